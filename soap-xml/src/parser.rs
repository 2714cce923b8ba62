//! XML parsing into [`XmlMap`] using xmltree

use crate::{Result, XmlError, XmlMap, XmlValue};
use xmltree::{Element, XMLNode};

/// A fallible conversion from raw response bytes into a structured mapping
///
/// The response wrapper only ever talks to this trait, so tests and callers
/// with unusual payloads can plug in their own parser. Closures with the
/// matching signature implement it too.
pub trait XmlParser: Send + Sync {
    fn parse(&self, raw: &[u8]) -> Result<XmlMap>;
}

/// The default parser, backed by [`xmltree`]
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlTreeParser;

impl XmlParser for XmlTreeParser {
    fn parse(&self, raw: &[u8]) -> Result<XmlMap> {
        parse(raw)
    }
}

impl<F> XmlParser for F
where
    F: Fn(&[u8]) -> Result<XmlMap> + Send + Sync,
{
    fn parse(&self, raw: &[u8]) -> Result<XmlMap> {
        self(raw)
    }
}

/// Parse raw XML into a mapping keyed by the root element's qualified name
///
/// Element names keep their namespace prefix (`s:Envelope`); use
/// [`find_soap_body`](crate::find_soap_body) to get a normalized view of the
/// SOAP body.
pub fn parse(raw: &[u8]) -> Result<XmlMap> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(XmlError::Empty);
    }

    let root = Element::parse(raw).map_err(|e| XmlError::Parse(e.to_string()))?;

    let mut document = XmlMap::new();
    document.insert(qualified_name(&root), element_value(&root));
    Ok(document)
}

fn qualified_name(element: &Element) -> String {
    match &element.prefix {
        Some(prefix) => format!("{}:{}", prefix, element.name),
        None => element.name.clone(),
    }
}

fn element_value(element: &Element) -> XmlValue {
    let mut children = XmlMap::new();
    let mut text = String::new();

    for node in &element.children {
        match node {
            XMLNode::Element(child) => children.append(qualified_name(child), element_value(child)),
            XMLNode::Text(chunk) | XMLNode::CData(chunk) => text.push_str(chunk),
            _ => {}
        }
    }

    // Text wins over attributes on leaf elements, e.g. <Text xml:lang="en">..</Text>
    if children.is_empty() && !text.trim().is_empty() {
        return XmlValue::Text(text);
    }

    for (name, value) in &element.attributes {
        if !children.contains_key(name) {
            children.insert(name.clone(), XmlValue::Text(value.clone()));
        }
    }

    if children.is_empty() {
        XmlValue::Null
    } else {
        XmlValue::Map(children)
    }
}
