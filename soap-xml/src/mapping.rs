//! Generic structured mapping produced from XML

use serde::Serialize;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// A mapping from element (or attribute) names to their values
///
/// Keys are kept sorted so that two parses of the same document always
/// compare and serialize identically.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct XmlMap(BTreeMap<String, XmlValue>);

/// The value of a single XML element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XmlValue {
    /// An empty element such as `<detail/>`
    Null,
    /// Character data of a leaf element
    Text(String),
    /// An element with child elements
    Map(XmlMap),
    /// Repeated sibling elements sharing the same name
    List(Vec<XmlValue>),
}

impl XmlMap {
    /// Create an empty mapping
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: XmlValue) -> Option<XmlValue> {
        self.0.insert(key.into(), value)
    }

    /// Insert a value, turning the entry into a list if the key already exists
    ///
    /// This mirrors how repeated sibling elements are represented:
    /// `<item>a</item><item>b</item>` becomes `item: [a, b]`.
    pub fn append(&mut self, key: impl Into<String>, value: XmlValue) {
        match self.0.entry(key.into()) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(value);
            }
            btree_map::Entry::Occupied(mut entry) => match entry.get_mut() {
                XmlValue::List(items) => items.push(value),
                existing => {
                    let first = std::mem::replace(existing, XmlValue::Null);
                    *existing = XmlValue::List(vec![first, value]);
                }
            },
        }
    }

    /// Follow a path of keys through nested maps
    ///
    /// Returns `None` as soon as a key is missing or an intermediate value
    /// is not a map.
    pub fn lookup(&self, path: &[&str]) -> Option<&XmlValue> {
        let (first, rest) = path.split_first()?;
        let mut value = self.get(first)?;
        for key in rest {
            value = value.as_map()?.get(key)?;
        }
        Some(value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &XmlValue> {
        self.0.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &XmlValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl FromIterator<(String, XmlValue)> for XmlMap {
    fn from_iter<I: IntoIterator<Item = (String, XmlValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl XmlValue {
    /// Text content of a leaf element
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&XmlMap> {
        match self {
            XmlValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[XmlValue]> {
        match self {
            XmlValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, XmlValue::Null)
    }
}

impl fmt::Display for XmlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmlValue::Null => Ok(()),
            XmlValue::Text(text) => f.write_str(text),
            XmlValue::Map(map) => write!(f, "{}", map),
            XmlValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl fmt::Display for XmlMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> XmlValue {
        XmlValue::Text(value.to_string())
    }

    #[test]
    fn test_append_builds_list_for_repeated_keys() {
        let mut map = XmlMap::new();
        map.append("item", text("a"));
        assert_eq!(map.get("item"), Some(&text("a")));

        map.append("item", text("b"));
        map.append("item", text("c"));
        assert_eq!(
            map.get("item").and_then(XmlValue::as_list),
            Some(&[text("a"), text("b"), text("c")][..])
        );
    }

    #[test]
    fn test_lookup_nested_path() {
        let mut detail = XmlMap::new();
        detail.insert("errorcode", text("42"));
        let mut fault = XmlMap::new();
        fault.insert("detail", XmlValue::Map(detail));
        fault.insert("faultstring", text("boom"));

        assert_eq!(fault.lookup(&["detail", "errorcode"]), Some(&text("42")));
        assert_eq!(fault.lookup(&["faultstring", "errorcode"]), None);
        assert_eq!(fault.lookup(&["missing"]), None);
        assert_eq!(fault.lookup(&[]), None);
    }

    #[test]
    fn test_display_formats() {
        let mut map = XmlMap::new();
        map.insert("a", text("1"));
        map.insert("b", XmlValue::List(vec![text("x"), XmlValue::Null]));

        assert_eq!(XmlValue::Null.to_string(), "");
        assert_eq!(text("hello").to_string(), "hello");
        assert_eq!(map.to_string(), "{a: 1, b: [x, ]}");
    }

    #[test]
    fn test_serializes_as_plain_json() {
        let mut inner = XmlMap::new();
        inner.insert("value", text("soap:Sender"));
        let mut map = XmlMap::new();
        map.insert("code", XmlValue::Map(inner));
        map.insert("node", XmlValue::Null);

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": { "value": "soap:Sender" }, "node": null })
        );
    }
}
