//! Locating and normalizing the SOAP body

use crate::{XmlMap, XmlValue};

/// Extract the contents of the SOAP `Body` from a parsed envelope
///
/// The first entry of `document` is taken as the envelope. Its child whose
/// local name is `Body` (with or without a namespace prefix) is returned with
/// every key passed through [`normalize_key`], so `<soap:Fault>` becomes
/// `fault` and `<errorCode>` becomes `error_code`.
///
/// A document without an envelope or without a body yields an empty mapping.
pub fn find_soap_body(document: &XmlMap) -> XmlMap {
    let envelope = match document.values().next().and_then(XmlValue::as_map) {
        Some(envelope) => envelope,
        None => return XmlMap::new(),
    };

    envelope
        .iter()
        .find(|(key, _)| local_name(key) == "Body")
        .and_then(|(_, body)| body.as_map())
        .map(normalize_map)
        .unwrap_or_default()
}

/// Strip a namespace prefix from an element name
///
/// `soap:Fault` → `Fault`, `Fault` → `Fault`
pub fn local_name(name: &str) -> &str {
    match name.rfind(':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Convert an element name to the key used in normalized mappings
///
/// The namespace prefix is dropped and the name is converted to snake_case:
/// `env:faultCode` → `fault_code`, `UPnPError` → `u_pn_p_error`,
/// `HTTPStatus` → `http_status`.
pub fn normalize_key(name: &str) -> String {
    snake_case(local_name(name))
}

fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = if i > 0 { Some(chars[i - 1]) } else { None };
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                // End of an acronym: "HTTPStatus" splits before the "S"
                Some(p) if p.is_ascii_uppercase() => next.map_or(false, |n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else if c == '-' || c == '.' {
            result.push('_');
        } else {
            result.push(c);
        }
    }

    result
}

fn normalize_map(map: &XmlMap) -> XmlMap {
    map.iter()
        .map(|(key, value)| (normalize_key(key), normalize_value(value)))
        .collect()
}

fn normalize_value(value: &XmlValue) -> XmlValue {
    match value {
        XmlValue::Map(map) => XmlValue::Map(normalize_map(map)),
        XmlValue::List(items) => XmlValue::List(items.iter().map(normalize_value).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use rstest::rstest;

    #[rstest]
    #[case("Fault", "fault")]
    #[case("soap:Fault", "fault")]
    #[case("faultcode", "faultcode")]
    #[case("errorCode", "error_code")]
    #[case("UPnPError", "u_pn_p_error")]
    #[case("HTTPStatus", "http_status")]
    #[case("GetVolumeResponse", "get_volume_response")]
    #[case("error-code.v2", "error_code_v2")]
    #[case("level2Value", "level2_value")]
    fn test_normalize_key(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_key(input), expected);
    }

    #[test]
    fn test_find_soap_body_normalizes_nested_keys() {
        let xml = br#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">
            <soap:Header><Token>abc</Token></soap:Header>
            <soap:Body>
                <soap:Fault>
                    <soap:Code><soap:Value>soap:Sender</soap:Value></soap:Code>
                </soap:Fault>
            </soap:Body>
        </soap:Envelope>"#;
        let document = parse(xml).unwrap();
        let body = find_soap_body(&document);

        assert_eq!(body.keys().collect::<Vec<_>>(), vec!["fault"]);
        assert_eq!(
            body.lookup(&["fault", "code", "value"]).and_then(XmlValue::as_text),
            Some("soap:Sender")
        );
    }

    #[test]
    fn test_find_soap_body_accepts_unprefixed_body() {
        let document = parse(b"<Envelope><Body><PingResponse>pong</PingResponse></Body></Envelope>").unwrap();
        let body = find_soap_body(&document);

        assert_eq!(
            body.get("ping_response").and_then(XmlValue::as_text),
            Some("pong")
        );
    }

    #[test]
    fn test_find_soap_body_without_body() {
        let document = parse(b"<Envelope><Header>x</Header></Envelope>").unwrap();
        assert!(find_soap_body(&document).is_empty());

        let document = parse(b"<Envelope/>").unwrap();
        assert!(find_soap_body(&document).is_empty());

        assert!(find_soap_body(&XmlMap::new()).is_empty());
    }

    #[test]
    fn test_find_soap_body_normalizes_lists() {
        let document = parse(
            b"<Envelope><Body><Items><ItemName>a</ItemName><ItemName>b</ItemName></Items></Body></Envelope>",
        )
        .unwrap();
        let body = find_soap_body(&document);

        let names = body.lookup(&["items", "item_name"]).and_then(XmlValue::as_list).unwrap();
        assert_eq!(names.len(), 2);
    }
}
