//! XML to JSON value conversion.

use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, Event};
use serde_json::{Map, Value};

use crate::error::XmlError;

/// Key under which element attributes are collected.
pub const ATTRIBUTES_KEY: &str = "$";

/// Key under which text is kept when an element also has children or attributes.
pub const TEXT_KEY: &str = "_";

/// An element that has been opened but not closed yet.
#[derive(Debug)]
struct Frame {
    name: String,
    attributes: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Map::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.decode_and_unescape_value(reader.decoder())?;
            attributes.insert(key, Value::String(value.into_owned()));
        }
        Ok(Self {
            name,
            attributes,
            children: Map::new(),
            text: String::new(),
        })
    }

    fn into_value(self) -> (String, Value) {
        if self.children.is_empty() && self.attributes.is_empty() {
            return (self.name, Value::String(self.text));
        }

        let mut object = self.children;
        if !self.attributes.is_empty() {
            object.insert(ATTRIBUTES_KEY.to_owned(), Value::Object(self.attributes));
        }
        let text = self.text.trim();
        if !text.is_empty() {
            object.insert(TEXT_KEY.to_owned(), Value::String(text.to_owned()));
        }
        (self.name, Value::Object(object))
    }
}

/// Convert an XML document into a [`Value`].
///
/// # Examples
///
/// ```
/// use serde_json::json;
///
/// let value = vaultclient_xml::xml_to_value(
///     b"<ErrorResponse><Error><Code>AccessDenied</Code></Error></ErrorResponse>",
/// )
/// .unwrap();
/// assert_eq!(
///     value,
///     json!({"ErrorResponse": {"Error": {"Code": "AccessDenied"}}})
/// );
/// ```
///
/// # Errors
///
/// Returns [`XmlError`] when the document is malformed, has no root element
/// or contains content after the root element.
pub fn xml_to_value(xml: &[u8]) -> Result<Value, XmlError> {
    let mut reader = Reader::from_reader(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Value> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if root.is_some() {
                    return Err(trailing_element(&e));
                }
                stack.push(Frame::open(&e, &reader)?);
            }
            Event::Empty(e) => {
                if root.is_some() {
                    return Err(trailing_element(&e));
                }
                let frame = Frame::open(&e, &reader)?;
                close(frame, &mut stack, &mut root);
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or_else(|| {
                    XmlError::UnexpectedElement("closing tag without an open element".to_owned())
                })?;
                close(frame, &mut stack, &mut root);
            }
            Event::Text(e) => {
                if let Some(frame) = stack.last_mut() {
                    let decoded = e
                        .decode()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    frame.text.push_str(&decoded);
                }
            }
            Event::CData(e) => {
                if let Some(frame) = stack.last_mut() {
                    let decoded = e
                        .decode()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    frame.text.push_str(&decoded);
                }
            }
            Event::GeneralRef(e) => {
                if let Some(frame) = stack.last_mut() {
                    push_reference(&mut frame.text, &e)?;
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            // carry nothing for the caller.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::UnexpectedElement(format!(
            "unexpected EOF inside <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| XmlError::MissingElement("root element".to_owned()))
}

/// Attach a closed element to its parent, or make it the document root.
fn close(frame: Frame, stack: &mut [Frame], root: &mut Option<Value>) {
    let (name, value) = frame.into_value();
    match stack.last_mut() {
        Some(parent) => insert_child(&mut parent.children, name, value),
        None => {
            let mut document = Map::new();
            document.insert(name, value);
            *root = Some(Value::Object(document));
        }
    }
}

/// Insert `value` under `name`, turning repeated names into arrays.
fn insert_child(children: &mut Map<String, Value>, name: String, value: Value) {
    match children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            children.insert(name, value);
        }
    }
}

/// Resolve `&name;` or `&#N;` into `text`.
fn push_reference(text: &mut String, reference: &BytesRef<'_>) -> Result<(), XmlError> {
    if let Some(ch) = reference.resolve_char_ref()? {
        text.push(ch);
        return Ok(());
    }
    let name = reference
        .decode()
        .map_err(|err| XmlError::ParseError(err.to_string()))?;
    let resolved = quick_xml::escape::resolve_predefined_entity(&name)
        .ok_or_else(|| XmlError::ParseError(format!("unknown entity: &{name};")))?;
    text.push_str(resolved);
    Ok(())
}

fn trailing_element(start: &BytesStart<'_>) -> XmlError {
    XmlError::UnexpectedElement(format!(
        "<{}> after the root element",
        String::from_utf8_lossy(start.name().as_ref())
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_should_convert_error_response_envelope() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<ErrorResponse>
  <Error>
    <Code>EntityAlreadyExists</Code>
    <Message>The request was rejected because it attempted to create a resource that already exists.</Message>
  </Error>
  <RequestId>7f3a</RequestId>
</ErrorResponse>"#;

        let value = xml_to_value(xml).unwrap();
        assert_eq!(
            value,
            json!({
                "ErrorResponse": {
                    "Error": {
                        "Code": "EntityAlreadyExists",
                        "Message": "The request was rejected because it attempted to create a resource that already exists."
                    },
                    "RequestId": "7f3a"
                }
            })
        );
    }

    #[test]
    fn test_should_collect_repeated_siblings_into_array() {
        let xml = b"<Accounts><Account>a</Account><Account>b</Account><Account>c</Account></Accounts>";
        let value = xml_to_value(xml).unwrap();
        assert_eq!(value, json!({"Accounts": {"Account": ["a", "b", "c"]}}));
    }

    #[test]
    fn test_should_keep_attributes_and_mixed_text() {
        let xml = br#"<Entry id="1" kind="user">note<Name>bob</Name></Entry>"#;
        let value = xml_to_value(xml).unwrap();
        assert_eq!(
            value,
            json!({
                "Entry": {
                    "Name": "bob",
                    "$": {"id": "1", "kind": "user"},
                    "_": "note"
                }
            })
        );
    }

    #[test]
    fn test_should_map_empty_elements_to_empty_strings() {
        let value = xml_to_value(b"<Response><Marker/><Code></Code></Response>").unwrap();
        assert_eq!(value, json!({"Response": {"Marker": "", "Code": ""}}));
    }

    #[test]
    fn test_should_resolve_entities_and_cdata() {
        let xml = b"<Message>a &amp; b &#x3C; c<![CDATA[ <raw> ]]></Message>";
        let value = xml_to_value(xml).unwrap();
        assert_eq!(value, json!({"Message": "a & b < c <raw> "}));
    }

    #[test]
    fn test_should_reject_truncated_document() {
        let result = xml_to_value(b"<Response><Code>foo</Code>");
        assert!(matches!(result, Err(XmlError::UnexpectedElement(_))));
    }

    #[test]
    fn test_should_reject_document_without_root() {
        let result = xml_to_value(b"<?xml version=\"1.0\"?>");
        assert!(matches!(result, Err(XmlError::MissingElement(_))));
    }

    #[test]
    fn test_should_reject_mismatched_end_tag() {
        assert!(xml_to_value(b"<Response><Code>foo</Message></Response>").is_err());
    }

    #[test]
    fn test_should_reject_second_root() {
        let result = xml_to_value(b"<A>1</A><B>2</B>");
        assert!(matches!(result, Err(XmlError::UnexpectedElement(_))));
    }
}
