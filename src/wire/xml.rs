//! XML encoding for Redmine request bodies.
//!
//! Redmine accepts create/update payloads as XML with a few conventions:
//!
//! - list fields are wrapped in an element carrying `type="array"`, whose
//!   children use a singular tag name (`<user_ids type="array"><user_id>…`);
//! - custom fields carry `name`, `field_format` and `id` as attributes, and
//!   multi-value fields nest their values in `<value type="array">`;
//! - upload-style custom field values (maps with a `token`) are also marked
//!   `multiple="true"`, but their entries become plain children of a single
//!   `<value>`.
//!
//! # Example
//!
//! ```rust
//! use redmine_api::wire::{xml::XmlEncoder, WireValue};
//! use serde_json::json;
//!
//! let payload = WireValue::from(json!({
//!     "name": "Developers",
//!     "user_ids": [3, 5],
//! }));
//!
//! let body = XmlEncoder::new("group").encode(&payload);
//! assert_eq!(
//!     body,
//!     "<?xml version=\"1.0\"?>\n<group><name>Developers</name>\
//!      <user_ids type=\"array\"><user_id>3</user_id><user_id>5</user_id></user_ids></group>\n"
//! );
//! ```

use std::borrow::Cow;
use std::collections::HashSet;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::wire::{SerializerError, WireMap, WireValue};

/// Declaration written at the top of every encoded document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0"?>"#;

/// Key whose list value is encoded with the custom field rules.
const CUSTOM_FIELDS: &str = "custom_fields";

/// Item tags shared by every resource.
const DEFAULT_SINGULARS: &[(&str, &str)] = &[
    ("uploads", "upload"),
    ("watcher_user_ids", "watcher_user_id"),
    ("user_ids", "user_id"),
    ("role_ids", "role_id"),
];

/// Encodes wire values into Redmine's XML request dialect.
///
/// Item tags for list fields come from a per-field table; resources extend
/// it with [`XmlEncoder::singular`].
#[derive(Debug, Clone)]
pub struct XmlEncoder<'a> {
    root: &'a str,
    singulars: Vec<(&'a str, &'a str)>,
}

impl<'a> XmlEncoder<'a> {
    /// Creates an encoder for documents rooted at `root`.
    #[must_use]
    pub fn new(root: &'a str) -> Self {
        Self {
            root,
            singulars: DEFAULT_SINGULARS.to_vec(),
        }
    }

    /// Sets the item tag used for the elements of list field `key`.
    #[must_use]
    pub fn singular(mut self, key: &'a str, tag: &'a str) -> Self {
        self.singulars.retain(|(k, _)| *k != key);
        self.singulars.push((key, tag));
        self
    }

    /// Encodes `value` as a complete document.
    ///
    /// Map keys become child elements of the root in map order. Encoding
    /// never fails.
    #[must_use]
    pub fn encode(&self, value: &WireValue) -> String {
        let mut out = String::with_capacity(128);
        out.push_str(XML_DECLARATION);
        out.push('\n');
        self.write_element(&mut out, self.root, value);
        out.push('\n');
        out
    }

    fn item_tag<'k>(&'k self, key: &'k str) -> Cow<'k, str> {
        self.singulars
            .iter()
            .find(|(k, _)| *k == key)
            .map_or_else(|| naive_singular(key), |(_, tag)| Cow::Borrowed(*tag))
    }

    fn write_element(&self, out: &mut String, name: &str, value: &WireValue) {
        match value {
            WireValue::List(items) if name == CUSTOM_FIELDS => {
                self.write_custom_fields(out, items);
            }
            WireValue::Null => {
                out.push('<');
                out.push_str(name);
                out.push_str("/>");
            }
            WireValue::List(items) => {
                open_tag(out, name, &[("type", "array")]);
                let tag = self.item_tag(name);
                for item in items {
                    self.write_element(out, &tag, item);
                }
                close_tag(out, name);
            }
            WireValue::Map(map) => {
                open_tag(out, name, &[]);
                self.write_children(out, map);
                close_tag(out, name);
            }
            scalar => {
                open_tag(out, name, &[]);
                push_text(out, scalar);
                close_tag(out, name);
            }
        }
    }

    fn write_children(&self, out: &mut String, map: &WireMap) {
        for (key, value) in map {
            self.write_element(out, key, value);
        }
    }

    fn write_custom_fields(&self, out: &mut String, fields: &[WireValue]) {
        open_tag(out, CUSTOM_FIELDS, &[("type", "array")]);
        for field in fields.iter().filter_map(WireValue::as_map) {
            let mut attributes: Vec<(&str, String)> = ["name", "field_format", "id"]
                .into_iter()
                .filter_map(|key| {
                    field.get(key)
                        .and_then(WireValue::scalar_text)
                        .map(|text| (key, text))
                })
                .collect();

            let value = field.get("value").unwrap_or(&WireValue::Null);
            let multiple: Option<Vec<&WireValue>> = match value {
                WireValue::Map(map) if map.contains_key("token") => None,
                WireValue::Map(map) => Some(map.values().collect()),
                WireValue::List(items) => Some(items.iter().collect()),
                _ => None,
            };
            if matches!(value, WireValue::List(_) | WireValue::Map(_)) {
                attributes.push(("multiple", "true".to_string()));
            }

            let attributes: Vec<(&str, &str)> = attributes
                .iter()
                .map(|(key, text)| (*key, text.as_str()))
                .collect();
            open_tag(out, "custom_field", &attributes);

            match (multiple, value) {
                (Some(values), _) => {
                    open_tag(out, "value", &[("type", "array")]);
                    for item in values {
                        self.write_element(out, "value", item);
                    }
                    close_tag(out, "value");
                }
                (None, WireValue::Map(upload)) => {
                    open_tag(out, "value", &[]);
                    self.write_children(out, upload);
                    close_tag(out, "value");
                }
                (None, scalar) => self.write_element(out, "value", scalar),
            }

            close_tag(out, "custom_field");
        }
        close_tag(out, CUSTOM_FIELDS);
    }
}

/// Encodes `value` under `root` with the default item tag table.
#[must_use]
pub fn encode(root: &str, value: &WireValue) -> String {
    XmlEncoder::new(root).encode(value)
}

fn naive_singular(key: &str) -> Cow<'_, str> {
    if let Some(stem) = key.strip_suffix("ies") {
        return Cow::Owned(format!("{stem}y"));
    }
    match key.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => Cow::Borrowed(stem),
        _ => Cow::Borrowed(key),
    }
}

fn open_tag(out: &mut String, name: &str, attributes: &[(&str, &str)]) {
    out.push('<');
    out.push_str(name);
    for (key, value) in attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(*value));
        out.push('"');
    }
    out.push('>');
}

fn close_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn push_text(out: &mut String, value: &WireValue) {
    if let Some(text) = value.scalar_text() {
        out.push_str(&escape(text.as_str()));
    }
}

/// Decodes an XML document.
///
/// The document becomes `{root_name: content}`, the same shape Redmine uses
/// for JSON responses. Elements marked `type="array"` decode to lists; for an
/// array root the remaining root attributes (`total_count`, `offset`,
/// `limit`) are placed next to the list. An empty body decodes to
/// [`WireValue::Null`].
///
/// # Errors
///
/// Returns [`SerializerError::Xml`] for malformed markup.
///
/// # Example
///
/// ```rust
/// use redmine_api::wire::{xml, WireValue};
///
/// let value = xml::decode(
///     r#"<issues type="array" total_count="1" offset="0" limit="25">
///          <issue><id>4</id><subject>Crash</subject></issue>
///        </issues>"#,
/// ).unwrap();
///
/// assert_eq!(value.get("total_count").and_then(WireValue::as_i64), Some(1));
/// let issues = value.get("issues").and_then(WireValue::as_list).unwrap();
/// assert_eq!(issues[0].get("subject").and_then(WireValue::as_str), Some("Crash"));
/// ```
pub fn decode(body: &str) -> Result<WireValue, SerializerError> {
    if body.trim().is_empty() {
        return Ok(WireValue::Null);
    }

    let root = parse_tree(body)?;
    let mut document = WireMap::new();

    if root.is_array() {
        let lifted: Vec<(String, String)> = root
            .attributes
            .iter()
            .filter(|(key, _)| key != "type")
            .cloned()
            .collect();
        document.insert(root.name.clone(), root.into_value());
        for (key, value) in lifted {
            document.insert(key, WireValue::String(value));
        }
    } else {
        document.insert(root.name.clone(), root.into_value());
    }

    Ok(WireValue::Map(document))
}

#[derive(Debug)]
struct Node {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
    text: String,
}

impl Node {
    fn open(start: &BytesStart<'_>, body: &str) -> Result<Self, SerializerError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| SerializerError::xml(e, body))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| SerializerError::xml(e, body))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    fn is_array(&self) -> bool {
        self.attributes
            .iter()
            .any(|(key, value)| key == "type" && value == "array")
    }

    fn into_value(self) -> WireValue {
        if self.is_array() {
            return WireValue::List(self.children.into_iter().map(Self::into_value).collect());
        }

        let mut map: WireMap = self
            .attributes
            .into_iter()
            .filter(|(key, _)| key != "type")
            .map(|(key, value)| (key, WireValue::String(value)))
            .collect();

        if self.children.is_empty() {
            if map.is_empty() {
                return WireValue::String(self.text);
            }
            if !self.text.is_empty() {
                map.insert("value".to_string(), WireValue::String(self.text));
            }
            return WireValue::Map(map);
        }

        let mut repeated: HashSet<String> = HashSet::new();
        for child in self.children {
            let name = child.name.clone();
            let value = child.into_value();
            match map.get_mut(&name) {
                Some(WireValue::List(items)) if repeated.contains(&name) => items.push(value),
                Some(slot) => {
                    let first = std::mem::take(slot);
                    *slot = WireValue::List(vec![first, value]);
                    repeated.insert(name);
                }
                None => {
                    map.insert(name, value);
                }
            }
        }
        WireValue::Map(map)
    }
}

fn parse_tree(body: &str) -> Result<Node, SerializerError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader
            .read_event()
            .map_err(|e| SerializerError::xml(e, body))?
        {
            Event::Start(start) => stack.push(Node::open(&start, body)?),
            Event::Empty(start) => {
                let node = Node::open(&start, body)?;
                attach(&mut stack, &mut root, node, body)?;
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| SerializerError::xml("unexpected closing tag", body))?;
                attach(&mut stack, &mut root, node, body)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| SerializerError::xml(e, body))?;
                push_content(&mut stack, &text, body)?;
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                push_content(&mut stack, &text, body)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(SerializerError::xml(
            format!("element <{}> is never closed", open.name),
            body,
        ));
    }

    root.ok_or_else(|| SerializerError::xml("document has no root element", body))
}

fn attach(
    stack: &mut [Node],
    root: &mut Option<Node>,
    node: Node,
    body: &str,
) -> Result<(), SerializerError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        Ok(())
    } else if root.is_some() {
        Err(SerializerError::xml("document has more than one root element", body))
    } else {
        *root = Some(node);
        Ok(())
    }
}

fn push_content(stack: &mut [Node], text: &str, body: &str) -> Result<(), SerializerError> {
    match stack.last_mut() {
        Some(node) => {
            node.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(SerializerError::xml("text outside of the root element", body)),
    }
}
