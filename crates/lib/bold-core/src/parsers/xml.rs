//! XML body parsing into a nested mapping.
//!
//! Element names become keys and repeated siblings collapse into an array
//! under one key. Attributes are stored as `@name`; text that sits next to
//! attributes or child elements is stored as `#text`. A leaf element maps to
//! its trimmed text, or `null` when it has none. Names keep their namespace
//! prefix (`a:x`), and namespace declarations are kept as `@xmlns` or
//! `@xmlns:prefix` on the element that declares them.

use roxmltree::{Document, Node, ParsingOptions};
use serde_json::{Map, Value};

use super::ParseError;

/// Parses an XML body into a mapping keyed by the root element name.
///
/// A body with no content parses to an empty mapping.
///
/// # Errors
/// Returns `ParseError::MalformedXml` if the body is not well-formed XML.
pub fn parse(body: &str) -> Result<Map<String, Value>, ParseError> {
    let mut document = Map::new();
    if body.trim().is_empty() {
        return Ok(document);
    }

    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(body, options)?;
    let root = doc.root_element();
    document.insert(element_name(root), element_value(root));
    Ok(document)
}

/// Counts child elements of the document root across all keys.
#[must_use]
pub fn record_count(document: &Map<String, Value>) -> usize {
    document
        .values()
        .filter_map(Value::as_object)
        .map(|root| {
            root.iter()
                .filter(|(key, _)| is_element_key(key))
                .map(|(_, value)| value.as_array().map_or(1, Vec::len))
                .sum::<usize>()
        })
        .sum()
}

/// Keeps the first `limit` child elements of the document root, walking keys
/// in order. Attributes and text of the root are untouched.
pub fn truncate_records(document: &mut Map<String, Value>, limit: usize) {
    let mut remaining = limit;
    for root in document.values_mut().filter_map(Value::as_object_mut) {
        root.retain(|key, value| {
            if !is_element_key(key) {
                return true;
            }
            if let Value::Array(items) = value {
                items.truncate(remaining);
                remaining -= items.len();
                !items.is_empty()
            } else if remaining > 0 {
                remaining -= 1;
                true
            } else {
                false
            }
        });
    }
}

fn is_element_key(key: &str) -> bool {
    !key.starts_with('@') && !key.starts_with('#')
}

fn qualified_name(node: Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

fn element_name(node: Node<'_, '_>) -> String {
    let tag = node.tag_name();
    qualified_name(node, tag.namespace(), tag.name())
}

/// Namespace declarations made on `node` itself, not inherited from a parent.
fn declared_namespaces(node: Node<'_, '_>, map: &mut Map<String, Value>) {
    let parent = node.parent_element();
    for namespace in node.namespaces() {
        if namespace.name() == Some("xml") {
            continue;
        }
        let inherited = parent.is_some_and(|parent| {
            parent
                .namespaces()
                .any(|outer| outer.name() == namespace.name() && outer.uri() == namespace.uri())
        });
        if inherited {
            continue;
        }
        let key = namespace
            .name()
            .map_or_else(|| "@xmlns".to_string(), |prefix| format!("@xmlns:{prefix}"));
        map.insert(key, Value::String(namespace.uri().to_string()));
    }
}

fn element_value(node: Node<'_, '_>) -> Value {
    let mut map = Map::new();
    declared_namespaces(node, &mut map);
    for attribute in node.attributes() {
        let name = qualified_name(node, attribute.namespace(), attribute.name());
        map.insert(format!("@{name}"), Value::String(attribute.value().to_string()));
    }

    let mut text = String::new();
    for child in node.children() {
        if child.is_element() {
            push_child(&mut map, &element_name(child), element_value(child));
        } else if child.is_text() {
            text.push_str(child.text().unwrap_or(""));
        }
    }

    let text = text.trim();
    if map.is_empty() {
        return if text.is_empty() {
            Value::Null
        } else {
            Value::String(text.to_string())
        };
    }
    if !text.is_empty() {
        map.insert("#text".to_string(), Value::String(text.to_string()));
    }
    Value::Object(map)
}

fn push_child(map: &mut Map<String, Value>, name: &str, value: Value) {
    match map.get_mut(name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(name.to_string(), value);
        }
    }
}
