//! Decoding of serialized element trees.
//!
//! The stored schema is external and loosely enforced, so decoding is
//! tolerant: anything that is not a well-formed node is dropped instead of
//! failing the whole tree. Only a tree that is not JSON at all is an error.

use crate::error::{Result, WidgetscopeError};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use widgetscope_api::{DocumentRecord, ElementNode, ElementTree, RawTree};

const KIND_FIELD: &str = "elType";
const WIDGET_KIND: &str = "widget";
const WIDGET_TYPE_FIELD: &str = "widgetType";
const CHILDREN_FIELD: &str = "elements";

/// Decodes a raw tree into element nodes.
pub fn parse_raw_tree(raw: &RawTree) -> Result<ElementTree> {
    match raw {
        RawTree::Serialized(text) => {
            if text.trim().is_empty() {
                return Ok(Vec::new());
            }
            let value: Value = from_str_unbounded(text)?;
            nodes_from_value(&value)
        }
        RawTree::Inline(value) => nodes_from_value(value),
    }
}

/// Decodes the tree stored on a record. A record without a tree has no nodes.
pub fn parse_record(record: &DocumentRecord) -> Result<ElementTree> {
    match &record.raw_tree {
        Some(raw) => parse_raw_tree(raw),
        None => Ok(Vec::new()),
    }
}

/// Like [`parse_record`], but an undecodable tree counts as empty.
pub fn parse_record_or_empty(record: &DocumentRecord) -> ElementTree {
    parse_record(record).unwrap_or_else(|e| {
        tracing::debug!("Treating tree of document {} as empty: {}", record.id, e);
        Vec::new()
    })
}

/// Parses JSON without serde_json's nesting limit. Deep input grows the
/// stack on the heap instead of overflowing it.
pub(crate) fn from_str_unbounded<T: DeserializeOwned>(text: &str) -> serde_json::Result<T> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

fn nodes_from_value(value: &Value) -> Result<ElementTree> {
    match value {
        Value::Array(items) => Ok(items.iter().filter_map(node_from_value).collect()),
        // A bare object is a tree with a single root.
        Value::Object(_) => Ok(node_from_value(value).into_iter().collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(WidgetscopeError::Parsing(format!(
            "expected a sequence of elements, found {}",
            value_kind(other)
        ))),
    }
}

/// A node whose children are still being decoded.
struct Frame<'a> {
    object: &'a Map<String, Value>,
    pending: std::slice::Iter<'a, Value>,
    children: ElementTree,
}

impl<'a> Frame<'a> {
    fn new(object: &'a Map<String, Value>) -> Self {
        let pending = object
            .get(CHILDREN_FIELD)
            .and_then(Value::as_array)
            .map(|items| items.iter())
            .unwrap_or_default();
        Self {
            object,
            pending,
            children: Vec::new(),
        }
    }

    fn finish(self) -> ElementNode {
        let is_widget = self.object.get(KIND_FIELD).and_then(Value::as_str) == Some(WIDGET_KIND);
        let widget_type = self
            .object
            .get(WIDGET_TYPE_FIELD)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty());

        match (is_widget, widget_type) {
            (true, Some(widget_type)) => ElementNode::widget(widget_type, self.children),
            _ => ElementNode::container(self.children),
        }
    }
}

// Builds bottom-up with an explicit stack so tree depth never touches the
// call stack.
fn node_from_value(value: &Value) -> Option<ElementNode> {
    let mut stack = vec![Frame::new(value.as_object()?)];

    while let Some(top) = stack.last_mut() {
        match top.pending.next() {
            Some(child) => {
                if let Some(object) = child.as_object() {
                    stack.push(Frame::new(object));
                }
            }
            None => {
                let node = stack.pop()?.finish();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Some(node),
                }
            }
        }
    }
    None
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
