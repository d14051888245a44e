//! HCL rendering for converted resource blocks
//!
//! A [`ResourceBlock`] is the converter output: block header labels plus an
//! ordered list of attributes. Top-level attribute order is whatever the
//! converter declared (its schema order); nested objects go through
//! `serde_json::Map`, which iterates in sorted key order. Map iteration order
//! of the emitter therefore never depends on a hash map.

use hcl::expr::{Expression, Object, ObjectKey};
use hcl::{Attribute, Block, Body, Identifier, Number};
use serde_json::Value;

use crate::errors::{ConvertError, ConvertResult};

/// One `resource` block to be rendered
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceBlock {
    /// Block header components, e.g. `["google_project", "my-proj"]`
    pub labels: Vec<String>,

    /// Attributes in schema-declared order. Null values are dropped on
    /// emission; arrays of objects render as repeated nested blocks.
    pub fields: Vec<(String, Value)>,
}

impl ResourceBlock {
    pub fn new(labels: Vec<String>, fields: Vec<(String, Value)>) -> Self {
        Self { labels, fields }
    }
}

/// Render blocks as `resource "<kind>" "<name>" { ... }` text
pub fn emit(blocks: &[ResourceBlock]) -> ConvertResult<Vec<u8>> {
    let mut body = Body::builder();
    for block in blocks {
        body = body.add_block(build_block("resource", &block.labels, &block.fields));
    }
    let rendered = hcl::format::to_string(&body.build())
        .map_err(|e| ConvertError::Serialization(e.to_string()))?;
    Ok(rendered.into_bytes())
}

fn build_block(identifier: &str, labels: &[String], fields: &[(String, Value)]) -> Block {
    let mut builder = Block::builder(Identifier::sanitized(identifier));
    for label in labels {
        builder = builder.add_label(label.as_str());
    }
    for (key, value) in fields {
        match value {
            Value::Null => continue,
            Value::Array(items) if is_block_list(items) => {
                for item in items {
                    let nested: Vec<(String, Value)> = item
                        .as_object()
                        .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                        .unwrap_or_default();
                    builder = builder.add_block(build_block(key, &[], &nested));
                }
            }
            other => {
                builder = builder.add_attribute(Attribute::new(
                    Identifier::sanitized(key),
                    to_expression(other),
                ));
            }
        }
    }
    builder.build()
}

/// Non-empty arrays whose elements are all objects render as nested blocks
fn is_block_list(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(|v| v.is_object())
}

fn to_expression(value: &Value) -> Expression {
    match value {
        Value::Null => Expression::Null,
        Value::Bool(b) => Expression::Bool(*b),
        Value::Number(n) => Expression::Number(to_number(n)),
        Value::String(s) => Expression::String(s.clone()),
        Value::Array(items) => Expression::Array(items.iter().map(to_expression).collect()),
        Value::Object(map) => Expression::Object(
            map.iter()
                .map(|(k, v)| {
                    (
                        ObjectKey::Expression(Expression::String(k.clone())),
                        to_expression(v),
                    )
                })
                .collect::<Object<_, _>>(),
        ),
    }
}

fn to_number(n: &serde_json::Number) -> Number {
    if let Some(i) = n.as_i64() {
        Number::from(i)
    } else if let Some(u) = n.as_u64() {
        Number::from(u)
    } else {
        // f64 here is finite since it came from parsed JSON
        Number::from_f64(n.as_f64().unwrap_or(0.0)).unwrap_or_else(|| Number::from(0))
    }
}
