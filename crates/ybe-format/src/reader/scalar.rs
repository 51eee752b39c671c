//! Coercion of tree nodes into field values.
//!
//! Each function returns a message describing the mismatch on failure; the
//! caller attaches it to the field being read.

use jiff::civil::Date;
use strum::IntoEnumIterator;
use ybe_core::model::Points;
use ybe_core::text::{TextContent, TextFormat};
use ybe_core::tree::{Mapping, Node};

pub type Coerced<T> = std::result::Result<T, String>;

/// 2^63, the first float above the `i64` range.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

fn found(node: &Node) -> String {
    match node {
        Node::String(value) => format!("'{value}'"),
        other => other.type_name().to_owned(),
    }
}

/// Reads an optional string; numbers and booleans are stringified.
pub fn optional_string(node: Option<&Node>) -> Coerced<Option<String>> {
    match node {
        None | Some(Node::Null) => Ok(None),
        Some(node) => node
            .scalar_to_string()
            .map(Some)
            .ok_or_else(|| format!("expected a string, found {}", node.type_name())),
    }
}

/// Reads a list of strings, accepting a bare scalar as a single-item list.
pub fn string_list(node: Option<&Node>) -> Coerced<Vec<String>> {
    match node {
        None | Some(Node::Null) => Ok(Vec::new()),
        Some(Node::Sequence(items)) => items
            .iter()
            .map(|item| {
                item.scalar_to_string().ok_or_else(|| {
                    format!("expected a list of strings, found a {} item", item.type_name())
                })
            })
            .collect(),
        Some(Node::Mapping(_)) => Err("expected a string or a list of strings, found mapping".to_owned()),
        Some(scalar) => Ok(scalar.scalar_to_string().into_iter().collect()),
    }
}

pub fn boolean(node: Option<&Node>) -> Coerced<bool> {
    match node {
        None | Some(Node::Null) => Ok(false),
        Some(Node::Bool(value)) => Ok(*value),
        Some(other) => Err(format!("expected a boolean, found {}", found(other))),
    }
}

/// Reads an optional number; integral values become integers.
pub fn points(node: Option<&Node>) -> Coerced<Option<Points>> {
    let value = match node {
        None | Some(Node::Null) => return Ok(None),
        Some(Node::Integer(value)) => return Ok(Some(Points::Integer(*value))),
        Some(Node::Float(value)) => *value,
        Some(Node::String(value)) => value
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("expected a number, found '{value}'"))?,
        Some(other) => return Err(format!("expected a number, found {}", other.type_name())),
    };

    Points::from_f64(value)
        .map(Some)
        .ok_or_else(|| format!("expected a finite number, found {value}"))
}

/// Reads an optional integer, accepting integral floats and numeric strings.
pub fn integer(node: Option<&Node>) -> Coerced<Option<i64>> {
    let expected = |node: &Node| format!("expected an integer, found {}", found(node));
    match node {
        None | Some(Node::Null) => Ok(None),
        Some(Node::Integer(value)) => Ok(Some(*value)),
        Some(node @ Node::Float(value)) => {
            if !value.is_finite() || value.fract() != 0.0 {
                Err(expected(node))
            } else if (-I64_LIMIT..I64_LIMIT).contains(value) {
                Ok(Some(*value as i64))
            } else {
                Err(format!("integer {value:e} is out of range"))
            }
        }
        Some(node @ Node::String(value)) => {
            value.trim().parse().map(Some).map_err(|_| expected(node))
        }
        Some(node) => Err(expected(node)),
    }
}

/// Reads an optional count such as a word limit.
pub fn count(node: Option<&Node>) -> Coerced<Option<u32>> {
    match integer(node)? {
        None => Ok(None),
        Some(value) => u32::try_from(value)
            .map(Some)
            .map_err(|_| format!("expected a non-negative integer, found {value}")),
    }
}

/// Reads an optional ISO calendar date such as `2020-04-07`.
pub fn date(node: Option<&Node>) -> Coerced<Option<Date>> {
    match node {
        None | Some(Node::Null) => Ok(None),
        Some(Node::String(value)) => value
            .trim()
            .parse::<Date>()
            .map(Some)
            .map_err(|err| format!("invalid date '{value}': {err}")),
        Some(other) => Err(format!("expected a date, found {}", other.type_name())),
    }
}

fn block_value(format: TextFormat, node: Option<&Node>) -> Coerced<TextContent> {
    match node {
        None | Some(Node::Null) => Ok(TextContent::with_format(format, String::new())),
        Some(node) => node
            .scalar_to_string()
            .map(|text| TextContent::with_format(format, text))
            .ok_or_else(|| format!("{} must be a string, found {}", format.key(), node.type_name())),
    }
}

fn expected_blocks() -> String {
    TextFormat::keys().collect::<Vec<_>>().join(", ")
}

/// Selects the single text block of a question or answer mapping.
pub fn text_block(mapping: &Mapping) -> Coerced<TextContent> {
    let present: Vec<_> = TextFormat::iter()
        .filter(|format| mapping.contains_key(format.key()))
        .collect();

    match present.as_slice() {
        [] => Err(format!(
            "no text block defined, expected one of: {}",
            expected_blocks()
        )),
        [format] => block_value(*format, mapping.get(format.key())),
        formats => {
            let keys: Vec<_> = formats.iter().map(TextFormat::key).collect();
            Err(format!("multiple text blocks found: [{}]", keys.join(", ")))
        }
    }
}

/// Reads an optional text value.
///
/// A scalar is plain text; a mapping with one text block key selects the
/// markup.
pub fn text_value(node: Option<&Node>) -> Coerced<Option<TextContent>> {
    match node {
        None | Some(Node::Null) => Ok(None),
        Some(Node::Mapping(mapping)) => {
            if mapping.len() != 1 {
                return Err(format!(
                    "expected text or a mapping with a single key out of: {}",
                    expected_blocks()
                ));
            }
            text_block(mapping).map(Some)
        }
        Some(Node::Sequence(_)) => Err("expected text, found sequence".to_owned()),
        Some(scalar) => Ok(scalar.scalar_to_string().map(TextContent::Plain)),
    }
}
