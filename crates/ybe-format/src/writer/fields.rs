use std::marker::PhantomData;

use jiff::civil::Date;
use ybe_core::model::Points;
use ybe_core::schema::Schema;
use ybe_core::text::TextContent;
use ybe_core::tree::{Mapping, Node, Sequence};

/// Builds the field mapping of one model node in canonical order.
///
/// In minimal mode a field whose rendered value equals its declared default
/// is left out.
pub(super) struct Fields<S> {
    minimal: bool,
    mapping: Mapping,
    schema: PhantomData<S>,
}

impl<S: Schema> Fields<S> {
    pub fn new(minimal: bool) -> Self {
        Self {
            minimal,
            mapping: Mapping::new(),
            schema: PhantomData,
        }
    }

    /// Adds a field written under its own name.
    pub fn field(self, name: &str, value: Node) -> Self {
        self.keyed(name, name, value)
    }

    /// Adds the field `name`, written under `key`.
    pub fn keyed(mut self, name: &str, key: &str, value: Node) -> Self {
        let is_default = S::default_value(name).is_some_and(|default| default.is_default(&value));
        if !(self.minimal && is_default) {
            self.mapping.insert(key, value);
        }
        self
    }

    pub fn finish(self) -> Node {
        Node::Mapping(self.mapping)
    }
}

pub(super) fn string(value: &str) -> Node {
    if value.is_empty() {
        Node::Null
    } else {
        Node::string(value)
    }
}

pub(super) fn optional_string(value: Option<&str>) -> Node {
    value.map_or(Node::Null, Node::string)
}

pub(super) fn string_list(values: &[String]) -> Node {
    Node::Sequence(Sequence::flow(values.iter().map(Node::string).collect()))
}

pub(super) fn count(value: Option<u32>) -> Node {
    value.map_or(Node::Null, |value| Node::Integer(i64::from(value)))
}

pub(super) fn points(value: Option<Points>) -> Node {
    match value {
        None => Node::Null,
        Some(Points::Integer(value)) => Node::Integer(value),
        Some(Points::Decimal(value)) => Node::Float(value),
    }
}

pub(super) fn date(value: Option<Date>) -> Node {
    value.map_or(Node::Null, |date| Node::string(date.to_string()))
}

/// Value of a text block field, keyed by its format elsewhere.
pub(super) fn text_block(text: &TextContent) -> Node {
    string(text.as_str())
}

/// A text value: plain text as a scalar, other markups as a one-key mapping.
pub(super) fn text_value(text: Option<&TextContent>) -> Node {
    match text {
        None => Node::Null,
        Some(TextContent::Plain(text)) => Node::string(text.as_str()),
        Some(text) => {
            let mut mapping = Mapping::new();
            mapping.insert(text.format().key(), text_block(text));
            Node::Mapping(mapping)
        }
    }
}

/// A text value that is unset when empty plain text.
pub(super) fn text_or_null(text: &TextContent) -> Node {
    match text {
        TextContent::Plain(plain) if plain.is_empty() => Node::Null,
        text => text_value(Some(text)),
    }
}

#[cfg(test)]
mod tests {
    use ybe_core::model::OpenOptions;

    use super::*;

    #[test]
    fn test_minimal_fields_skip_defaults() {
        let minimal = Fields::<OpenOptions>::new(true)
            .field("max_words", Node::Null)
            .field("min_words", Node::Integer(10))
            .finish();
        assert_eq!(minimal.to_string(), "{min_words: 10}");

        let full = Fields::<OpenOptions>::new(false)
            .field("max_words", Node::Null)
            .field("min_words", Node::Integer(10))
            .finish();
        assert_eq!(full.to_string(), "{max_words: null, min_words: 10}");
    }

    #[test]
    fn test_text_values() {
        assert_eq!(text_value(Some(&TextContent::plain("x"))), Node::string("x"));
        assert_eq!(
            text_value(Some(&TextContent::html("<b>x</b>"))).to_string(),
            "{text_html: <b>x</b>}"
        );
        assert_eq!(text_or_null(&TextContent::default()), Node::Null);
        assert_eq!(text_block(&TextContent::markdown("")), Node::Null);
    }
}
