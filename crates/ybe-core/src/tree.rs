//! Generic document tree.
//!
//! [`Node`] is the format-neutral shape exchanged between the textual codec and
//! the exam model: the reader decodes text into nodes before building the model,
//! and the writer turns the model into nodes before encoding them as text.

use std::fmt;

use derive_more::{Deref, From};

/// Rendering style of a sequence.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceStyle {
    /// One item per line.
    #[default]
    Block,
    /// Inline, bracketed list.
    Flow,
}

/// An ordered list of nodes.
///
/// Equality only compares the items; the style is a rendering hint.
#[derive(Debug, Default, Clone, Deref)]
pub struct Sequence {
    #[deref]
    items: Vec<Node>,
    style: SequenceStyle,
}

impl Sequence {
    /// Creates a block-style sequence.
    pub fn block(items: Vec<Node>) -> Self {
        Self {
            items,
            style: SequenceStyle::Block,
        }
    }

    /// Creates a flow-style sequence.
    pub fn flow(items: Vec<Node>) -> Self {
        Self {
            items,
            style: SequenceStyle::Flow,
        }
    }

    /// Returns the rendering style.
    pub fn style(&self) -> SequenceStyle {
        self.style
    }

    /// Returns the items.
    pub fn items(&self) -> &[Node] {
        &self.items
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

/// An insertion-ordered mapping of string keys to nodes.
#[derive(Debug, Default, Clone, PartialEq, Deref, From)]
pub struct Mapping(Vec<(String, Node)>);

impl Mapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, keeping the insertion order.
    pub fn insert(&mut self, key: impl Into<String>, value: Node) {
        self.0.push((key.into(), value));
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns true if `key` is present, including when it maps to null.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    /// Iterates over the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }
}

impl FromIterator<(String, Node)> for Mapping {
    fn from_iter<T: IntoIterator<Item = (String, Node)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A node of the generic document tree.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Sequence),
    Mapping(Mapping),
}

impl Node {
    /// Creates a string node.
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Creates an empty mapping node.
    pub fn empty_mapping() -> Self {
        Self::Mapping(Mapping::new())
    }

    /// Creates an empty sequence node.
    pub fn empty_sequence() -> Self {
        Self::Sequence(Sequence::default())
    }

    /// Short name of the node type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true for nulls, booleans, numbers and strings.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Sequence(_) | Self::Mapping(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    /// Returns the textual form of a non-null scalar.
    ///
    /// Numbers and booleans are rendered the way they were written, so an
    /// identifier given as `id: 12` reads back as `"12"`.
    pub fn scalar_to_string(&self) -> Option<String> {
        match self {
            Self::Bool(value) => Some(value.to_string()),
            Self::Integer(value) => Some(value.to_string()),
            Self::Float(value) => Some(value.to_string()),
            Self::String(value) => Some(value.clone()),
            _ => None,
        }
    }
}

impl From<Mapping> for Node {
    fn from(mapping: Mapping) -> Self {
        Self::Mapping(mapping)
    }
}

impl From<Sequence> for Node {
    fn from(sequence: Sequence) -> Self {
        Self::Sequence(sequence)
    }
}

impl fmt::Display for Node {
    /// Compact single-line rendering used in diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "{value}"),
            Self::Sequence(sequence) => {
                write!(f, "[")?;
                for (index, item) in sequence.items().iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Mapping(mapping) => {
                write!(f, "{{")?;
                for (index, (key, value)) in mapping.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_equality_ignores_style() {
        let block = Sequence::block(vec![Node::string("a")]);
        let flow = Sequence::flow(vec![Node::string("a")]);
        assert_eq!(block, flow);
        assert_ne!(block.style(), flow.style());
    }

    #[test]
    fn test_mapping_preserves_order() {
        let mut mapping = Mapping::new();
        mapping.insert("b", Node::Integer(1));
        mapping.insert("a", Node::Null);

        assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(mapping.contains_key("a"));
        assert_eq!(mapping.get("a"), Some(&Node::Null));
        assert_eq!(mapping.get("c"), None);
    }

    #[test]
    fn test_display() {
        let mut mapping = Mapping::new();
        mapping.insert("keywords", Sequence::flow(vec![Node::string("x"), Node::Integer(2)]).into());
        assert_eq!(Node::from(mapping).to_string(), "{keywords: [x, 2]}");
    }

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(Node::Integer(12).scalar_to_string().as_deref(), Some("12"));
        assert_eq!(Node::Null.scalar_to_string(), None);
        assert_eq!(Node::empty_mapping().scalar_to_string(), None);
    }
}
