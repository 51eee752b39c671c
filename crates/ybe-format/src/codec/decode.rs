use serde_yaml::Value;
use ybe_core::tree::{Mapping, Node, Sequence};

use crate::error::{LoadError, LoadResult};

/// Decodes exam text into a generic tree.
///
/// Blank input decodes to [`Node::Null`]. Tags such as `!html` are dropped and
/// scalar mapping keys are turned into strings.
pub fn decode(text: &str) -> LoadResult<Node> {
    if text.trim().is_empty() {
        return Ok(Node::Null);
    }

    let value: Value = serde_yaml::from_str(text)?;
    convert(value)
}

fn convert(value: Value) -> LoadResult<Node> {
    let node = match value {
        Value::Null => Node::Null,
        Value::Bool(value) => Node::Bool(value),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => Node::Integer(integer),
            None => Node::Float(number.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(value) => Node::String(value),
        Value::Sequence(items) => {
            let items = items.into_iter().map(convert).collect::<LoadResult<Vec<_>>>()?;
            Node::Sequence(Sequence::block(items))
        }
        Value::Mapping(entries) => {
            let mut mapping = Mapping::new();
            for (key, value) in entries {
                let key = convert(key)?;
                let key = match key {
                    Node::Null => "null".to_owned(),
                    other => other.scalar_to_string().ok_or_else(|| {
                        LoadError::Structure(format!(
                            "mapping keys must be scalars, found {}",
                            other.type_name()
                        ))
                    })?,
                };
                mapping.insert(key, convert(value)?);
            }
            Node::Mapping(mapping)
        }
        Value::Tagged(tagged) => convert(tagged.value)?,
    };

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_preserves_key_order() {
        let node = decode("b: 1\na: [x, 2]\nc:\n").unwrap();
        let mapping = node.as_mapping().unwrap();

        assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(mapping.get("b"), Some(&Node::Integer(1)));
        assert_eq!(
            mapping.get("a"),
            Some(&Node::Sequence(Sequence::flow(vec![
                Node::string("x"),
                Node::Integer(2)
            ])))
        );
        assert_eq!(mapping.get("c"), Some(&Node::Null));
    }

    #[test]
    fn test_decode_blank_input() {
        assert_eq!(decode("").unwrap(), Node::Null);
        assert_eq!(decode("  \n\n").unwrap(), Node::Null);
    }

    #[test]
    fn test_decode_drops_tags_and_stringifies_keys() {
        let node = decode("1: !html '<b>x</b>'\ntrue: 1.5\n").unwrap();
        let mapping = node.as_mapping().unwrap();

        assert_eq!(mapping.get("1"), Some(&Node::string("<b>x</b>")));
        assert_eq!(mapping.get("true"), Some(&Node::Float(1.5)));
    }

    #[test]
    fn test_decode_block_literal() {
        let node = decode("text: |-\n    line one\n\n    line two\n").unwrap();
        assert_eq!(
            node.as_mapping().unwrap().get("text"),
            Some(&Node::string("line one\n\nline two"))
        );
    }

    #[test]
    fn test_decode_syntax_error() {
        let error = decode("a: [unclosed\n").unwrap_err();
        assert!(matches!(error, LoadError::Syntax(_)));
    }

    #[test]
    fn test_decode_rejects_complex_keys() {
        let error = decode("? [a, b]\n: value\n").unwrap_err();
        assert!(matches!(error, LoadError::Structure(_)));
    }
}
