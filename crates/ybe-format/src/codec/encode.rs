//! Canonical text encoding of the generic tree.
//!
//! Output conventions:
//! - mappings indent by four spaces;
//! - block sequence items start with `-   ` at the indentation of their key;
//! - multi-line strings use block literals (`|` or `|-`);
//! - strings are quoted only when a plain scalar would read back differently.

use std::fmt::Write as _;

use ybe_core::tree::{Mapping, Node, Sequence, SequenceStyle};

const INDENT: usize = 4;
const ITEM_MARKER: &str = "-   ";

/// Encodes a tree as exam text, ending with a newline.
pub fn encode(node: &Node) -> String {
    let mut out = String::new();
    match node {
        Node::Mapping(mapping) if !mapping.is_empty() => write_entries(mapping, 0, &mut out),
        Node::Sequence(sequence) if is_block(sequence) => write_items(sequence, 0, &mut out),
        Node::String(value) if block_literal(value).is_some() => {
            write_block_literal(value, 0, &mut out)
        }
        other => {
            out.push_str(&inline(other, false));
            out.push('\n');
        }
    }
    out
}

fn is_block(sequence: &Sequence) -> bool {
    sequence.style() == SequenceStyle::Block && !sequence.is_empty()
}

fn write_entries(mapping: &Mapping, indent: usize, out: &mut String) {
    let pad = " ".repeat(indent);
    for (key, value) in mapping.iter() {
        let key = scalar_string(key, false);
        match value {
            Node::Null => {
                let _ = writeln!(out, "{pad}{key}:");
            }
            Node::Mapping(nested) if !nested.is_empty() => {
                let _ = writeln!(out, "{pad}{key}:");
                write_entries(nested, indent + INDENT, out);
            }
            Node::Sequence(sequence) if is_block(sequence) => {
                let _ = writeln!(out, "{pad}{key}:");
                write_items(sequence, indent, out);
            }
            Node::String(text) if block_literal(text).is_some() => {
                let _ = write!(out, "{pad}{key}: ");
                write_block_literal(text, indent + INDENT, out);
            }
            other => {
                let _ = writeln!(out, "{pad}{key}: {}", inline(other, false));
            }
        }
    }
}

fn write_items(sequence: &Sequence, indent: usize, out: &mut String) {
    let pad = " ".repeat(indent);
    for item in sequence.iter() {
        match item {
            Node::Null => {
                let _ = writeln!(out, "{pad}-");
            }
            Node::Mapping(mapping) if !mapping.is_empty() => {
                // The first entry shares its line with the item marker.
                let mut nested = String::new();
                write_entries(mapping, indent + INDENT, &mut nested);
                out.push_str(&pad);
                out.push_str(ITEM_MARKER);
                out.push_str(&nested[indent + INDENT..]);
            }
            Node::Sequence(nested) if is_block(nested) => {
                let _ = writeln!(out, "{pad}-");
                write_items(nested, indent + INDENT, out);
            }
            Node::String(text) if block_literal(text).is_some() => {
                let _ = write!(out, "{pad}{ITEM_MARKER}");
                write_block_literal(text, indent + INDENT, out);
            }
            other => {
                let _ = writeln!(out, "{pad}{ITEM_MARKER}{}", inline(other, false));
            }
        }
    }
}

/// Returns the block literal header for `text`, if it can be written as one.
fn block_literal(text: &str) -> Option<&'static str> {
    if !text.contains('\n') || text.ends_with("\n\n") {
        return None;
    }
    if text.chars().any(|c| c != '\n' && c != '\t' && needs_escape(c)) {
        return None;
    }

    // The first content line fixes the indentation of the whole block.
    let first_content = text.lines().find(|line| !line.trim().is_empty())?;
    if first_content.starts_with([' ', '\t']) {
        return None;
    }
    let mut leading_blank = text.lines().take_while(|line| line.trim().is_empty());
    if leading_blank.any(|line| !line.is_empty()) {
        return None;
    }

    Some(if text.ends_with('\n') { "|" } else { "|-" })
}

fn write_block_literal(text: &str, indent: usize, out: &mut String) {
    let Some(header) = block_literal(text) else {
        return;
    };

    let pad = " ".repeat(indent);
    out.push_str(header);
    out.push('\n');

    let body = text.strip_suffix('\n').unwrap_or(text);
    for line in body.split('\n') {
        if !line.is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
        out.push('\n');
    }
}

/// Renders a node on a single line.
fn inline(node: &Node, in_flow: bool) -> String {
    match node {
        Node::Null if in_flow => "null".to_owned(),
        Node::Null => String::new(),
        Node::Bool(value) => value.to_string(),
        Node::Integer(value) => value.to_string(),
        Node::Float(value) => float(*value),
        Node::String(value) => scalar_string(value, in_flow),
        Node::Sequence(sequence) => {
            let items: Vec<_> = sequence.iter().map(|item| inline(item, true)).collect();
            format!("[{}]", items.join(", "))
        }
        Node::Mapping(mapping) => {
            let entries: Vec<_> = mapping
                .iter()
                .map(|(key, value)| format!("{}: {}", scalar_string(key, true), inline(value, true)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

fn float(value: f64) -> String {
    if value.is_nan() {
        ".nan".to_owned()
    } else if value.is_infinite() {
        (if value > 0.0 { ".inf" } else { "-.inf" }).to_owned()
    } else if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Renders a string scalar, quoting it when needed.
fn scalar_string(value: &str, in_flow: bool) -> String {
    if value.chars().any(needs_escape) {
        double_quoted(value)
    } else if needs_quotes(value, in_flow) {
        format!("'{}'", value.replace('\'', "''"))
    } else {
        value.to_owned()
    }
}

fn needs_quotes(value: &str, in_flow: bool) -> bool {
    let Some(first) = value.chars().next() else {
        return true;
    };

    if value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace) {
        return true;
    }
    if "-?:,[]{}#&*!|>'\"%@`".contains(first) {
        return true;
    }
    if value.contains(": ") || value.contains(" #") || value.ends_with(':') {
        return true;
    }
    if in_flow && value.contains([',', '[', ']', '{', '}']) {
        return true;
    }

    is_reserved(value) || looks_numeric(value)
}

fn is_reserved(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "~" | "null" | "true" | "false" | "yes" | "no" | "on" | "off" | "y" | "n"
    )
}

fn looks_numeric(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    let unsigned = lower.trim_start_matches(['+', '-']);

    unsigned.starts_with("0x")
        || unsigned.starts_with("0o")
        || unsigned.starts_with("0b")
        || matches!(unsigned, ".inf" | ".nan")
        || value.parse::<f64>().is_ok()
        || (unsigned.starts_with(|c: char| c.is_ascii_digit())
            && unsigned.chars().all(|c| c.is_ascii_digit() || matches!(c, '_' | ':')))
}

/// Characters a parser would read as a line break or drop from a plain scalar.
fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}')
}

fn double_quoted(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            '\u{85}' => quoted.push_str("\\N"),
            '\u{2028}' => quoted.push_str("\\L"),
            '\u{2029}' => quoted.push_str("\\P"),
            c if needs_escape(c) => {
                let _ = write!(quoted, "\\u{:04x}", u32::from(c));
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
