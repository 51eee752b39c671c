//! Blank-line layout of encoded exam text.

use strum::IntoEnumIterator;
use ybe_core::model::QuestionType;

/// Inserts one blank line before the `info` and `questions` sections and
/// before every question.
///
/// Operates on encoder output, where those lines are the only ones starting at
/// column zero with these prefixes. Existing blank lines are not doubled.
pub fn space_sections(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    let mut previous_blank = true;

    for line in text.split_inclusive('\n') {
        if !previous_blank && starts_section(line) {
            out.push('\n');
        }
        previous_blank = line.trim().is_empty();
        out.push_str(line);
    }

    out
}

fn starts_section(line: &str) -> bool {
    if line.starts_with("info:") || line.starts_with("questions:") {
        return true;
    }

    let Some(item) = line.strip_prefix("-   ") else {
        return false;
    };
    QuestionType::iter().any(|question_type| {
        item.strip_prefix(question_type.as_ref())
            .is_some_and(|rest| rest.starts_with(':'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_sections() {
        let text = "\
schema_version: 0.3.0
info:
    title: Quiz
questions:
-   text_only:
        text: Hello
-   open:
        text: Why?
        options:
            max_words: 10
";
        let expected = "\
schema_version: 0.3.0

info:
    title: Quiz

questions:

-   text_only:
        text: Hello

-   open:
        text: Why?
        options:
            max_words: 10
";
        assert_eq!(space_sections(text), expected);
        assert_eq!(space_sections(expected), expected);
    }

    #[test]
    fn test_nested_lines_are_left_alone() {
        let text = "\
questions:
-   multiple_choice:
        answers:
        -   answer:
                text: 'info:'
";
        let spaced = space_sections(text);
        assert_eq!(spaced.matches("\n\n").count(), 1);
    }

    #[test]
    fn test_document_start_is_not_spaced() {
        assert_eq!(space_sections("info:\n"), "info:\n");
    }
}
