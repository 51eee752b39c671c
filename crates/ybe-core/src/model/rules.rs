//! Semantic rules shared by the reader and the linter.
//!
//! Each rule returns a human-readable problem description, or `None` when the
//! checked value is acceptable.

use std::collections::BTreeMap;

use super::question::QuestionType;

/// Highest allowed difficulty.
pub const MAX_DIFFICULTY: i64 = 10;

/// Returns the non-empty identifiers occurring more than once, sorted.
pub fn duplicate_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut counts = BTreeMap::new();
    for id in ids.into_iter().filter(|id| !id.is_empty()) {
        *counts.entry(id).or_insert(0usize) += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id.to_owned())
        .collect()
}

/// Describes a set of duplicate identifiers.
pub fn duplicate_ids_message(duplicates: &[String]) -> String {
    format!(
        "multiple questions with the same id: {}",
        duplicates.join(", ")
    )
}

/// Checks the number of correct answers against the question type.
pub fn correct_count_problem(question_type: QuestionType, nmr_correct: usize) -> Option<String> {
    match question_type {
        QuestionType::MultipleChoice if nmr_correct != 1 => Some(format!(
            "must have exactly 1 answer marked as correct, {nmr_correct} marked"
        )),
        QuestionType::MultipleResponse if nmr_correct == 0 => Some(format!(
            "must have at least 1 answer marked as correct, {nmr_correct} marked"
        )),
        _ => None,
    }
}

pub fn difficulty_problem(difficulty: i64) -> Option<String> {
    (!(0..=MAX_DIFFICULTY).contains(&difficulty)).then(|| {
        format!("difficulty must be between 0 and {MAX_DIFFICULTY}, {difficulty} given")
    })
}

pub fn word_range_problem(min_words: Option<u32>, max_words: Option<u32>) -> Option<String> {
    match (min_words, max_words) {
        (Some(min), Some(max)) if min > max => Some(format!(
            "min_words ({min}) is larger than max_words ({max})"
        )),
        _ => None,
    }
}

pub fn analytics_problem(participants: Option<u32>, nmr_correct: Option<u32>) -> Option<String> {
    match (participants, nmr_correct) {
        (Some(participants), Some(correct)) if correct > participants => Some(format!(
            "nmr_correct ({correct}) is larger than participants ({participants})"
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_ids() {
        let duplicates = duplicate_ids(["q2", "q1", "", "q1", "", "q2", "q3"]);
        assert_eq!(duplicates, vec!["q1", "q2"]);
        assert!(duplicate_ids(["a", "b"]).is_empty());
        assert!(duplicate_ids(["", ""]).is_empty());
        assert_eq!(
            duplicate_ids_message(&duplicates),
            "multiple questions with the same id: q1, q2"
        );
    }

    #[test]
    fn test_correct_count() {
        assert!(correct_count_problem(QuestionType::MultipleChoice, 1).is_none());
        assert_eq!(
            correct_count_problem(QuestionType::MultipleChoice, 2).unwrap(),
            "must have exactly 1 answer marked as correct, 2 marked"
        );
        assert!(correct_count_problem(QuestionType::MultipleChoice, 0).is_some());
        assert!(correct_count_problem(QuestionType::MultipleResponse, 0).is_some());
        assert!(correct_count_problem(QuestionType::MultipleResponse, 3).is_none());
        assert!(correct_count_problem(QuestionType::Open, 0).is_none());
    }

    #[test]
    fn test_ranges() {
        assert!(difficulty_problem(0).is_none());
        assert!(difficulty_problem(10).is_none());
        assert!(difficulty_problem(11).is_some());
        assert!(difficulty_problem(-1).is_some());

        assert!(word_range_problem(Some(10), Some(5)).is_some());
        assert!(word_range_problem(Some(5), Some(5)).is_none());
        assert!(word_range_problem(Some(10), None).is_none());

        assert!(analytics_problem(Some(10), Some(11)).is_some());
        assert!(analytics_problem(None, Some(11)).is_none());
    }
}
