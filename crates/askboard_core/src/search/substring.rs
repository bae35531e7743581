//! Case-insensitive substring filter for forum listings.
//!
//! # Invariants
//! - A blank term matches every question.
//! - Filtering preserves input order.

use crate::model::question::Question;

/// Returns whether `question` matches `term` in title, body or any tag.
pub fn matches_term(question: &Question, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    question.title.to_lowercase().contains(&needle)
        || question.body.to_lowercase().contains(&needle)
        || question
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
}

/// Keeps questions matching `term`, or all of them when no term is given.
pub fn filter_questions(questions: Vec<Question>, term: Option<&str>) -> Vec<Question> {
    match term.map(str::trim).filter(|term| !term.is_empty()) {
        Some(term) => questions
            .into_iter()
            .filter(|question| matches_term(question, term))
            .collect(),
        None => questions,
    }
}
