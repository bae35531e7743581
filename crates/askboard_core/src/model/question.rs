//! Question domain model.
//!
//! # Invariants
//! - `title` and `body` are non-blank.
//! - `tags` are trimmed, non-blank, unique, and at most [`MAX_QUESTION_TAGS`].
//! - `upvotes` mirrors the net vote score and is only written by the vote path.

use super::{now_epoch_ms, require_id, require_text, UserId, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type QuestionId = Uuid;

/// Maximum number of tags a question may carry.
pub const MAX_QUESTION_TAGS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub uuid: QuestionId,
    /// Owner; the only user allowed to accept an answer.
    pub user_id: UserId,
    pub title: String,
    pub body: String,
    /// Ordered tag list, first occurrence wins on duplicates.
    pub tags: Vec<String>,
    /// Net vote score (sum of vote directions).
    pub upvotes: i64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Question {
    /// Creates a validated question owned by `user_id`.
    ///
    /// Title and body are trimmed; tags are normalized with [`normalize_tags`].
    pub fn new(
        user_id: UserId,
        title: impl Into<String>,
        body: impl Into<String>,
        tags: &[String],
    ) -> Result<Self, ValidationError> {
        let question = Self {
            uuid: Uuid::new_v4(),
            user_id,
            title: title.into().trim().to_string(),
            body: body.into().trim().to_string(),
            tags: normalize_tags(tags)?,
            upvotes: 0,
            created_at: now_epoch_ms(),
        };
        question.validate()?;
        Ok(question)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(self.uuid, "question id")?;
        require_id(self.user_id, "question owner")?;
        require_text(&self.title, "question title")?;
        require_text(&self.body, "question body")?;
        if self.tags.len() > MAX_QUESTION_TAGS {
            return Err(ValidationError::TooManyTags {
                count: self.tags.len(),
                max: MAX_QUESTION_TAGS,
            });
        }
        if self.tags.iter().any(|tag| tag.trim().is_empty()) {
            return Err(ValidationError::BlankTag);
        }
        Ok(())
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// Splits comma-separated tag input into a normalized tag list.
///
/// Empty segments are dropped, so `"rust, ,sql,"` yields `["rust", "sql"]`.
/// The count limit is not checked here.
pub fn parse_tag_input(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|tag| !tag.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Trims and deduplicates tags, keeping first-occurrence order.
///
/// # Errors
/// - [`ValidationError::BlankTag`] when any tag is blank.
/// - [`ValidationError::TooManyTags`] when more than [`MAX_QUESTION_TAGS`]
///   distinct tags remain.
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>, ValidationError> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::BlankTag);
        }
        if !normalized.iter().any(|existing| existing == trimmed) {
            normalized.push(trimmed.to_string());
        }
    }
    if normalized.len() > MAX_QUESTION_TAGS {
        return Err(ValidationError::TooManyTags {
            count: normalized.len(),
            max: MAX_QUESTION_TAGS,
        });
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::{normalize_tags, parse_tag_input, Question, MAX_QUESTION_TAGS};
    use crate::model::ValidationError;
    use uuid::Uuid;

    #[test]
    fn parse_tag_input_drops_empty_segments_and_duplicates() {
        assert_eq!(
            parse_tag_input(" rust, ,sql,rust,"),
            vec!["rust".to_string(), "sql".to_string()]
        );
        assert!(parse_tag_input("  ").is_empty());
    }

    #[test]
    fn normalize_tags_rejects_more_than_limit() {
        let tags: Vec<String> = (0..=MAX_QUESTION_TAGS).map(|i| format!("t{i}")).collect();
        let err = normalize_tags(&tags).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooManyTags {
                count: MAX_QUESTION_TAGS + 1,
                max: MAX_QUESTION_TAGS
            }
        );
    }

    #[test]
    fn new_question_trims_and_rejects_blank_title() {
        let owner = Uuid::new_v4();
        let question = Question::new(owner, "  How?  ", " body ", &[]).unwrap();
        assert_eq!(question.title, "How?");
        assert_eq!(question.body, "body");
        assert_eq!(question.upvotes, 0);

        let err = Question::new(owner, "   ", "body", &[]).unwrap_err();
        assert_eq!(err, ValidationError::Blank("question title"));
    }
}
