//! Answer domain model.
//!
//! # Invariants
//! - `body` is non-blank.
//! - At most one answer per question has `is_accepted == true`; the store
//!   enforces this with a partial unique index.

use super::question::QuestionId;
use super::{now_epoch_ms, require_id, require_text, UserId, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AnswerId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub uuid: AnswerId,
    pub question_id: QuestionId,
    pub user_id: UserId,
    pub body: String,
    /// Net vote score (sum of vote directions).
    pub upvotes: i64,
    pub is_accepted: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Answer {
    /// Creates a validated, not-yet-accepted answer with a trimmed body.
    pub fn new(
        question_id: QuestionId,
        user_id: UserId,
        body: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let answer = Self {
            uuid: Uuid::new_v4(),
            question_id,
            user_id,
            body: body.into().trim().to_string(),
            upvotes: 0,
            is_accepted: false,
            created_at: now_epoch_ms(),
        };
        answer.validate()?;
        Ok(answer)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(self.uuid, "answer id")?;
        require_id(self.question_id, "answer question")?;
        require_id(self.user_id, "answer owner")?;
        require_text(&self.body, "answer body")
    }
}
