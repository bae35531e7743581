//! Forum use-case services.
//!
//! # Responsibility
//! - Compose repository calls into the forum's read and write paths.
//! - Map storage failures onto the caller-facing error taxonomy.
//!
//! # Invariants
//! - Write paths require a signed-in [`Session`].
//! - Read paths degrade to fallback values instead of failing a whole view.
//! - Services never cache records; callers re-fetch after writes.

use crate::model::answer::AnswerId;
use crate::model::question::QuestionId;
use crate::model::session::Session;
use crate::model::{UserId, ValidationError};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod answer_service;
pub mod listing_service;
pub mod profile_service;
pub mod question_service;
pub mod vote_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Caller-facing error for forum use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Write attempted without a signed-in user.
    Unauthorized,
    /// Input rejected before reaching storage.
    Validation(ValidationError),
    QuestionNotFound(QuestionId),
    AnswerNotFound(AnswerId),
    /// Only the question owner may accept an answer.
    NotQuestionOwner {
        question_id: QuestionId,
        user_id: UserId,
    },
    /// The record store call itself failed; safe to re-submit manually.
    StoreUnavailable(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "sign in required"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::QuestionNotFound(id) => write!(f, "question not found: {id}"),
            Self::AnswerNotFound(id) => write!(f, "answer not found: {id}"),
            Self::NotQuestionOwner {
                question_id,
                user_id,
            } => write!(f, "user {user_id} does not own question {question_id}"),
            Self::StoreUnavailable(err) => write!(f, "record store unavailable: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::StoreUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                table: "questions",
                id,
            } => Self::QuestionNotFound(id),
            RepoError::NotFound { table: "answers", id } => Self::AnswerNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::StoreUnavailable(other),
        }
    }
}

/// Returns the signed-in user or [`ServiceError::Unauthorized`].
pub fn require_user(session: &Session) -> ServiceResult<UserId> {
    session.user_id().ok_or(ServiceError::Unauthorized)
}
