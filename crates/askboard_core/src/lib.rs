//! Data-access core for the Askboard discussion forum.
//! Questions, answers, profiles and votes live in a SQLite record store;
//! this crate owns listing aggregation, answer ranking and vote toggling.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::answer::{Answer, AnswerId};
pub use model::profile::{display_label, Profile, ANONYMOUS_NAME};
pub use model::question::{parse_tag_input, Question, QuestionId, MAX_QUESTION_TAGS};
pub use model::session::Session;
pub use model::vote::{Vote, VoteDirection, VoteOutcome, VoteTarget};
pub use model::{UserId, ValidationError};
pub use repo::answer_repo::{AnswerRepository, SqliteAnswerRepository};
pub use repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
pub use repo::question_repo::{QuestionRepository, SqliteQuestionRepository};
pub use repo::vote_repo::{SqliteVoteRepository, VoteRepository};
pub use repo::{RepoError, RepoResult};
pub use service::answer_service::{AnswerService, AnswerView};
pub use service::listing_service::{ListingAggregator, ListingEntry};
pub use service::profile_service::ProfileResolver;
pub use service::question_service::{NewQuestion, QuestionDetail, QuestionService};
pub use service::vote_service::VoteReconciler;
pub use service::{ServiceError, ServiceResult};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
