//! Forum listing aggregation.
//!
//! # Responsibility
//! - Attach author name, answer count and a plain-text excerpt to each
//!   question of a listing.
//!
//! # Invariants
//! - Output order equals input order; lookups are keyed by id and the
//!   output is assembled by walking the input sequence.
//! - Enrichment uses one grouped profile lookup and one grouped count.
//! - A failed lookup degrades that field (`Anonymous`, `0`) and never drops
//!   a question from the listing.

use crate::model::profile::ANONYMOUS_NAME;
use crate::model::question::{Question, QuestionId};
use crate::model::UserId;
use crate::repo::answer_repo::AnswerRepository;
use crate::repo::profile_repo::ProfileRepository;
use crate::service::profile_service::ProfileResolver;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

const EXCERPT_MAX_CHARS: usize = 160;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// One row of the forum listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub question: Question,
    /// Resolved author display name.
    pub author: String,
    pub answer_count: u64,
    /// Plain-text excerpt of the question body.
    pub excerpt: String,
}

/// Enriches question listings with author and answer count data.
pub struct ListingAggregator<P: ProfileRepository, A: AnswerRepository> {
    resolver: ProfileResolver<P>,
    answers: A,
}

impl<P: ProfileRepository, A: AnswerRepository> ListingAggregator<P, A> {
    pub fn new(profiles: P, answers: A) -> Self {
        Self {
            resolver: ProfileResolver::new(profiles),
            answers,
        }
    }

    /// Resolver used for author names.
    pub fn resolver(&self) -> &ProfileResolver<P> {
        &self.resolver
    }

    /// Enriches `questions`, preserving their order exactly.
    pub fn aggregate(&self, questions: Vec<Question>) -> Vec<ListingEntry> {
        let authors: Vec<UserId> = questions.iter().map(|question| question.user_id).collect();
        let question_ids: Vec<QuestionId> =
            questions.iter().map(|question| question.uuid).collect();

        let names = self.resolver.resolve_many(&authors);
        let counts = self.answer_counts(&question_ids);
        debug!(
            "event=listing_aggregate module=service status=ok count={}",
            questions.len()
        );

        questions
            .into_iter()
            .map(|question| {
                let author = names
                    .get(&question.user_id)
                    .cloned()
                    .unwrap_or_else(|| ANONYMOUS_NAME.to_string());
                let answer_count = counts.get(&question.uuid).copied().unwrap_or(0);
                let excerpt = derive_excerpt(&question.body);
                ListingEntry {
                    question,
                    author,
                    answer_count,
                    excerpt,
                }
            })
            .collect()
    }

    fn answer_counts(&self, question_ids: &[QuestionId]) -> HashMap<QuestionId, u64> {
        match self.answers.count_answers_grouped(question_ids) {
            Ok(counts) => counts,
            Err(err) => {
                warn!(
                    "event=answer_count module=service status=fallback error_code=grouped_count_failed count={} error={err}",
                    question_ids.len()
                );
                question_ids
                    .iter()
                    .map(|question_id| (*question_id, self.count_one(*question_id)))
                    .collect()
            }
        }
    }

    fn count_one(&self, question_id: QuestionId) -> u64 {
        self.answers.count_answers(question_id).unwrap_or_else(|err| {
            warn!(
                "event=answer_count module=service status=fallback error_code=count_failed error={err}"
            );
            0
        })
    }
}

/// Derives a short excerpt from a plain-text body.
///
/// The body is kept as written; only whitespace runs are collapsed before
/// truncating.
pub fn derive_excerpt(body: &str) -> String {
    let normalized = WHITESPACE_RE.replace_all(body, " ");
    let trimmed = normalized.trim();

    let mut excerpt: String = trimmed.chars().take(EXCERPT_MAX_CHARS).collect();
    if trimmed.chars().count() > EXCERPT_MAX_CHARS {
        excerpt.push_str("...");
    }
    excerpt
}
