//! Question use-cases: asking, detail view and the forum listing.
//!
//! # Invariants
//! - Asking requires a signed-in session.
//! - The forum listing is newest first and filtered before aggregation.

use crate::model::question::{parse_tag_input, Question, QuestionId};
use crate::model::session::Session;
use crate::repo::answer_repo::AnswerRepository;
use crate::repo::profile_repo::ProfileRepository;
use crate::repo::question_repo::QuestionRepository;
use crate::search::substring::filter_questions;
use crate::service::listing_service::{ListingAggregator, ListingEntry};
use crate::service::{require_user, ServiceError, ServiceResult};
use log::info;
use serde::Serialize;

/// Input for [`QuestionService::ask_question`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewQuestion {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

impl NewQuestion {
    /// Builds a request from raw form fields; `tag_input` is comma-separated.
    pub fn from_form(title: &str, body: &str, tag_input: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            tags: parse_tag_input(tag_input),
        }
    }
}

/// Question plus resolved author name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionDetail {
    pub question: Question,
    pub author: String,
}

pub struct QuestionService<P, Q, A>
where
    P: ProfileRepository,
    Q: QuestionRepository,
    A: AnswerRepository,
{
    questions: Q,
    listing: ListingAggregator<P, A>,
}

impl<P, Q, A> QuestionService<P, Q, A>
where
    P: ProfileRepository,
    Q: QuestionRepository,
    A: AnswerRepository,
{
    pub fn new(profiles: P, questions: Q, answers: A) -> Self {
        Self {
            questions,
            listing: ListingAggregator::new(profiles, answers),
        }
    }

    /// Creates a question owned by the signed-in user and returns it as stored.
    pub fn ask_question(&self, session: &Session, request: NewQuestion) -> ServiceResult<Question> {
        let user_id = require_user(session)?;
        let question = Question::new(user_id, request.title, request.body, &request.tags)?;
        let question_id = self.questions.create_question(&question)?;
        info!(
            "event=question_ask module=service status=ok tag_count={}",
            question.tags.len()
        );
        self.questions
            .get_question(question_id)?
            .ok_or(ServiceError::QuestionNotFound(question_id))
    }

    pub fn get_question(&self, question_id: QuestionId) -> ServiceResult<QuestionDetail> {
        let question = self
            .questions
            .get_question(question_id)?
            .ok_or(ServiceError::QuestionNotFound(question_id))?;
        let author = self.listing.resolver().resolve(question.user_id);
        Ok(QuestionDetail { question, author })
    }

    /// Lists the forum front page, optionally filtered by a search term.
    pub fn list_forum(&self, search_term: Option<&str>) -> ServiceResult<Vec<ListingEntry>> {
        let questions = self.questions.list_questions()?;
        let matching = filter_questions(questions, search_term);
        Ok(self.listing.aggregate(matching))
    }
}
