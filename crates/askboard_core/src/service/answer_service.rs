//! Answer use-cases: ranked listing, posting and acceptance.
//!
//! # Invariants
//! - Ranking is accepted first, then `upvotes` descending, then
//!   `created_at` ascending; remaining ties keep store order.
//! - Only the owner of a question may accept one of its answers.
//! - At most one answer per question is accepted at any time.

use crate::model::answer::{Answer, AnswerId};
use crate::model::profile::ANONYMOUS_NAME;
use crate::model::question::QuestionId;
use crate::model::session::Session;
use crate::repo::answer_repo::AnswerRepository;
use crate::repo::profile_repo::ProfileRepository;
use crate::repo::question_repo::QuestionRepository;
use crate::service::profile_service::ProfileResolver;
use crate::service::{require_user, ServiceError, ServiceResult};
use log::info;
use serde::Serialize;
use std::cmp::Ordering;

/// Answer paired with its resolved author name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerView {
    pub answer: Answer,
    pub author: String,
}

/// Answer service over profile, answer and question repositories.
pub struct AnswerService<P, A, Q>
where
    P: ProfileRepository,
    A: AnswerRepository,
    Q: QuestionRepository,
{
    resolver: ProfileResolver<P>,
    answers: A,
    questions: Q,
}

impl<P, A, Q> AnswerService<P, A, Q>
where
    P: ProfileRepository,
    A: AnswerRepository,
    Q: QuestionRepository,
{
    pub fn new(profiles: P, answers: A, questions: Q) -> Self {
        Self {
            resolver: ProfileResolver::new(profiles),
            answers,
            questions,
        }
    }

    /// Lists the answers of a question in presentation order.
    pub fn list_answers(&self, question_id: QuestionId) -> ServiceResult<Vec<AnswerView>> {
        let mut answers = self.answers.list_answers_for_question(question_id)?;
        rank_answers(&mut answers);

        let authors: Vec<_> = answers.iter().map(|answer| answer.user_id).collect();
        let names = self.resolver.resolve_many(&authors);
        Ok(answers
            .into_iter()
            .map(|answer| {
                let author = names
                    .get(&answer.user_id)
                    .cloned()
                    .unwrap_or_else(|| ANONYMOUS_NAME.to_string());
                AnswerView { answer, author }
            })
            .collect())
    }

    /// Posts an answer as the signed-in user.
    pub fn post_answer(
        &self,
        session: &Session,
        question_id: QuestionId,
        body: &str,
    ) -> ServiceResult<Answer> {
        let user_id = require_user(session)?;
        if self.questions.get_question(question_id)?.is_none() {
            return Err(ServiceError::QuestionNotFound(question_id));
        }

        let answer = Answer::new(question_id, user_id, body)?;
        let answer_id = self.answers.create_answer(&answer)?;
        info!("event=answer_post module=service status=ok");
        self.answers
            .get_answer(answer_id)?
            .ok_or(ServiceError::AnswerNotFound(answer_id))
    }

    /// Marks an answer as the accepted one for its question.
    ///
    /// Accepting the already-accepted answer is a no-op.
    pub fn accept_answer(&self, session: &Session, answer_id: AnswerId) -> ServiceResult<Answer> {
        let user_id = require_user(session)?;
        let answer = self
            .answers
            .get_answer(answer_id)?
            .ok_or(ServiceError::AnswerNotFound(answer_id))?;
        let question = self
            .questions
            .get_question(answer.question_id)?
            .ok_or(ServiceError::QuestionNotFound(answer.question_id))?;

        if !question.is_owned_by(user_id) {
            return Err(ServiceError::NotQuestionOwner {
                question_id: question.uuid,
                user_id,
            });
        }
        if answer.is_accepted {
            return Ok(answer);
        }

        self.answers.accept_answer(answer_id)?;
        info!("event=answer_accept module=service status=ok");
        self.answers
            .get_answer(answer_id)?
            .ok_or(ServiceError::AnswerNotFound(answer_id))
    }
}

/// Stable-sorts answers into presentation order.
pub fn rank_answers(answers: &mut [Answer]) {
    answers.sort_by(compare_for_display);
}

fn compare_for_display(left: &Answer, right: &Answer) -> Ordering {
    right
        .is_accepted
        .cmp(&left.is_accepted)
        .then_with(|| right.upvotes.cmp(&left.upvotes))
        .then_with(|| left.created_at.cmp(&right.created_at))
}
