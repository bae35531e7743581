//! Answer repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist answers and serve per-question answer lists and counts.
//! - Own the accepted-answer switch.
//!
//! # Invariants
//! - `list_answers_for_question` returns rows in insertion order; ranking is
//!   the service layer's job.
//! - Accepting an answer clears the previous accepted answer of the same
//!   question in the same transaction.

use super::{
    bool_to_int, ensure_tables, parse_bool, parse_uuid, placeholders, RepoError, RepoResult,
    IN_CLAUSE_CHUNK,
};
use crate::model::answer::{Answer, AnswerId};
use crate::model::question::QuestionId;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;

const ANSWER_SELECT_SQL: &str = "SELECT
    uuid,
    question_uuid,
    user_id,
    body,
    upvotes,
    is_accepted,
    created_at
FROM answers";

/// Data access for the `answers` table.
pub trait AnswerRepository {
    fn create_answer(&self, answer: &Answer) -> RepoResult<AnswerId>;
    fn get_answer(&self, id: AnswerId) -> RepoResult<Option<Answer>>;
    fn list_answers_for_question(&self, question_id: QuestionId) -> RepoResult<Vec<Answer>>;
    fn count_answers(&self, question_id: QuestionId) -> RepoResult<u64>;
    /// Grouped count; questions without answers are absent from the map.
    fn count_answers_grouped(
        &self,
        question_ids: &[QuestionId],
    ) -> RepoResult<HashMap<QuestionId, u64>>;
    /// Marks `answer_id` accepted and clears any sibling acceptance.
    fn accept_answer(&self, answer_id: AnswerId) -> RepoResult<()>;
}

/// SQLite-backed answer repository.
pub struct SqliteAnswerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAnswerRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["answers"])?;
        Ok(Self { conn })
    }
}

impl AnswerRepository for SqliteAnswerRepository<'_> {
    fn create_answer(&self, answer: &Answer) -> RepoResult<AnswerId> {
        answer.validate()?;

        self.conn.execute(
            "INSERT INTO answers (
                uuid,
                question_uuid,
                user_id,
                body,
                upvotes,
                is_accepted,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                answer.uuid.to_string(),
                answer.question_id.to_string(),
                answer.user_id.to_string(),
                answer.body.as_str(),
                answer.upvotes,
                bool_to_int(answer.is_accepted),
                answer.created_at,
            ],
        )?;

        Ok(answer.uuid)
    }

    fn get_answer(&self, id: AnswerId) -> RepoResult<Option<Answer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ANSWER_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_answer_row(row)?));
        }
        Ok(None)
    }

    fn list_answers_for_question(&self, question_id: QuestionId) -> RepoResult<Vec<Answer>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ANSWER_SELECT_SQL} WHERE question_uuid = ?1 ORDER BY rowid ASC;"
        ))?;
        let mut rows = stmt.query([question_id.to_string()])?;
        let mut answers = Vec::new();
        while let Some(row) = rows.next()? {
            answers.push(parse_answer_row(row)?);
        }
        Ok(answers)
    }

    fn count_answers(&self, question_id: QuestionId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM answers WHERE question_uuid = ?1;",
            [question_id.to_string()],
            |row| row.get(0),
        )?;
        to_count(count)
    }

    fn count_answers_grouped(
        &self,
        question_ids: &[QuestionId],
    ) -> RepoResult<HashMap<QuestionId, u64>> {
        let mut counts = HashMap::new();
        for chunk in question_ids.chunks(IN_CLAUSE_CHUNK) {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT question_uuid, COUNT(*)
                 FROM answers
                 WHERE question_uuid IN ({})
                 GROUP BY question_uuid;",
                placeholders(chunk.len())
            ))?;
            let mut rows = stmt.query(params_from_iter(chunk.iter().map(|id| id.to_string())))?;
            while let Some(row) = rows.next()? {
                let question_text: String = row.get(0)?;
                let question_id = parse_uuid(&question_text, "answers.question_uuid")?;
                counts.insert(question_id, to_count(row.get(1)?)?);
            }
        }
        Ok(counts)
    }

    fn accept_answer(&self, answer_id: AnswerId) -> RepoResult<()> {
        let answer_uuid = answer_id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let question_uuid: Option<String> = {
            let mut stmt = tx.prepare("SELECT question_uuid FROM answers WHERE uuid = ?1;")?;
            let mut rows = stmt.query([answer_uuid.as_str()])?;
            match rows.next()? {
                Some(row) => Some(row.get(0)?),
                None => None,
            }
        };
        let Some(question_uuid) = question_uuid else {
            return Err(RepoError::NotFound {
                table: "answers",
                id: answer_id,
            });
        };

        tx.execute(
            "UPDATE answers
             SET is_accepted = 0
             WHERE question_uuid = ?1
               AND is_accepted = 1
               AND uuid <> ?2;",
            params![question_uuid.as_str(), answer_uuid.as_str()],
        )?;
        tx.execute(
            "UPDATE answers SET is_accepted = 1 WHERE uuid = ?1;",
            [answer_uuid.as_str()],
        )?;

        tx.commit()?;
        Ok(())
    }
}

fn parse_answer_row(row: &Row<'_>) -> RepoResult<Answer> {
    let uuid_text: String = row.get("uuid")?;
    let question_text: String = row.get("question_uuid")?;
    let user_id_text: String = row.get("user_id")?;
    let answer = Answer {
        uuid: parse_uuid(&uuid_text, "answers.uuid")?,
        question_id: parse_uuid(&question_text, "answers.question_uuid")?,
        user_id: parse_uuid(&user_id_text, "answers.user_id")?,
        body: row.get("body")?,
        upvotes: row.get("upvotes")?,
        is_accepted: parse_bool(row.get("is_accepted")?, "answers.is_accepted")?,
        created_at: row.get("created_at")?,
    };
    answer.validate()?;
    Ok(answer)
}

fn to_count(value: i64) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative answer count `{value}`")))
}
