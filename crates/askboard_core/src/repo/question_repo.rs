//! Question repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist questions together with their ordered tag list.
//! - Serve newest-first listings for the forum front page.
//!
//! # Invariants
//! - A question row and its tag rows are written in one transaction.
//! - Listing order is `created_at DESC, uuid ASC`.

use super::{ensure_tables, parse_uuid, placeholders, RepoResult, IN_CLAUSE_CHUNK};
use crate::model::question::{Question, QuestionId};
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;

const QUESTION_SELECT_SQL: &str = "SELECT
    uuid,
    user_id,
    title,
    body,
    upvotes,
    created_at
FROM questions";

/// Data access for the `questions` and `question_tags` tables.
pub trait QuestionRepository {
    fn create_question(&self, question: &Question) -> RepoResult<QuestionId>;
    fn get_question(&self, id: QuestionId) -> RepoResult<Option<Question>>;
    /// All questions, newest first.
    fn list_questions(&self) -> RepoResult<Vec<Question>>;
}

/// SQLite-backed question repository.
pub struct SqliteQuestionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuestionRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["questions", "question_tags"])?;
        Ok(Self { conn })
    }
}

impl QuestionRepository for SqliteQuestionRepository<'_> {
    fn create_question(&self, question: &Question) -> RepoResult<QuestionId> {
        question.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let question_uuid = question.uuid.to_string();
        tx.execute(
            "INSERT INTO questions (
                uuid,
                user_id,
                title,
                body,
                upvotes,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                question_uuid.as_str(),
                question.user_id.to_string(),
                question.title.as_str(),
                question.body.as_str(),
                question.upvotes,
                question.created_at,
            ],
        )?;

        for (position, tag) in question.tags.iter().enumerate() {
            let position = i64::try_from(position).unwrap_or(i64::MAX);
            tx.execute(
                "INSERT INTO question_tags (question_uuid, position, name)
                 VALUES (?1, ?2, ?3);",
                params![question_uuid.as_str(), position, tag.as_str()],
            )?;
        }

        tx.commit()?;
        Ok(question.uuid)
    }

    fn get_question(&self, id: QuestionId) -> RepoResult<Option<Question>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{QUESTION_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let mut question = parse_question_row(row)?;
        question.tags = load_tags(self.conn, &[question.uuid])?
            .remove(&question.uuid)
            .unwrap_or_default();
        question.validate()?;
        Ok(Some(question))
    }

    fn list_questions(&self) -> RepoResult<Vec<Question>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{QUESTION_SELECT_SQL} ORDER BY created_at DESC, uuid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut questions = Vec::new();
        while let Some(row) = rows.next()? {
            questions.push(parse_question_row(row)?);
        }

        let ids: Vec<QuestionId> = questions.iter().map(|question| question.uuid).collect();
        let mut tags_by_question = load_tags(self.conn, &ids)?;
        for question in &mut questions {
            question.tags = tags_by_question.remove(&question.uuid).unwrap_or_default();
            question.validate()?;
        }
        Ok(questions)
    }
}

fn parse_question_row(row: &Row<'_>) -> RepoResult<Question> {
    let uuid_text: String = row.get("uuid")?;
    let user_id_text: String = row.get("user_id")?;
    Ok(Question {
        uuid: parse_uuid(&uuid_text, "questions.uuid")?,
        user_id: parse_uuid(&user_id_text, "questions.user_id")?,
        title: row.get("title")?,
        body: row.get("body")?,
        tags: Vec::new(),
        upvotes: row.get("upvotes")?,
        created_at: row.get("created_at")?,
    })
}

/// Loads ordered tags for a set of questions, one query per id chunk.
fn load_tags(
    conn: &Connection,
    question_ids: &[QuestionId],
) -> RepoResult<HashMap<QuestionId, Vec<String>>> {
    let mut tags: HashMap<QuestionId, Vec<String>> = HashMap::new();
    for chunk in question_ids.chunks(IN_CLAUSE_CHUNK) {
        let mut stmt = conn.prepare(&format!(
            "SELECT question_uuid, name
             FROM question_tags
             WHERE question_uuid IN ({})
             ORDER BY question_uuid ASC, position ASC;",
            placeholders(chunk.len())
        ))?;
        let mut rows = stmt.query(params_from_iter(chunk.iter().map(|id| id.to_string())))?;
        while let Some(row) = rows.next()? {
            let question_text: String = row.get(0)?;
            let question_id = parse_uuid(&question_text, "question_tags.question_uuid")?;
            tags.entry(question_id).or_default().push(row.get(1)?);
        }
    }
    Ok(tags)
}
