//! Vote repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Look up a user's vote on a target.
//! - Apply the insert/flip/remove decision atomically.
//!
//! # Invariants
//! - At most one vote row per (user, target): enforced by partial unique
//!   indexes and by running lookup and mutation in one immediate transaction.
//! - The target's `upvotes` column equals `SUM(direction)` of its votes after
//!   every reconcile.

use super::{ensure_tables, parse_uuid, RepoError, RepoResult};
use crate::model::vote::{plan_vote, Vote, VoteAction, VoteDirection, VoteOutcome, VoteTarget};
use crate::model::UserId;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

/// Data access for the `votes` table.
pub trait VoteRepository {
    fn find_vote(&self, user_id: UserId, target: VoteTarget) -> RepoResult<Option<Vote>>;
    /// Inserts, flips or removes the user's vote on `target` in one unit.
    ///
    /// Fails with `NotFound` when the target row does not exist.
    fn reconcile_vote(
        &self,
        user_id: UserId,
        target: VoteTarget,
        direction: VoteDirection,
    ) -> RepoResult<VoteOutcome>;
}

/// SQLite-backed vote repository.
pub struct SqliteVoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteVoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["votes", "questions", "answers"])?;
        Ok(Self { conn })
    }
}

impl VoteRepository for SqliteVoteRepository<'_> {
    fn find_vote(&self, user_id: UserId, target: VoteTarget) -> RepoResult<Option<Vote>> {
        find_vote_on(self.conn, user_id, target)
    }

    fn reconcile_vote(
        &self,
        user_id: UserId,
        target: VoteTarget,
        direction: VoteDirection,
    ) -> RepoResult<VoteOutcome> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        if !target_exists(&tx, target)? {
            return Err(RepoError::NotFound {
                table: target_table(target),
                id: target.id(),
            });
        }

        let existing = find_vote_on(&tx, user_id, target)?;
        let action = plan_vote(existing.as_ref(), direction);
        match action {
            VoteAction::Insert(direction) => {
                let vote = Vote::new(user_id, target, direction);
                vote.validate()?;
                let (question_uuid, answer_uuid) = match target {
                    VoteTarget::Question(id) => (Some(id.to_string()), None),
                    VoteTarget::Answer(id) => (None, Some(id.to_string())),
                };
                tx.execute(
                    "INSERT INTO votes (uuid, user_id, question_uuid, answer_uuid, direction)
                     VALUES (?1, ?2, ?3, ?4, ?5);",
                    params![
                        vote.uuid.to_string(),
                        user_id.to_string(),
                        question_uuid,
                        answer_uuid,
                        direction.as_i64(),
                    ],
                )?;
            }
            VoteAction::Flip { vote_id, to } => {
                tx.execute(
                    "UPDATE votes SET direction = ?1 WHERE uuid = ?2;",
                    params![to.as_i64(), vote_id.to_string()],
                )?;
            }
            VoteAction::Remove { vote_id } => {
                tx.execute("DELETE FROM votes WHERE uuid = ?1;", [vote_id.to_string()])?;
            }
        }

        recompute_score(&tx, target)?;
        tx.commit()?;
        Ok(action.outcome())
    }
}

fn target_table(target: VoteTarget) -> &'static str {
    match target {
        VoteTarget::Question(_) => "questions",
        VoteTarget::Answer(_) => "answers",
    }
}

fn target_column(target: VoteTarget) -> &'static str {
    match target {
        VoteTarget::Question(_) => "question_uuid",
        VoteTarget::Answer(_) => "answer_uuid",
    }
}

fn target_exists(conn: &Connection, target: VoteTarget) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE uuid = ?1);",
            target_table(target)
        ),
        [target.id().to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn find_vote_on(conn: &Connection, user_id: UserId, target: VoteTarget) -> RepoResult<Option<Vote>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT uuid, user_id, question_uuid, answer_uuid, direction
         FROM votes
         WHERE user_id = ?1 AND {} = ?2;",
        target_column(target)
    ))?;
    let mut rows = stmt.query(params![user_id.to_string(), target.id().to_string()])?;
    let Some(row) = rows.next()? else {
        return Ok(None);
    };
    let vote = parse_vote_row(row)?;

    if rows.next()?.is_some() {
        return Err(RepoError::InvalidData(format!(
            "multiple votes stored for user {user_id} on {} {}",
            target.kind_label(),
            target.id()
        )));
    }
    Ok(Some(vote))
}

/// Rewrites the denormalized score of `target` from its vote rows.
fn recompute_score(conn: &Connection, target: VoteTarget) -> RepoResult<()> {
    conn.execute(
        &format!(
            "UPDATE {table}
             SET upvotes = (
                SELECT COALESCE(SUM(direction), 0)
                FROM votes
                WHERE {column} = ?1
             )
             WHERE uuid = ?1;",
            table = target_table(target),
            column = target_column(target)
        ),
        [target.id().to_string()],
    )?;
    Ok(())
}

fn parse_vote_row(row: &Row<'_>) -> RepoResult<Vote> {
    let uuid_text: String = row.get("uuid")?;
    let user_id_text: String = row.get("user_id")?;
    let question_text: Option<String> = row.get("question_uuid")?;
    let answer_text: Option<String> = row.get("answer_uuid")?;
    let direction_value: i64 = row.get("direction")?;

    let target = match (question_text, answer_text) {
        (Some(question), None) => {
            VoteTarget::Question(parse_uuid(&question, "votes.question_uuid")?)
        }
        (None, Some(answer)) => VoteTarget::Answer(parse_uuid(&answer, "votes.answer_uuid")?),
        _ => {
            return Err(RepoError::InvalidData(format!(
                "vote {uuid_text} must target exactly one question or answer"
            )));
        }
    };
    let direction = VoteDirection::from_i64(direction_value).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid direction `{direction_value}` in votes.direction"
        ))
    })?;

    Ok(Vote {
        uuid: parse_uuid(&uuid_text, "votes.uuid")?,
        user_id: parse_uuid(&user_id_text, "votes.user_id")?,
        target,
        direction,
    })
}
