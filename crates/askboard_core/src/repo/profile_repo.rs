//! Profile repository contract and SQLite implementation.
//!
//! # Invariants
//! - `handle` is unique case-insensitively; violations surface as `Db` errors.
//! - Grouped lookups return at most one profile per requested user id.

use super::{ensure_tables, parse_uuid, placeholders, RepoResult, IN_CLAUSE_CHUNK};
use crate::model::profile::Profile;
use crate::model::UserId;
use rusqlite::{params, params_from_iter, Connection, Row};

const PROFILE_SELECT_SQL: &str = "SELECT user_id, handle, display_name FROM profiles";

/// Data access for the `profiles` table.
pub trait ProfileRepository {
    fn upsert_profile(&self, profile: &Profile) -> RepoResult<()>;
    fn get_profile(&self, user_id: UserId) -> RepoResult<Option<Profile>>;
    /// Grouped lookup; users without a profile are simply absent.
    fn get_profiles(&self, user_ids: &[UserId]) -> RepoResult<Vec<Profile>>;
}

/// SQLite-backed profile repository.
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["profiles"])?;
        Ok(Self { conn })
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn upsert_profile(&self, profile: &Profile) -> RepoResult<()> {
        profile.validate()?;

        self.conn.execute(
            "INSERT INTO profiles (user_id, handle, display_name)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (user_id) DO UPDATE SET
                handle = excluded.handle,
                display_name = excluded.display_name;",
            params![
                profile.user_id.to_string(),
                profile.handle.trim(),
                profile.display_name.as_deref(),
            ],
        )?;
        Ok(())
    }

    fn get_profile(&self, user_id: UserId) -> RepoResult<Option<Profile>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROFILE_SELECT_SQL} WHERE user_id = ?1;"))?;
        let mut rows = stmt.query([user_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_profile_row(row)?));
        }
        Ok(None)
    }

    fn get_profiles(&self, user_ids: &[UserId]) -> RepoResult<Vec<Profile>> {
        let mut profiles = Vec::new();
        for chunk in user_ids.chunks(IN_CLAUSE_CHUNK) {
            let mut stmt = self.conn.prepare(&format!(
                "{PROFILE_SELECT_SQL} WHERE user_id IN ({});",
                placeholders(chunk.len())
            ))?;
            let mut rows = stmt.query(params_from_iter(chunk.iter().map(|id| id.to_string())))?;
            while let Some(row) = rows.next()? {
                profiles.push(parse_profile_row(row)?);
            }
        }
        Ok(profiles)
    }
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<Profile> {
    let user_id_text: String = row.get("user_id")?;
    Ok(Profile {
        user_id: parse_uuid(&user_id_text, "profiles.user_id")?,
        handle: row.get("handle")?,
        display_name: row.get("display_name")?,
    })
}
