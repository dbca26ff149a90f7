mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;

use crate::error::TasError;
use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| TasError::StorageUnavailable(format!("{}: {e}", path.display())))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        db.seed_default_category()?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_default_category()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        // Check if schema_version table exists
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        // Existing database - check version and apply migrations
        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    /// The seed row must exist before any note can be added without an
    /// explicit category. Safe to run on every startup.
    fn seed_default_category(&mut self) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO categories (id, name) VALUES (?1, ?2)",
            params![Category::SEED_ID, Category::SEED_NAME],
        )?;
        Ok(())
    }

    // ── Users ─────────────────────────────────────────────────

    pub(crate) fn insert_user(&self, user: &User) -> Result<i64> {
        let result = self.conn.execute(
            "INSERT INTO users (username, created_at) VALUES (?1, ?2)",
            params![user.username, user.created_at],
        );
        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(TasError::DuplicateUser(user.username.clone()).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, username, created_at FROM users ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(User {
                id: Some(row.get(0)?),
                username: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let result = self.conn.query_row(
            "SELECT id, username, created_at FROM users WHERE id = ?1",
            params![id],
            |row| {
                Ok(User {
                    id: Some(row.get(0)?),
                    username: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        );
        match result {
            Ok(u) => Ok(Some(u)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ── Settings ──────────────────────────────────────────────

    /// Fixed-key upsert of the settings singleton. Accepts any integer;
    /// dependent operations validate the reference (see `ops::add_note`).
    pub(crate) fn set_default_user(&self, user_id: i64) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (id, current_user_id) VALUES (1, ?1)",
            params![user_id],
        )?;
        Ok(())
    }

    pub(crate) fn get_default_user_id(&self) -> Result<Option<i64>> {
        let result = self
            .conn
            .query_row("SELECT current_user_id FROM settings WHERE id = 1", [], |row| {
                row.get(0)
            });
        match result {
            Ok(id) => Ok(Some(id)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn get_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: Some(row.get(0)?),
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Exact-match category lookup.
    pub(crate) fn get_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let result = self.conn.query_row(
            "SELECT id, name FROM categories WHERE name = ?1",
            params![name],
            |row| {
                Ok(Category {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                })
            },
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ── Notes ─────────────────────────────────────────────────

    pub(crate) fn insert_note(&self, note: &Note) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO notes (user_id, category_id, content, remind_at, is_done, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                note.user_id,
                note.category_id,
                note.content,
                note.remind_at,
                note.is_done,
                note.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_open_notes(&self) -> Result<Vec<OpenNote>> {
        let mut stmt = self.conn.prepare(
            "SELECT notes.id, users.username, categories.name, notes.content
             FROM notes
             JOIN users ON notes.user_id = users.id
             JOIN categories ON notes.category_id = categories.id
             WHERE notes.is_done = 0
             ORDER BY notes.id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(OpenNote {
                id: row.get(0)?,
                username: row.get(1)?,
                category: row.get(2)?,
                content: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Marks a note done. Existence-gated: a note that is already done is
    /// marked again without complaint, a missing id is `NoteNotFound`.
    pub(crate) fn complete_note(&self, id: i64) -> Result<()> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM notes WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(TasError::NoteNotFound(id).into());
        }
        self.conn
            .execute("UPDATE notes SET is_done = 1 WHERE id = ?1", params![id])?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn count_users(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
    }

    #[cfg(test)]
    pub(crate) fn count_notes(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?)
    }

    #[cfg(test)]
    pub(crate) fn count_settings_rows(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))?)
    }
}

#[cfg(test)]
mod tests;
