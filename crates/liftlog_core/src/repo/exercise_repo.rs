//! Exercise catalog contracts and SQLite implementation.
//!
//! # Responsibility
//! - Resolve free-text exercise names to stable catalog ids.
//! - Serve the name-ordered catalog for entry forms.
//!
//! # Invariants
//! - `name` is unique; resolving an existing name is idempotent and never
//!   creates a second row.
//! - Resolution is one atomic statement, safe under concurrent writers.
//! - The catalog exposes no update or delete operations.

use crate::model::log::{Exercise, ExerciseId};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::Connection;

/// Repository interface for the exercise catalog.
pub trait ExerciseRepository {
    /// Returns the id for `name`, inserting a catalog row on first use.
    fn resolve_or_create(&self, name: &str) -> RepoResult<ExerciseId>;
    /// Lists the whole catalog ordered by name.
    fn list_exercises(&self) -> RepoResult<Vec<Exercise>>;
}

/// SQLite-backed exercise catalog.
pub struct SqliteExerciseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteExerciseRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ExerciseRepository for SqliteExerciseRepository<'_> {
    fn resolve_or_create(&self, name: &str) -> RepoResult<ExerciseId> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RepoError::InvalidData(
                "exercise name must not be blank".to_string(),
            ));
        }

        // Single round trip: the no-op DO UPDATE makes RETURNING yield the
        // existing row's id on conflict.
        let id = self.conn.query_row(
            "INSERT INTO exercises (name)
             VALUES (?1)
             ON CONFLICT (name) DO UPDATE SET name = excluded.name
             RETURNING id;",
            [trimmed],
            |row| row.get(0),
        )?;

        Ok(id)
    }

    fn list_exercises(&self) -> RepoResult<Vec<Exercise>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM exercises ORDER BY name COLLATE NOCASE ASC;")?;
        let mut rows = stmt.query([])?;
        let mut exercises = Vec::new();

        while let Some(row) = rows.next()? {
            exercises.push(Exercise {
                id: row.get("id")?,
                name: row.get("name")?,
            });
        }

        Ok(exercises)
    }
}
