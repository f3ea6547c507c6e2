//! Log store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own create/update/delete for logged sets.
//! - Answer filtered, paginated, sorted queries joined with the catalog.
//!
//! # Invariants
//! - The count query and the data query always apply identical filter
//!   predicates, built once by [`LogFilter::where_clause`].
//! - `timestamp` is assigned at insert and never changed by updates.
//! - Updating or deleting a missing id affects zero rows and is not an
//!   error.
//! - Ordering is `timestamp DESC, id DESC` on every read path.

use crate::model::log::{ExerciseId, LogEntryView, LogId};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

/// Fixed page size for the log listing.
pub const PER_PAGE: u32 = 20;

const VIEW_SELECT_SQL: &str = "SELECT
    l.id,
    l.exercise_id,
    e.name AS exercise_name,
    l.weight,
    l.reps,
    l.timestamp
FROM logs l
JOIN exercises e ON e.id = l.exercise_id";

const COUNT_SELECT_SQL: &str =
    "SELECT COUNT(*) FROM logs l JOIN exercises e ON e.id = l.exercise_id";

const ORDER_SQL: &str = " ORDER BY l.timestamp DESC, l.id DESC";

/// Optional listing filters, combined with AND when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Case-insensitive substring match on exercise name.
    pub search: Option<String>,
    /// Inclusive lower bound on the calendar date of `timestamp`.
    pub date_from: Option<String>,
    /// Inclusive upper bound on the calendar date of `timestamp`.
    pub date_to: Option<String>,
}

impl LogFilter {
    /// Builds the WHERE fragment plus bind values for this filter.
    ///
    /// Both the count query and the data query must consume the result of
    /// one call, so the filtered count always matches the filtered rows.
    fn where_clause(&self) -> (String, Vec<Value>) {
        let mut sql = String::from(" WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(search) = self.search.as_deref() {
            sql.push_str(" AND e.name LIKE ? ESCAPE '\\'");
            bind_values.push(Value::Text(format!("%{}%", escape_like_pattern(search))));
        }

        if let Some(from) = self.date_from.as_deref() {
            sql.push_str(" AND date(l.timestamp) >= date(?)");
            bind_values.push(Value::Text(from.to_string()));
        }

        if let Some(to) = self.date_to.as_deref() {
            sql.push_str(" AND date(l.timestamp) <= date(?)");
            bind_values.push(Value::Text(to.to_string()));
        }

        (sql, bind_values)
    }
}

/// One listing page plus pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct LogPage {
    pub entries: Vec<LogEntryView>,
    /// 1-indexed page that was actually served.
    pub page: u32,
    /// `ceil(total_matching_rows / PER_PAGE)`; zero when nothing matches.
    pub total_pages: u32,
}

/// Repository interface for the log store and query engine.
pub trait LogRepository {
    /// Inserts a new set, assigning the creation timestamp from the local
    /// clock, and returns the new id.
    fn insert_entry(&self, exercise_id: ExerciseId, weight: f64, reps: i64) -> RepoResult<LogId>;
    /// Rewrites exercise/weight/reps of an existing set. The creation
    /// timestamp is left untouched; a missing id is a silent no-op.
    fn update_entry(
        &self,
        id: LogId,
        exercise_id: ExerciseId,
        weight: f64,
        reps: i64,
    ) -> RepoResult<()>;
    /// Deletes by id; idempotent, a missing id is a no-op.
    fn delete_entry(&self, id: LogId) -> RepoResult<()>;
    /// Fetches one joined view row, `None` when the id does not exist.
    fn get_entry(&self, id: LogId) -> RepoResult<Option<LogEntryView>>;
    /// Counts rows matching `filter`.
    fn count_entries(&self, filter: &LogFilter) -> RepoResult<u32>;
    /// Serves one page of the filtered listing.
    fn list_entries(&self, filter: &LogFilter, page: u32) -> RepoResult<LogPage>;
    /// Returns the full unfiltered history in listing order.
    fn export_entries(&self) -> RepoResult<Vec<LogEntryView>>;
    /// Returns today's local date as `YYYYMMDD` for export file names.
    fn current_date_compact(&self) -> RepoResult<String>;
}

/// SQLite-backed log store.
pub struct SqliteLogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLogRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl LogRepository for SqliteLogRepository<'_> {
    fn insert_entry(&self, exercise_id: ExerciseId, weight: f64, reps: i64) -> RepoResult<LogId> {
        self.conn.execute(
            "INSERT INTO logs (exercise_id, weight, reps, timestamp)
             VALUES (?1, ?2, ?3, datetime('now', 'localtime'));",
            params![exercise_id, weight, reps],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_entry(
        &self,
        id: LogId,
        exercise_id: ExerciseId,
        weight: f64,
        reps: i64,
    ) -> RepoResult<()> {
        // A missing id updates zero rows, which is not an error. The
        // timestamp column never appears in the SET list.
        self.conn.execute(
            "UPDATE logs
             SET exercise_id = ?1, weight = ?2, reps = ?3
             WHERE id = ?4;",
            params![exercise_id, weight, reps, id],
        )?;

        Ok(())
    }

    fn delete_entry(&self, id: LogId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM logs WHERE id = ?1;", [id])?;
        Ok(())
    }

    fn get_entry(&self, id: LogId) -> RepoResult<Option<LogEntryView>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{VIEW_SELECT_SQL} WHERE l.id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_view_row(row)?));
        }

        Ok(None)
    }

    fn count_entries(&self, filter: &LogFilter) -> RepoResult<u32> {
        let (clause, bind_values) = filter.where_clause();
        let total: i64 = self.conn.query_row(
            &format!("{COUNT_SELECT_SQL}{clause};"),
            params_from_iter(bind_values),
            |row| row.get(0),
        )?;

        u32::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("row count {total} out of range")))
    }

    fn list_entries(&self, filter: &LogFilter, page: u32) -> RepoResult<LogPage> {
        let total = self.count_entries(filter)?;
        let total_pages = total.div_ceil(PER_PAGE);
        let page = page.max(1);
        let offset = i64::from(page - 1) * i64::from(PER_PAGE);

        let (clause, mut bind_values) = filter.where_clause();
        let sql = format!("{VIEW_SELECT_SQL}{clause}{ORDER_SQL} LIMIT ? OFFSET ?;");
        bind_values.push(Value::Integer(i64::from(PER_PAGE)));
        bind_values.push(Value::Integer(offset));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            entries.push(parse_view_row(row)?);
        }

        Ok(LogPage {
            entries,
            page,
            total_pages,
        })
    }

    fn export_entries(&self) -> RepoResult<Vec<LogEntryView>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{VIEW_SELECT_SQL}{ORDER_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            entries.push(parse_view_row(row)?);
        }

        Ok(entries)
    }

    fn current_date_compact(&self) -> RepoResult<String> {
        let date = self.conn.query_row(
            "SELECT strftime('%Y%m%d', 'now', 'localtime');",
            [],
            |row| row.get(0),
        )?;
        Ok(date)
    }
}

fn parse_view_row(row: &Row<'_>) -> RepoResult<LogEntryView> {
    Ok(LogEntryView {
        id: row.get("id")?,
        exercise_id: row.get("exercise_id")?,
        exercise_name: row.get("exercise_name")?,
        weight: row.get("weight")?,
        reps: row.get("reps")?,
        timestamp: row.get("timestamp")?,
    })
}

/// Escapes LIKE metacharacters so user text only ever matches literally.
fn escape_like_pattern(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::{escape_like_pattern, LogFilter};

    #[test]
    fn escape_like_pattern_neutralizes_metacharacters() {
        assert_eq!(escape_like_pattern("100% raw_bar"), "100\\% raw\\_bar");
        assert_eq!(escape_like_pattern(r"back\slash"), r"back\\slash");
        assert_eq!(escape_like_pattern("bench"), "bench");
    }

    #[test]
    fn where_clause_is_empty_for_default_filter() {
        let (sql, binds) = LogFilter::default().where_clause();
        assert_eq!(sql, " WHERE 1 = 1");
        assert!(binds.is_empty());
    }

    #[test]
    fn where_clause_adds_one_predicate_per_present_filter() {
        let filter = LogFilter {
            search: Some("bench".to_string()),
            date_from: Some("2024-01-01".to_string()),
            date_to: Some("2024-01-31".to_string()),
        };
        let (sql, binds) = filter.where_clause();
        assert!(sql.contains("e.name LIKE ?"));
        assert!(sql.contains("date(l.timestamp) >= date(?)"));
        assert!(sql.contains("date(l.timestamp) <= date(?)"));
        assert_eq!(binds.len(), 3);
    }
}
