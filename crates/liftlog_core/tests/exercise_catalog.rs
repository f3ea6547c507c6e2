use liftlog_core::db::migrations::latest_version;
use liftlog_core::db::open_db_in_memory;
use liftlog_core::{ExerciseRepository, RepoError, SqliteExerciseRepository};
use rusqlite::Connection;

#[test]
fn resolve_or_create_is_idempotent_per_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteExerciseRepository::try_new(&conn).unwrap();

    let first = repo.resolve_or_create("Bench Press").unwrap();
    let second = repo.resolve_or_create("Bench Press").unwrap();

    assert_eq!(first, second);
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM exercises;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn distinct_names_resolve_to_distinct_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteExerciseRepository::try_new(&conn).unwrap();

    let bench = repo.resolve_or_create("Bench Press").unwrap();
    let squat = repo.resolve_or_create("Squat").unwrap();

    assert_ne!(bench, squat);
}

#[test]
fn blank_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteExerciseRepository::try_new(&conn).unwrap();

    let err = repo.resolve_or_create("   ").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn resolution_trims_surrounding_whitespace() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteExerciseRepository::try_new(&conn).unwrap();

    let first = repo.resolve_or_create("Deadlift").unwrap();
    let second = repo.resolve_or_create("  Deadlift  ").unwrap();

    assert_eq!(first, second);
}

#[test]
fn list_exercises_orders_by_name_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteExerciseRepository::try_new(&conn).unwrap();

    repo.resolve_or_create("Squat").unwrap();
    repo.resolve_or_create("bench press").unwrap();
    repo.resolve_or_create("Deadlift").unwrap();

    let names: Vec<String> = repo
        .list_exercises()
        .unwrap()
        .into_iter()
        .map(|exercise| exercise.name)
        .collect();
    assert_eq!(names, ["bench press", "Deadlift", "Squat"]);
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteExerciseRepository::try_new(&conn);
    match result {
        Err(RepoError::SchemaMismatch {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected schema mismatch error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_tables() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteExerciseRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("exercises"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE exercises (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );
        CREATE TABLE logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            exercise_id INTEGER NOT NULL,
            weight REAL NOT NULL,
            reps INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteExerciseRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "logs",
            column: "timestamp"
        })
    ));
}
