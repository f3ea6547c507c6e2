//! Core domain logic for LiftLog, a personal training-log tracker.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use export::{file_name_for_date, write_csv, ExportError, CSV_HEADER};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::log::{
    Exercise, ExerciseId, ExerciseRef, InputError, LogEntry, LogEntryView, LogId, SubmitCommand,
    SubmitForm,
};
pub use repo::exercise_repo::{ExerciseRepository, SqliteExerciseRepository};
pub use repo::log_repo::{LogFilter, LogPage, LogRepository, SqliteLogRepository, PER_PAGE};
pub use repo::{RepoError, RepoResult};
pub use service::log_service::{
    ListRequest, LogPageData, LogService, ServiceError, ServiceResult, SubmitOutcome,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
