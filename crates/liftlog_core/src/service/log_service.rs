//! Training-log use-case service.
//!
//! # Responsibility
//! - Drive submit/delete/list/export flows over the catalog and log
//!   repositories.
//! - Validate raw request input before any storage work happens.
//!
//! # Invariants
//! - A non-blank new-exercise name always wins over a pre-selected id.
//! - Updates never touch the stored creation timestamp.
//! - Deleting or updating a missing id completes without error.

use crate::export::{self, ExportError};
use crate::model::log::{
    Exercise, ExerciseRef, InputError, LogEntryView, LogId, SubmitForm,
};
use crate::repo::exercise_repo::ExerciseRepository;
use crate::repo::log_repo::{LogFilter, LogRepository};
use crate::repo::RepoError;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-level error wrapping the boundary and storage layers.
#[derive(Debug)]
pub enum ServiceError {
    Input(InputError),
    Repo(RepoError),
    Export(ExportError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Input(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<InputError> for ServiceError {
    fn from(value: InputError) -> Self {
        Self::Input(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ExportError> for ServiceError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

/// Raw listing request as the HTTP layer hands it over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    /// 1-indexed page; zero is treated as the first page.
    pub page: u32,
    pub search: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    /// Entry id whose edit form should be pre-populated.
    pub edit: Option<LogId>,
}

/// Everything the listing view needs to render.
#[derive(Debug, Clone, PartialEq)]
pub struct LogPageData {
    pub exercises: Vec<Exercise>,
    pub logs: Vec<LogEntryView>,
    pub edit_log: Option<LogEntryView>,
    pub page: u32,
    pub total_pages: u32,
    pub filter: LogFilter,
}

/// Result of a submit call; the caller redirects to the listing either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub log_id: LogId,
    pub created: bool,
}

/// Use-case service over the catalog and log repositories.
pub struct LogService<E: ExerciseRepository, L: LogRepository> {
    exercises: E,
    logs: L,
}

impl<E: ExerciseRepository, L: LogRepository> LogService<E, L> {
    /// Creates a service using the provided repository implementations.
    pub fn new(exercises: E, logs: L) -> Self {
        Self { exercises, logs }
    }

    /// Records or rewrites one set from raw form fields.
    ///
    /// # Contract
    /// - Malformed input is rejected with `ServiceError::Input` before any
    ///   storage work.
    /// - A form carrying a `log_id` updates that entry; without one a new
    ///   entry is created with the current timestamp.
    /// - Updating a missing id is a silent no-op.
    pub fn submit(&self, form: &SubmitForm) -> ServiceResult<SubmitOutcome> {
        let command = form.parse()?;

        let exercise_id = match &command.exercise {
            ExerciseRef::New(name) => self.exercises.resolve_or_create(name)?,
            ExerciseRef::Existing(id) => *id,
        };

        let outcome = match command.target {
            Some(log_id) => {
                self.logs
                    .update_entry(log_id, exercise_id, command.weight, command.reps)?;
                SubmitOutcome {
                    log_id,
                    created: false,
                }
            }
            None => {
                let log_id = self
                    .logs
                    .insert_entry(exercise_id, command.weight, command.reps)?;
                SubmitOutcome {
                    log_id,
                    created: true,
                }
            }
        };

        info!(
            "event=log_submit module=service status=ok action={} log_id={} exercise_id={exercise_id}",
            if outcome.created { "create" } else { "update" },
            outcome.log_id,
        );

        Ok(outcome)
    }

    /// Deletes one entry by id; idempotent.
    pub fn delete(&self, log_id: LogId) -> ServiceResult<()> {
        self.logs.delete_entry(log_id)?;
        info!("event=log_delete module=service status=ok log_id={log_id}");
        Ok(())
    }

    /// Serves one page of the filtered listing plus form data.
    ///
    /// Blank filter fields are treated as absent; malformed dates are
    /// rejected. A page past the end yields an empty row list.
    pub fn list_page(&self, request: &ListRequest) -> ServiceResult<LogPageData> {
        let filter = parse_filter(request)?;
        let page = self.logs.list_entries(&filter, request.page.max(1))?;
        let exercises = self.exercises.list_exercises()?;
        let edit_log = match request.edit {
            Some(id) => self.logs.get_entry(id)?,
            None => None,
        };

        Ok(LogPageData {
            exercises,
            logs: page.entries,
            edit_log,
            page: page.page,
            total_pages: page.total_pages,
            filter,
        })
    }

    /// Returns the full history in listing order.
    pub fn export_rows(&self) -> ServiceResult<Vec<LogEntryView>> {
        Ok(self.logs.export_entries()?)
    }

    /// Streams the full history as CSV into `sink`.
    pub fn export_csv<W: Write>(&self, sink: W) -> ServiceResult<()> {
        let rows = self.logs.export_entries()?;
        export::write_csv(&rows, sink)?;
        info!(
            "event=log_export module=service status=ok rows={}",
            rows.len()
        );
        Ok(())
    }

    /// Returns the dated download file name, e.g. `training_log_20240131.csv`.
    pub fn export_file_name(&self) -> ServiceResult<String> {
        let date = self.logs.current_date_compact()?;
        Ok(export::file_name_for_date(&date))
    }
}

fn parse_filter(request: &ListRequest) -> Result<LogFilter, InputError> {
    Ok(LogFilter {
        search: crate::model::log::normalized(request.search.as_deref()).map(str::to_string),
        date_from: parse_date_bound("date_from", request.date_from.as_deref())?,
        date_to: parse_date_bound("date_to", request.date_to.as_deref())?,
    })
}

fn parse_date_bound(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<String>, InputError> {
    let Some(trimmed) = crate::model::log::normalized(value) else {
        return Ok(None);
    };

    if !DATE_RE.is_match(trimmed) {
        return Err(InputError::InvalidDate {
            field,
            value: trimmed.to_string(),
        });
    }

    Ok(Some(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_date_bound, parse_filter, ListRequest};
    use crate::model::log::InputError;

    #[test]
    fn parse_date_bound_accepts_shape_and_blank() {
        assert_eq!(
            parse_date_bound("date_from", Some("2024-01-31")).unwrap(),
            Some("2024-01-31".to_string())
        );
        assert_eq!(parse_date_bound("date_from", Some("  ")).unwrap(), None);
        assert_eq!(parse_date_bound("date_from", None).unwrap(), None);
    }

    #[test]
    fn parse_date_bound_rejects_malformed_values() {
        let err = parse_date_bound("date_to", Some("31/01/2024")).unwrap_err();
        assert!(matches!(err, InputError::InvalidDate { field: "date_to", .. }));

        let err = parse_date_bound("date_to", Some("2024-1-5")).unwrap_err();
        assert!(matches!(err, InputError::InvalidDate { .. }));
    }

    #[test]
    fn parse_filter_trims_search_and_maps_blank_to_none() {
        let request = ListRequest {
            search: Some("  bench  ".to_string()),
            date_from: Some(String::new()),
            ..ListRequest::default()
        };
        let filter = parse_filter(&request).unwrap();
        assert_eq!(filter.search.as_deref(), Some("bench"));
        assert_eq!(filter.date_from, None);
    }
}
