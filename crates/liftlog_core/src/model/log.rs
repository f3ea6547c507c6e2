//! Log entry and exercise domain model.
//!
//! # Responsibility
//! - Define the records persisted by the catalog and log store.
//! - Convert raw submit-form text into a typed, validated command.
//!
//! # Invariants
//! - `LogEntry::timestamp` is assigned once at creation and never mutated.
//! - A `SubmitCommand` always carries a usable exercise reference: either
//!   an existing id or a trimmed, non-empty new name.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a catalog exercise.
pub type ExerciseId = i64;

/// Stable identifier for a logged set.
pub type LogId = i64;

/// One catalog row: a named exercise label.
///
/// Created lazily the first time an unseen name is submitted; never
/// updated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
}

/// One recorded set as stored in the `logs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: LogId,
    pub exercise_id: ExerciseId,
    pub weight: f64,
    pub reps: i64,
    /// Local wall-clock time in `YYYY-MM-DD HH:MM:SS`, set at insert.
    pub timestamp: String,
}

/// A log entry joined with its exercise name, as returned to readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntryView {
    pub id: LogId,
    pub exercise_id: ExerciseId,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: i64,
    pub timestamp: String,
}

/// Raw submit-form fields exactly as the HTTP layer hands them over.
///
/// All fields are text; blank and absent values are equivalent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitForm {
    pub log_id: Option<String>,
    pub exercise_id: Option<String>,
    pub new_exercise: Option<String>,
    pub weight: String,
    pub reps: String,
}

/// Exercise reference resolved from a submit form.
///
/// A non-blank new-exercise name takes precedence over a pre-selected id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExerciseRef {
    Existing(ExerciseId),
    New(String),
}

/// Validated submit command ready for the write path.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitCommand {
    /// `Some` updates an existing entry, `None` creates a new one.
    pub target: Option<LogId>,
    pub exercise: ExerciseRef,
    pub weight: f64,
    pub reps: i64,
}

/// Boundary validation failure for submit-form fields and list filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Neither an existing exercise id nor a new exercise name was given.
    MissingExercise,
    InvalidLogId(String),
    InvalidExerciseId(String),
    InvalidWeight(String),
    InvalidReps(String),
    InvalidDate {
        field: &'static str,
        value: String,
    },
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingExercise => {
                write!(f, "an exercise must be selected or a new name supplied")
            }
            Self::InvalidLogId(value) => write!(f, "invalid log id `{value}`"),
            Self::InvalidExerciseId(value) => write!(f, "invalid exercise id `{value}`"),
            Self::InvalidWeight(value) => {
                write!(f, "invalid weight `{value}`: expected a non-negative number")
            }
            Self::InvalidReps(value) => {
                write!(f, "invalid reps `{value}`: expected a positive whole number")
            }
            Self::InvalidDate { field, value } => {
                write!(f, "invalid {field} `{value}`: expected YYYY-MM-DD")
            }
        }
    }
}

impl Error for InputError {}

impl SubmitForm {
    /// Parses the raw form into a typed command, rejecting malformed input.
    ///
    /// # Contract
    /// - A non-blank `new_exercise` overrides any `exercise_id` supplied
    ///   alongside it.
    /// - Weight must parse as a finite, non-negative number.
    /// - Reps must parse as a whole number >= 1.
    pub fn parse(&self) -> Result<SubmitCommand, InputError> {
        let target = match normalized(self.log_id.as_deref()) {
            Some(raw) => Some(
                raw.parse::<LogId>()
                    .map_err(|_| InputError::InvalidLogId(raw.to_string()))?,
            ),
            None => None,
        };

        let exercise = if let Some(name) = normalized(self.new_exercise.as_deref()) {
            ExerciseRef::New(name.to_string())
        } else if let Some(raw) = normalized(self.exercise_id.as_deref()) {
            ExerciseRef::Existing(
                raw.parse::<ExerciseId>()
                    .map_err(|_| InputError::InvalidExerciseId(raw.to_string()))?,
            )
        } else {
            return Err(InputError::MissingExercise);
        };

        Ok(SubmitCommand {
            target,
            exercise,
            weight: parse_weight(&self.weight)?,
            reps: parse_reps(&self.reps)?,
        })
    }
}

/// Trims a raw optional field and maps blank values to `None`.
pub fn normalized(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_weight(raw: &str) -> Result<f64, InputError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| InputError::InvalidWeight(raw.to_string()))?;

    if !value.is_finite() || value < 0.0 {
        return Err(InputError::InvalidWeight(raw.to_string()));
    }

    Ok(value)
}

fn parse_reps(raw: &str) -> Result<i64, InputError> {
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| InputError::InvalidReps(raw.to_string()))?;

    if value < 1 {
        return Err(InputError::InvalidReps(raw.to_string()));
    }

    Ok(value)
}
