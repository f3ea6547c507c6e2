//! Domain model for the training log.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the parse-and-validate boundary between raw form text and typed
//!   commands.
//!
//! # Invariants
//! - Every stored record is identified by a stable integer id.
//! - Malformed input is rejected at parse time, never coerced.

pub mod log;
