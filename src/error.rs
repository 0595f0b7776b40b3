//! # Error Types
//!
//! This module defines the error type shared by every part of the rota evaluation core.
//! Each failure the core can hit (a malformed range string, a gene vector of the wrong
//! length, a saturated contiguity bonus, a failed worker evaluation) has its own variant,
//! so callers can tell configuration mistakes apart from evaluation failures.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use rotagen::error::{Result, RotaError};
//!
//! fn check_length(expected: usize, actual: usize) -> Result<()> {
//!     if expected != actual {
//!         return Err(RotaError::LengthMismatch { expected, actual });
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_length(3, 3).is_ok());
//! assert!(check_length(3, 2).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use rotagen::error::{OptionExt, RotaError};
//!
//! fn first_score(scores: &[u64]) -> rotagen::error::Result<u64> {
//!     scores.first().copied().ok_or_else_rota(|| {
//!         RotaError::Configuration("no scores".to_string())
//!     })
//! }
//!
//! assert_eq!(first_score(&[7]).unwrap(), 7);
//! ```

use thiserror::Error;

use crate::roster::PersonId;

/// Represents errors that can occur while building or scoring a rota.
#[derive(Error, Debug)]
pub enum RotaError {
    /// An hour or day range string could not be parsed.
    #[error("Range parse error: invalid range '{range}': {reason}")]
    RangeParse { range: String, reason: String },

    /// An hour slot was built from an out-of-range hour or an unrepresentable date.
    #[error("Invalid hour slot: {0}")]
    InvalidHourSlot(String),

    /// The gene vector does not have one entry per schedulable hour.
    #[error("Length mismatch: expected {expected} genes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A gene refers to a person that is not on the roster.
    #[error("Unknown person id: {0}")]
    UnknownPerson(PersonId),

    /// Two people on the roster share an id.
    #[error("Duplicate person id: {0}")]
    DuplicatePerson(PersonId),

    /// The hours to schedule are not strictly ascending.
    #[error("Schedule order error: hour at position {position} is not after its predecessor")]
    NotAscending { position: usize },

    /// The contiguity diff for a day has no entry in the bonus table.
    #[error("Contiguity diff {diff} is outside the bonus table domain 0..={max}")]
    ContiguityOutOfDomain { diff: usize, max: usize },

    /// The total contiguity bonus reached the saturation trip-wire.
    #[error("Contiguity bonus saturated at {score} over {days} days")]
    BonusSaturated { score: u64, days: usize },

    /// The evaluation of a single individual failed.
    #[error("Fitness calculation error for individual {index}: {source}")]
    Evaluation {
        index: usize,
        #[source]
        source: Box<RotaError>,
    },

    /// The prior generation's parents and fitness values are not aligned.
    #[error("Prior generation mismatch: {parents} parents but {fitness} fitness values")]
    PriorGeneration { parents: usize, fitness: usize },

    /// Error that occurs when the worker pool cannot be built.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for rota operations.
///
/// This type is a convenience wrapper around `std::result::Result` with the error type
/// fixed to `RotaError`.
pub type Result<T> = std::result::Result<T, RotaError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an Option to a Result using a closure to generate the error.
    fn ok_or_else_rota<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> RotaError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_rota<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> RotaError,
    {
        self.ok_or_else(err_fn)
    }
}

impl RotaError {
    /// Builds a `RangeParse` error for the given range string.
    pub(crate) fn range(range: &str, reason: impl Into<String>) -> Self {
        RotaError::RangeParse {
            range: range.to_string(),
            reason: reason.into(),
        }
    }
}
