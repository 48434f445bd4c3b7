//! Error type shared by the data providers and the simulation engine.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading hourly data or running a simulation.
///
/// All errors are fatal for the run that produced them; the engine never
/// returns partial results.
#[derive(Debug, Error)]
pub enum SimError {
    /// A sizing or policy parameter is outside its valid range.
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// An input record could not be parsed or failed validation.
    #[error("malformed input in {source_name} (line {line}): {reason}")]
    MalformedInput {
        source_name: String,
        line: u64,
        reason: String,
    },

    /// A derived series does not line up with the input records.
    #[error("length mismatch in {series}: expected {expected} values, got {actual}")]
    LengthMismatch {
        series: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("cannot read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl SimError {
    pub(crate) fn malformed(source_name: impl Into<String>, line: u64, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            source_name: source_name.into(),
            line,
            reason: reason.into(),
        }
    }
}

/// Fails with [`SimError::LengthMismatch`] unless `actual == expected`.
pub(crate) fn ensure_aligned(series: &'static str, expected: usize, actual: usize) -> Result<(), SimError> {
    if expected == actual {
        Ok(())
    } else {
        Err(SimError::LengthMismatch {
            series,
            expected,
            actual,
        })
    }
}
