use enumset::EnumSet;
use itertools::Itertools;

use crate::tradespace::metadata::Parameter;

/// Domain failures of the tradespace pipeline.
#[derive(Debug, thiserror::Error)]
pub enum TradespaceError {
    #[error("missing metadata parameters: {}", .0.iter().map(Parameter::label).join(", "))]
    MissingParameter(EnumSet<Parameter>),

    /// Unparsable cell, or a row that does not have the shape the file format requires.
    ///
    /// `line` is 1-based, as shown by text editors.
    #[error("line {line}, column `{column}`: cannot use `{value}`: {reason}")]
    Format { line: usize, column: String, value: String, reason: String },

    /// Inconsistent constants within one configuration or across files.
    #[error("data integrity violation: {0}")]
    DataIntegrity(String),

    #[error("division by zero: {0}")]
    Division(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl TradespaceError {
    pub fn format(
        index: usize,
        column: impl Into<String>,
        value: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::Format {
            line: index + 1,
            column: column.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}
