use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the classification core and the batch pipeline.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing required column: `{column}`")]
    MissingColumn { column: &'static str },

    #[error("Malformed row {row}: {cause}")]
    MalformedRow { row: usize, cause: RowFault },

    /// Wiring defect, never a user error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid allocation distribution: percentages sum to {total}, expected 100")]
    InvalidDistribution { total: u32 },
}

impl ProfileError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ProfileError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            ProfileError::InputNotFound { .. } | ProfileError::Io { .. } | ProfileError::MissingColumn { .. } => 2,
            ProfileError::MalformedRow { .. } => 3,
            ProfileError::Configuration(_) | ProfileError::InvalidDistribution { .. } => 4,
        }
    }
}

/// Why a single input row could not be turned into a customer record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowFault {
    #[error("missing `{0}` field")]
    MissingField(&'static str),

    #[error("empty `Total score` value")]
    EmptyScore,

    #[error("CSV parse error: {0}")]
    Csv(String),
}

/// Front-end error: a message plus the process exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_row_message_names_the_row() {
        let err = ProfileError::MalformedRow {
            row: 3,
            cause: RowFault::MissingField("Total score"),
        };
        assert_eq!(err.to_string(), "Malformed row 3: missing `Total score` field");

        let app: AppError = err.into();
        assert_eq!(app.exit_code(), 3);
        assert!(app.message().contains("row 3"));
    }
}
