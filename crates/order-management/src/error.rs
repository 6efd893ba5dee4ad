//! Error types for the order-management harness.

use thiserror::Error;

/// Main error type for harness operations.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Configuration error (malformed properties, bad database URL).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Could not open or authenticate a database session.
    #[error("Connection error: {0}")]
    Connection(#[source] tokio_postgres::Error),

    /// Both migration paths failed.
    #[error("Migration error: {0}")]
    Migration(String),

    /// The CRUD scenario failed and the transaction was rolled back.
    #[error("Scenario error: {0}")]
    Scenario(String),

    /// A single catalog statement failed.
    #[error("Statement #{number} failed: {message}")]
    Statement { number: usize, message: String },

    /// Database error outside the categories above.
    #[error("Database error: {0}")]
    Db(#[from] tokio_postgres::Error),

    /// IO error (reading the optional query script).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Create a Statement error for a numbered catalog entry.
    pub fn statement(number: usize, message: impl Into<String>) -> Self {
        HarnessError::Statement {
            number,
            message: message.into(),
        }
    }

    /// Exit code for the process when this error reaches the top level.
    pub fn exit_code(&self) -> u8 {
        match self {
            HarnessError::Connection(_) => 2,
            HarnessError::Migration(_) => 3,
            _ => 1,
        }
    }

    /// Format error with full details including error chain.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("{}", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_distinguish_bringup_failures() {
        assert_eq!(HarnessError::Migration("boom".into()).exit_code(), 3);
        assert_eq!(HarnessError::Config("bad".into()).exit_code(), 1);
        assert_eq!(HarnessError::statement(7, "no such row").exit_code(), 1);
    }

    #[test]
    fn statement_error_carries_number() {
        let err = HarnessError::statement(9, "syntax error");
        assert_eq!(err.to_string(), "Statement #9 failed: syntax error");
    }
}
