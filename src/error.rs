//! Fatal, run-aborting errors.
//!
//! Anything that should stop the whole request (bad input file, broken
//! invariants) is an `AppError`. Per-product problems are *not* errors at this
//! level; they travel as `fit::SkipReason` values inside the run output.

/// Exit code for runtime failures unrelated to the input (e.g. thread pool setup).
pub const EXIT_RUNTIME: u8 = 1;
/// Exit code for ingestion, input and configuration problems.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for internal invariant violations (programming errors upstream).
pub const EXIT_INVARIANT: u8 = 4;

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

    /// Malformed date, missing column, unreadable/empty input, bad option.
    pub fn ingestion(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    /// Environment failure that is not caused by the input or options.
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(EXIT_RUNTIME, message)
    }

    /// A forecast row that cannot be merged into the totals table.
    pub fn merge_invariant(message: impl Into<String>) -> Self {
        Self::new(EXIT_INVARIANT, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
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
    fn constructors_carry_distinct_exit_codes() {
        assert_eq!(AppError::runtime("pool").exit_code(), EXIT_RUNTIME);
        assert_eq!(AppError::ingestion("bad").exit_code(), EXIT_INPUT);
        assert_eq!(AppError::merge_invariant("dup").exit_code(), EXIT_INVARIANT);
        assert_ne!(EXIT_RUNTIME, EXIT_INPUT);
    }
}
