//! Typed error hierarchy (§7). Every fallible boundary in the crate returns
//! `Result<T, Error>` rather than panicking; the CLI layer matches on the
//! variant to pick an exit code and a user-facing message.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{file}:{line}: expected {expected}, found {actual}")]
    InputSyntax {
        file: String,
        line: usize,
        expected: String,
        actual: String,
    },

    #[error("{file} row {row}, column {col}: value {value} is not a valid level (factor {col} allows 0..{level})")]
    InputSemantics {
        file: String,
        row: usize,
        col: usize,
        value: i64,
        level: usize,
    },

    #[error("infeasible parameters: {rule}")]
    ParameterInfeasible { rule: String },

    #[error("out of memory while {during}")]
    OutOfMemory {
        during: &'static str,
        /// Enumeration failures are unrecoverable (exit 1); a failed
        /// speculative clone inside `heuristic_all` just downgrades the
        /// heuristic and is reported as a warning (exit 0).
        fatal: bool,
    },

    #[error("score stagnated for {rows} rows; requested properties appear infeasible with this budget")]
    Stagnation { rows: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Process exit code this error maps to, per §7.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InputSyntax { .. }
            | Error::InputSemantics { .. }
            | Error::ParameterInfeasible { .. }
            | Error::Io(_) => 1,
            Error::OutOfMemory { fatal, .. } => {
                if *fatal {
                    1
                } else {
                    0
                }
            }
            // stagnation aborts the loop but still flushes best-effort
            // output, so the process itself reports success.
            Error::Stagnation { .. } => 0,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_syntax_display_is_verbatim() {
        let err = Error::InputSyntax {
            file: "profile.txt".to_string(),
            line: 2,
            expected: "3 level bounds".to_string(),
            actual: "2 tokens".to_string(),
        };
        assert_eq!(err.to_string(), "profile.txt:2: expected 3 level bounds, found 2 tokens");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn stagnation_display_and_exit_code() {
        let err = Error::Stagnation { rows: 42 };
        assert_eq!(
            err.to_string(),
            "score stagnated for 42 rows; requested properties appear infeasible with this budget"
        );
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn recoverable_out_of_memory_exits_zero_fatal_exits_one() {
        let recoverable = Error::OutOfMemory { during: "probing", fatal: false };
        let fatal = Error::OutOfMemory { during: "enumeration", fatal: true };
        assert_eq!(recoverable.exit_code(), 0);
        assert_eq!(fatal.exit_code(), 1);
    }
}
