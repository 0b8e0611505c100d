//! CLI / Args (C12, §4.8): argument parsing and dispatch. Argument count
//! (not a flag) selects the property mode, mirroring the reference tool's
//! `generate (t | d t | d t δ) <input-file> [output-file]` contract.

use clap::Parser;

use crate::error::{Error, Result};
use crate::model::PropertyMode;

#[derive(Parser, Debug)]
#[command(name = "generate", about = "Generates covering, locating, or detecting arrays")]
pub struct Args {
    /// One, two, or three positional integers: `t`, `t d`, or `t d δ`.
    /// The count determines the property mode (coverage / location /
    /// detection).
    #[arg(num_args = 1..=3, value_name = "INT")]
    pub params: Vec<u64>,

    /// Factor-profile input file (column count + level bounds).
    pub input_file: String,

    /// Output file for the generated array; stdout if omitted.
    pub output_file: Option<String>,

    /// Pre-existing row prefix to extend rather than replace.
    #[arg(long = "partial", value_name = "FILE")]
    pub partial: Option<String>,

    /// Enable engine-internal debug tracing.
    #[arg(short = 'd')]
    pub debug: bool,

    /// Print a score breakdown and the active heuristic after each row.
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Halfway mode: suppress per-row console lines.
    #[arg(short = 'h')]
    pub halfway: bool,

    /// Silent mode: print only the final summary; overrides `-d`/`-v`.
    #[arg(short = 's')]
    pub silent: bool,
}

/// The resolved `(t, d, delta, mode)` tuple implied by the positional
/// parameter count.
pub struct Parameters {
    pub t: u64,
    pub d: u64,
    pub delta: u64,
    pub mode: PropertyMode,
}

impl Args {
    pub fn parameters(&self) -> Result<Parameters> {
        match self.params.as_slice() {
            [t] => Ok(Parameters { t: *t, d: 0, delta: 0, mode: PropertyMode::CoverageOnly }),
            [d, t] => Ok(Parameters { t: *t, d: *d, delta: 0, mode: PropertyMode::CoverageAndLocation }),
            [d, t, delta] => Ok(Parameters { t: *t, d: *d, delta: *delta, mode: PropertyMode::All }),
            other => Err(Error::ParameterInfeasible {
                rule: format!("expected 1 to 3 positional integers (t | d t | d t delta), got {}", other.len()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with(params: Vec<u64>) -> Args {
        Args {
            params,
            input_file: "in.txt".into(),
            output_file: None,
            partial: None,
            debug: false,
            verbose: false,
            halfway: false,
            silent: false,
        }
    }

    #[test]
    fn one_int_selects_coverage_only() {
        let p = args_with(vec![2]).parameters().unwrap();
        assert_eq!(p.mode, PropertyMode::CoverageOnly);
        assert_eq!(p.t, 2);
    }

    #[test]
    fn two_ints_select_coverage_and_location() {
        let p = args_with(vec![3, 2]).parameters().unwrap();
        assert_eq!(p.mode, PropertyMode::CoverageAndLocation);
        assert_eq!(p.d, 3);
        assert_eq!(p.t, 2);
    }

    #[test]
    fn three_ints_select_all() {
        let p = args_with(vec![3, 2, 2]).parameters().unwrap();
        assert_eq!(p.mode, PropertyMode::All);
        assert_eq!(p.delta, 2);
    }
}
