//! Progress reporter (C15, §4.10): user-facing console output, distinct
//! from [`crate::logging`]'s internal tracing. Verbosity is controlled by
//! the `-v`/`-h`/`-s` flags; `-s` silences everything below the final
//! summary.

use colored::Colorize;

use crate::engine::Engine;
use crate::model::Row;

#[derive(Clone, Copy, Debug)]
pub enum Verbosity {
    /// Print every row as it is committed.
    Normal,
    /// Print a score breakdown and active heuristic alongside each row.
    Verbose,
    /// Suppress per-row lines; only the final summary is printed.
    Halfway,
    /// Only the final row count is printed; overrides verbose/halfway.
    Silent,
}

impl Verbosity {
    pub fn resolve(verbose: bool, halfway: bool, silent: bool) -> Verbosity {
        if silent {
            Verbosity::Silent
        } else if halfway {
            Verbosity::Halfway
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

pub struct Progress {
    verbosity: Verbosity,
}

impl Progress {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn row_committed(&self, engine: &Engine, row: &Row) {
        match self.verbosity {
            Verbosity::Silent | Verbosity::Halfway => {}
            Verbosity::Normal => {
                let line = row.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("\t");
                println!("{} {}", "pushed row:".dimmed(), line);
            }
            Verbosity::Verbose => {
                let line = row.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("\t");
                println!(
                    "{} {}  {} {}  {} {}",
                    "pushed row:".dimmed(),
                    line,
                    "score:".dimmed(),
                    engine.score,
                    "heuristic:".dimmed(),
                    heuristic_label(engine),
                );
            }
        }
    }

    pub fn finished(&self, engine: &Engine) {
        let summary = format!(
            "generated {} rows (score {})",
            engine.rows.len(),
            engine.score
        );
        if engine.score == 0 {
            println!("{}", summary.green());
        } else {
            println!("{}", summary.yellow());
        }
    }

    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "warning:".yellow().bold(), message);
    }
}

fn heuristic_label(engine: &Engine) -> &'static str {
    use crate::controller::HeuristicKind::*;
    match engine.heuristic_in_use {
        None => "none",
        COnly => "c_only",
        LOnly => "l_only",
        LAndD => "l_and_d",
        DOnly => "d_only",
        All => "all",
    }
}
