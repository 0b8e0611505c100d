//! Logging (C17, §4.10): structured, leveled tracing of engine-internal
//! events via `log`/`simplelog`, wired up once at process start. Distinct
//! from [`crate::progress`], which is the user-facing row-by-row output.

use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

/// Initializes the global logger. `-d` raises the level to `Debug`;
/// `-s` (silent) drops it to `Warn` so engine chatter never competes with
/// the final summary.
pub fn init(debug: bool, silent: bool) {
    let level = if silent {
        LevelFilter::Warn
    } else if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);
}
