//! A heuristic generator for t-covering, (d,t)-locating, and (d,t,δ)-detecting
//! combinatorial test arrays.
//!
//! [`enumerate::build`] constructs the immutable structural graph
//! (Factors, Singles, Interactions, DSets); [`Engine::run`] then drives the
//! score-guided search to completion, committing rows through
//! [`score::update_array`] until the score reaches zero or the search
//! stagnates.

pub mod cli;
pub mod controller;
pub mod engine;
pub mod enumerate;
pub mod error;
pub mod init;
pub mod io;
pub mod logging;
pub mod model;
pub mod progress;
pub mod score;
pub mod tweak;

pub use engine::Engine;
pub use error::{Error, Result};
