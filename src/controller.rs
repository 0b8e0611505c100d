//! Heuristic controller (§4.3): a one-way state machine over
//! `(mode, score, total_problems)` that tells the engine loop which of the
//! five [`crate::tweak`] heuristics to run next.

use crate::model::PropertyMode;

/// Which row-tweaking heuristic (§4.5) is currently active. Distinct from
/// [`PropertyMode`]: this also has `None` (before the first transition) and
/// `LAndD`, which only ever appear as internal heuristic states, never as a
/// user-selectable top-level property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeuristicKind {
    None,
    COnly,
    LOnly,
    LAndD,
    DOnly,
    All,
}

/// Pure transition function: given the active mode, the current score and
/// total_problems, and the heuristic in use, returns the heuristic that
/// should be in use now. Threshold constants are transcribed verbatim from
/// the reference implementation's `update_heuristic` (§9: tunable but
/// preserved to reproduce array sizes).
pub fn select(mode: PropertyMode, score: u64, total_problems: u64, current: HeuristicKind) -> HeuristicKind {
    if total_problems == 0 {
        return HeuristicKind::All;
    }
    let ratio = score as f64 / total_problems as f64;
    use HeuristicKind::*;

    match mode {
        PropertyMode::CoverageOnly => {
            if current != All && total_problems < 20_000 {
                All
            } else if current == DOnly && ratio < 0.20 && score < 100_000 {
                All
            } else if current == COnly && ratio < 0.40 && score < 500_000 {
                DOnly
            } else if current == None {
                COnly
            } else {
                current
            }
        }
        PropertyMode::CoverageAndLocation => {
            if current != All && total_problems < 15_000 {
                All
            } else if current == DOnly && ratio < 0.15 && score < 75_000 {
                All
            } else if current == LOnly && ratio < 0.30 && score < 250_000 {
                DOnly
            } else if current == COnly && ratio < 0.80 && score < 750_000 {
                LOnly
            } else if current == None {
                COnly
            } else {
                current
            }
        }
        PropertyMode::All => {
            if current != All && total_problems < 10_000 {
                All
            } else if current == DOnly && ratio < 0.10 && score < 50_000 {
                All
            } else if current == LAndD && ratio < 0.20 && score < 100_000 {
                DOnly
            } else if current == LOnly && ratio < 0.60 && score < 500_000 {
                LAndD
            } else if current == COnly && ratio < 0.85 && score < 1_000_000 {
                LOnly
            } else if current == None {
                COnly
            } else {
                current
            }
        }
    }
}

/// Heuristic to fall back to when `heuristic_all`'s memory probe fails
/// (§5 resource policy): step down one rung rather than abandoning the
/// search entirely.
pub fn fallback(heuristic: HeuristicKind) -> HeuristicKind {
    use HeuristicKind::*;
    match heuristic {
        All => DOnly,
        DOnly => LAndD,
        LAndD => LOnly,
        LOnly => COnly,
        COnly => COnly,
        None => COnly,
    }
}
