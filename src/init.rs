//! Row initializers (§4.4): build a first-draft row before a tweak
//! heuristic refines it. Each initializer also optionally "locks" an
//! Interaction or DSet that the paired tweak heuristic must not disturb.

use rand::Rng;

use crate::engine::Engine;
use crate::model::{DontCare, InteractionId, PropertyMode, Row};

/// Purely random row: one uniformly chosen value per factor.
pub fn random_row(engine: &mut Engine) -> Row {
    engine.factors.iter().map(|f| engine.rng.random_range(0..f.level)).collect()
}

/// Random row plus the single worst-scoring Interaction, whose Singles are
/// then pinned into the row. When `ties_out` is given, all Interactions
/// tied for worst are returned instead of the tie being broken here, so the
/// caller (`initialize_row_T`/`initialize_row_I`) can judge them itself.
pub fn random_row_locked(
    engine: &mut Engine,
    ties_out: Option<&mut Vec<InteractionId>>,
) -> (Row, InteractionId) {
    let mut row = random_row(engine);

    let num_tests = engine.rows.len() as u64;
    let mut worst_count: u64 = 0;
    let mut worst: Vec<InteractionId> = Vec::new();
    for interaction in &engine.interactions {
        let mut cur_count = 4 * (num_tests - interaction.rows.len() as u64);
        for &sid in &interaction.singles {
            let s = &engine.singles[sid];
            cur_count += s.c_issues + s.l_issues + s.d_issues;
        }
        if cur_count >= worst_count {
            if cur_count > worst_count {
                worst_count = cur_count;
                worst.clear();
            }
            worst.push(interaction.id);
        }
    }

    if let Some(out) = ties_out {
        if worst.len() > 1 {
            *out = worst.clone();
            let locked = worst[engine.rng.random_range(0..worst.len())];
            return (row, locked);
        }
        *out = worst.clone();
    }

    let locked = worst[engine.rng.random_range(0..worst.len())];
    for &sid in &engine.interactions[locked].singles {
        let s = &engine.singles[sid];
        row[s.factor] = s.value;
    }
    (row, locked)
}

/// Greedily sets each factor to its worst-scoring value (weighted
/// `c_issues/3 + l_issues/2 + d_issues`), skipping factors already
/// don't-care at the array's target property level.
pub fn single_driven_row(engine: &mut Engine) -> Row {
    let mut row = vec![0usize; engine.num_factors()];
    let order: Vec<usize> = (0..engine.num_factors()).collect();

    for &col in &order {
        let factor_done = match engine.mode {
            PropertyMode::All => engine.factors[col].dont_care == DontCare::All,
            PropertyMode::CoverageAndLocation => engine.factors[col].dont_care == DontCare::CoverageAndLocation,
            PropertyMode::CoverageOnly => engine.factors[col].dont_care == DontCare::CoverageOnly,
        };
        if factor_done {
            row[col] = engine.rng.random_range(0..engine.factors[col].level);
            continue;
        }

        let level = engine.factors[col].level;
        let mut worst_val = 0usize;
        let mut worst_score = single_score(engine, col, 0);
        for val in 1..level {
            let cur_score = single_score(engine, col, val);
            if cur_score > worst_score || (cur_score == worst_score && engine.rng.random_bool(0.5)) {
                worst_val = val;
                worst_score = cur_score;
            }
        }
        row[col] = worst_val;
    }
    row
}

fn single_score(engine: &Engine, factor: usize, value: usize) -> u64 {
    let sid = engine.factors[factor].singles[value];
    let s = &engine.singles[sid];
    s.c_issues / 3 + s.l_issues / 2 + s.d_issues
}

/// Locks onto the DSet with the most location conflicts among those
/// touched by the tied-for-worst Interactions from [`random_row_locked`],
/// then (when more than one Interaction was tied) further narrows to one
/// Interaction within that DSet.
pub fn set_driven_row(engine: &mut Engine) -> (Row, usize, Option<InteractionId>) {
    let mut ties = Vec::new();
    let (mut row, locked_interaction) = random_row_locked(engine, Some(&mut ties));

    let mut working_sets = Vec::new();
    for t_set in &engine.dsets {
        if ties.iter().any(|iid| t_set.interactions.contains(iid)) {
            working_sets.push(t_set.id);
        }
    }

    let mut worst_count = 0usize;
    let mut worst_sets = Vec::new();
    for &did in &working_sets {
        let n = engine.dsets[did].location_conflicts.len();
        if n >= worst_count {
            if n > worst_count {
                worst_count = n;
                worst_sets.clear();
            }
            worst_sets.push(did);
        }
    }

    let l_set = worst_sets[engine.rng.random_range(0..worst_sets.len())];
    if ties.len() == 1 {
        return (row, l_set, None);
    }

    let candidates = &engine.dsets[l_set].interactions;
    let l_interaction = candidates[engine.rng.random_range(0..candidates.len())];
    for &sid in &engine.interactions[l_interaction].singles {
        let s = &engine.singles[sid];
        row[s.factor] = s.value;
    }
    (row, l_set, Some(l_interaction))
}

/// Locks onto whichever tied-for-worst Interaction has the lowest total
/// separation below `delta` across its DSets, since that Interaction is
/// furthest from being detectable.
pub fn interaction_driven_row(engine: &mut Engine) -> (Row, InteractionId) {
    let mut ties = Vec::new();
    let (row, locked) = random_row_locked(engine, Some(&mut ties));
    if ties.len() == 1 {
        return (row, locked);
    }

    let delta = engine.delta as i64;
    let mut worst_count: i64 = 0;
    let mut worst = Vec::new();
    for &iid in &ties {
        let mut cur_count: i64 = 0;
        for (_, &sep) in &engine.interactions[iid].deltas {
            if sep < delta {
                cur_count += delta - sep;
            }
        }
        if cur_count >= worst_count {
            if cur_count > worst_count {
                worst_count = cur_count;
                worst.clear();
            }
            worst.push(iid);
        }
    }

    let chosen = worst[engine.rng.random_range(0..worst.len())];
    let mut row = row;
    for &sid in &engine.interactions[chosen].singles {
        let s = &engine.singles[sid];
        row[s.factor] = s.value;
    }
    (row, chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyMode;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn random_row_respects_factor_levels() {
        let rng = SmallRng::seed_from_u64(7);
        let mut engine = crate::enumerate::build(&[3, 2, 4], 2, 0, 0, PropertyMode::CoverageOnly, 1, rng).unwrap();
        let row = random_row(&mut engine);
        assert_eq!(row.len(), 3);
        assert!(row[0] < 3 && row[1] < 2 && row[2] < 4);
    }

    #[test]
    fn single_driven_row_picks_in_range_values() {
        let rng = SmallRng::seed_from_u64(8);
        let mut engine = crate::enumerate::build(&[2, 3], 2, 0, 0, PropertyMode::CoverageOnly, 1, rng).unwrap();
        let row = single_driven_row(&mut engine);
        assert!(row[0] < 2 && row[1] < 3);
    }
}
