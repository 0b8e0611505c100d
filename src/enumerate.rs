//! Enumerator (§4.1): builds the immutable structural graph — Factors,
//! Singles, t-way Interactions, and size-d DSets — and seeds the initial
//! problem counts and score before the engine loop ever runs.

use std::collections::HashMap;

use rand::rngs::SmallRng;

use crate::controller::HeuristicKind;
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::model::{DSet, Factor, Interaction, PropertyMode, Single};

/// All length-`k` strictly increasing index sequences over `0..n`, in
/// lexicographic order. Shared by column-combination and DSet enumeration.
pub fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k == 0 {
        out.push(Vec::new());
        return out;
    }
    if k > n {
        return out;
    }
    let mut current = Vec::with_capacity(k);
    fn recurse(start: usize, n: usize, k: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        let end = n - (k - current.len()) + 1;
        for i in start..end {
            current.push(i);
            recurse(i + 1, n, k, current, out);
            current.pop();
        }
    }
    recurse(0, n, k, &mut current, &mut out);
    out
}

/// Builds an [`Engine`] from a validated factor profile. This is the only
/// place Singles, Interactions, and DSets are created; afterwards the graph
/// never grows.
pub fn build(
    levels: &[usize],
    t: usize,
    d: usize,
    delta: u64,
    mode: PropertyMode,
    max_threads: usize,
    rng: SmallRng,
) -> Result<Engine> {
    let num_factors = levels.len();

    let mut singles = Vec::new();
    let mut factors = Vec::with_capacity(num_factors);
    for (f, &level) in levels.iter().enumerate() {
        let mut single_ids = Vec::with_capacity(level);
        for v in 0..level {
            let id = singles.len();
            singles.push(Single::new(f, v));
            single_ids.push(id);
        }
        factors.push(Factor::new(f, level, single_ids));
    }

    let column_combos = combinations(num_factors, t);
    if t > 0 && column_combos.is_empty() {
        return Err(Error::ParameterInfeasible {
            rule: format!("no {t}-way column combination exists among {num_factors} factors"),
        });
    }

    let mut interactions = Vec::new();
    let mut interaction_index: HashMap<Vec<(usize, usize)>, usize> = HashMap::new();

    for combo in &column_combos {
        let mut path = Vec::with_capacity(t);
        build_interactions_for_combo(combo, 0, &factors, &mut path, &mut |key, singles_so_far| {
            let id = interactions.len();
            interactions.push(Interaction::new(id, singles_so_far.to_vec()));
            interaction_index.insert(key.to_vec(), id);
            for &sid in singles_so_far {
                singles[sid].c_issues += 1;
            }
        });
    }
    for f in factors.iter_mut() {
        f.c_issues = f.singles.iter().map(|&sid| singles[sid].c_issues).sum();
    }

    // Per the reference constructor: the singles loop above already added
    // t per Interaction (one per constituent Single); the interaction count
    // itself contributes one more, giving a combined t+1 per Interaction.
    let per_single_coverage: u64 = singles.iter().map(|s| s.c_issues).sum();
    let mut total_problems: u64 = per_single_coverage + interactions.len() as u64;
    let coverage_problems: u64 = interactions.len() as u64;
    let mut score: u64 = total_problems;

    let mut dsets = Vec::new();
    let mut location_problems: u64 = 0;
    let mut detection_problems: u64 = 0;

    if mode.wants_location() || mode.wants_detection() {
        let dset_combos = combinations(interactions.len(), d);
        if d > 0 && dset_combos.is_empty() {
            return Err(Error::ParameterInfeasible {
                rule: format!("no size-{d} DSet exists among {} interactions", interactions.len()),
            });
        }
        for combo in &dset_combos {
            let id = dsets.len();
            let mut dset_singles = Vec::new();
            for &iid in combo {
                dset_singles.extend(interactions[iid].singles.iter().copied());
            }
            dsets.push(DSet::new(id, combo.clone(), dset_singles));
            for &iid in combo {
                interactions[iid].sets.insert(id);
            }
        }

        let n_sets = dsets.len() as u64;
        for t_set in &dsets {
            for &sid in &t_set.singles {
                singles[sid].l_issues += n_sets;
                total_problems += n_sets;
            }
        }

        // Every DSet conflicts with every other until rows start telling
        // them apart; this is the maximal conflict graph the reference
        // builds before a single row is ever committed.
        let all_ids: Vec<usize> = (0..dsets.len()).collect();
        for t_set in dsets.iter_mut() {
            for &other in &all_ids {
                if other != t_set.id {
                    t_set.location_conflicts.insert(other);
                }
            }
        }

        total_problems += n_sets;
        location_problems += n_sets;
        score = total_problems;

        for f in factors.iter_mut() {
            f.l_issues = f.singles.iter().map(|&sid| singles[sid].l_issues).sum();
        }

        if mode.wants_detection() {
            for i in 0..interactions.len() {
                let member_sets = interactions[i].sets.clone();
                let own_singles = interactions[i].singles.clone();
                for t_set in &dsets {
                    if !member_sets.contains(&t_set.id) {
                        interactions[i].deltas.insert(t_set.id, 0);
                        for &sid in &own_singles {
                            singles[sid].d_issues += delta;
                            total_problems += delta;
                            score += delta;
                        }
                    }
                }
            }
            total_problems += interactions.len() as u64;
            detection_problems += interactions.len() as u64;
            score += interactions.len() as u64;

            for f in factors.iter_mut() {
                f.d_issues = f.singles.iter().map(|&sid| singles[sid].d_issues).sum();
            }
        }
    }

    Ok(Engine {
        t,
        d,
        delta,
        mode,
        factors,
        singles,
        interactions,
        dsets,
        rows: Vec::new(),
        column_combos,
        interaction_index,
        total_problems,
        coverage_problems,
        location_problems,
        detection_problems,
        score,
        is_covering: false,
        is_locating: false,
        is_detecting: false,
        heuristic_in_use: HeuristicKind::None,
        just_switched_heuristics: false,
        stagnation_counter: 0,
        row_scores: HashMap::new(),
        min_positive_score: u64::MAX,
        max_threads,
        rng,
    })
}

/// Mirrors `build_t_way_interactions`: recurse over the chosen column
/// combo, expanding the Cartesian product of its level sets, emitting one
/// Interaction per combination via `emit`.
fn build_interactions_for_combo(
    combo: &[usize],
    pos: usize,
    factors: &[Factor],
    singles_so_far: &mut Vec<usize>,
    emit: &mut dyn FnMut(&[(usize, usize)], &[usize]),
) {
    if pos == combo.len() {
        let key: Vec<(usize, usize)> = combo
            .iter()
            .zip(singles_so_far.iter())
            .map(|(&col, &sid)| (col, sid - factors[col].singles[0]))
            .collect();
        emit(&key, singles_so_far);
        return;
    }
    let col = combo[pos];
    for value in 0..factors[col].level {
        let sid = factors[col].singles[value];
        singles_so_far.push(sid);
        build_interactions_for_combo(combo, pos + 1, factors, singles_so_far, emit);
        singles_so_far.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn combinations_counts_match_binomial() {
        assert_eq!(combinations(5, 0).len(), 1);
        assert_eq!(combinations(5, 5).len(), 1);
        assert_eq!(combinations(5, 6).len(), 0);
        assert_eq!(combinations(5, 2).len(), 10);
        assert_eq!(combinations(6, 3).len(), 20);
    }

    #[test]
    fn combinations_are_strictly_increasing_and_sorted() {
        for combo in combinations(6, 3) {
            assert!(combo.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn pairwise_coverage_seeds_expected_score() {
        let rng = SmallRng::seed_from_u64(0);
        let engine = build(&[2, 2, 2], 2, 0, 0, PropertyMode::CoverageOnly, 1, rng).unwrap();
        // C(3,2) = 3 column pairs, each with 2*2 = 4 value combinations.
        assert_eq!(engine.interactions.len(), 12);
        assert!(engine.score > 0);
        assert!(engine.score_invariant_holds());
    }

    #[test]
    fn infeasible_t_rejected_before_enumeration() {
        let rng = SmallRng::seed_from_u64(0);
        let result = build(&[2, 2], 3, 0, 0, PropertyMode::CoverageOnly, 1, rng);
        assert!(result.is_err());
    }
}
