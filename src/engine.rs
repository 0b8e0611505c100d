//! The engine loop (§4.7): owns every arena, drives the heuristic
//! controller, and commits rows through the score keeper until the score
//! reaches zero or the search stagnates.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::controller::HeuristicKind;
use crate::error::{Error, Result};
use crate::model::{DSet, Factor, Interaction, PropertyMode, Row, Single};

/// Column combinations of size `t`, and the Interaction each produces for a
/// given value assignment, keyed by the flattened `(factor, value)` pairs.
/// Built once by the enumerator; used afterwards to look up the Interaction
/// that a freshly committed row activates on each t-way column subset.
pub(crate) type InteractionKey = Vec<(usize, usize)>;

pub struct Engine {
    pub t: usize,
    pub d: usize,
    pub delta: u64,
    pub mode: PropertyMode,

    pub factors: Vec<Factor>,
    pub singles: Vec<Single>,
    pub interactions: Vec<Interaction>,
    pub dsets: Vec<DSet>,
    pub rows: Vec<Row>,

    /// All size-`t` column index combinations, in enumeration order. Shared
    /// between the enumerator (to build Interactions) and the score keeper
    /// (to read off row_interactions from a candidate row).
    pub(crate) column_combos: Vec<Vec<usize>>,
    /// Lookup from an Interaction's `(factor, value)` key to its id.
    pub(crate) interaction_index: std::collections::HashMap<InteractionKey, usize>,

    pub total_problems: u64,
    pub coverage_problems: u64,
    pub location_problems: u64,
    pub detection_problems: u64,
    pub score: u64,

    pub is_covering: bool,
    pub is_locating: bool,
    pub is_detecting: bool,

    pub heuristic_in_use: HeuristicKind,
    pub just_switched_heuristics: bool,
    pub stagnation_counter: usize,

    /// Memoized `heuristic_all` row scores, keyed by the row's tab-joined
    /// string form, replacing the reference's `row_scores` map. Cleared
    /// whenever `just_switched_heuristics` fires.
    pub(crate) row_scores: std::collections::HashMap<String, u64>,
    pub(crate) min_positive_score: u64,

    pub max_threads: usize,
    pub rng: SmallRng,
}

impl Engine {
    pub fn levels(&self) -> Vec<usize> {
        self.factors.iter().map(|f| f.level).collect()
    }

    pub fn num_factors(&self) -> usize {
        self.factors.len()
    }

    pub fn seed_rng(seed: u64) -> SmallRng {
        SmallRng::seed_from_u64(seed)
    }

    /// Score-weighted invariant check (§4.2): useful in tests, and as a
    /// cheap consistency assertion after each commit in debug builds.
    pub fn score_invariant_holds(&self) -> bool {
        let singles_total: u64 = self
            .singles
            .iter()
            .map(|s| s.c_issues + s.l_issues + s.d_issues)
            .sum();
        let total =
            singles_total + self.coverage_problems + self.location_problems + self.detection_problems;
        total == self.score
    }

    /// Runs the engine loop (§4.7) to completion: picks a heuristic, seeds
    /// and tweaks a row, commits it, and repeats until the score reaches
    /// zero or the search stagnates for more than 10 consecutive rows.
    pub fn run(&mut self) -> Result<()> {
        self.run_with(|_, _| {})
    }

    /// As [`Engine::run`], but invokes `on_row` with the engine and the just
    /// committed row after every successful commit, so a caller (the CLI's
    /// progress reporter) can print per-row output without the loop itself
    /// knowing anything about consoles.
    pub fn run_with(&mut self, mut on_row: impl FnMut(&Engine, &Row)) -> Result<()> {
        const STAGNATION_LIMIT: usize = 10;
        while self.score > 0 {
            let prev = self.score;
            let heuristic = crate::controller::select(self.mode, self.score, self.total_problems, self.heuristic_in_use);
            if heuristic != self.heuristic_in_use {
                self.heuristic_in_use = heuristic;
                self.just_switched_heuristics = true;
                self.row_scores.clear();
                self.min_positive_score = u64::MAX;
            }

            let row = match crate::tweak::build_row(self, heuristic) {
                Ok(row) => row,
                Err(Error::OutOfMemory { fatal: false, during }) => {
                    log::warn!("out of memory while {during}; falling back to a lighter heuristic");
                    crate::tweak::build_row(self, crate::controller::fallback(heuristic))?
                }
                Err(e) => return Err(e),
            };

            crate::score::update_array(self, &row, true);
            on_row(self, &row);

            if self.score == prev {
                self.stagnation_counter += 1;
            } else {
                self.stagnation_counter = 0;
            }
            if self.stagnation_counter > STAGNATION_LIMIT {
                return Err(Error::Stagnation { rows: self.rows.len() });
            }
        }
        Ok(())
    }

    /// Deep-copies every mutable field needed to score a what-if row without
    /// touching the live engine (§4.6). The immutable structural graph
    /// (column combos, interaction index, factor levels) is recreated too,
    /// since the clone must be fully independent and `Send` across threads.
    pub fn clone_for_scoring(&self) -> Engine {
        Engine {
            t: self.t,
            d: self.d,
            delta: self.delta,
            mode: self.mode,
            factors: self.factors.clone(),
            singles: self.singles.clone(),
            interactions: self.interactions.clone(),
            dsets: self.dsets.clone(),
            rows: self.rows.clone(),
            column_combos: self.column_combos.clone(),
            interaction_index: self.interaction_index.clone(),
            total_problems: self.total_problems,
            coverage_problems: self.coverage_problems,
            location_problems: self.location_problems,
            detection_problems: self.detection_problems,
            score: self.score,
            is_covering: self.is_covering,
            is_locating: self.is_locating,
            is_detecting: self.is_detecting,
            heuristic_in_use: self.heuristic_in_use,
            just_switched_heuristics: false,
            stagnation_counter: self.stagnation_counter,
            row_scores: std::collections::HashMap::new(),
            min_positive_score: u64::MAX,
            max_threads: self.max_threads,
            rng: {
                use rand::RngCore;
                let mut seed_source = self.rng.clone();
                SmallRng::seed_from_u64(seed_source.next_u64())
            },
        }
    }
}

/// End-to-end scenarios straight out of §8's concrete seed tests: build an
/// engine, run it to completion (or to a deliberately injected partial
/// prefix), and check the quantified invariants hold on the result.
#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn interaction_rows_match_single_intersection(engine: &Engine) -> bool {
        engine.interactions.iter().all(|interaction| {
            let mut expected: Option<std::collections::BTreeSet<usize>> = None;
            for &sid in &interaction.singles {
                let rows = &engine.singles[sid].rows;
                expected = Some(match expected {
                    None => rows.clone(),
                    Some(acc) => acc.intersection(rows).copied().collect(),
                });
            }
            expected.map(|e| e == interaction.rows).unwrap_or(true)
        })
    }

    fn dset_rows_match_interaction_union(engine: &Engine) -> bool {
        engine.dsets.iter().all(|t_set| {
            let mut expected = std::collections::BTreeSet::new();
            for &iid in &t_set.interactions {
                expected.extend(engine.interactions[iid].rows.iter().copied());
            }
            expected == t_set.rows
        })
    }

    /// S1: a 2-covering array over three binary factors terminates with
    /// score 0 and invariant 1 holding for all 12 pairwise Interactions.
    #[test]
    fn s1_two_covering_array_over_binary_factors() {
        let rng = SmallRng::seed_from_u64(100);
        let mut engine =
            crate::enumerate::build(&[2, 2, 2], 2, 0, 0, PropertyMode::CoverageOnly, 1, rng).unwrap();
        assert_eq!(engine.interactions.len(), 12);
        engine.run().unwrap();
        assert_eq!(engine.score, 0);
        assert!(engine.is_covering);
        assert!(interaction_rows_match_single_intersection(&engine));
        assert!(engine.score_invariant_holds());
    }

    /// S2: a (2,2)-locating array over four ternary factors terminates
    /// `is_locating`, with every DSet's row set the union of its members'.
    #[test]
    fn s2_locating_array_over_ternary_factors() {
        let rng = SmallRng::seed_from_u64(101);
        let mut engine = crate::enumerate::build(
            &[3, 3, 3, 3],
            2,
            2,
            0,
            PropertyMode::CoverageAndLocation,
            1,
            rng,
        )
        .unwrap();
        engine.run().unwrap();
        assert_eq!(engine.score, 0);
        assert!(engine.is_covering);
        assert!(engine.is_locating);
        assert!(dset_rows_match_interaction_union(&engine));
        assert!(engine.score_invariant_holds());
    }

    /// S4: a one-row partial prefix is extended, never replaced — the
    /// generated sequence begins with the supplied row.
    #[test]
    fn s4_partial_prefix_is_extended_not_replaced() {
        let rng = SmallRng::seed_from_u64(102);
        let mut engine =
            crate::enumerate::build(&[2, 2, 2], 2, 0, 0, PropertyMode::CoverageOnly, 1, rng).unwrap();
        let partial = vec![1, 1, 1];
        crate::score::update_array(&mut engine, &partial, true);
        assert_eq!(engine.rows.len(), 1);
        engine.run().unwrap();
        assert_eq!(engine.rows[0], partial);
        assert!(engine.rows.len() > 1);
        assert!(engine.is_covering);
    }

    /// Boundary invariant 8: with `t = C` there is exactly one Interaction
    /// per value tuple, so covering needs at least `prod(L_f)` rows (the
    /// heuristic search may commit a few more than the minimum).
    #[test]
    fn invariant_8_t_equals_c_needs_at_least_the_full_product_of_levels() {
        let rng = SmallRng::seed_from_u64(103);
        let mut engine =
            crate::enumerate::build(&[2, 3], 2, 0, 0, PropertyMode::CoverageOnly, 1, rng).unwrap();
        assert_eq!(engine.interactions.len(), 6);
        engine.run().unwrap();
        assert!(engine.rows.len() >= 6);
        assert!(engine.is_covering);
    }

    /// Invariant 6: a rewound speculative commit on a throwaway clone leaves
    /// the clone's row count unchanged and never touches the source engine.
    #[test]
    fn invariant_6_rewind_on_a_clone_does_not_grow_its_row_count() {
        let rng = SmallRng::seed_from_u64(104);
        let engine =
            crate::enumerate::build(&[2, 2, 2], 2, 0, 0, PropertyMode::CoverageOnly, 1, rng).unwrap();
        let mut clone = engine.clone_for_scoring();
        let before_score = clone.score;
        crate::score::update_array(&mut clone, &vec![0, 0, 0], false);
        assert_eq!(clone.rows.len(), 0);
        assert!(clone.score <= before_score);
        assert_eq!(engine.rows.len(), 0);
    }
}
