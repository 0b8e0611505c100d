use std::collections::{BTreeMap, BTreeSet};

use super::{DSetId, InteractionId, RowId, SingleId};

/// A t-tuple of Singles drawn from pairwise-distinct, strictly increasing
/// factors. Interactions are created once by the enumerator and never
/// removed; only their counters and row sets evolve.
#[derive(Clone, Debug)]
pub struct Interaction {
    pub id: InteractionId,
    pub singles: Vec<SingleId>,
    pub rows: BTreeSet<RowId>,
    pub is_covered: bool,
    /// Every DSet that contains this Interaction.
    pub sets: BTreeSet<DSetId>,
    /// For every DSet `T` that does *not* contain this Interaction,
    /// `deltas[T] = |self.rows \ T.rows|`. Transiently negative mid-update,
    /// never negative once `update_array` has returned.
    pub deltas: BTreeMap<DSetId, i64>,
    pub is_detectable: bool,
}

impl Interaction {
    pub fn new(id: InteractionId, singles: Vec<SingleId>) -> Self {
        Self {
            id,
            singles,
            rows: BTreeSet::new(),
            is_covered: false,
            sets: BTreeSet::new(),
            deltas: BTreeMap::new(),
            is_detectable: false,
        }
    }
}
