use std::collections::BTreeSet;

use super::{DSetId, InteractionId, RowId, SingleId};

/// A size-`d` set of t-way Interactions (Colbourn's script-T). Used to
/// compare row coverage between distinct sets of interactions for the
/// locating and detecting properties.
#[derive(Clone, Debug)]
pub struct DSet {
    pub id: DSetId,
    pub interactions: Vec<InteractionId>,
    /// Concatenation of member Interactions' Singles; duplicates permitted.
    pub singles: Vec<SingleId>,
    pub rows: BTreeSet<RowId>,
    /// Other DSets whose occurrence is still a subset of `self.rows`, i.e.
    /// still indistinguishable from `self` by row membership alone.
    pub location_conflicts: BTreeSet<DSetId>,
    pub is_locatable: bool,
}

impl DSet {
    pub fn new(id: DSetId, interactions: Vec<InteractionId>, singles: Vec<SingleId>) -> Self {
        Self {
            id,
            interactions,
            singles,
            rows: BTreeSet::new(),
            location_conflicts: BTreeSet::new(),
            is_locatable: false,
        }
    }
}
