use super::{FactorId, SingleId};

/// A column of the array: an id, a level bound, and aggregated issue
/// counters summed across its Singles.
#[derive(Clone, Debug)]
pub struct Factor {
    pub id: FactorId,
    pub level: usize,
    /// Ids of this factor's `level` Singles, indexed by value.
    pub singles: Vec<SingleId>,
    pub c_issues: u64,
    pub l_issues: u64,
    pub d_issues: u64,
    pub dont_care: DontCareLevel,
}

/// Mirrors [`super::DontCare`] but tracked per factor as a monotonically
/// rising watermark rather than a standalone value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DontCareLevel {
    None,
    CoverageOnly,
    CoverageAndLocation,
    All,
}

impl Factor {
    pub fn new(id: FactorId, level: usize, singles: Vec<SingleId>) -> Self {
        Self {
            id,
            level,
            singles,
            c_issues: 0,
            l_issues: 0,
            d_issues: 0,
            dont_care: DontCareLevel::None,
        }
    }
}
