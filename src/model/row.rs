/// One committed (or candidate) row: one value per factor.
pub type Row = Vec<usize>;

/// The three user-selectable top-level properties (§6: argument count
/// selects one of these). Internal heuristic/don't-care states additionally
/// track `l_only`/`d_only`/`l_and_d`/`c_and_d`/`none`, but those never
/// surface as a top-level mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyMode {
    CoverageOnly,
    CoverageAndLocation,
    All,
}

impl PropertyMode {
    pub fn wants_location(self) -> bool {
        matches!(self, PropertyMode::CoverageAndLocation | PropertyMode::All)
    }

    pub fn wants_detection(self) -> bool {
        matches!(self, PropertyMode::All)
    }
}
