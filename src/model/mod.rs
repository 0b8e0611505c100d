//! Arena-indexed data model for the covering/locating/detecting array.
//!
//! Singles, Interactions, and DSets are never freed once [`crate::enumerate::build`]
//! creates them; everything else in the engine refers to them by stable index rather
//! than by pointer or by a string key, per the redesign away from the reference's
//! `to_string()`-keyed maps.

mod dset;
mod factor;
mod interaction;
mod row;
mod single;

pub use dset::DSet;
pub use factor::{DontCareLevel as DontCare, Factor};
pub use interaction::Interaction;
pub use row::{PropertyMode, Row};
pub use single::Single;

/// Index into the engine's `singles` arena.
pub type SingleId = usize;
/// Index into the engine's `interactions` arena.
pub type InteractionId = usize;
/// Index into the engine's `dsets` arena.
pub type DSetId = usize;
/// Index into the engine's `factors` arena.
pub type FactorId = usize;
/// Index of a committed row, in insertion order.
pub type RowId = usize;
