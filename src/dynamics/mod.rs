//! Reusable system-dynamics building blocks
//!
//! Table functions and first-order delays. Neither knows anything about
//! insurgencies; the sectors in `conflict::systems` wire them together.

pub mod delay;
pub mod lookup;
pub mod tables;

pub use delay::ExponentialDelay;
pub use lookup::LookupTable;
pub use tables::{baseline_curves, CurveData, CurveId, TableSet};
