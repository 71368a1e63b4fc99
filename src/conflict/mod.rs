//! Insurgency conflict model
//!
//! A population split between Government, Insurgent and Neutral stocks,
//! moved by propaganda and thinned by Lanchester attrition. The engine steps
//! the sectors in a fixed order each month:
//! intelligence -> propaganda -> military -> integration -> record.

pub mod output;
pub mod simulation;
pub mod state;
pub mod sweep;
pub mod systems;

pub use output::{RunSummary, SimulationOutput, StepRecord};
pub use simulation::{run, simulate, Simulation};
pub use state::{DelayBank, SimulationState};
pub use sweep::{monte_carlo, seeds_from, SweepSummary};
