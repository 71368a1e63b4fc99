//! Per-step sector computations
//!
//! Sectors read the state and return what they computed; only the engine
//! writes the state back.

pub mod integration;
pub mod intelligence;
pub mod military;
pub mod propaganda;

pub use integration::{integrate, Integrated, StepFlows};
pub use intelligence::{gather_intelligence, Intelligence};
pub use military::{
    exchange_ratio, insurgent_constant, lanchester_attrition, update_military, MilitaryOutcome,
    Replacement,
};
pub use propaganda::{update_propaganda, Conversions, PropagandaOutcome};
