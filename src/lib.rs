//! Insurgency Dynamics - system-dynamics model of propaganda and attrition

pub mod conflict;
pub mod core;
pub mod dynamics;
