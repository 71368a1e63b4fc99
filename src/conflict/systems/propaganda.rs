//! Propaganda sector
//!
//! Effort responds to perceived strength, lags through first-order delays,
//! and drives the four allegiance conversions between population stocks.

use serde::{Deserialize, Serialize};

use crate::conflict::state::SimulationState;
use crate::conflict::systems::intelligence::Intelligence;
use crate::dynamics::delay::ExponentialDelay;
use crate::dynamics::tables::{CurveId, TableSet};

/// One value per conversion direction
///
/// Used both for probabilities (fraction of PT per month) and for flows
/// (persons per month).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversions {
    pub neutral_to_insurgent: f64,
    pub neutral_to_government: f64,
    pub government_to_insurgent: f64,
    pub insurgent_to_government: f64,
}

impl Conversions {
    fn scaled(&self, factor: f64) -> Self {
        Self {
            neutral_to_insurgent: self.neutral_to_insurgent * factor,
            neutral_to_government: self.neutral_to_government * factor,
            government_to_insurgent: self.government_to_insurgent * factor,
            insurgent_to_government: self.insurgent_to_government * factor,
        }
    }

    /// Net change to GC
    pub fn net_government(&self) -> f64 {
        self.neutral_to_government + self.insurgent_to_government - self.government_to_insurgent
    }

    /// Net change to INS
    pub fn net_insurgent(&self) -> f64 {
        self.neutral_to_insurgent + self.government_to_insurgent - self.insurgent_to_government
    }

    /// Net change to NC
    pub fn net_neutral(&self) -> f64 {
        -(self.neutral_to_insurgent + self.neutral_to_government)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagandaOutcome {
    /// IPI
    pub indicated_insurgent_effort: f64,
    /// IPG
    pub indicated_government_effort: f64,
    /// PI, after this step's delay update
    pub insurgent_effort: f64,
    /// PG, after this step's delay update
    pub government_effort: f64,
    pub insurgent_reach: f64,
    pub government_reach: f64,
    /// Per-month conversion probabilities, each in [0, 1]
    pub probabilities: Conversions,
    /// Persons per month: `probability * PT`
    pub flows: Conversions,
}

/// Run the propaganda sector for one step
///
/// Mutates only the two effort delays.
pub fn update_propaganda(
    state: &SimulationState,
    intel: &Intelligence,
    tables: &TableSet,
    insurgent_effort: &mut ExponentialDelay,
    government_effort: &mut ExponentialDelay,
    dt: f64,
) -> PropagandaOutcome {
    let ipi = tables.lookup(CurveId::InsurgentPropagandaEffort, intel.perceived_government_ratio);
    let ipg = tables.lookup(CurveId::GovernmentPropagandaEffort, intel.perceived_insurgent_ratio);

    let pi = insurgent_effort.update(ipi, dt);
    let pg = government_effort.update(ipg, dt);

    let insurgent_reach = tables.lookup(CurveId::InsurgentReach, pi);
    let government_reach = tables.lookup(CurveId::GovernmentReach, pg);

    let ir = state.insurgent_ratio();
    let gr = state.government_ratio();

    let probabilities = Conversions {
        neutral_to_insurgent: conversion(
            insurgent_reach,
            state.neutral_ratio(),
            tables.lookup(CurveId::NeutralToInsurgent, ir),
        ),
        neutral_to_government: conversion(
            government_reach,
            state.neutral_ratio(),
            tables.lookup(CurveId::NeutralToGovernment, gr),
        ),
        government_to_insurgent: conversion(
            insurgent_reach,
            gr,
            tables.lookup(CurveId::GovernmentToInsurgent, ir),
        ),
        insurgent_to_government: conversion(
            government_reach,
            ir,
            tables.lookup(CurveId::InsurgentToGovernment, gr),
        ),
    };
    let flows = probabilities.scaled(state.total_population());

    PropagandaOutcome {
        indicated_insurgent_effort: ipi,
        indicated_government_effort: ipg,
        insurgent_effort: pi,
        government_effort: pg,
        insurgent_reach,
        government_reach,
        probabilities,
        flows,
    }
}

/// reach * target share * conversion factor, clamped to [0, 1]
fn conversion(reach: f64, target_share: f64, factor: f64) -> f64 {
    (reach * target_share * factor).clamp(0.0, 1.0)
}
