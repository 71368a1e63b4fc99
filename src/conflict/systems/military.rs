//! Military sector
//!
//! Troop allocation, warfare phase, Lanchester attrition, and the smoothed
//! replacement flows for police and regulars.
//!
//! Attrition uses one formula for both phases:
//!
//! ```text
//! DG = EF * kI * FSI
//! DI = EF * kG * FSG * FSI / IC
//! ```
//!
//! In the guerrilla phase IC is a configured constant, giving area fire
//! against the insurgents. In the conventional phase IC = FSI, which reduces
//! DI to aimed fire `EF * kG * FSG`.

use serde::{Deserialize, Serialize};

use crate::conflict::state::{ratio, DelayBank, SimulationState};
use crate::conflict::systems::intelligence::Intelligence;
use crate::core::config::MilitaryConfig;
use crate::core::types::WarfarePhase;
use crate::dynamics::tables::{CurveId, TableSet};

/// Target, requested and smoothed flow for one troop category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Replacement {
    /// Desired troop level
    pub target: f64,
    /// Flow that would close the gap over the adjustment time
    pub requested: f64,
    /// Flow actually applied this step (delayed request)
    pub actual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilitaryOutcome {
    /// TI
    pub insurgent_troops: f64,
    /// TG
    pub government_troops: f64,
    pub phase: WarfarePhase,
    /// EF, engagements per month
    pub engagement_frequency: f64,
    /// FSI, insurgents per engagement
    pub insurgent_force_size: f64,
    /// FSG, government troops per engagement
    pub government_force_size: f64,
    /// IC
    pub insurgent_constant: f64,
    /// DG, government deaths per month
    pub government_attrition: f64,
    /// DI, insurgent deaths per month
    pub insurgent_attrition: f64,
    /// KILLR = DG / DI; `None` when DI is zero
    pub exchange_ratio: Option<f64>,
    pub police: Replacement,
    pub regulars: Replacement,
}

/// Run the military sector for one step
///
/// Mutates only the police and regulars flow delays in `delays`.
pub fn update_military(
    state: &SimulationState,
    intel: &Intelligence,
    tables: &TableSet,
    params: &MilitaryConfig,
    delays: &mut DelayBank,
    dt: f64,
) -> MilitaryOutcome {
    let ti = (tables.lookup(CurveId::InsurgentTroopShare, state.insurgent_ratio())
        * state.insurgent)
        .max(0.0);
    let tg = state.government_troops();
    let phase = WarfarePhase::from_insurgent_troops(ti);

    let (ef_curve, fsi_curve, ratio_curve) = match phase {
        WarfarePhase::Guerrilla => (
            CurveId::EngagementFrequencyGuerrilla,
            CurveId::InsurgentForceSizeGuerrilla,
            CurveId::GovernmentForceRatioGuerrilla,
        ),
        WarfarePhase::Conventional => (
            CurveId::EngagementFrequencyConventional,
            CurveId::InsurgentForceSizeConventional,
            CurveId::GovernmentForceRatioConventional,
        ),
    };

    let ef = tables.lookup(ef_curve, ti).max(0.0);
    let fsi = tables.lookup(fsi_curve, ti).clamp(0.0, ti);
    let fsg = (fsi * tables.lookup(ratio_curve, ratio(tg, ti))).clamp(0.0, tg);
    let ic = insurgent_constant(phase, fsi, params.insurgent_constant);

    let (dg, di) = lanchester_attrition(
        ef,
        fsi,
        fsg,
        ic,
        params.insurgent_fire_effectiveness,
        params.government_fire_effectiveness,
    );

    let police = police_replacement(state, params, delays, dt);
    let regulars = regulars_replacement(state, intel, tables, params, delays, dt);

    MilitaryOutcome {
        insurgent_troops: ti,
        government_troops: tg,
        phase,
        engagement_frequency: ef,
        insurgent_force_size: fsi,
        government_force_size: fsg,
        insurgent_constant: ic,
        government_attrition: dg,
        insurgent_attrition: di,
        exchange_ratio: exchange_ratio(dg, di),
        police,
        regulars,
    }
}

/// IC for the current phase
pub fn insurgent_constant(phase: WarfarePhase, insurgent_force_size: f64, guerrilla_ic: f64) -> f64 {
    match phase {
        WarfarePhase::Guerrilla => guerrilla_ic,
        WarfarePhase::Conventional => insurgent_force_size,
    }
}

/// Returns (DG, DI). A non-positive IC yields no insurgent losses.
pub fn lanchester_attrition(
    engagement_frequency: f64,
    insurgent_force_size: f64,
    government_force_size: f64,
    insurgent_constant: f64,
    insurgent_fire_effectiveness: f64,
    government_fire_effectiveness: f64,
) -> (f64, f64) {
    let dg = engagement_frequency * insurgent_fire_effectiveness * insurgent_force_size;
    let di = if insurgent_constant > 0.0 {
        engagement_frequency
            * government_fire_effectiveness
            * government_force_size
            * insurgent_force_size
            / insurgent_constant
    } else {
        0.0
    };
    (dg, di)
}

pub fn exchange_ratio(government_attrition: f64, insurgent_attrition: f64) -> Option<f64> {
    if insurgent_attrition > 0.0 {
        Some(government_attrition / insurgent_attrition)
    } else {
        None
    }
}

fn police_replacement(
    state: &SimulationState,
    params: &MilitaryConfig,
    delays: &mut DelayBank,
    dt: f64,
) -> Replacement {
    let target = params.police_share * state.total_population();
    let requested = (target - state.police) / params.police_hiring_time;
    let actual = delays.police_flow.update(requested, dt);

    Replacement {
        target,
        requested,
        actual,
    }
}

/// Regulars act on the government's noisy view of insurgent strength
fn regulars_replacement(
    state: &SimulationState,
    intel: &Intelligence,
    tables: &TableSet,
    params: &MilitaryConfig,
    delays: &mut DelayBank,
    dt: f64,
) -> Replacement {
    let target = tables.lookup(CurveId::RegularsTarget, intel.perceived_insurgent_ratio)
        * state.total_population();
    let requested = (target - state.regulars) / params.regulars_adjustment_time;

    let time_constant = if target > state.regulars {
        delays.regulars_reinforcement_time()
    } else {
        delays.regulars_drawdown_time()
    };
    let actual = delays.regulars_flow.update_with(requested, dt, time_constant);

    Replacement {
        target,
        requested,
        actual,
    }
}
