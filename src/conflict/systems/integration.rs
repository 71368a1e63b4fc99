//! Explicit Euler integration of one step's flows into the stocks
//!
//! Every population outflow has a single source stock. When a stock cannot
//! cover its outflows for the step, all of them are scaled down by the same
//! share so the stock drains exactly to zero. Conversions therefore stay
//! conserved, and the population falls by exactly the deaths that happened.

use crate::conflict::state::{ratio, SimulationState};
use crate::conflict::systems::military::MilitaryOutcome;
use crate::conflict::systems::propaganda::{Conversions, PropagandaOutcome};

/// Gross rates (per month) computed by the sectors for one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepFlows {
    pub conversions: Conversions,
    /// DG
    pub government_attrition: f64,
    /// DI
    pub insurgent_attrition: f64,
    pub regulars_flow: f64,
    pub police_flow: f64,
}

impl StepFlows {
    pub fn from_sectors(propaganda: &PropagandaOutcome, military: &MilitaryOutcome) -> Self {
        Self {
            conversions: propaganda.flows,
            government_attrition: military.government_attrition,
            insurgent_attrition: military.insurgent_attrition,
            regulars_flow: military.regulars.actual,
            police_flow: military.police.actual,
        }
    }
}

/// Result of one integration step
#[derive(Debug, Clone, PartialEq)]
pub struct Integrated {
    pub state: SimulationState,
    /// Persons actually converted this step
    pub moved: Conversions,
    /// Government deaths this step, persons
    pub government_deaths: f64,
    /// Insurgent deaths this step, persons
    pub insurgent_deaths: f64,
    /// A stock could not cover its outflows, or a troop stock hit zero
    pub clamped: bool,
}

/// Share of a requested outflow the stock can deliver
fn outflow_share(stock: f64, outflow: f64) -> f64 {
    if outflow > stock && outflow > 0.0 {
        stock.max(0.0) / outflow
    } else {
        1.0
    }
}

/// Stock left after its outflows; exactly zero when the outflows were limited
fn drain(stock: f64, share: f64, outflow: f64) -> f64 {
    if share < 1.0 {
        0.0
    } else {
        stock - outflow
    }
}

/// Advance every stock by `dt`
pub fn integrate(state: &SimulationState, flows: &StepFlows, dt: f64) -> Integrated {
    let c = &flows.conversions;
    let dg = dt * flows.government_attrition;
    let di = dt * flows.insurgent_attrition;

    let neutral_out = dt * (c.neutral_to_insurgent + c.neutral_to_government);
    let government_out = dt * c.government_to_insurgent + dg;
    let insurgent_out = dt * c.insurgent_to_government + di;

    let neutral_share = outflow_share(state.neutral, neutral_out);
    let government_share = outflow_share(state.government, government_out);
    let insurgent_share = outflow_share(state.insurgent, insurgent_out);

    let moved = Conversions {
        neutral_to_insurgent: dt * c.neutral_to_insurgent * neutral_share,
        neutral_to_government: dt * c.neutral_to_government * neutral_share,
        government_to_insurgent: dt * c.government_to_insurgent * government_share,
        insurgent_to_government: dt * c.insurgent_to_government * insurgent_share,
    };
    let government_deaths = dg * government_share;
    let insurgent_deaths = di * insurgent_share;

    let neutral = drain(state.neutral, neutral_share, neutral_out);
    let government = drain(state.government, government_share, government_out)
        + moved.neutral_to_government
        + moved.insurgent_to_government;
    let insurgent = drain(state.insurgent, insurgent_share, insurgent_out)
        + moved.neutral_to_insurgent
        + moved.government_to_insurgent;

    let mut clamped = neutral_share < 1.0 || government_share < 1.0 || insurgent_share < 1.0;

    // Troops carry the government's realized deaths in proportion to their size
    let tg = state.government_troops();
    let mut troops = |stock: f64, flow: f64| {
        let next = stock + dt * flow - government_deaths * ratio(stock, tg);
        if next < 0.0 {
            clamped = true;
            0.0
        } else {
            next
        }
    };
    let regulars = troops(state.regulars, flows.regulars_flow);
    let police = troops(state.police, flows.police_flow);

    Integrated {
        state: SimulationState {
            government,
            insurgent,
            neutral,
            regulars,
            police,
            war_dead: state.war_dead + government_deaths + insurgent_deaths,
        },
        moved,
        government_deaths,
        insurgent_deaths,
        clamped,
    }
}
