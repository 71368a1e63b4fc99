//! SimulationState - the stocks the engine integrates

use serde::{Deserialize, Serialize};

use crate::core::config::{DelayConfig, InitialConditions};
use crate::core::error::Result;
use crate::dynamics::delay::{validate_time_constant, ExponentialDelay};

/// Population and troop stocks
///
/// Government troops are members of `government`; insurgent fighters are
/// members of `insurgent`. Total population is always the sum of the three
/// population stocks and shrinks by the war dead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// GC
    pub government: f64,
    /// INS
    pub insurgent: f64,
    /// NC
    pub neutral: f64,
    /// TGR
    pub regulars: f64,
    /// TGP
    pub police: f64,
    /// Combat deaths since the start of the run (both sides)
    pub war_dead: f64,
}

impl SimulationState {
    pub fn from_initial(initial: &InitialConditions) -> Self {
        Self {
            government: initial.government,
            insurgent: initial.insurgent,
            neutral: initial.neutral(),
            regulars: initial.regulars,
            police: initial.police,
            war_dead: 0.0,
        }
    }

    /// PT
    pub fn total_population(&self) -> f64 {
        self.government + self.insurgent + self.neutral
    }

    /// TG
    pub fn government_troops(&self) -> f64 {
        self.regulars + self.police
    }

    /// IR = INS / PT
    pub fn insurgent_ratio(&self) -> f64 {
        ratio(self.insurgent, self.total_population())
    }

    /// GR = GC / PT
    pub fn government_ratio(&self) -> f64 {
        ratio(self.government, self.total_population())
    }

    /// NC / PT
    pub fn neutral_ratio(&self) -> f64 {
        ratio(self.neutral, self.total_population())
    }
}

/// `part / total`, or 0 when the total is not positive
pub fn ratio(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total
    } else {
        0.0
    }
}

/// One delay cell per smoothed quantity
#[derive(Debug, Clone, PartialEq)]
pub struct DelayBank {
    /// PI
    pub insurgent_effort: ExponentialDelay,
    /// PG
    pub government_effort: ExponentialDelay,
    /// Actual police hiring flow
    pub police_flow: ExponentialDelay,
    /// Actual regulars flow; time constant chosen per step by the gap's sign
    pub regulars_flow: ExponentialDelay,
    regulars_drawdown: f64,
}

impl DelayBank {
    pub fn new(initial: &InitialConditions, delays: &DelayConfig) -> Result<Self> {
        validate_time_constant("delays.regulars_drawdown", delays.regulars_drawdown)?;

        Ok(Self {
            insurgent_effort: ExponentialDelay::new(
                initial.insurgent_effort,
                delays.insurgent_propaganda,
            )?,
            government_effort: ExponentialDelay::new(
                initial.government_effort,
                delays.government_propaganda,
            )?,
            police_flow: ExponentialDelay::new(0.0, delays.police)?,
            regulars_flow: ExponentialDelay::new(0.0, delays.regulars_reinforcement)?,
            regulars_drawdown: delays.regulars_drawdown,
        })
    }

    pub fn regulars_reinforcement_time(&self) -> f64 {
        self.regulars_flow.time_constant()
    }

    pub fn regulars_drawdown_time(&self) -> f64 {
        self.regulars_drawdown
    }
}
