//! Scenario configuration with documented constants
//!
//! A scenario is everything a run needs: initial stocks, step size and count,
//! the RNG seed, every delay time constant, combat coefficients, the
//! intelligence noise band, and the full set of named curves. The default
//! scenario is the built-in baseline; `data/scenarios/baseline.toml` carries
//! the same values in file form.
//!
//! Time unit throughout is one month.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{InsurgencyError, Result};
use crate::dynamics::delay::validate_time_constant;
use crate::dynamics::tables::{baseline_curves, CurveData, TableSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub initial: InitialConditions,
    pub run: RunConfig,
    pub delays: DelayConfig,
    pub military: MilitaryConfig,
    pub intelligence: IntelligenceConfig,
    /// Curve name -> `[[x, y], ...]`, every curve required
    pub tables: CurveData,
}

/// Starting stocks and seeds for the smoothed quantities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialConditions {
    /// Government-controlled population (GC), troops included
    pub government: f64,
    /// Insurgent population (INS), fighters included
    pub insurgent: f64,
    /// Total population (PT); neutrals are `PT - GC - INS`
    pub total_population: f64,
    /// Government regulars (TGR), drawn from GC
    pub regulars: f64,
    /// Government police (TGP), drawn from GC
    pub police: f64,
    /// Seed for the insurgent propaganda effort delay (PI)
    pub insurgent_effort: f64,
    /// Seed for the government propaganda effort delay (PG)
    pub government_effort: f64,
}

impl InitialConditions {
    pub fn neutral(&self) -> f64 {
        self.total_population - self.government - self.insurgent
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of steps to simulate
    pub steps: u32,
    /// Step size in months
    ///
    /// Must not exceed any delay time constant, otherwise a single Euler
    /// step overshoots its input.
    pub dt: f64,
    /// Seed for the intelligence-noise RNG
    pub seed: u64,
}

/// Time constants (months) of every first-order delay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    /// Lag between indicated and actual insurgent propaganda effort
    pub insurgent_propaganda: f64,
    /// Lag between indicated and actual government propaganda effort
    pub government_propaganda: f64,
    /// Smoothing of the police hiring flow
    pub police: f64,
    /// Smoothing of the regulars flow while building up (TMG > TGR)
    pub regulars_reinforcement: f64,
    /// Smoothing of the regulars flow while drawing down (TMG <= TGR)
    ///
    /// Longer than reinforcement: armies demobilise slower than they mobilise.
    pub regulars_drawdown: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MilitaryConfig {
    /// Insurgent Constant (IC) while in the guerrilla phase
    ///
    /// Divides the area-fire product `FSG * FSI`. Larger values make
    /// guerrillas harder to kill. In the conventional phase IC becomes the
    /// insurgent force size and the formula reduces to aimed fire.
    pub insurgent_constant: f64,
    /// Government casualties per engaged insurgent per engagement (kI)
    pub insurgent_fire_effectiveness: f64,
    /// Insurgent casualties per engaged government soldier per engagement (kG)
    pub government_fire_effectiveness: f64,
    /// Police target as a share of total population
    pub police_share: f64,
    /// Months over which a police shortfall is requested to be closed
    pub police_hiring_time: f64,
    /// Months over which a regulars gap is requested to be closed
    pub regulars_adjustment_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntelligenceConfig {
    /// Half-width of the relative noise band on perceived ratios
    ///
    /// A perceived ratio is `true * (1 + u)` with `u ~ U[-band, band]`.
    /// 0 gives perfect intelligence.
    pub noise_band: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            initial: InitialConditions::default(),
            run: RunConfig::default(),
            delays: DelayConfig::default(),
            military: MilitaryConfig::default(),
            intelligence: IntelligenceConfig::default(),
            tables: baseline_curves(),
        }
    }
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self {
            government: 60_000.0,
            insurgent: 800.0,
            total_population: 200_000.0,
            regulars: 5_000.0,
            police: 3_000.0,
            insurgent_effort: 3.0,
            government_effort: 2.0,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: 120,
            dt: 1.0,
            seed: 12345,
        }
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            insurgent_propaganda: 3.0,
            government_propaganda: 3.0,
            police: 6.0,
            regulars_reinforcement: 4.0,
            regulars_drawdown: 12.0,
        }
    }
}

impl Default for MilitaryConfig {
    fn default() -> Self {
        Self {
            insurgent_constant: 500.0,
            insurgent_fire_effectiveness: 0.05,
            government_fire_effectiveness: 0.08,
            police_share: 0.05,
            police_hiring_time: 12.0,
            regulars_adjustment_time: 6.0,
        }
    }
}

impl Default for IntelligenceConfig {
    fn default() -> Self {
        Self { noise_band: 0.2 }
    }
}

impl ScenarioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a scenario from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a scenario from a TOML string; missing sections take baseline values
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: ScenarioConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Validate parameters and build the curve set
    ///
    /// Everything that can be wrong with a scenario is reported here, before
    /// any step runs.
    pub fn build_tables(&self) -> Result<TableSet> {
        self.validate()?;
        TableSet::from_curves(&self.tables)
    }

    /// Validate every scalar parameter (curves are checked by [`TableSet`])
    pub fn validate(&self) -> Result<()> {
        let init = &self.initial;

        for (name, value) in [
            ("initial.government", init.government),
            ("initial.insurgent", init.insurgent),
            ("initial.total_population", init.total_population),
            ("initial.regulars", init.regulars),
            ("initial.police", init.police),
        ] {
            non_negative(name, value)?;
        }
        finite("initial.insurgent_effort", init.insurgent_effort)?;
        finite("initial.government_effort", init.government_effort)?;

        if init.total_population <= 0.0 {
            return Err(InsurgencyError::invalid_parameter(
                "initial.total_population",
                "must be > 0",
            ));
        }
        if init.neutral() < 0.0 {
            return Err(InsurgencyError::invalid_parameter(
                "initial.total_population",
                format!(
                    "government ({}) + insurgent ({}) exceeds total population ({})",
                    init.government, init.insurgent, init.total_population
                ),
            ));
        }
        if init.regulars + init.police > init.government {
            return Err(InsurgencyError::invalid_parameter(
                "initial.regulars",
                format!(
                    "regulars ({}) + police ({}) exceed government population ({})",
                    init.regulars, init.police, init.government
                ),
            ));
        }

        if self.run.steps == 0 {
            return Err(InsurgencyError::invalid_parameter("run.steps", "must be > 0"));
        }
        if !self.run.dt.is_finite() || self.run.dt <= 0.0 {
            return Err(InsurgencyError::invalid_parameter(
                "run.dt",
                format!("must be > 0, got {}", self.run.dt),
            ));
        }

        let d = &self.delays;
        let m = &self.military;
        for (name, tc) in [
            ("delays.insurgent_propaganda", d.insurgent_propaganda),
            ("delays.government_propaganda", d.government_propaganda),
            ("delays.police", d.police),
            ("delays.regulars_reinforcement", d.regulars_reinforcement),
            ("delays.regulars_drawdown", d.regulars_drawdown),
            ("military.police_hiring_time", m.police_hiring_time),
            ("military.regulars_adjustment_time", m.regulars_adjustment_time),
        ] {
            validate_time_constant(name, tc)?;
            if tc < self.run.dt {
                return Err(InsurgencyError::invalid_parameter(
                    name,
                    format!("time constant {} is shorter than dt {}", tc, self.run.dt),
                ));
            }
        }

        if !m.insurgent_constant.is_finite() || m.insurgent_constant <= 0.0 {
            return Err(InsurgencyError::invalid_parameter(
                "military.insurgent_constant",
                format!("must be > 0, got {}", m.insurgent_constant),
            ));
        }
        non_negative("military.insurgent_fire_effectiveness", m.insurgent_fire_effectiveness)?;
        non_negative("military.government_fire_effectiveness", m.government_fire_effectiveness)?;
        non_negative("military.police_share", m.police_share)?;
        if m.police_share > 1.0 {
            return Err(InsurgencyError::invalid_parameter(
                "military.police_share",
                format!("must be <= 1, got {}", m.police_share),
            ));
        }

        let band = self.intelligence.noise_band;
        if !band.is_finite() || !(0.0..1.0).contains(&band) {
            return Err(InsurgencyError::invalid_parameter(
                "intelligence.noise_band",
                format!("must be in [0, 1), got {}", band),
            ));
        }

        Ok(())
    }
}

fn finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(InsurgencyError::invalid_parameter(
            name,
            format!("must be finite, got {}", value),
        ));
    }
    Ok(())
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(InsurgencyError::invalid_parameter(
            name,
            format!("must be >= 0, got {}", value),
        ));
    }
    Ok(())
}
