//! Simulation output and serialization

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::conflict::state::SimulationState;
use crate::conflict::systems::{Integrated, Intelligence, MilitaryOutcome, PropagandaOutcome};
use crate::core::error::Result;
use crate::core::types::{Step, Termination, WarfarePhase};

/// Flat snapshot of one step
///
/// Stocks are as of the end of the step. Effort, perceptions, troop
/// allocation and every rate are the values computed during the step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: Step,
    pub time: f64,

    // Population stocks
    pub government: f64,
    pub insurgent: f64,
    pub neutral: f64,
    pub total_population: f64,

    // Propaganda
    pub insurgent_effort: f64,
    pub government_effort: f64,
    pub indicated_insurgent_effort: f64,
    pub indicated_government_effort: f64,
    pub perceived_insurgent_ratio: f64,
    pub perceived_government_ratio: f64,
    pub neutral_to_insurgent: f64,
    pub neutral_to_government: f64,
    pub government_to_insurgent: f64,
    pub insurgent_to_government: f64,

    // Troops
    pub insurgent_troops: f64,
    pub regulars: f64,
    pub police: f64,
    pub government_troops: f64,

    // Combat
    pub phase: WarfarePhase,
    pub engagement_frequency: f64,
    pub insurgent_force_size: f64,
    pub government_force_size: f64,
    pub insurgent_constant: f64,
    pub government_attrition: f64,
    pub insurgent_attrition: f64,
    /// `null` when no insurgents were killed
    pub exchange_ratio: Option<f64>,

    // Replacement
    pub police_target: f64,
    pub police_requested: f64,
    pub police_actual: f64,
    pub regulars_target: f64,
    pub regulars_requested: f64,
    pub regulars_actual: f64,

    /// Deaths that actually happened this step (persons, not rates). Lower
    /// than `dt * DG` or `dt * DI` only when a stock ran out.
    pub government_deaths: f64,
    pub insurgent_deaths: f64,
    pub war_dead: f64,
    /// A stock could not cover its outflows, or a troop stock was held at zero
    pub clamped: bool,
}

impl StepRecord {
    pub fn new(
        step: Step,
        time: f64,
        integrated: &Integrated,
        intel: &Intelligence,
        propaganda: &PropagandaOutcome,
        military: &MilitaryOutcome,
    ) -> Self {
        let state = &integrated.state;
        Self {
            step,
            time,
            government: state.government,
            insurgent: state.insurgent,
            neutral: state.neutral,
            total_population: state.total_population(),
            insurgent_effort: propaganda.insurgent_effort,
            government_effort: propaganda.government_effort,
            indicated_insurgent_effort: propaganda.indicated_insurgent_effort,
            indicated_government_effort: propaganda.indicated_government_effort,
            perceived_insurgent_ratio: intel.perceived_insurgent_ratio,
            perceived_government_ratio: intel.perceived_government_ratio,
            neutral_to_insurgent: propaganda.flows.neutral_to_insurgent,
            neutral_to_government: propaganda.flows.neutral_to_government,
            government_to_insurgent: propaganda.flows.government_to_insurgent,
            insurgent_to_government: propaganda.flows.insurgent_to_government,
            insurgent_troops: military.insurgent_troops,
            regulars: state.regulars,
            police: state.police,
            government_troops: state.government_troops(),
            phase: military.phase,
            engagement_frequency: military.engagement_frequency,
            insurgent_force_size: military.insurgent_force_size,
            government_force_size: military.government_force_size,
            insurgent_constant: military.insurgent_constant,
            government_attrition: military.government_attrition,
            insurgent_attrition: military.insurgent_attrition,
            exchange_ratio: military.exchange_ratio,
            police_target: military.police.target,
            police_requested: military.police.requested,
            police_actual: military.police.actual,
            regulars_target: military.regulars.target,
            regulars_requested: military.regulars.requested,
            regulars_actual: military.regulars.actual,
            government_deaths: integrated.government_deaths,
            insurgent_deaths: integrated.insurgent_deaths,
            war_dead: state.war_dead,
            clamped: integrated.clamped,
        }
    }
}

/// Complete simulation output
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub seed: u64,
    pub dt: f64,
    pub steps_requested: u32,
    pub initial: SimulationState,
    pub trace: Vec<StepRecord>,
    pub termination: Option<Termination>,
    pub statistics: RunSummary,
}

/// Headline numbers for one run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub steps_run: u32,
    pub final_time: f64,
    pub final_government: f64,
    pub final_insurgent: f64,
    pub final_neutral: f64,
    pub final_total_population: f64,
    pub peak_insurgent: f64,
    pub peak_insurgent_troops: f64,
    /// First step spent in the conventional phase, if any
    pub first_conventional_step: Option<Step>,
    pub phase_changes: u32,
    pub total_war_dead: f64,
    pub termination: Option<Termination>,
}

impl RunSummary {
    pub fn from_trace(
        seed: u64,
        initial: &SimulationState,
        trace: &[StepRecord],
        termination: Option<Termination>,
    ) -> Self {
        let last = trace.last();

        let peak_insurgent = trace
            .iter()
            .map(|r| r.insurgent)
            .fold(initial.insurgent, f64::max);
        let peak_insurgent_troops = trace.iter().map(|r| r.insurgent_troops).fold(0.0, f64::max);

        let first_conventional_step = trace
            .iter()
            .find(|r| r.phase == WarfarePhase::Conventional)
            .map(|r| r.step);

        let phase_changes = trace
            .windows(2)
            .filter(|pair| pair[0].phase != pair[1].phase)
            .count() as u32;

        Self {
            seed,
            steps_run: trace.len() as u32,
            final_time: last.map_or(0.0, |r| r.time),
            final_government: last.map_or(initial.government, |r| r.government),
            final_insurgent: last.map_or(initial.insurgent, |r| r.insurgent),
            final_neutral: last.map_or(initial.neutral, |r| r.neutral),
            final_total_population: last
                .map_or(initial.total_population(), |r| r.total_population),
            peak_insurgent,
            peak_insurgent_troops,
            first_conventional_step,
            phase_changes,
            total_war_dead: last.map_or(0.0, |r| r.war_dead),
            termination,
        }
    }
}

impl SimulationOutput {
    pub fn new(
        seed: u64,
        dt: f64,
        steps_requested: u32,
        initial: SimulationState,
        trace: Vec<StepRecord>,
        termination: Option<Termination>,
    ) -> Self {
        let statistics = RunSummary::from_trace(seed, &initial, &trace, termination);
        Self {
            seed,
            dt,
            steps_requested,
            initial,
            trace,
            termination,
            statistics,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn summary(&self) -> String {
        let s = &self.statistics;
        let outcome = match s.termination {
            Some(t) => t.to_string(),
            None => "ran to completion".to_string(),
        };
        let conventional = match s.first_conventional_step {
            Some(step) => format!("conventional from step {}", step),
            None => "guerrilla throughout".to_string(),
        };

        format!(
            "Simulated {} of {} steps (seed {}), {}\n\
             GC {:.0}, INS {:.0} (peak {:.0}), NC {:.0}, PT {:.0}\n\
             {}, {} phase changes, {:.0} war dead",
            s.steps_run,
            self.steps_requested,
            s.seed,
            outcome,
            s.final_government,
            s.final_insurgent,
            s.peak_insurgent,
            s.final_neutral,
            s.final_total_population,
            conventional,
            s.phase_changes,
            s.total_war_dead,
        )
    }
}
