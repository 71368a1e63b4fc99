//! Main simulation loop

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::conflict::output::{SimulationOutput, StepRecord};
use crate::conflict::state::{DelayBank, SimulationState};
use crate::conflict::systems;
use crate::core::config::ScenarioConfig;
use crate::core::error::Result;
use crate::core::types::{Step, Termination, WarfarePhase};
use crate::dynamics::tables::TableSet;

/// One run of the model
///
/// Owns the state, every delay cell and the noise RNG. Tables are shared
/// read-only and may back any number of concurrent runs.
pub struct Simulation {
    config: ScenarioConfig,
    tables: Arc<TableSet>,
    state: SimulationState,
    initial: SimulationState,
    delays: DelayBank,
    rng: ChaCha8Rng,
    step: Step,
    trace: Vec<StepRecord>,
    termination: Option<Termination>,
    phase: Option<WarfarePhase>,
}

impl Simulation {
    /// Validate the scenario, build its tables and seed the run
    pub fn new(config: &ScenarioConfig) -> Result<Self> {
        let tables = Arc::new(config.build_tables()?);
        Self::with_tables(config, tables)
    }

    /// Seed a run against an already-built table set
    ///
    /// The scenario's own `tables` section is ignored in favour of `tables`.
    pub fn with_tables(config: &ScenarioConfig, tables: Arc<TableSet>) -> Result<Self> {
        config.validate()?;

        let state = SimulationState::from_initial(&config.initial);
        let delays = DelayBank::new(&config.initial, &config.delays)?;

        Ok(Self {
            config: config.clone(),
            tables,
            initial: state.clone(),
            state,
            delays,
            rng: ChaCha8Rng::seed_from_u64(config.run.seed),
            step: 0,
            trace: Vec::with_capacity(config.run.steps as usize),
            termination: None,
            phase: None,
        })
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn delays(&self) -> &DelayBank {
        &self.delays
    }

    pub fn trace(&self) -> &[StepRecord] {
        &self.trace
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    pub fn steps_taken(&self) -> Step {
        self.step
    }

    /// Terminal state reached or configured step count exhausted
    pub fn is_finished(&self) -> bool {
        self.termination.is_some() || self.step >= self.config.run.steps
    }

    /// Return to the initial state with a fresh RNG stream
    pub fn reset(&mut self, seed: u64) -> Result<()> {
        self.config.run.seed = seed;
        self.state = self.initial.clone();
        self.delays = DelayBank::new(&self.config.initial, &self.config.delays)?;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.step = 0;
        self.trace.clear();
        self.termination = None;
        self.phase = None;
        Ok(())
    }

    /// Advance one step and return its record
    ///
    /// Once the run is finished, by a terminal state or by exhausting
    /// `run.steps`, the state is frozen and every further call returns the
    /// last record unchanged.
    pub fn step(&mut self) -> StepRecord {
        if self.is_finished() {
            if let Some(last) = self.trace.last() {
                return last.clone();
            }
        }

        let dt = self.config.run.dt;
        let tables = &*self.tables;

        let intel = systems::gather_intelligence(
            &self.state,
            self.config.intelligence.noise_band,
            &mut self.rng,
        );

        let propaganda = systems::update_propaganda(
            &self.state,
            &intel,
            tables,
            &mut self.delays.insurgent_effort,
            &mut self.delays.government_effort,
            dt,
        );

        let military = systems::update_military(
            &self.state,
            &intel,
            tables,
            &self.config.military,
            &mut self.delays,
            dt,
        );

        let flows = systems::StepFlows::from_sectors(&propaganda, &military);
        let integrated = systems::integrate(&self.state, &flows, dt);
        self.state = integrated.state.clone();
        self.step += 1;

        if self.phase != Some(military.phase) {
            if let Some(previous) = self.phase {
                tracing::debug!(
                    step = self.step,
                    insurgent_troops = military.insurgent_troops,
                    "Warfare phase changed: {} -> {}",
                    previous,
                    military.phase
                );
            }
            self.phase = Some(military.phase);
        }

        let record = StepRecord::new(
            self.step,
            f64::from(self.step) * dt,
            &integrated,
            &intel,
            &propaganda,
            &military,
        );
        tracing::trace!(
            step = record.step,
            gc = record.government,
            ins = record.insurgent,
            nc = record.neutral,
            "step"
        );
        self.trace.push(record.clone());

        self.termination = check_termination(&self.state);
        if let Some(reason) = self.termination {
            tracing::debug!(step = self.step, "Run terminated: {}", reason);
        }

        record
    }

    /// Step until finished and package the output
    pub fn run_to_end(mut self) -> SimulationOutput {
        tracing::info!(
            seed = self.config.run.seed,
            steps = self.config.run.steps,
            dt = self.config.run.dt,
            "Starting simulation"
        );

        while !self.is_finished() {
            self.step();
        }

        let output = SimulationOutput::new(
            self.config.run.seed,
            self.config.run.dt,
            self.config.run.steps,
            self.initial,
            self.trace,
            self.termination,
        );

        tracing::info!(
            steps_run = output.statistics.steps_run,
            final_insurgent = output.statistics.final_insurgent,
            termination = ?output.termination,
            "Simulation finished"
        );

        output
    }
}

/// Terminal conditions, checked after every step
///
/// A side reduced to zero members counts as eliminated. Recruitment tables
/// describe an organization that still exists, so nothing regrows a stock
/// or a force after this point and the run stops.
fn check_termination(state: &SimulationState) -> Option<Termination> {
    if state.total_population() <= 0.0 {
        Some(Termination::PopulationExtinct)
    } else if state.insurgent <= 0.0 {
        Some(Termination::InsurgencyDefeated)
    } else if state.government <= 0.0 {
        Some(Termination::GovernmentCollapsed)
    } else if state.government_troops() <= 0.0 {
        Some(Termination::GovernmentForcesDestroyed)
    } else {
        None
    }
}

/// Run a scenario to completion
pub fn simulate(config: &ScenarioConfig) -> Result<SimulationOutput> {
    Ok(Simulation::new(config)?.run_to_end())
}

/// Run a scenario and return only its trace
pub fn run(config: &ScenarioConfig) -> Result<Vec<StepRecord>> {
    Ok(simulate(config)?.trace)
}
