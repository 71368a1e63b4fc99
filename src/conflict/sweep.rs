//! Monte Carlo sweeps over noise seeds
//!
//! Runs are independent: each owns its state, delays and RNG. The table set
//! is built once and shared read-only across rayon workers.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::conflict::output::RunSummary;
use crate::conflict::simulation::Simulation;
use crate::core::config::ScenarioConfig;
use crate::core::error::{InsurgencyError, Result};
use crate::core::types::Termination;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepSummary {
    /// One entry per seed, in seed order
    pub runs: Vec<RunSummary>,
    pub mean_final_insurgent: f64,
    pub min_final_insurgent: f64,
    pub max_final_insurgent: f64,
    pub mean_war_dead: f64,
    /// Share of runs that reached the conventional phase
    pub conventional_share: f64,
    /// Share of runs ending with the insurgency defeated
    pub insurgency_defeated_share: f64,
}

impl SweepSummary {
    fn from_runs(runs: Vec<RunSummary>) -> Self {
        let n = runs.len() as f64;
        let final_ins = runs.iter().map(|r| r.final_insurgent);

        let mean_final_insurgent = final_ins.clone().sum::<f64>() / n;
        let min_final_insurgent = final_ins.clone().fold(f64::INFINITY, f64::min);
        let max_final_insurgent = final_ins.fold(f64::NEG_INFINITY, f64::max);
        let mean_war_dead = runs.iter().map(|r| r.total_war_dead).sum::<f64>() / n;

        let conventional = runs.iter().filter(|r| r.first_conventional_step.is_some()).count();
        let defeated = runs
            .iter()
            .filter(|r| r.termination == Some(Termination::InsurgencyDefeated))
            .count();

        Self {
            mean_final_insurgent,
            min_final_insurgent,
            max_final_insurgent,
            mean_war_dead,
            conventional_share: conventional as f64 / n,
            insurgency_defeated_share: defeated as f64 / n,
            runs,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} runs: final INS mean {:.0} (min {:.0}, max {:.0}), \
             {:.0}% reached conventional war, {:.0}% insurgency defeated, \
             mean war dead {:.0}",
            self.runs.len(),
            self.mean_final_insurgent,
            self.min_final_insurgent,
            self.max_final_insurgent,
            self.conventional_share * 100.0,
            self.insurgency_defeated_share * 100.0,
            self.mean_war_dead,
        )
    }
}

/// `count` consecutive seeds starting at `base`
pub fn seeds_from(base: u64, count: usize) -> Vec<u64> {
    (0..count as u64).map(|i| base.wrapping_add(i)).collect()
}

/// Run the scenario once per seed, in parallel
pub fn monte_carlo(config: &ScenarioConfig, seeds: &[u64]) -> Result<SweepSummary> {
    if seeds.is_empty() {
        return Err(InsurgencyError::invalid_parameter(
            "runs",
            "a sweep needs at least one seed",
        ));
    }

    let tables = Arc::new(config.build_tables()?);
    tracing::info!(runs = seeds.len(), "Starting Monte Carlo sweep");

    let runs = seeds
        .par_iter()
        .map(|&seed| -> Result<RunSummary> {
            let mut run_config = config.clone();
            run_config.run.seed = seed;
            let sim = Simulation::with_tables(&run_config, Arc::clone(&tables))?;
            Ok(sim.run_to_end().statistics)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SweepSummary::from_runs(runs))
}
