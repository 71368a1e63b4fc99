//! Engine-level properties of the insurgency model
//!
//! These tests run whole scenarios and check the invariants every trace must
//! satisfy: non-negative stocks, mass balance, deterministic phase
//! selection, reproducibility from the seed, and visible lag in the
//! smoothed decision variables.

use insurgency_dynamics::conflict::{run, simulate, Simulation, StepRecord};
use insurgency_dynamics::core::{ScenarioConfig, Termination, WarfarePhase};
use insurgency_dynamics::dynamics::{CurveId, TableSet};

fn stressed_configs() -> Vec<ScenarioConfig> {
    let baseline = ScenarioConfig::default();

    // Strong insurgency that goes conventional straight away
    let mut strong = baseline.clone();
    strong.initial.insurgent = 30_000.0;
    strong.run.steps = 240;

    // Weak government, fast propaganda
    let mut weak = baseline.clone();
    weak.initial.government = 20_000.0;
    weak.initial.regulars = 1_000.0;
    weak.initial.police = 500.0;
    weak.delays.insurgent_propaganda = 1.0;

    // Coarse step
    let mut coarse = baseline.clone();
    coarse.run.dt = 2.0;
    coarse.run.steps = 60;

    vec![baseline, strong, weak, coarse]
}

#[test]
fn test_stocks_never_negative() {
    for config in stressed_configs() {
        for r in run(&config).unwrap() {
            for (name, value) in [
                ("GC", r.government),
                ("INS", r.insurgent),
                ("NC", r.neutral),
                ("TGR", r.regulars),
                ("TGP", r.police),
            ] {
                assert!(value >= 0.0, "{} went negative at step {}: {}", name, r.step, value);
            }
        }
    }
}

#[test]
fn test_population_mass_balance() {
    for config in stressed_configs() {
        let output = simulate(&config).unwrap();
        let dt = output.dt;
        let mut previous_pt = output.initial.total_population();

        for r in &output.trace {
            let expected = previous_pt - (r.government_deaths + r.insurgent_deaths);
            let tolerance = 1e-9 * previous_pt.max(1.0);
            assert!(
                (r.total_population - expected).abs() < tolerance,
                "step {}: PT {} but expected {}",
                r.step,
                r.total_population,
                expected
            );
            if !r.clamped {
                let requested = dt * (r.government_attrition + r.insurgent_attrition);
                assert!((r.government_deaths + r.insurgent_deaths - requested).abs() < tolerance);
            }
            previous_pt = r.total_population;
        }
    }
}

#[test]
fn test_war_dead_account_for_population_loss() {
    let output = simulate(&ScenarioConfig::default()).unwrap();
    assert!(output.trace.iter().all(|r| !r.clamped));

    let last = output.trace.last().unwrap();
    let lost = output.initial.total_population() - last.total_population;
    assert!((lost - last.war_dead).abs() < 1e-6 * output.initial.total_population());
    assert!(last.war_dead > 0.0);
}

#[test]
fn test_phase_follows_insurgent_troops() {
    assert_eq!(WarfarePhase::from_insurgent_troops(999.999), WarfarePhase::Guerrilla);
    assert_eq!(WarfarePhase::from_insurgent_troops(1000.0), WarfarePhase::Conventional);

    for config in stressed_configs() {
        for r in run(&config).unwrap() {
            assert_eq!(r.phase, WarfarePhase::from_insurgent_troops(r.insurgent_troops));
            match r.phase {
                WarfarePhase::Guerrilla => {
                    assert_eq!(r.insurgent_constant, config.military.insurgent_constant)
                }
                WarfarePhase::Conventional => {
                    assert_eq!(r.insurgent_constant, r.insurgent_force_size)
                }
            }
        }
    }
}

#[test]
fn test_strong_insurgency_fights_conventionally() {
    let mut config = ScenarioConfig::default();
    config.initial.insurgent = 30_000.0;
    let trace = run(&config).unwrap();
    assert_eq!(trace[0].phase, WarfarePhase::Conventional);

    let output = simulate(&config).unwrap();
    assert_eq!(output.statistics.first_conventional_step, Some(1));
}

#[test]
fn test_same_seed_gives_byte_identical_trace() {
    let config = ScenarioConfig::default();
    let a = serde_json::to_string(&run(&config).unwrap()).unwrap();
    let b = serde_json::to_string(&run(&config).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_different_seed_changes_perceptions_only() {
    let config = ScenarioConfig::default();
    let mut other = config.clone();
    other.run.seed = config.run.seed + 1;

    let a = simulate(&config).unwrap();
    let b = simulate(&other).unwrap();

    assert_eq!(a.initial, b.initial);
    assert_ne!(
        a.trace[0].perceived_insurgent_ratio,
        b.trace[0].perceived_insurgent_ratio
    );

    // The seed never touches the delay structure
    let sim_a = Simulation::new(&config).unwrap();
    let sim_b = Simulation::new(&other).unwrap();
    assert_eq!(sim_a.delays(), sim_b.delays());
}

#[test]
fn test_zero_noise_band_is_seed_independent() {
    let mut config = ScenarioConfig::default();
    config.intelligence.noise_band = 0.0;
    config.run.steps = 36;
    let mut other = config.clone();
    other.run.seed = 999;

    assert_eq!(run(&config).unwrap(), run(&other).unwrap());
}

#[test]
fn test_effort_lags_from_first_step() {
    let mut config = ScenarioConfig::default();
    config.initial.total_population = 200_000.0;
    config.initial.insurgent = 800.0;
    config.run.dt = 1.0;

    let tables = TableSet::from_curves(&config.tables).unwrap();
    let first: StepRecord = run(&config).unwrap().remove(0);

    let ipi = tables.lookup(
        CurveId::InsurgentPropagandaEffort,
        first.perceived_government_ratio,
    );
    let ipg = tables.lookup(
        CurveId::GovernmentPropagandaEffort,
        first.perceived_insurgent_ratio,
    );
    assert_eq!(first.indicated_insurgent_effort, ipi);
    assert_eq!(first.indicated_government_effort, ipg);

    let seed_pi = config.initial.insurgent_effort;
    let seed_pg = config.initial.government_effort;
    let expected_pi = seed_pi + 1.0 / config.delays.insurgent_propaganda * (ipi - seed_pi);
    let expected_pg = seed_pg + 1.0 / config.delays.government_propaganda * (ipg - seed_pg);

    assert!((first.insurgent_effort - expected_pi).abs() < 1e-12);
    assert!((first.government_effort - expected_pg).abs() < 1e-12);
    assert_ne!(first.insurgent_effort, ipi);
    assert_ne!(first.government_effort, ipg);
}

#[test]
fn test_replacement_flows_lag_requests() {
    let trace = run(&ScenarioConfig::default()).unwrap();
    let first = &trace[0];

    // Police start below 5% of PT: hiring requested, only partly delivered
    assert!(first.police_requested > 0.0);
    assert!(first.police_actual > 0.0);
    assert!(first.police_actual < first.police_requested);
    assert!((first.police_target - 0.05 * 200_000.0).abs() < 1e-6);
}

#[test]
fn test_no_insurgent_losses_gives_undefined_exchange_ratio() {
    let mut config = ScenarioConfig::default();
    config.military.government_fire_effectiveness = 0.0;
    config.run.steps = 3;

    let trace = run(&config).unwrap();
    assert!(trace.iter().all(|r| r.insurgent_attrition == 0.0));
    assert!(trace.iter().all(|r| r.exchange_ratio.is_none()));

    let json = serde_json::to_string(&trace[0]).unwrap();
    assert!(json.contains("\"exchange_ratio\":null"));
}

#[test]
fn test_exchange_ratio_matches_attrition() {
    for r in run(&ScenarioConfig::default()).unwrap() {
        if let Some(killr) = r.exchange_ratio {
            assert!((killr - r.government_attrition / r.insurgent_attrition).abs() < 1e-9);
        }
    }
}

#[test]
fn test_defeated_insurgency_stops_run_early() {
    let mut config = ScenarioConfig::default();
    config.initial.insurgent = 100.0;
    config.military.government_fire_effectiveness = 1.0;
    config.tables.insert("insurgent_reach".into(), vec![[0.0, 0.0]]);
    config.tables.insert("insurgent_troop_share".into(), vec![[0.0, 1.0]]);
    config.tables.insert("engagement_frequency_guerrilla".into(), vec![[0.0, 10.0]]);
    config.tables.insert("insurgent_force_size_guerrilla".into(), vec![[0.0, 100.0]]);

    let output = simulate(&config).unwrap();
    assert_eq!(output.termination, Some(Termination::InsurgencyDefeated));
    assert_eq!(output.trace.len(), 1);
    assert_eq!(output.statistics.steps_run, 1);
    assert!(output.summary().contains("insurgency defeated"));
}

#[test]
fn test_war_dead_never_exceed_the_people_who_existed() {
    // The government requests far more insurgent deaths than there are insurgents
    let mut config = ScenarioConfig::default();
    config.initial.insurgent = 100.0;
    config.military.government_fire_effectiveness = 1.0;
    config.tables.insert("insurgent_reach".into(), vec![[0.0, 0.0]]);
    config.tables.insert("insurgent_troop_share".into(), vec![[0.0, 1.0]]);
    config.tables.insert("engagement_frequency_guerrilla".into(), vec![[0.0, 10.0]]);
    config.tables.insert("insurgent_force_size_guerrilla".into(), vec![[0.0, 100.0]]);

    let output = simulate(&config).unwrap();
    let r = &output.trace[0];
    assert!(r.clamped);
    assert!(r.insurgent_attrition > 100.0);
    assert!(r.insurgent_deaths <= 100.0);
    assert_eq!(r.insurgent, 0.0);

    let initial_pt = output.initial.total_population();
    assert!((initial_pt - r.total_population - r.war_dead).abs() < 1e-9 * initial_pt);
    assert!((r.war_dead - (r.government_deaths + r.insurgent_deaths)).abs() < 1e-9);
    assert_eq!(output.statistics.total_war_dead, r.war_dead);
}

#[test]
fn test_trace_time_advances_by_dt() {
    let mut config = ScenarioConfig::default();
    config.run.dt = 0.5;
    config.run.steps = 10;
    let trace = run(&config).unwrap();
    for (i, r) in trace.iter().enumerate() {
        assert_eq!(r.step as usize, i + 1);
        assert!((r.time - 0.5 * (i + 1) as f64).abs() < 1e-12);
    }
}

#[test]
fn test_output_json_round_trips() {
    let mut config = ScenarioConfig::default();
    config.run.steps = 12;
    let output = simulate(&config).unwrap();
    let json = output.to_json().unwrap();

    let parsed: insurgency_dynamics::conflict::SimulationOutput =
        serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.trace.len(), 12);
    assert_eq!(parsed.statistics.steps_run, output.statistics.steps_run);
    assert_eq!(parsed.trace[0].phase, output.trace[0].phase);
}
