//! Scenario loading and configuration errors
//!
//! A bad scenario must fail before any step runs, with an error naming the
//! offending table or parameter.

use std::path::Path;

use insurgency_dynamics::conflict::{simulate, Simulation};
use insurgency_dynamics::core::{InsurgencyError, ScenarioConfig};

const BASELINE: &str = include_str!("../data/scenarios/baseline.toml");

#[test]
fn test_baseline_file_matches_default() {
    let parsed = ScenarioConfig::parse_toml(BASELINE).unwrap();
    assert_eq!(parsed, ScenarioConfig::default());
}

#[test]
fn test_load_baseline_from_disk() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/scenarios/baseline.toml");
    let config = ScenarioConfig::load_from_toml(&path).unwrap();
    let output = simulate(&config).unwrap();
    assert_eq!(output.trace.len(), 120);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = ScenarioConfig::load_from_toml(Path::new("no/such/scenario.toml")).unwrap_err();
    assert!(matches!(err, InsurgencyError::IoError(_)));
    assert!(!err.is_configuration());
}

#[test]
fn test_incomplete_table_section_names_missing_curve() {
    let toml = r#"
        [tables]
        insurgent_reach = [[0.0, 0.0], [10.0, 0.7]]
    "#;
    let config = ScenarioConfig::parse_toml(toml).unwrap();
    let err = Simulation::new(&config).err().unwrap();
    assert!(matches!(err, InsurgencyError::MissingTable(_)));
}

#[test]
fn test_tied_knots_are_rejected_with_table_name() {
    let toml = BASELINE.replace(
        "government_reach = [[0.0, 0.0], [2.0, 0.15], [5.0, 0.4], [10.0, 0.6]]",
        "government_reach = [[0.0, 0.0], [2.0, 0.15], [2.0, 0.4], [10.0, 0.6]]",
    );
    assert_ne!(toml, BASELINE);

    let config = ScenarioConfig::parse_toml(&toml).unwrap();
    let err = Simulation::new(&config).err().unwrap();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("government_reach"));
}

#[test]
fn test_empty_table_is_rejected() {
    let mut config = ScenarioConfig::default();
    config.tables.insert("regulars_target".into(), vec![]);
    let err = Simulation::new(&config).err().unwrap();
    assert!(matches!(err, InsurgencyError::InvalidTable { ref table, .. } if table == "regulars_target"));
}

#[test]
fn test_misspelled_table_is_rejected() {
    let toml = BASELINE.replace("regulars_target =", "regular_target =");
    let config = ScenarioConfig::parse_toml(&toml).unwrap();
    let err = Simulation::new(&config).err().unwrap();
    assert!(matches!(err, InsurgencyError::UnknownTable(ref name) if name == "regular_target"));
}

#[test]
fn test_invalid_parameters_name_themselves() {
    let cases: Vec<(&str, Box<dyn Fn(&mut ScenarioConfig)>)> = vec![
        ("run.dt", Box::new(|c: &mut ScenarioConfig| c.run.dt = 0.0)),
        ("run.steps", Box::new(|c: &mut ScenarioConfig| c.run.steps = 0)),
        ("delays.regulars_drawdown", Box::new(|c: &mut ScenarioConfig| c.delays.regulars_drawdown = 0.0)),
        ("military.insurgent_constant", Box::new(|c: &mut ScenarioConfig| c.military.insurgent_constant = 0.0)),
        ("military.police_share", Box::new(|c: &mut ScenarioConfig| c.military.police_share = 1.5)),
        ("intelligence.noise_band", Box::new(|c: &mut ScenarioConfig| c.intelligence.noise_band = -0.1)),
        ("initial.police", Box::new(|c: &mut ScenarioConfig| c.initial.police = f64::NAN)),
    ];

    for (name, mutate) in cases {
        let mut config = ScenarioConfig::default();
        mutate(&mut config);
        let err = Simulation::new(&config).err().unwrap();
        assert!(err.is_configuration(), "{} should be a configuration error", name);
        assert!(
            err.to_string().contains(name),
            "error for {} was: {}",
            name,
            err
        );
    }
}

#[test]
fn test_scenario_overrides_change_the_run() {
    let toml = r#"
        [initial]
        government = 80000.0
        insurgent = 2000.0
        total_population = 150000.0
        regulars = 6000.0
        police = 2000.0
        insurgent_effort = 4.0
        government_effort = 4.0

        [run]
        steps = 36
        dt = 0.5
        seed = 3
    "#;
    let config = ScenarioConfig::parse_toml(toml).unwrap();
    let output = simulate(&config).unwrap();

    assert_eq!(output.trace.len(), 36);
    assert_eq!(output.initial.neutral, 68_000.0);
    assert!((output.trace[35].time - 18.0).abs() < 1e-12);
}
