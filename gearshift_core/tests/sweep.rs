//! End-to-end sweep over the bundled miniature E. coli model
use std::path::PathBuf;

use gearshift_core::flux_analysis::FluxAnalysisError;
use gearshift_core::metabolic_model::model::Model;
use gearshift_core::simulation::gear::Gear;
use gearshift_core::simulation::stress::stress_cost;
use gearshift_core::simulation::sweep::{
    apply_gear, run_sweep, SweepError, ATP_SYNTHASE, GLUCOSE_EXCHANGE, MAINTENANCE_REACTION,
    OXYGEN_EXCHANGE,
};

fn fixture_model() -> Model {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_data")
        .join("mini_ecoli.json");
    Model::read_json(path).unwrap()
}

#[test]
fn sweep_returns_one_result_per_gear_in_order() {
    let mut model = fixture_model();
    let results = run_sweep(&mut model).unwrap();
    assert_eq!(results.len(), 5);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.gear.index as usize, i + 1);
    }
}

#[test]
fn first_gear_is_glucose_limited() {
    // Glycolysis runs at the full 10 units of glucose; the maintenance
    // demand claims m/13 of the resulting pyruvate through ATP synthase and
    // the rest feeds biomass at 20 pyruvate per unit growth.
    let mut model = fixture_model();
    let results = run_sweep(&mut model).unwrap();
    let first = &results[0];

    let maintenance = 35.0 + stress_cost(-10.0);
    let atp = maintenance / 13.0;
    let expected_growth = (2.0 * 10.0 - atp) / 20.0;
    assert!((first.growth - expected_growth).abs() < 1e-6);
    assert!((first.atp - atp).abs() < 1e-6);
    assert!((first.glucose - -10.0).abs() < 1e-6);
    // With glucose exhausted, diverting pyruvate to the fermentation
    // outlets would cost growth
    assert!(first.lactate.abs() < 1e-6);
    assert!(first.ethanol.abs() < 1e-6);
}

#[test]
fn top_gear_reports_the_largest_atp_flux() {
    // The stress cost raises the maintenance floor gear over gear, so the
    // ATP readout peaks in Gear 5 even though its growth has collapsed
    let mut model = fixture_model();
    let results = run_sweep(&mut model).unwrap();
    let top = results[4].atp;
    for earlier in &results[..4] {
        assert!(
            top >= earlier.atp - 1e-3,
            "{} atp {} exceeds gear 5 atp {}",
            earlier.gear.name(),
            earlier.atp,
            top
        );
    }
    // Gears 1 and 2 are pinned well below the top gear's maintenance demand
    assert!(top > results[0].atp + 1.0);
    assert!(top > results[1].atp + 1.0);
}

#[test]
fn accumulated_stress_starves_the_last_gear() {
    let mut model = fixture_model();
    let results = run_sweep(&mut model).unwrap();
    let last_growth = results[4].growth;
    for earlier in &results[..4] {
        assert!(last_growth < earlier.growth);
    }
}

#[test]
fn sweep_leaves_the_last_gear_configured() {
    let mut model = fixture_model();
    run_sweep(&mut model).unwrap();

    assert!((model.lower_bound(GLUCOSE_EXCHANGE).unwrap() - -250.0).abs() < 1e-12);
    assert!((model.lower_bound(OXYGEN_EXCHANGE).unwrap() - -150.0).abs() < 1e-12);
    let expected_maintenance = 35.0 + stress_cost(-250.0);
    assert!(
        (model.lower_bound(MAINTENANCE_REACTION).unwrap() - expected_maintenance).abs() < 1e-12
    );
}

#[test]
fn sweeps_from_fresh_loads_are_identical() {
    let mut first_model = fixture_model();
    let first = run_sweep(&mut first_model).unwrap();
    let mut second_model = fixture_model();
    let second = run_sweep(&mut second_model).unwrap();

    for (a, b) in first.iter().zip(second.iter()) {
        assert!((a.growth - b.growth).abs() < 1e-9);
        assert!((a.atp - b.atp).abs() < 1e-9);
        assert!((a.glucose - b.glucose).abs() < 1e-9);
        assert!((a.lactate - b.lactate).abs() < 1e-9);
        assert!((a.ethanol - b.ethanol).abs() < 1e-9);
    }
}

#[test]
fn sweep_matches_a_manually_configured_solve() {
    let mut swept = fixture_model();
    let results = run_sweep(&mut swept).unwrap();

    let mut manual = fixture_model();
    let first_gear = Gear::schedule()[0];
    apply_gear(&mut manual, &first_gear).unwrap();
    let solution = gearshift_core::flux_analysis::fba(&manual).unwrap();

    assert!((results[0].growth - solution.objective_value).abs() < 1e-9);
    assert!((results[0].atp - solution.flux(ATP_SYNTHASE)).abs() < 1e-9);
}

#[test]
fn unmeetable_maintenance_is_reported_as_infeasible() {
    let mut model = fixture_model();
    // Without ATP synthase the maintenance demand cannot be met
    model.set_upper_bound(ATP_SYNTHASE, 0.0).unwrap();
    match run_sweep(&mut model) {
        Err(SweepError::Solve(FluxAnalysisError::Infeasible)) => {}
        other => panic!("expected infeasibility, got {:?}", other.map(|r| r.len())),
    }
}
