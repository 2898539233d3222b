//! The gear configuration loop: apply each preset, solve, collect results
use crate::flux_analysis::{fba, FluxAnalysisError};
use crate::metabolic_model::model::{Model, ModelError};
use crate::simulation::gear::Gear;
use crate::simulation::stress::{growth_retention, stress_cost, stress_penalty};

use thiserror::Error;

/// Exchange reaction whose lower bound is the glucose uptake rate
pub const GLUCOSE_EXCHANGE: &str = "EX_glc__D_e";
/// Exchange reaction whose lower bound is the oxygen uptake rate
pub const OXYGEN_EXCHANGE: &str = "EX_o2_e";
/// Growth objective reaction of iML1515
pub const BIOMASS_REACTION: &str = "BIOMASS_Ec_iML1515_core_75p37M";
/// ATP maintenance pseudo-reaction
pub const MAINTENANCE_REACTION: &str = "ATPM";
/// ATP synthase, read out as the ATP production rate
pub const ATP_SYNTHASE: &str = "ATPS4rpp";
/// D-Lactate exchange, opened for fermentation overflow
pub const LACTATE_EXCHANGE: &str = "EX_lac__D_e";
/// Ethanol exchange, opened for fermentation overflow
pub const ETHANOL_EXCHANGE: &str = "EX_etoh_e";

/// Baseline ATP maintenance demand, mmol/gDW/h
const MAINTENANCE_FLOOR: f64 = 35.0;
/// Upper bound applied to the opened fermentation outlets
const FERMENTATION_CAP: f64 = 1000.0;

/// Per-gear scalar outputs of one optimization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearResult {
    /// The gear these outputs belong to
    pub gear: Gear,
    /// Growth rate at the optimum, 1/h
    pub growth: f64,
    /// ATP synthase flux at the optimum, mmol/gDW/h
    pub atp: f64,
    /// Glucose exchange flux at the optimum (negative = uptake), mmol/gDW/h
    pub glucose: f64,
    /// Lactate exchange flux at the optimum, mmol/gDW/h
    pub lactate: f64,
    /// Ethanol exchange flux at the optimum, mmol/gDW/h
    pub ethanol: f64,
}

/// Configure the model for one gear, mutating it in place
///
/// The biomass cap is derived from the bound currently on the model, so
/// successive gears compound it: the sweep is single-pass and restores
/// nothing between iterations.
pub fn apply_gear(model: &mut Model, gear: &Gear) -> Result<(), ModelError> {
    model.set_lower_bound(GLUCOSE_EXCHANGE, gear.glucose_uptake)?;
    model.set_lower_bound(OXYGEN_EXCHANGE, gear.oxygen_uptake)?;

    let base_biomass = model.upper_bound(BIOMASS_REACTION)?;
    let penalty = stress_penalty(gear.glucose_uptake);
    let biomass_bound = base_biomass * growth_retention(gear.burden, penalty);
    model.set_upper_bound(BIOMASS_REACTION, biomass_bound)?;

    model.set_lower_bound(
        MAINTENANCE_REACTION,
        MAINTENANCE_FLOOR + stress_cost(gear.glucose_uptake),
    )?;

    // Fermentation outlets stay open in every gear
    model.set_bounds(LACTATE_EXCHANGE, 0.0, FERMENTATION_CAP)?;
    model.set_bounds(ETHANOL_EXCHANGE, 0.0, FERMENTATION_CAP)?;
    Ok(())
}

/// Configure the model for one gear and solve it
///
/// One plain flux balance solve per gear. The simplex is deterministic for a
/// fixed problem, so repeating the sweep on a freshly loaded model reproduces
/// the same results ([`crate::flux_analysis::pfba`] is available where a
/// minimal-flux distribution is wanted instead).
pub fn run_gear(model: &mut Model, gear: &Gear) -> Result<GearResult, SweepError> {
    log::info!(
        "simulating {}: glucose {}, oxygen {}, burden {}",
        gear.name(),
        gear.glucose_uptake,
        gear.oxygen_uptake,
        gear.burden
    );
    apply_gear(model, gear)?;
    let solution = fba(model)?;
    log::debug!(
        "{}: growth {:.4}, ATP {:.4}",
        gear.name(),
        solution.objective_value,
        solution.flux(ATP_SYNTHASE)
    );
    Ok(GearResult {
        gear: *gear,
        growth: solution.objective_value,
        atp: solution.flux(ATP_SYNTHASE),
        glucose: solution.flux(GLUCOSE_EXCHANGE),
        lactate: solution.flux(LACTATE_EXCHANGE),
        ethanol: solution.flux(ETHANOL_EXCHANGE),
    })
}

/// Run the given gears strictly in sequence over one shared model
///
/// A failure in any gear aborts the sweep; gears are not isolated from one
/// another (the model is mutated in place with no rollback).
pub fn run_gears(model: &mut Model, gears: &[Gear]) -> Result<Vec<GearResult>, SweepError> {
    check_exchange_compartments(model);
    gears.iter().map(|gear| run_gear(model, gear)).collect()
}

/// Warn when a mutated exchange does not act on an extracellular metabolite
///
/// Exchange reactions act on the `e` compartment by BiGG convention; a
/// mismatch usually means the model uses different compartment suffixes than
/// the reaction ids the gear schedule targets.
fn check_exchange_compartments(model: &Model) {
    let exchanges = [
        GLUCOSE_EXCHANGE,
        OXYGEN_EXCHANGE,
        LACTATE_EXCHANGE,
        ETHANOL_EXCHANGE,
    ];
    for id in exchanges {
        let Ok(rxn) = model.reaction(id) else {
            // Missing ids surface as hard errors once the gear mutates them
            continue;
        };
        for met_id in rxn.metabolites.keys() {
            match model.metabolites.get(met_id) {
                Some(met) if met.is_extracellular() => {}
                _ => log::warn!("exchange {} acts on non-extracellular metabolite {}", id, met_id),
            }
        }
    }
}

/// Run the standard five-gear schedule
pub fn run_sweep(model: &mut Model) -> Result<Vec<GearResult>, SweepError> {
    run_gears(model, &Gear::schedule())
}

/// Errors raised while sweeping the gear schedule
#[derive(Error, Debug)]
pub enum SweepError {
    /// A gear referenced a reaction the model does not have, or produced
    /// invalid bounds
    #[error("Unable to configure the model for a gear")]
    Configure(#[from] ModelError),
    /// The solver could not produce an optimal solution for a gear
    #[error("Unable to solve a gear's flux balance problem")]
    Solve(#[from] FluxAnalysisError),
}
