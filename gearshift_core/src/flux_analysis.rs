//! COBRA methods over a metabolic model: FBA and parsimonious FBA
use crate::configuration::CONFIGURATION;
use crate::metabolic_model::model::Model;
use crate::optimize::problem::{Problem, ProblemError, SolveError};
use crate::optimize::OptimizationStatus;

use indexmap::IndexMap;
use thiserror::Error;

/// The flux distribution returned by a flux analysis method
#[derive(Debug, Clone)]
pub struct FluxSolution {
    /// Value of the model objective at the optimum
    pub objective_value: f64,
    /// Net flux through each reaction, keyed by reaction id
    pub fluxes: IndexMap<String, f64>,
}

impl FluxSolution {
    /// Net flux of a reaction, 0.0 when the id is not part of the solution
    pub fn flux(&self, reaction_id: &str) -> f64 {
        self.fluxes.get(reaction_id).copied().unwrap_or(0.0)
    }
}

/// Optimize the model according to Flux Balance Analysis (FBA)
///
/// FBA: [https://pubmed.ncbi.nlm.nih.gov/20212490/](https://pubmed.ncbi.nlm.nih.gov/20212490/)
///
/// Maximizes the model objective subject to mass balance and flux bounds.
/// The returned fluxes are one optimal vertex; where alternate optima exist
/// they are solver-dependent (see [`pfba`] for unique fluxes).
pub fn fba(model: &Model) -> Result<FluxSolution, FluxAnalysisError> {
    if model.objective.is_empty() {
        return Err(FluxAnalysisError::MissingObjective);
    }
    let problem = Problem::from_model(model)?;
    let solution = checked_solve(&problem)?;
    Ok(to_flux_solution(model, &solution))
}

/// Optimize the model according to parsimonious FBA (pFBA)
///
/// Two stages: first the FBA optimum is found, then the objective is pinned
/// at that optimum (less the configured tolerance) and total absolute flux is
/// minimized. The reported `objective_value` is the stage-one optimum; the
/// reported fluxes are the parsimonious stage-two distribution, which is
/// unique where plain FBA is degenerate.
pub fn pfba(model: &Model) -> Result<FluxSolution, FluxAnalysisError> {
    if model.objective.is_empty() {
        return Err(FluxAnalysisError::MissingObjective);
    }
    let tolerance = CONFIGURATION.read().unwrap().tolerance;

    let mut problem = Problem::from_model(model)?;
    let first = checked_solve(&problem)?;
    let optimum = first
        .objective_value
        .expect("optimal solution carries an objective value");

    problem.fix_objective(optimum - tolerance)?;
    problem.minimize_total_flux();
    let second = checked_solve(&problem)?;

    let mut flux_solution = to_flux_solution(model, &second);
    flux_solution.objective_value = optimum;
    Ok(flux_solution)
}

/// Solve, promoting a non-optimal status to a typed error
fn checked_solve(
    problem: &Problem,
) -> Result<crate::optimize::ProblemSolution, FluxAnalysisError> {
    let solution = problem.solve()?;
    match solution.status {
        OptimizationStatus::Optimal => Ok(solution),
        OptimizationStatus::Infeasible => Err(FluxAnalysisError::Infeasible),
        OptimizationStatus::Unbounded => Err(FluxAnalysisError::Unbounded),
        status => Err(FluxAnalysisError::NotOptimal(format!("{:?}", status))),
    }
}

/// Fold the forward/reverse variable values back into net fluxes
fn to_flux_solution(
    model: &Model,
    solution: &crate::optimize::ProblemSolution,
) -> FluxSolution {
    let values = solution
        .variable_values
        .as_ref()
        .expect("optimal solution carries variable values");
    let fluxes: IndexMap<String, f64> = model
        .reactions
        .values()
        .map(|rxn| {
            let forward = values.get(&rxn.forward_id()).copied().unwrap_or(0.0);
            let reverse = values.get(&rxn.reverse_id()).copied().unwrap_or(0.0);
            (rxn.id.clone(), forward - reverse)
        })
        .collect();
    FluxSolution {
        objective_value: solution.objective_value.unwrap_or(0.0),
        fluxes,
    }
}

/// Errors raised by the flux analysis methods
#[derive(Error, Debug)]
pub enum FluxAnalysisError {
    /// The model has no objective coefficients set
    #[error("The model has no objective to optimize")]
    MissingObjective,
    /// The linear program has no feasible flux distribution
    #[error("The flux balance problem is infeasible")]
    Infeasible,
    /// The linear program is unbounded
    #[error("The flux balance problem is unbounded")]
    Unbounded,
    /// The solver stopped with some other non-optimal status
    #[error("The solver stopped with a non-optimal status: {0}")]
    NotOptimal(String),
    /// The problem could not be formulated from the model
    #[error("Unable to formulate the optimization problem")]
    Formulation(#[from] ProblemError),
    /// The solver failed internally
    #[error("Solver error")]
    Solver(#[from] SolveError),
}
