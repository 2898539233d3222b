//! Provides struct representing an optimization problem
use crate::metabolic_model::model::Model;
use crate::optimize::{OptimizationStatus, ProblemSolution};

use indexmap::IndexMap;
use microlp::{ComparisonOp, LinearExpr, OptimizationDirection};
use thiserror::Error;

/// Sense of the objective function
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ObjectiveSense {
    Maximize,
    Minimize,
}

/// A variable of the optimization problem
#[derive(Debug, Clone)]
pub struct ProblemVariable {
    /// Used to identify the variable
    pub id: String,
    /// Lower variable bound
    pub lower_bound: f64,
    /// Upper variable bound
    pub upper_bound: f64,
    /// Coefficient of this variable in the linear objective
    pub objective_coefficient: f64,
}

/// A single linear term of a constraint
#[derive(Debug, Clone)]
pub struct ConstraintTerm {
    /// Id of the variable in the term
    pub variable: String,
    /// Coefficient multiplying the variable
    pub coefficient: f64,
}

/// Represents a linear constraint in an optimization problem
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Represents an equality constraint, where the sum of `terms` = `equals`
    Equality {
        terms: Vec<ConstraintTerm>,
        equals: f64,
    },
    /// Represents a one-sided constraint, where the sum of `terms` >= `bound`
    GreaterEqual {
        terms: Vec<ConstraintTerm>,
        bound: f64,
    },
}

/// An optimization problem over named variables
///
/// A thin layer over the `microlp` simplex solver: variables and constraints
/// are kept by id in insertion order so solutions can be read back by
/// reaction id, and so repeated solves of the same model are reproducible.
#[derive(Debug, Clone)]
pub struct Problem {
    /// Sense of the objective (maximize or minimize)
    sense: ObjectiveSense,
    /// Variables of the optimization problem
    variables: IndexMap<String, ProblemVariable>,
    /// Constraints of the optimization problem, keyed by id
    constraints: IndexMap<String, Constraint>,
}

impl Problem {
    // region Creation Functions
    /// Create a new optimization problem
    pub fn new(sense: ObjectiveSense) -> Self {
        Self {
            sense,
            variables: IndexMap::new(),
            constraints: IndexMap::new(),
        }
    }

    /// Create a new maximization problem
    pub fn new_maximization() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new minimization problem
    pub fn new_minimization() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }
    // endregion Creation Functions

    /// Update the objective sense of the problem
    pub fn update_objective_sense(&mut self, sense: ObjectiveSense) {
        self.sense = sense;
    }

    // region Adding Variables
    /// Create a new variable and add it to the optimization problem
    pub fn add_new_variable(
        &mut self,
        id: &str,
        lower_bound: f64,
        upper_bound: f64,
        objective_coefficient: f64,
    ) -> Result<(), ProblemError> {
        if self.variables.contains_key(id) {
            return Err(ProblemError::VariableIdAlreadyExists);
        }
        if lower_bound > upper_bound {
            return Err(ProblemError::InvalidVariableBounds);
        }
        self.variables.insert(
            id.to_string(),
            ProblemVariable {
                id: id.to_string(),
                lower_bound,
                upper_bound,
                objective_coefficient,
            },
        );
        Ok(())
    }
    // endregion Adding Variables

    // region Adding Constraints
    /// Create a new equality constraint and add it to the problem
    pub fn add_new_equality_constraint(
        &mut self,
        id: &str,
        terms: &[(&str, f64)],
        equals: f64,
    ) -> Result<(), ProblemError> {
        let terms = self.validate_terms(id, terms)?;
        self.constraints
            .insert(id.to_string(), Constraint::Equality { terms, equals });
        Ok(())
    }

    /// Create a new greater-or-equal constraint and add it to the problem
    pub fn add_new_ge_constraint(
        &mut self,
        id: &str,
        terms: &[(&str, f64)],
        bound: f64,
    ) -> Result<(), ProblemError> {
        let terms = self.validate_terms(id, terms)?;
        self.constraints
            .insert(id.to_string(), Constraint::GreaterEqual { terms, bound });
        Ok(())
    }

    /// Check that a constraint can be added, converting its terms
    fn validate_terms(
        &self,
        id: &str,
        terms: &[(&str, f64)],
    ) -> Result<Vec<ConstraintTerm>, ProblemError> {
        if self.constraints.contains_key(id) {
            return Err(ProblemError::ConstraintAlreadyExists);
        }
        terms
            .iter()
            .map(|(variable, coefficient)| {
                if !self.variables.contains_key(*variable) {
                    return Err(ProblemError::NonExistentVariablesInConstraint);
                }
                Ok(ConstraintTerm {
                    variable: variable.to_string(),
                    coefficient: *coefficient,
                })
            })
            .collect()
    }
    // endregion Adding Constraints

    // region Objective
    /// Terms of the current linear objective as (variable id, coefficient)
    pub fn objective_terms(&self) -> Vec<(String, f64)> {
        self.variables
            .iter()
            .filter(|(_, var)| var.objective_coefficient != 0.0)
            .map(|(id, var)| (id.clone(), var.objective_coefficient))
            .collect()
    }

    /// Pin the current objective expression at or above `value`
    ///
    /// Used for two-stage analyses (pFBA): after the first solve, the
    /// objective expression becomes a constraint and a new objective can be
    /// installed.
    pub fn fix_objective(&mut self, value: f64) -> Result<(), ProblemError> {
        let terms = self.objective_terms();
        if terms.is_empty() {
            return Err(ProblemError::EmptyObjective);
        }
        let term_refs: Vec<(&str, f64)> = terms.iter().map(|(v, c)| (v.as_str(), *c)).collect();
        self.add_new_ge_constraint("objective_fixation", &term_refs, value)
    }

    /// Replace the objective with minimization of the sum of all variables
    ///
    /// With the forward/reverse variable split all variables are nonnegative,
    /// so this minimizes total absolute flux.
    pub fn minimize_total_flux(&mut self) {
        for (_, var) in self.variables.iter_mut() {
            var.objective_coefficient = 1.0;
        }
        self.sense = ObjectiveSense::Minimize;
    }
    // endregion Objective

    /// Current number of variables in the problem
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Current number of constraints in the problem
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    // region Model Formulation
    /// Formulate a metabolic model as an FBA linear program
    ///
    /// Each reaction contributes a nonnegative forward and reverse variable;
    /// each metabolite contributes a mass balance equality (the `S·v = 0`
    /// steady state condition); the objective is the model's objective map
    /// applied to the net flux of each reaction.
    pub fn from_model(model: &Model) -> Result<Self, ProblemError> {
        let mut problem = Problem::new_maximization();
        for (_, rxn) in &model.reactions {
            let coefficient = model.objective.get(&rxn.id).copied().unwrap_or(0.0);
            problem.add_new_variable(
                &rxn.forward_id(),
                rxn.forward_lower_bound(),
                rxn.forward_upper_bound(),
                coefficient,
            )?;
            problem.add_new_variable(
                &rxn.reverse_id(),
                rxn.reverse_lower_bound(),
                rxn.reverse_upper_bound(),
                -coefficient,
            )?;
        }

        // Collect the stoichiometry column of every reaction into one mass
        // balance row per metabolite
        let mut balances: IndexMap<String, Vec<(String, f64)>> = IndexMap::new();
        for met_id in model.metabolites.keys() {
            balances.insert(met_id.clone(), Vec::new());
        }
        for (_, rxn) in &model.reactions {
            for (met_id, coefficient) in &rxn.metabolites {
                let row = balances.entry(met_id.clone()).or_default();
                row.push((rxn.forward_id(), *coefficient));
                row.push((rxn.reverse_id(), -*coefficient));
            }
        }
        for (met_id, row) in &balances {
            if row.is_empty() {
                // Orphan metabolite, no reaction touches it
                continue;
            }
            let term_refs: Vec<(&str, f64)> = row.iter().map(|(v, c)| (v.as_str(), *c)).collect();
            problem.add_new_equality_constraint(
                &format!("mass_balance_{}", met_id),
                &term_refs,
                0.0,
            )?;
        }
        Ok(problem)
    }
    // endregion Model Formulation

    // region Solving
    /// Solve the problem with the microlp simplex solver
    ///
    /// Infeasible and unbounded outcomes are reported through the solution
    /// status; an `Err` is only returned for internal solver failures.
    pub fn solve(&self) -> Result<ProblemSolution, SolveError> {
        let direction = match self.sense {
            ObjectiveSense::Maximize => OptimizationDirection::Maximize,
            ObjectiveSense::Minimize => OptimizationDirection::Minimize,
        };
        let mut lp = microlp::Problem::new(direction);
        let mut handles: IndexMap<String, microlp::Variable> = IndexMap::new();
        for (id, var) in &self.variables {
            let handle = lp.add_var(
                var.objective_coefficient,
                (var.lower_bound, var.upper_bound),
            );
            handles.insert(id.clone(), handle);
        }
        for (_, constraint) in &self.constraints {
            let (terms, op, rhs) = match constraint {
                Constraint::Equality { terms, equals } => (terms, ComparisonOp::Eq, *equals),
                Constraint::GreaterEqual { terms, bound } => (terms, ComparisonOp::Ge, *bound),
            };
            let mut expr = LinearExpr::empty();
            for term in terms {
                expr.add(handles[&term.variable], term.coefficient);
            }
            lp.add_constraint(expr, op, rhs);
        }
        log::debug!(
            "solving LP with {} variables and {} constraints",
            self.num_variables(),
            self.num_constraints()
        );
        match lp.solve() {
            Ok(solution) => {
                let values: IndexMap<String, f64> = handles
                    .iter()
                    .map(|(id, handle)| (id.clone(), solution[*handle]))
                    .collect();
                Ok(ProblemSolution {
                    status: OptimizationStatus::Optimal,
                    objective_value: Some(solution.objective()),
                    variable_values: Some(values),
                })
            }
            Err(microlp::Error::Infeasible) => Ok(ProblemSolution {
                status: OptimizationStatus::Infeasible,
                objective_value: None,
                variable_values: None,
            }),
            Err(microlp::Error::Unbounded) => Ok(ProblemSolution {
                status: OptimizationStatus::Unbounded,
                objective_value: None,
                variable_values: None,
            }),
            Err(err) => Err(SolveError::Solver(err.to_string())),
        }
    }
    // endregion Solving
}

/// Errors associated with building a Problem
#[derive(Error, Debug, Clone)]
pub enum ProblemError {
    /// Error when trying to add a variable with the same id as an existing variable
    #[error("Tried to add a variable with the same id as an existing variable")]
    VariableIdAlreadyExists,
    /// Error when trying to add variable with invalid bounds
    #[error("Tried to add a variable with lower_bound>upper_bound")]
    InvalidVariableBounds,
    /// Error when trying to add a constraint with the same id as an existing constraint
    #[error("Tried to add a constraint with the same id as an existing constraint")]
    ConstraintAlreadyExists,
    /// Error when trying to add a constraint that contains variables not in the problem
    #[error("Tried to add a constraint with variables not in the problem")]
    NonExistentVariablesInConstraint,
    /// Error when trying to fix an objective which has no terms
    #[error("Tried to fix an objective with no terms")]
    EmptyObjective,
}

/// Errors raised by the underlying solver
#[derive(Error, Debug, Clone)]
pub enum SolveError {
    /// The solver failed internally (not an infeasibility or unboundedness)
    #[error("Solver failure: {0}")]
    Solver(String),
}
