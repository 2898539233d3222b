//! This module provides the Model struct for representing an entire metabolic model
use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::reaction::Reaction;

use indexmap::IndexMap;
use thiserror::Error;

/// Represents a Genome Scale Metabolic Model
#[derive(Clone, Debug)]
pub struct Model {
    /// Map of reaction ids to Reaction objects
    pub reactions: IndexMap<String, Reaction>,
    /// Map of gene ids to Gene objects
    pub genes: IndexMap<String, Gene>,
    /// Map of metabolite ids to Metabolite objects
    pub metabolites: IndexMap<String, Metabolite>,
    /// Map of reaction ids to objective function coefficients
    pub objective: IndexMap<String, f64>,
    /// Id associated with the Model
    pub id: Option<String>,
    /// Compartments in the model
    ///
    /// An IndexMap<String, String> of {short name: long name}
    pub compartments: Option<IndexMap<String, String>>,
    /// A version identifier for the Model, stored as a string
    pub version: Option<String>,
}

impl Model {
    pub fn new_empty() -> Self {
        Model {
            reactions: IndexMap::new(),
            genes: IndexMap::new(),
            metabolites: IndexMap::new(),
            objective: IndexMap::new(),
            id: None,
            compartments: None,
            version: None,
        }
    }

    /// Add a reaction to the model
    pub fn add_reaction(&mut self, reaction: Reaction) {
        let id = reaction.id.clone();
        self.reactions.insert(id, reaction);
    }

    /// Add a gene to the model
    pub fn add_gene(&mut self, gene: Gene) {
        let id = gene.id.clone();
        self.genes.insert(id, gene);
    }

    /// Add a metabolite to the model
    pub fn add_metabolite(&mut self, metabolite: Metabolite) {
        let id = metabolite.id.clone();
        self.metabolites.insert(id, metabolite);
    }

    /// Look up a reaction by id
    pub fn reaction(&self, id: &str) -> Result<&Reaction, ModelError> {
        self.reactions
            .get(id)
            .ok_or_else(|| ModelError::ReactionNotFound(id.to_string()))
    }

    /// Look up a reaction by id for mutation
    pub fn reaction_mut(&mut self, id: &str) -> Result<&mut Reaction, ModelError> {
        self.reactions
            .get_mut(id)
            .ok_or_else(|| ModelError::ReactionNotFound(id.to_string()))
    }

    /// Set the lower flux bound of a reaction
    pub fn set_lower_bound(&mut self, id: &str, lower_bound: f64) -> Result<(), ModelError> {
        let rxn = self.reaction_mut(id)?;
        if lower_bound > rxn.upper_bound {
            return Err(ModelError::InvalidBounds {
                reaction: id.to_string(),
                lower_bound,
                upper_bound: rxn.upper_bound,
            });
        }
        rxn.lower_bound = lower_bound;
        Ok(())
    }

    /// Set the upper flux bound of a reaction
    pub fn set_upper_bound(&mut self, id: &str, upper_bound: f64) -> Result<(), ModelError> {
        let rxn = self.reaction_mut(id)?;
        if upper_bound < rxn.lower_bound {
            return Err(ModelError::InvalidBounds {
                reaction: id.to_string(),
                lower_bound: rxn.lower_bound,
                upper_bound,
            });
        }
        rxn.upper_bound = upper_bound;
        Ok(())
    }

    /// Set both flux bounds of a reaction at once
    pub fn set_bounds(&mut self, id: &str, lower_bound: f64, upper_bound: f64) -> Result<(), ModelError> {
        if lower_bound > upper_bound {
            return Err(ModelError::InvalidBounds {
                reaction: id.to_string(),
                lower_bound,
                upper_bound,
            });
        }
        let rxn = self.reaction_mut(id)?;
        rxn.lower_bound = lower_bound;
        rxn.upper_bound = upper_bound;
        Ok(())
    }

    /// Current upper flux bound of a reaction
    pub fn upper_bound(&self, id: &str) -> Result<f64, ModelError> {
        Ok(self.reaction(id)?.upper_bound)
    }

    /// Current lower flux bound of a reaction
    pub fn lower_bound(&self, id: &str) -> Result<f64, ModelError> {
        Ok(self.reaction(id)?.lower_bound)
    }

    /// Replace the objective with a single reaction at the given coefficient
    pub fn set_objective(&mut self, id: &str, coefficient: f64) -> Result<(), ModelError> {
        // Validate the id before touching the existing objective
        self.reaction(id)?;
        self.objective.clear();
        self.objective.insert(id.to_string(), coefficient);
        Ok(())
    }
}

/// Errors associated with the Model
#[derive(Error, Debug, Clone)]
pub enum ModelError {
    /// A reaction id was referenced which is not present in the model
    #[error("Reaction {0} not found in the model")]
    ReactionNotFound(String),
    /// A bound update would leave lower_bound > upper_bound
    #[error("Invalid bounds for reaction {reaction}: lower {lower_bound} > upper {upper_bound}")]
    InvalidBounds {
        reaction: String,
        lower_bound: f64,
        upper_bound: f64,
    },
}
