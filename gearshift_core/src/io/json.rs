//! Module providing JSON IO for BiGG-style models (e.g. iML1515)
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::{ReactionBuilder, ReactionBuilderError};

// region JSON Model
/// Represents a JSON serialized model, used for reading and writing models in json format
#[derive(Serialize, Deserialize)]
struct JsonModel {
    metabolites: Vec<JsonMetabolite>,
    reactions: Vec<JsonReaction>,
    genes: Vec<JsonGene>,
    id: Option<String>,
    compartments: Option<IndexMap<String, String>>,
    version: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct JsonMetabolite {
    id: String,
    name: Option<String>,
    compartment: Option<String>,
    charge: Option<i32>,
    formula: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct JsonReaction {
    id: String,
    name: Option<String>,
    metabolites: IndexMap<String, f64>,
    lower_bound: f64,
    upper_bound: f64,
    gene_reaction_rule: String,
    objective_coefficient: Option<f64>,
    subsystem: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct JsonGene {
    id: String,
    name: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}
// endregion JSON Model

// region Conversions
/* Notes and annotations are weakly structured in BiGG files, so they are
kept as JSON strings on the model entities rather than unpacked further. */
impl From<JsonGene> for Gene {
    fn from(g: JsonGene) -> Self {
        Self {
            id: g.id,
            name: g.name,
            notes: g.notes.map(|v| v.to_string()),
            annotation: g.annotation.map(|v| v.to_string()),
        }
    }
}

impl From<JsonMetabolite> for Metabolite {
    fn from(m: JsonMetabolite) -> Self {
        Self {
            id: m.id,
            name: m.name,
            compartment: m.compartment,
            charge: m.charge.unwrap_or_default(),
            formula: m.formula,
            notes: m.notes.map(|v| v.to_string()),
            annotation: m.annotation.map(|v| v.to_string()),
        }
    }
}

impl From<Gene> for JsonGene {
    fn from(g: Gene) -> Self {
        Self {
            id: g.id,
            name: g.name,
            notes: g
                .notes
                .map(|n| serde_json::from_str(&n).unwrap_or(Value::String(n))),
            annotation: g
                .annotation
                .map(|a| serde_json::from_str(&a).unwrap_or(Value::String(a))),
        }
    }
}

impl From<Metabolite> for JsonMetabolite {
    fn from(m: Metabolite) -> Self {
        Self {
            id: m.id,
            name: m.name,
            compartment: m.compartment,
            charge: Some(m.charge),
            formula: m.formula,
            notes: m
                .notes
                .map(|n| serde_json::from_str(&n).unwrap_or(Value::String(n))),
            annotation: m
                .annotation
                .map(|a| serde_json::from_str(&a).unwrap_or(Value::String(a))),
        }
    }
}

impl Model {
    /// Read a BiGG-style JSON model file into a Model
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Model, JsonError> {
        let model_str = fs::read_to_string(&path)
            .map_err(|err| JsonError::UnableToRead(format!("{:?}", err)))?;
        let json_model = serde_json::from_str::<JsonModel>(&model_str)
            .map_err(|err| JsonError::UnableToParse(format!("{:?}", err)))?;
        log::info!(
            "read model {} from {}",
            json_model.id.as_deref().unwrap_or("<unnamed>"),
            path.as_ref().display()
        );
        Model::from_json(json_model)
    }

    /// Write the Model back out as BiGG-style JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), JsonError> {
        let json_model = self.to_json();
        let model_string = serde_json::to_string(&json_model)?;
        fs::write(path, model_string)?;
        Ok(())
    }

    fn from_json(json_model: JsonModel) -> Result<Self, JsonError> {
        let mut model = Model::new_empty();
        json_model.genes.into_iter().for_each(|g| {
            model.add_gene(Gene::from(g));
        });
        json_model.metabolites.into_iter().for_each(|m| {
            model.add_metabolite(Metabolite::from(m));
        });
        // Reactions also feed the objective coefficient map
        for rxn in json_model.reactions {
            let rule = if rxn.gene_reaction_rule.is_empty() {
                None
            } else {
                Some(rxn.gene_reaction_rule)
            };
            let new_reaction = ReactionBuilder::default()
                .id(rxn.id.clone())
                .metabolites(rxn.metabolites)
                .name(rxn.name)
                .gene_reaction_rule(rule)
                .lower_bound(rxn.lower_bound)
                .upper_bound(rxn.upper_bound)
                .subsystem(rxn.subsystem)
                .notes(rxn.notes.map(|v| v.to_string()))
                .annotation(rxn.annotation.map(|v| v.to_string()))
                .build()?;
            model.add_reaction(new_reaction);
            if let Some(coef) = rxn.objective_coefficient {
                if coef != 0.0 {
                    model.objective.insert(rxn.id, coef);
                }
            }
        }
        model.id = json_model.id;
        model.compartments = json_model.compartments;
        model.version = json_model.version;
        Ok(model)
    }

    fn to_json(&self) -> JsonModel {
        let json_genes: Vec<JsonGene> = self.genes.values().map(|g| g.clone().into()).collect();
        let json_metabolites: Vec<JsonMetabolite> =
            self.metabolites.values().map(|m| m.clone().into()).collect();
        let json_reactions: Vec<JsonReaction> = self
            .reactions
            .values()
            .map(|r| JsonReaction {
                id: r.id.clone(),
                name: r.name.clone(),
                metabolites: r.metabolites.clone(),
                lower_bound: r.lower_bound,
                upper_bound: r.upper_bound,
                gene_reaction_rule: r.gene_reaction_rule.clone().unwrap_or_default(),
                objective_coefficient: self.objective.get(&r.id).copied(),
                subsystem: r.subsystem.clone(),
                notes: r
                    .notes
                    .clone()
                    .map(|n| serde_json::from_str(&n).unwrap_or(Value::String(n))),
                annotation: r
                    .annotation
                    .clone()
                    .map(|a| serde_json::from_str(&a).unwrap_or(Value::String(a))),
            })
            .collect();

        JsonModel {
            metabolites: json_metabolites,
            reactions: json_reactions,
            genes: json_genes,
            id: self.id.clone(),
            compartments: self.compartments.clone(),
            version: self.version.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to read file due to {0}")]
    UnableToRead(String),
    #[error("Unable to parse json due to {0}")]
    UnableToParse(String),
    #[error("Unable to build reaction")]
    UnableToBuildReaction(#[from] ReactionBuilderError),
    #[error("Serde json error")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("Unable to write to file")]
    UnableToWrite(#[from] std::io::Error),
}

// endregion Conversions

#[cfg(test)]
mod json_tests {
    use super::*;

    #[test]
    fn json_metabolite() {
        let data = r#"{
"id":"glc__D_e",
"name":"D-Glucose",
"compartment":"e",
"charge":0,
"formula":"C6H12O6",
"annotation":{
"bigg.metabolite":["glc__D"],
"kegg.compound":["C00031"]
}
}"#;
        let met: JsonMetabolite = serde_json::from_str(data).unwrap();
        assert_eq!(met.id, "glc__D_e");
        assert_eq!(met.name.unwrap(), "D-Glucose");
        assert_eq!(met.compartment.unwrap(), "e");
        assert_eq!(met.charge.unwrap(), 0);
        assert_eq!(met.formula.unwrap(), "C6H12O6");
    }

    #[test]
    fn json_reaction() {
        let data = r#"{
"id":"ATPM",
"name":"ATP maintenance requirement",
"metabolites":{
"atp_c":-1.0,
"h2o_c":-1.0,
"adp_c":1.0,
"h_c":1.0,
"pi_c":1.0
},
"lower_bound":6.86,
"upper_bound":1000.0,
"gene_reaction_rule":"",
"subsystem":"Intracellular demand"
}"#;
        let reaction: JsonReaction = serde_json::from_str(data).unwrap();
        assert_eq!(reaction.id, "ATPM");
        assert!((reaction.lower_bound - 6.86).abs() < 1e-12);
        assert!((reaction.upper_bound - 1000.0).abs() < 1e-12);
        assert!((reaction.metabolites["atp_c"] - -1.0).abs() < 1e-12);
        assert!(reaction.gene_reaction_rule.is_empty());
        assert_eq!(reaction.subsystem.unwrap(), "Intracellular demand");
    }

    #[test]
    fn json_gene() {
        let data = r#"{
"id":"b1241",
"name":"adhE",
"annotation":{"ncbigene":["945837"]}
}"#;
        let gene: JsonGene = serde_json::from_str(data).unwrap();
        assert_eq!(gene.id, "b1241");
        assert_eq!(gene.name.unwrap(), "adhE");
    }
}

#[cfg(test)]
mod model_tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test_data")
            .join("mini_ecoli.json")
    }

    #[test]
    fn read_fixture_model() {
        let model = Model::read_json(fixture_path()).unwrap();

        assert_eq!(model.id.as_deref().unwrap(), "mini_ecoli");
        assert_eq!(model.version.as_deref().unwrap(), "1");
        assert_eq!(model.reactions.len(), 10);
        assert_eq!(model.metabolites.len(), 7);

        // Bounds come through the reaction parameters
        let glc = model.reaction("EX_glc__D_e").unwrap();
        assert!((glc.lower_bound - -10.0).abs() < 1e-12);
        assert!((glc.upper_bound - 1000.0).abs() < 1e-12);

        // The biomass reaction carries the objective
        assert_eq!(model.objective.len(), 1);
        assert!(
            (model.objective["BIOMASS_Ec_iML1515_core_75p37M"] - 1.0).abs() < 1e-12
        );

        // Gene rules survive as opaque strings
        let glyc = model.reaction("GLYC").unwrap();
        assert_eq!(glyc.gene_reaction_rule.as_deref().unwrap(), "b0001 or b0002");

        // Compartments map
        let compartments = model.compartments.as_ref().unwrap();
        assert_eq!(compartments["e"], "extracellular space");
        assert_eq!(compartments["c"], "cytosol");
    }

    #[test]
    fn round_trip_through_json() {
        let model = Model::read_json(fixture_path()).unwrap();
        let out_path = std::env::temp_dir().join("gearshift_round_trip.json");
        model.write_json(&out_path).unwrap();
        let reread = Model::read_json(&out_path).unwrap();

        assert_eq!(model.reactions.len(), reread.reactions.len());
        assert_eq!(model.metabolites.len(), reread.metabolites.len());
        assert_eq!(model.genes.len(), reread.genes.len());
        assert_eq!(model.objective, reread.objective);
        for (id, rxn) in &model.reactions {
            let other = reread.reaction(id).unwrap();
            assert!((rxn.lower_bound - other.lower_bound).abs() < 1e-12);
            assert!((rxn.upper_bound - other.upper_bound).abs() < 1e-12);
        }
        std::fs::remove_file(&out_path).ok();
    }

    #[test]
    fn missing_file_is_an_error() {
        match Model::read_json("no_such_model.json") {
            Err(JsonError::UnableToRead(_)) => {}
            other => panic!("expected UnableToRead, got {:?}", other.map(|_| ())),
        }
    }
}
