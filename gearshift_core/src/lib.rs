//! Core library for gear-shifting flux balance analysis.
//!
//! Reads a BiGG-style JSON genome scale model (e.g. iML1515), formulates the
//! FBA linear program, and sweeps it through a fixed schedule of metabolic
//! "gears": presets of glucose/oxygen uptake bounds combined with a
//! stress-dependent penalty on the growth objective.

pub mod configuration;
pub mod flux_analysis;
pub mod io;
pub mod metabolic_model;
pub mod optimize;
pub mod simulation;
