//! Process-wide defaults shared by model construction and the solvers
use std::sync::{LazyLock, RwLock};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

pub struct Configuration {
    /// Default lower flux bound for reactions which don't specify one
    pub lower_bound: f64,
    /// Default upper flux bound for reactions which don't specify one
    pub upper_bound: f64,
    /// Feasibility tolerance, also used when pinning the objective for pFBA
    pub tolerance: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: -1000.,
            upper_bound: 1000.,
            tolerance: 1e-07,
        }
    }
}
