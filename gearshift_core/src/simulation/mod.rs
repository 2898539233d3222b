//! The gear-shifting simulation: presets, stress model, sweep, reporting

pub mod gear;
pub mod report;
pub mod stress;
pub mod sweep;
