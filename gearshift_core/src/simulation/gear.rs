//! Gear presets: the five operating modes of the simulated cell
use std::fmt::{Display, Formatter};

/// A named preset of uptake-rate bounds and plasmid burden
///
/// Uptake rates are exchange-reaction lower bounds, so they are negative by
/// convention (flux into the cell). Gears are immutable; the schedule is
/// defined once and consumed in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gear {
    /// Position in the schedule, 1 through 5
    pub index: u8,
    /// Glucose uptake rate in mmol/gDW/h (lower bound on EX_glc__D_e)
    pub glucose_uptake: f64,
    /// Oxygen uptake rate in mmol/gDW/h (lower bound on EX_o2_e)
    pub oxygen_uptake: f64,
    /// Plasmid burden subtracted from growth retention, 0.0 to 1.0
    pub burden: f64,
}

impl Gear {
    /// The five hand-tuned gears of the enhancement schedule
    pub fn schedule() -> [Gear; 5] {
        [
            Gear { index: 1, glucose_uptake: -10.0, oxygen_uptake: -18.0, burden: 0.0 },
            Gear { index: 2, glucose_uptake: -30.0, oxygen_uptake: -30.0, burden: 0.05 },
            Gear { index: 3, glucose_uptake: -80.0, oxygen_uptake: -60.0, burden: 0.12 },
            Gear { index: 4, glucose_uptake: -150.0, oxygen_uptake: -100.0, burden: 0.18 },
            Gear { index: 5, glucose_uptake: -250.0, oxygen_uptake: -150.0, burden: 0.25 },
        ]
    }

    /// Human-readable gear name, e.g. "Gear 3"
    pub fn name(&self) -> String {
        format!("Gear {}", self.index)
    }
}

impl Display for Gear {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_is_five_gears_in_order() {
        let schedule = Gear::schedule();
        assert_eq!(schedule.len(), 5);
        for (position, gear) in schedule.iter().enumerate() {
            assert_eq!(gear.index as usize, position + 1);
        }
    }

    #[test]
    fn uptakes_intensify_down_the_schedule() {
        let schedule = Gear::schedule();
        for pair in schedule.windows(2) {
            assert!(pair[1].glucose_uptake < pair[0].glucose_uptake);
            assert!(pair[1].oxygen_uptake < pair[0].oxygen_uptake);
            assert!(pair[1].burden > pair[0].burden);
        }
    }

    #[test]
    fn preset_values() {
        let schedule = Gear::schedule();
        assert!((schedule[0].glucose_uptake - -10.0).abs() < 1e-12);
        assert!((schedule[0].oxygen_uptake - -18.0).abs() < 1e-12);
        assert!((schedule[0].burden - 0.0).abs() < 1e-12);
        assert!((schedule[4].glucose_uptake - -250.0).abs() < 1e-12);
        assert!((schedule[4].oxygen_uptake - -150.0).abs() < 1e-12);
        assert!((schedule[4].burden - 0.25).abs() < 1e-12);
        assert_eq!(schedule[2].name(), "Gear 3");
    }
}
