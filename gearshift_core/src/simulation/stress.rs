//! Stress model: pure functions mapping uptake intensity to penalties
//!
//! Constants are the published calibration of the gear-shifting study; they
//! are not derivable from the model itself.

/// Scale applied to |glucose uptake| before the cost exponent
const STRESS_COST_SCALE: f64 = 0.02;
/// Exponent of the non-linear maintenance cost
const STRESS_COST_EXPONENT: f64 = 1.8;
/// Cap on the additional maintenance cost, mmol ATP/gDW/h
const STRESS_COST_CAP: f64 = 200.0;
/// Cap on the growth penalty fraction
const STRESS_PENALTY_CAP: f64 = 0.95;
/// Floor on growth retention, keeps the biomass bound strictly positive
const RETENTION_FLOOR: f64 = 0.001;

/// Non-linear ATP maintenance cost of running at the given glucose uptake
///
/// Added to the baseline ATPM requirement. Monotone non-decreasing in
/// |uptake| and capped at [`STRESS_COST_CAP`].
pub fn stress_cost(glucose_uptake: f64) -> f64 {
    let base_stress = glucose_uptake.abs() * STRESS_COST_SCALE;
    base_stress.powf(STRESS_COST_EXPONENT).min(STRESS_COST_CAP)
}

/// Piecewise growth penalty for the given glucose uptake
///
/// Three bands: up to 30 (gears 1-2, controlled decline), up to 80 (gear 3),
/// and beyond (gears 4-5, approaching growth cessation). Within each band the
/// penalty grows exponentially with |uptake|; the cap at
/// [`STRESS_PENALTY_CAP`] keeps a sliver of growth available.
pub fn stress_penalty(glucose_uptake: f64) -> f64 {
    let glucose = glucose_uptake.abs();
    let penalty = if glucose <= 30.0 {
        (glucose / 35.0).exp() / 20.0
    } else if glucose <= 80.0 {
        (glucose / 25.0).exp() / 15.0
    } else {
        (glucose / 40.0).exp() / 10.0
    };
    penalty.min(STRESS_PENALTY_CAP)
}

/// Fraction of the biomass bound retained under burden and stress
pub fn growth_retention(burden: f64, penalty: f64) -> f64 {
    (1.0 - burden - penalty).max(RETENTION_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_values() {
        // (|g| * 0.02)^1.8, capped at 200
        assert!((stress_cost(-10.0) - 0.2f64.powf(1.8)).abs() < 1e-12);
        assert!((stress_cost(-250.0) - 5.0f64.powf(1.8)).abs() < 1e-12);
        assert!((stress_cost(-100000.0) - 200.0).abs() < 1e-12);
        // Sign of the uptake does not matter
        assert!((stress_cost(30.0) - stress_cost(-30.0)).abs() < 1e-12);
    }

    #[test]
    fn cost_is_monotone() {
        let mut previous = stress_cost(0.0);
        for g in 1..=300 {
            let current = stress_cost(-(g as f64));
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn penalty_band_values() {
        assert!((stress_penalty(-10.0) - (10.0f64 / 35.0).exp() / 20.0).abs() < 1e-12);
        // 30 sits in the first band, 80 in the second
        assert!((stress_penalty(-30.0) - (30.0f64 / 35.0).exp() / 20.0).abs() < 1e-12);
        assert!((stress_penalty(-80.0) - 0.95).abs() < 1e-12);
        assert!((stress_penalty(-50.0) - (50.0f64 / 25.0).exp() / 15.0).abs() < 1e-12);
        assert!((stress_penalty(-150.0) - 0.95).abs() < 1e-12);
    }

    #[test]
    fn penalty_is_monotone_within_each_band() {
        for band in [(0, 30), (31, 80), (81, 300)] {
            let mut previous = stress_penalty(-(band.0 as f64));
            for g in band.0..=band.1 {
                let current = stress_penalty(-(g as f64));
                assert!(current >= previous, "penalty dropped at uptake {}", g);
                previous = current;
            }
        }
    }

    #[test]
    fn penalty_capped() {
        assert!(stress_penalty(-1000.0) <= 0.95);
        assert!((stress_penalty(-1000.0) - 0.95).abs() < 1e-12);
    }

    #[test]
    fn retention_floor() {
        // Burden plus a capped penalty can exceed 1; the floor keeps the
        // biomass bound strictly positive
        assert!((growth_retention(0.25, 0.95) - 0.001).abs() < 1e-12);
        assert!((growth_retention(0.0, stress_penalty(-10.0))
            - (1.0 - stress_penalty(-10.0)))
        .abs()
            < 1e-12);
    }

    #[test]
    fn retention_non_increasing_in_penalty() {
        let mut previous = growth_retention(0.05, 0.0);
        for step in 0..=100 {
            let current = growth_retention(0.05, step as f64 / 100.0);
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn penalty_drops_at_the_band_boundary() {
        // The second band saturates its cap before 80, while the third band
        // re-enters below it; the bands are calibrated independently
        assert!(stress_penalty(-81.0) < stress_penalty(-80.0));
    }
}
