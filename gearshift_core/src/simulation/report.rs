//! Plain-text summaries of a completed gear sweep
use crate::simulation::sweep::GearResult;

/// Fold changes of one gear's outputs relative to the first gear
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoldChange {
    /// Index of the gear being compared
    pub gear_index: u8,
    /// Growth rate relative to the first gear's growth rate
    pub growth: f64,
    /// ATP synthase flux relative to the first gear's
    pub atp: f64,
    /// Glucose uptake relative to the first gear's
    pub glucose: f64,
}

/// Render the per-gear results as a fixed-width table
pub fn summary_table(results: &[GearResult]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<8} {:>12} {:>17} {:>17} {:>17} {:>17}\n",
        "Gear",
        "Growth (1/h)",
        "ATP (mmol/gDW/h)",
        "Glc (mmol/gDW/h)",
        "Lac (mmol/gDW/h)",
        "EtOH (mmol/gDW/h)"
    ));
    for result in results {
        out.push_str(&format!(
            "{:<8} {:>12.4} {:>17.2} {:>17.2} {:>17.2} {:>17.2}\n",
            result.gear.name(),
            result.growth,
            result.atp,
            result.glucose,
            result.lactate,
            result.ethanol
        ));
    }
    out
}

/// Compute growth, ATP and glucose fold changes against the first gear
///
/// The first gear is the baseline and gets no entry of its own. A zero value
/// in the first gear yields a fold change of 0.0 rather than infinity,
/// matching the reporting convention of dividing only when the baseline is
/// nonzero.
pub fn fold_changes(results: &[GearResult]) -> Vec<FoldChange> {
    let Some(first) = results.first() else {
        return Vec::new();
    };
    results
        .iter()
        .skip(1)
        .map(|result| FoldChange {
            gear_index: result.gear.index,
            growth: ratio(result.growth, first.growth),
            atp: ratio(result.atp, first.atp),
            glucose: ratio(result.glucose, first.glucose),
        })
        .collect()
}

/// Render the fold changes against the first gear as text
pub fn fold_change_report(results: &[GearResult]) -> String {
    let mut out = String::new();
    for change in fold_changes(results) {
        out.push_str(&format!(
            "Gear {}: growth {:.1}x, ATP {:.1}x, glucose {:.1}x\n",
            change.gear_index, change.growth, change.atp, change.glucose
        ));
    }
    out
}

fn ratio(value: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        0.0
    } else {
        value / baseline
    }
}
