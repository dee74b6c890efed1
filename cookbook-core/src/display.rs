//! Preference-aware display strings for stored amounts.
//!
//! Metric users see the stored amount with two decimals. Everyone else sees
//! the non-zero parts of the US customary breakdown, e.g.
//! `"1 cup, 1 quarter cup, 1 tablespoon, 1 teaspoon"` or `"1 lb and 5.16 ozs"`.
//! A breakdown with no non-zero part renders as an explicit zero of the
//! smallest unit (`"0 teaspoons"`, `"0.00 ozs"`).

use serde::{Deserialize, Serialize};

use crate::conversions::{check_quantity, decompose_mass, decompose_volume, OUNCES_PER_POUND};
use crate::error::ConversionError;
use crate::types::MeasureKind;

const VOLUME_SEPARATOR: &str = ", ";
const MASS_SEPARATOR: &str = " and ";

/// Which unit systems a viewer wants amounts rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurePreference {
    pub metric_volume: bool,
    pub metric_mass: bool,
}

impl Default for MeasurePreference {
    /// Anonymous viewers get metric for both.
    fn default() -> Self {
        Self {
            metric_volume: true,
            metric_mass: true,
        }
    }
}

impl MeasurePreference {
    pub fn new(metric_volume: bool, metric_mass: bool) -> Self {
        Self {
            metric_volume,
            metric_mass,
        }
    }

    /// Render an amount stored in the base unit of `kind`.
    pub fn format_amount(&self, kind: MeasureKind, amount: f64) -> Result<String, ConversionError> {
        match kind {
            MeasureKind::Volume => format_volume(self.metric_volume, amount),
            MeasureKind::Mass => format_mass(self.metric_mass, amount),
            MeasureKind::Count => Ok(format_decimal(check_quantity(amount)?)),
        }
    }
}

/// Render a volume in milliliters.
pub fn format_volume(uses_metric: bool, ml: f64) -> Result<String, ConversionError> {
    if uses_metric {
        return Ok(format!("{:.2} ml", check_quantity(ml)?));
    }

    let volume = decompose_volume(ml)?;
    if volume.is_zero() {
        return Ok(counted(0.0, "teaspoon", "teaspoons"));
    }

    let mut parts = Vec::new();

    if volume.cups > 0 {
        parts.push(counted(f64::from(volume.cups), "cup", "cups"));
    }
    match volume.quarter_cups {
        0 => {}
        2 => parts.push("1 half cup".to_string()),
        n => parts.push(counted(f64::from(n), "quarter cup", "quarter cups")),
    }
    if volume.tablespoons > 0 {
        parts.push(counted(
            f64::from(volume.tablespoons),
            "tablespoon",
            "tablespoons",
        ));
    }
    if volume.teaspoons > 0.0 {
        parts.push(counted(volume.teaspoons, "teaspoon", "teaspoons"));
    }

    Ok(parts.join(VOLUME_SEPARATOR))
}

/// Render a mass in grams.
///
/// Ounces are always shown with two decimals. Ounces that would print as
/// `16.00` carry into the pound count; ounces that print as `0.00` are
/// dropped when there is at least one pound.
pub fn format_mass(uses_metric: bool, grams: f64) -> Result<String, ConversionError> {
    if uses_metric {
        return Ok(format!("{:.2} g", check_quantity(grams)?));
    }

    let mass = decompose_mass(grams)?;
    let mut pounds = mass.pounds;
    let mut ounces = (mass.ounces * 100.0).round() / 100.0;
    if ounces >= OUNCES_PER_POUND {
        pounds = pounds.saturating_add(1);
        ounces = 0.0;
    }

    let mut parts = Vec::new();
    if pounds > 0 {
        parts.push(counted(f64::from(pounds), "lb", "lbs"));
    }
    if ounces > 0.0 || pounds == 0 {
        let noun = if ounces == 1.0 { "oz" } else { "ozs" };
        parts.push(format!("{:.2} {}", ounces, noun));
    }

    Ok(parts.join(MASS_SEPARATOR))
}

/// Format a number without trailing zeros: `2`, `1.25`, `0.5`.
pub fn format_decimal(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn counted(value: f64, singular: &str, plural: &str) -> String {
    let noun = if value == 1.0 { singular } else { plural };
    format!("{} {}", format_decimal(value), noun)
}
