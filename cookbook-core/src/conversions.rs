//! Metric to US customary decomposition for volumes and masses.
//!
//! Volumes are stored in milliliters and broken down into cups, quarter cups,
//! tablespoons and teaspoons. Masses are stored in grams and broken down into
//! pounds and ounces. Both directions are provided so a breakdown can be
//! turned back into a stored amount.

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;

pub const ML_PER_CUP: f64 = 250.0;
pub const ML_PER_QUARTER_CUP: f64 = 62.5;
pub const ML_PER_TABLESPOON: f64 = ML_PER_QUARTER_CUP / 4.0;
pub const ML_PER_TEASPOON: f64 = 4.92892;

pub const GRAMS_PER_OUNCE: f64 = 28.35;
pub const OUNCES_PER_POUND: f64 = 16.0;

const QUARTER_CUPS_PER_CUP: u64 = 4;
const TABLESPOONS_PER_QUARTER_CUP: u32 = 4;
const TEASPOON_CARRY: f64 = 3.0;

/// A volume expressed as cups, quarter cups, tablespoons and teaspoons.
///
/// In canonical form `quarter_cups` is in `[0, 3]`, `tablespoons` in `[0, 3]`
/// and `teaspoons` is a multiple of 0.25 in `[0, 3)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VolumeBreakdown {
    pub cups: u32,
    pub quarter_cups: u32,
    pub tablespoons: u32,
    pub teaspoons: f64,
}

impl VolumeBreakdown {
    pub fn new(cups: u32, quarter_cups: u32, tablespoons: u32, teaspoons: f64) -> Self {
        Self {
            cups,
            quarter_cups,
            tablespoons,
            teaspoons,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.cups == 0 && self.quarter_cups == 0 && self.tablespoons == 0 && self.teaspoons == 0.0
    }
}

/// A mass expressed as whole pounds plus ounces in `[0, 16)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MassBreakdown {
    pub pounds: u32,
    pub ounces: f64,
}

impl MassBreakdown {
    pub fn new(pounds: u32, ounces: f64) -> Self {
        Self { pounds, ounces }
    }
}

/// Reject negative, NaN and infinite quantities.
pub(crate) fn check_quantity(value: f64) -> Result<f64, ConversionError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConversionError::InvalidQuantity(value));
    }
    Ok(value)
}

fn round_to_quarter(value: f64) -> f64 {
    ((value * 4.0).round() / 4.0).max(0.0)
}

/// Break a volume in milliliters into cups, quarter cups, tablespoons and teaspoons.
///
/// Whole quarter cups are taken first; the remainder is split into whole
/// tablespoons and teaspoons rounded to the nearest quarter. A teaspoon count
/// that rounds up to 3 becomes one more tablespoon, and four tablespoons
/// become a quarter cup, so the result is always canonical. Volumes of more
/// than `u32::MAX` cups are rejected with [`ConversionError::TooLarge`].
pub fn decompose_volume(ml: f64) -> Result<VolumeBreakdown, ConversionError> {
    let ml = check_quantity(ml)?;

    let whole_quarter_cups = (ml / ML_PER_QUARTER_CUP).floor();
    let remainder = (ml - whole_quarter_cups * ML_PER_QUARTER_CUP).max(0.0);
    let mut quarter_cup_units = whole_quarter_cups as u64;
    if quarter_cup_units / QUARTER_CUPS_PER_CUP > u64::from(u32::MAX) {
        return Err(ConversionError::TooLarge(ml));
    }

    let mut tablespoons = (remainder / ML_PER_TABLESPOON).floor() as u32;
    let leftover = remainder - f64::from(tablespoons) * ML_PER_TABLESPOON;
    let mut teaspoons = round_to_quarter(leftover / ML_PER_TEASPOON);

    if teaspoons >= TEASPOON_CARRY {
        tablespoons += 1;
        teaspoons = 0.0;
    }
    if tablespoons >= TABLESPOONS_PER_QUARTER_CUP {
        quarter_cup_units += 1;
        tablespoons -= TABLESPOONS_PER_QUARTER_CUP;
    }

    let cups = u32::try_from(quarter_cup_units / QUARTER_CUPS_PER_CUP)
        .map_err(|_| ConversionError::TooLarge(ml))?;
    let quarter_cups = (quarter_cup_units % QUARTER_CUPS_PER_CUP) as u32;

    Ok(VolumeBreakdown {
        cups,
        quarter_cups,
        tablespoons,
        teaspoons,
    })
}

/// Recombine a volume breakdown into milliliters.
pub fn compose_volume(volume: &VolumeBreakdown) -> f64 {
    f64::from(volume.cups) * ML_PER_CUP
        + f64::from(volume.quarter_cups) * ML_PER_QUARTER_CUP
        + f64::from(volume.tablespoons) * ML_PER_TABLESPOON
        + volume.teaspoons * ML_PER_TEASPOON
}

/// Break a mass in grams into whole pounds and remaining ounces.
///
/// Masses of more than `u32::MAX` pounds are rejected with
/// [`ConversionError::TooLarge`].
pub fn decompose_mass(grams: f64) -> Result<MassBreakdown, ConversionError> {
    let grams = check_quantity(grams)?;

    let total_ounces = grams / GRAMS_PER_OUNCE;
    let pounds = (total_ounces / OUNCES_PER_POUND).floor();
    if pounds > f64::from(u32::MAX) {
        return Err(ConversionError::TooLarge(grams));
    }
    let ounces = (total_ounces - pounds * OUNCES_PER_POUND).max(0.0);

    Ok(MassBreakdown {
        pounds: pounds as u32,
        ounces,
    })
}

/// Recombine a mass breakdown into grams.
pub fn compose_mass(mass: &MassBreakdown) -> f64 {
    f64::from(mass.pounds) * OUNCES_PER_POUND * GRAMS_PER_OUNCE + mass.ounces * GRAMS_PER_OUNCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_volume_276ml() {
        let volume = decompose_volume(276.0).unwrap();
        assert_eq!(volume, VolumeBreakdown::new(1, 0, 1, 2.0));

        let composed = compose_volume(&volume);
        assert!((composed - 276.0).abs() <= 5.0, "composed = {}", composed);
    }

    #[test]
    fn test_decompose_volume_333ml() {
        // 5 quarter cups, 20.5 ml left: 1 tablespoon and ~0.99 teaspoon
        let volume = decompose_volume(333.0).unwrap();
        assert_eq!(volume, VolumeBreakdown::new(1, 1, 1, 1.0));
    }

    #[test]
    fn test_decompose_volume_zero() {
        let volume = decompose_volume(0.0).unwrap();
        assert!(volume.is_zero());
    }

    #[test]
    fn test_decompose_volume_exact_cups() {
        assert_eq!(
            decompose_volume(500.0).unwrap(),
            VolumeBreakdown::new(2, 0, 0, 0.0)
        );
        assert_eq!(
            decompose_volume(125.0).unwrap(),
            VolumeBreakdown::new(0, 2, 0, 0.0)
        );
    }

    #[test]
    fn test_decompose_volume_teaspoons_round_to_quarter() {
        // 1.1 teaspoons rounds to 1.0, 1.2 rounds to 1.25
        let volume = decompose_volume(1.1 * ML_PER_TEASPOON).unwrap();
        assert_eq!(volume.teaspoons, 1.0);
        let volume = decompose_volume(1.2 * ML_PER_TEASPOON).unwrap();
        assert_eq!(volume.teaspoons, 1.25);
    }

    #[test]
    fn test_decompose_volume_teaspoons_carry_into_tablespoon() {
        // 15 ml is just short of a 15.625 ml tablespoon but rounds to 3 teaspoons
        let volume = decompose_volume(15.0).unwrap();
        assert_eq!(volume, VolumeBreakdown::new(0, 0, 1, 0.0));
    }

    #[test]
    fn test_decompose_volume_tablespoons_carry_into_quarter_cup() {
        // 3 tablespoons + ~2.97 teaspoons rounds to a full quarter cup
        let volume = decompose_volume(62.3).unwrap();
        assert_eq!(volume, VolumeBreakdown::new(0, 1, 0, 0.0));

        // and a quarter cup short of a cup carries all the way up
        let volume = decompose_volume(249.9).unwrap();
        assert_eq!(volume, VolumeBreakdown::new(1, 0, 0, 0.0));
    }

    #[test]
    fn test_compose_volume() {
        let ml = compose_volume(&VolumeBreakdown::new(1, 2, 3, 0.5));
        let expected = 250.0 + 125.0 + 46.875 + 0.5 * ML_PER_TEASPOON;
        assert!((ml - expected).abs() < 1e-9);
    }

    #[test]
    fn test_decompose_volume_rejects_negative() {
        assert_eq!(
            decompose_volume(-1.0),
            Err(ConversionError::InvalidQuantity(-1.0))
        );
    }

    #[test]
    fn test_decompose_volume_rejects_non_finite() {
        assert!(decompose_volume(f64::NAN).is_err());
        assert!(decompose_volume(f64::INFINITY).is_err());
    }

    #[test]
    fn test_decompose_mass_250g() {
        let mass = decompose_mass(250.0).unwrap();
        assert_eq!(mass.pounds, 0);
        assert!((mass.ounces - 8.8185).abs() < 1e-3, "ounces = {}", mass.ounces);

        let composed = compose_mass(&mass);
        assert!((composed - 250.0).abs() < 1e-3);
    }

    #[test]
    fn test_decompose_mass_600g() {
        let mass = decompose_mass(600.0).unwrap();
        assert_eq!(mass.pounds, 1);
        assert!((mass.ounces - 5.1640).abs() < 1e-3, "ounces = {}", mass.ounces);
    }

    #[test]
    fn test_decompose_mass_rejects_negative() {
        assert_eq!(
            decompose_mass(-0.5),
            Err(ConversionError::InvalidQuantity(-0.5))
        );
    }

    #[test]
    fn test_compose_mass() {
        let grams = compose_mass(&MassBreakdown::new(2, 4.0));
        assert!((grams - 36.0 * GRAMS_PER_OUNCE).abs() < 1e-9);
    }

    #[test]
    fn test_decompose_rejects_amounts_beyond_unit_range() {
        assert_eq!(decompose_mass(1e15), Err(ConversionError::TooLarge(1e15)));
        assert_eq!(decompose_volume(1e15), Err(ConversionError::TooLarge(1e15)));
        assert_eq!(decompose_volume(f64::MAX), Err(ConversionError::TooLarge(f64::MAX)));
    }

    #[test]
    fn test_decompose_largest_representable_mass() {
        let grams = (f64::from(u32::MAX) - 0.5) * OUNCES_PER_POUND * GRAMS_PER_OUNCE;
        let mass = decompose_mass(grams).unwrap();
        assert_eq!(mass.pounds, u32::MAX - 1);
        assert!((mass.ounces - 8.0).abs() < 1e-3, "ounces = {}", mass.ounces);
    }
}
