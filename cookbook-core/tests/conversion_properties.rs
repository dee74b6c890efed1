//! Sweeps over the conversion engine checking round trips and idempotence.

use cookbook_core::conversions::{
    compose_mass, compose_volume, decompose_mass, decompose_volume, VolumeBreakdown,
};
use cookbook_core::display::{format_mass, format_volume};

/// 0 to 10000 in steps of 0.37, which hits many fractional remainders.
fn sweep() -> impl Iterator<Item = f64> {
    (0..27_027).map(|i| f64::from(i) * 0.37)
}

#[test]
fn test_volume_round_trip_within_five_ml() {
    for ml in sweep() {
        let volume = decompose_volume(ml).unwrap();
        let composed = compose_volume(&volume);
        assert!(
            (composed - ml).abs() <= 5.0,
            "{} ml decomposed to {:?} which composes to {}",
            ml,
            volume,
            composed
        );
    }
}

#[test]
fn test_volume_breakdown_is_canonical() {
    for ml in sweep() {
        let volume = decompose_volume(ml).unwrap();
        assert!(volume.quarter_cups <= 3, "{} ml: {:?}", ml, volume);
        assert!(volume.tablespoons <= 3, "{} ml: {:?}", ml, volume);
        assert!(
            (0.0..3.0).contains(&volume.teaspoons),
            "{} ml: {:?}",
            ml,
            volume
        );
        assert_eq!(
            (volume.teaspoons * 4.0).fract(),
            0.0,
            "{} ml: teaspoons not a quarter multiple",
            ml
        );
    }
}

#[test]
fn test_mass_round_trip_within_hundredth_gram() {
    for grams in sweep() {
        let mass = decompose_mass(grams).unwrap();
        let composed = compose_mass(&mass);
        assert!(
            (composed - grams).abs() <= 0.01,
            "{} g decomposed to {:?} which composes to {}",
            grams,
            mass,
            composed
        );
        assert!(mass.ounces >= 0.0 && mass.ounces < 16.0, "{} g: {:?}", grams, mass);
    }
}

#[test]
fn test_volume_decompose_compose_idempotent() {
    for cups in 0..=3 {
        for quarter_cups in 0..=3 {
            for tablespoons in 0..=3 {
                for quarters in 0..12 {
                    let original =
                        VolumeBreakdown::new(cups, quarter_cups, tablespoons, f64::from(quarters) / 4.0);
                    let again = decompose_volume(compose_volume(&original)).unwrap();
                    assert_eq!(again, original, "breakdown did not survive a round trip");
                }
            }
        }
    }
}

#[test]
fn test_display_never_fails_on_valid_input() {
    for amount in sweep().step_by(97) {
        for metric in [true, false] {
            assert!(!format_volume(metric, amount).unwrap().is_empty());
            assert!(!format_mass(metric, amount).unwrap().is_empty());
        }
    }
}
