//! `salatr methods`: list the calculation method presets.

use crate::engine::{AsrMethod, CalculationMethod, HighLatitudeAdjustment, IshaRule};

/// Table row for a method: key, authority and angles.
pub fn method_row(method: &CalculationMethod) -> String {
    let isha = match method.isha_rule() {
        IshaRule::Angle(angle) => format!("Isha {angle:>4.1}°"),
        IshaRule::FixedOffset => "Isha Maghrib + 90 min".to_string(),
    };
    format!(
        "{:<9} Fajr {:>4.1}°  {:<22} {}",
        method.key(),
        method.fajr_angle(),
        isha,
        method.long_name()
    )
}

pub fn handle_methods_command() {
    log_version!();
    log_block_start!("Calculation methods (method = \"...\"):");
    for method in CalculationMethod::PRESETS.iter() {
        log_indented!("{}", method_row(method));
    }
    log_indented!("custom    uses fajr_angle and isha_angle (no isha_angle = Maghrib + 90 min)");

    log_block_start!("Asr methods (asr_method = \"...\"):");
    for asr in [AsrMethod::Standard, AsrMethod::Hanafi] {
        log_indented!("{:<9} {}", asr.key(), asr.label());
    }

    log_block_start!("High latitude adjustments (high_latitude_adjustment = \"...\"):");
    for mode in [
        HighLatitudeAdjustment::NightMiddle,
        HighLatitudeAdjustment::NightSeventh,
        HighLatitudeAdjustment::Angle,
    ] {
        log_indented!("{:<13} {}", mode.key(), mode.label());
    }
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_rows() {
        let mwl = method_row(&CalculationMethod::Mwl);
        assert!(mwl.starts_with("mwl"));
        assert!(mwl.contains("Fajr 18.0°"));
        assert!(mwl.contains("Isha 17.0°"));
        assert!(mwl.ends_with("Muslim World League (London)"));

        let makkah = method_row(&CalculationMethod::Makkah);
        assert!(makkah.contains("Fajr 18.5°"));
        assert!(makkah.contains("Isha Maghrib + 90 min"));
    }

    #[test]
    fn test_every_preset_has_a_row() {
        let keys: Vec<String> = CalculationMethod::PRESETS
            .iter()
            .map(|m| method_row(m).split_whitespace().next().unwrap().to_string())
            .collect();
        assert_eq!(
            keys,
            ["mwl", "egypt", "france", "isna", "karachi", "turkey", "makkah", "malaysia", "russia"]
        );
    }
}
