//! Numeric value formatting with unit suffixes

use crate::directives::{FormatConfig, Unit};

pub const DEFAULT_DECIMALS: usize = 4;

/// Render a number without float noise.
///
/// Integers print without a decimal point; everything else is rounded to
/// `decimals` places with trailing zeros (and a dangling `.`) stripped.
/// Non-finite values print as `Infinity`, `-Infinity` and `NaN`.
pub fn clean(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 {
        return format!("{}", value);
    }

    let fixed = format!("{:.*}", decimals, value);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };

    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// [`clean`] with the default precision
pub fn clean_default(value: f64) -> String {
    clean(value, DEFAULT_DECIMALS)
}

/// Render `value` in the unit selected by `config`
pub fn format(value: f64, config: &FormatConfig) -> String {
    match config.unit {
        Unit::None => clean_default(value),
        Unit::Rem => format!("{}{}", clean_default(value / config.rem_base), Unit::Rem.suffix()),
        unit @ (Unit::Px | Unit::Em | Unit::Percent | Unit::Ms | Unit::S) => {
            format!("{}{}", clean_default(value), unit.suffix())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(unit: Unit) -> FormatConfig {
        FormatConfig {
            unit,
            ..FormatConfig::default()
        }
    }

    #[test]
    fn test_clean_integers() {
        assert_eq!(clean_default(16.0), "16");
        assert_eq!(clean_default(-4.0), "-4");
        assert_eq!(clean_default(0.0), "0");
        assert_eq!(clean_default(-0.0), "0");
    }

    #[test]
    fn test_clean_fractions() {
        assert_eq!(clean_default(1.5), "1.5");
        assert_eq!(clean_default(0.1 + 0.2), "0.3");
        assert_eq!(clean_default(1.23456), "1.2346");
        assert_eq!(clean(1.23456, 2), "1.23");
        assert_eq!(clean_default(2.00001), "2");
        assert_eq!(clean_default(-0.00001), "0");
    }

    #[test]
    fn test_clean_non_finite() {
        assert_eq!(clean_default(f64::INFINITY), "Infinity");
        assert_eq!(clean_default(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(clean_default(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format(12.0, &config(Unit::None)), "12");
        assert_eq!(format(12.0, &config(Unit::Px)), "12px");
        assert_eq!(format(1.25, &config(Unit::Em)), "1.25em");
        assert_eq!(format(50.0, &config(Unit::Percent)), "50%");
        assert_eq!(format(200.0, &config(Unit::Ms)), "200ms");
        assert_eq!(format(0.3, &config(Unit::S)), "0.3s");
    }

    #[test]
    fn test_format_rem_uses_base() {
        assert_eq!(format(24.0, &config(Unit::Rem)), "1.5rem");
        let custom = FormatConfig {
            unit: Unit::Rem,
            rem_base: 20.0,
            ..FormatConfig::default()
        };
        assert_eq!(format(10.0, &custom), "0.5rem");
        assert_eq!(format(10.0, &config(Unit::Rem)), "0.625rem");
    }

    #[test]
    fn test_px_matches_clean() {
        for value in [0.0, 1.0, 2.5, 13.3333333, -7.125, 1e6] {
            assert_eq!(format(value, &config(Unit::Px)), format!("{}px", clean_default(value)));
        }
    }
}
