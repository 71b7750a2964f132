//! Numeric conversion helpers centralizing money and weight casts.

use num_traits::cast::cast;

use crate::constants::CP_PER_GP;

/// Convert a gold-piece amount into copper, rounding to the nearest copper.
///
/// Returns `None` for negative or non-finite amounts so callers can treat
/// them as "not purchasable".
#[must_use]
pub fn gp_to_cp(gp: f64) -> Option<u64> {
    if !gp.is_finite() || gp < 0.0 {
        return None;
    }
    let per_gp = cast::<u64, f64>(CP_PER_GP).unwrap_or(100.0);
    cast::<f64, u64>((gp * per_gp).round())
}

/// Convert copper back to gold pieces for display and serialization.
#[must_use]
pub fn cp_to_gp(cp: u64) -> f64 {
    let whole = cast::<u64, f64>(cp / CP_PER_GP).unwrap_or(f64::MAX);
    let frac = cast::<u64, f64>(cp % CP_PER_GP).unwrap_or(0.0);
    let per_gp = cast::<u64, f64>(CP_PER_GP).unwrap_or(100.0);
    whole + frac / per_gp
}

/// Format copper as a gold string, e.g. `2,315 gp` or `12.5 gp`.
#[must_use]
pub fn format_gp(cp: u64) -> String {
    let whole = cp / CP_PER_GP;
    let frac = cp % CP_PER_GP;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if frac == 0 {
        format!("{grouped} gp")
    } else if frac % 10 == 0 {
        format!("{grouped}.{} gp", frac / 10)
    } else {
        format!("{grouped}.{frac:02} gp")
    }
}

/// Collection sizes used as sampling weights saturate instead of wrapping.
#[must_use]
pub fn weight_from_len(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gp_to_cp_rounds_and_rejects_invalid() {
        assert_eq!(gp_to_cp(12.5), Some(1_250));
        assert_eq!(gp_to_cp(0.01), Some(1));
        assert_eq!(gp_to_cp(0.0), Some(0));
        assert_eq!(gp_to_cp(-3.0), None);
        assert_eq!(gp_to_cp(f64::NAN), None);
        assert_eq!(gp_to_cp(f64::INFINITY), None);
    }

    #[test]
    fn cp_to_gp_keeps_fractions() {
        assert!((cp_to_gp(1_250) - 12.5).abs() < f64::EPSILON);
        assert!((cp_to_gp(7) - 0.07).abs() < 1e-9);
    }

    #[test]
    fn format_gp_groups_thousands() {
        assert_eq!(format_gp(231_500), "2,315 gp");
        assert_eq!(format_gp(1_250), "12.5 gp");
        assert_eq!(format_gp(7), "0.07 gp");
        assert_eq!(format_gp(100_000_000), "1,000,000 gp");
        assert_eq!(format_gp(0), "0 gp");
    }
}
