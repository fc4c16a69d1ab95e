use crate::error::CoreError;

/// Base of the logarithmic level curve. Level `L` spans the XP band
/// `(1.5^(L-1) - 1, 1.5^L - 1]`.
pub const XP_LOG_BASE: f64 = 1.5;

/// Level for an accumulated XP total. Monotonic non-decreasing;
/// `level_for_xp(0) == 1`. Negative XP is rejected rather than clamped so
/// upstream accounting bugs surface instead of hiding.
pub fn level_for_xp(xp: i64) -> Result<i64, CoreError> {
    if xp < 0 {
        return Err(CoreError::InvalidArgument(format!(
            "xp must be non-negative, got {xp}"
        )));
    }

    let raw = ((xp as f64) + 1.0).ln() / XP_LOG_BASE.ln();
    Ok(raw.floor() as i64 + 1)
}

/// XP ceiling of a level's band: `1.5^level - 1`. Fractional for level >= 2;
/// `level_for_xp(threshold.floor())` lands back on the same level.
pub fn xp_threshold_for_level(level: i64) -> Result<f64, CoreError> {
    if level < 1 {
        return Err(CoreError::InvalidArgument(format!(
            "level must be at least 1, got {level}"
        )));
    }

    Ok(XP_LOG_BASE.powf(level as f64) - 1.0)
}

/// Fraction of the way through the current level band, clamped to [0, 1].
/// Display only; never persisted.
pub fn progress_to_next_level(xp: i64) -> Result<f64, CoreError> {
    let level = level_for_xp(xp)?;
    let band_floor = if level == 1 {
        0.0
    } else {
        xp_threshold_for_level(level - 1)?
    };
    let band_ceiling = xp_threshold_for_level(level)?;

    let span = band_ceiling - band_floor;
    if span <= 0.0 {
        return Ok(0.0);
    }

    Ok(((xp as f64 - band_floor) / span).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::{level_for_xp, progress_to_next_level, xp_threshold_for_level};
    use crate::error::CoreError;

    #[test]
    fn zero_xp_is_level_one() {
        assert_eq!(level_for_xp(0).unwrap(), 1);
    }

    #[test]
    fn negative_xp_is_rejected() {
        assert!(matches!(
            level_for_xp(-1),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            level_for_xp(i64::MIN),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn level_is_monotonic_in_xp() {
        let mut previous = 0;
        for xp in 0..=5_000 {
            let level = level_for_xp(xp).unwrap();
            assert!(level >= previous, "level dropped at xp {xp}");
            previous = level;
        }
    }

    #[test]
    fn threshold_round_trips_through_level() {
        for level in 1..=60 {
            let threshold = xp_threshold_for_level(level).unwrap();
            let xp = threshold.floor() as i64;
            assert_eq!(
                level_for_xp(xp).unwrap(),
                level,
                "round trip failed at level {level} (xp {xp})"
            );
        }
    }

    #[test]
    fn threshold_rejects_level_below_one() {
        assert!(matches!(
            xp_threshold_for_level(0),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn golden_values_for_base_one_point_five() {
        // ln(11) / ln(1.5) = 5.913..., so 10 XP lands on level 6.
        assert_eq!(level_for_xp(10).unwrap(), 6);
        // Band for level 6 is (6.59375, 10.390625]; 10 XP is 218/243 through it.
        let progress = progress_to_next_level(10).unwrap();
        assert!((progress - 218.0 / 243.0).abs() < 1e-12);
    }

    #[test]
    fn progress_is_zero_at_zero_xp() {
        assert_eq!(progress_to_next_level(0).unwrap(), 0.0);
    }

    #[test]
    fn progress_stays_within_unit_interval() {
        for xp in 0..=2_000 {
            let progress = progress_to_next_level(xp).unwrap();
            assert!((0.0..=1.0).contains(&progress), "progress {progress} at xp {xp}");
        }
    }
}
