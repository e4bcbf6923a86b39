//! Per-frame motion of the board.

/// Rotation added to the board on every frame, in radians.
pub const ROTATION_STEP: f64 = 0.01;

/// Peak vertical displacement of the bob, in scene units.
pub const BOB_AMPLITUDE: f32 = 0.1;

/// Bob angular rate per millisecond of host clock time.
pub const BOB_FREQUENCY: f64 = 0.001;

/// Vertical offset of the board at clock time `now_ms`.
///
/// Depends only on the clock reading; there is no phase carried between frames.
pub fn bob_offset(now_ms: f64) -> f32 {
    // f64 keeps precision for large clock readings before narrowing.
    (f64::from(BOB_AMPLITUDE) * (now_ms * BOB_FREQUENCY).sin()) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_bounded() {
        let mut t = -5_000.0;
        while t < 50_000.0 {
            let y = bob_offset(t);
            assert!((-BOB_AMPLITUDE..=BOB_AMPLITUDE).contains(&y), "t={t} y={y}");
            t += 7.3;
        }
    }

    #[test]
    fn offset_is_bounded_for_epoch_scale_clocks() {
        for t in [1.7e12, 1.7e12 + 0.5, 4.0e12, f64::from(u32::MAX)] {
            let y = bob_offset(t);
            assert!(y.abs() <= BOB_AMPLITUDE, "t={t} y={y}");
        }
    }

    #[test]
    fn offset_peaks_at_quarter_period() {
        let quarter = std::f64::consts::FRAC_PI_2 / BOB_FREQUENCY;
        assert_eq!(bob_offset(0.0), 0.0);
        assert!((bob_offset(quarter) - BOB_AMPLITUDE).abs() < 1e-6);
        assert!((bob_offset(3.0 * quarter) + BOB_AMPLITUDE).abs() < 1e-6);
    }
}
