//! Analog stick calibration
//!
//! Sticks report 0-255 with 127 as the physical center. Samples within
//! [`DEADZONE`] of the center read as exactly 0.0, everything else is scaled
//! into -1.0..=1.0.

/// Center sample of a resting stick
pub const CENTER: i32 = 127;
/// Half-width of the band around [`CENTER`] that reads as zero
pub const DEADZONE: i32 = 8;
const SCALE: f64 = 128.0;

/// Maps a raw sample to `(raw, normalized)`.
///
/// Out-of-range samples are passed through unclamped.
pub fn calibrate(raw: i32) -> (i32, f64) {
    if (CENTER - DEADZONE..=CENTER + DEADZONE).contains(&raw) {
        return (raw, 0.0);
    }
    if raw > CENTER {
        return (raw, (f64::from(raw) - f64::from(CENTER)) / SCALE);
    }
    (raw, -(f64::from(CENTER + 1) - f64::from(raw)) / SCALE)
}

/// Both channels of one stick.
///
/// `x` < 0 is left, `y` < 0 is up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalogStick {
    pub x: f64,
    pub y: f64,
    pub x_raw: i32,
    pub y_raw: i32,
}

impl AnalogStick {
    /// Returns false, leaving the stick untouched, when the normalized value is unchanged
    pub fn set_x(&mut self, raw: i32) -> bool {
        update_channel(&mut self.x_raw, &mut self.x, raw)
    }

    pub fn set_y(&mut self, raw: i32) -> bool {
        update_channel(&mut self.y_raw, &mut self.y, raw)
    }
}

fn update_channel(stored_raw: &mut i32, stored: &mut f64, raw: i32) -> bool {
    let (raw, normalized) = calibrate(raw);
    if *stored == normalized {
        return false;
    }
    *stored_raw = raw;
    *stored = normalized;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn deadzone_bounds() {
        assert_eq!(calibrate(118).1, -10.0 / 128.0);
        assert_eq!(calibrate(119).1, 0.0);
        assert_eq!(calibrate(127).1, 0.0);
        assert_eq!(calibrate(135).1, 0.0);
        assert_eq!(calibrate(136).1, 9.0 / 128.0);
    }

    #[test]
    fn full_deflection() {
        assert_eq!(calibrate(0), (0, -1.0));
        assert_eq!(calibrate(255), (255, 1.0));
    }

    #[test]
    fn out_of_range_is_not_clamped() {
        assert_eq!(calibrate(300), (300, 173.0 / 128.0));
        assert_eq!(calibrate(-10), (-10, -138.0 / 128.0));
    }

    #[test]
    fn extreme_samples_keep_their_sign() {
        let (raw, n) = calibrate(i32::MIN);
        assert_eq!(raw, i32::MIN);
        assert_eq!(n, (f64::from(i32::MIN) - 128.0) / 128.0);
        assert!(n < -1.0);

        let (raw, n) = calibrate(i32::MAX);
        assert_eq!(raw, i32::MAX);
        assert_eq!(n, (f64::from(i32::MAX) - 127.0) / 128.0);
        assert!(n > 1.0);

        let mut stick = AnalogStick::default();
        assert!(stick.set_x(i32::MIN));
        assert!(stick.set_y(i32::MAX));
        assert!(stick.x < 0.0 && stick.y > 0.0);
    }

    #[test]
    fn same_sample_twice_reports_change_once() {
        let mut stick = AnalogStick::default();
        assert!(stick.set_x(40));
        assert!(!stick.set_x(40));
        assert!(stick.set_y(210));
        assert!(!stick.set_y(210));
    }

    #[test]
    fn leaving_deflection_into_deadzone_is_a_change() {
        let mut stick = AnalogStick::default();

        assert!(stick.set_x(200));
        assert_eq!(stick.x_raw, 200);
        assert_eq!(stick.x, 0.5703125);

        assert!(stick.set_x(128));
        assert_eq!(stick.x_raw, 128);
        assert_eq!(stick.x, 0.0);
    }

    #[test]
    fn deadzone_jitter_keeps_first_raw_sample() {
        let mut stick = AnalogStick::default();
        assert!(stick.set_y(20));
        assert!(stick.set_y(125));
        assert!(!stick.set_y(131));
        assert_eq!(stick.y_raw, 125);
    }

    #[test]
    fn channels_are_independent() {
        let mut stick = AnalogStick::default();
        stick.set_x(255);
        assert_eq!(stick.y, 0.0);
        assert_eq!(stick.y_raw, 0);
    }

    proptest! {
        #[test]
        fn deadzone_samples_never_report_change(a in 119i32..=135, b in 119i32..=135) {
            let mut stick = AnalogStick::default();
            stick.set_x(0);
            stick.set_x(a);
            prop_assert_eq!(stick.x, 0.0);
            prop_assert!(!stick.set_x(b));
            prop_assert_eq!(stick.x, 0.0);
        }

        #[test]
        fn above_deadzone_is_linear_and_increasing(v in 136i32..255) {
            let (_, n) = calibrate(v);
            prop_assert_eq!(n, f64::from(v - 127) / 128.0);
            prop_assert!(calibrate(v + 1).1 > n);
        }

        #[test]
        fn below_deadzone_is_linear_and_increasing(v in 0i32..118) {
            let (_, n) = calibrate(v);
            prop_assert_eq!(n, -f64::from(128 - v) / 128.0);
            prop_assert!(calibrate(v + 1).1 > n);
        }

        #[test]
        fn output_stays_in_unit_range(v in 0i32..=255) {
            let (raw, n) = calibrate(v);
            prop_assert_eq!(raw, v);
            prop_assert!((-1.0..=1.0).contains(&n));
        }
    }

    #[test]
    fn first_step_out_of_deadzone() {
        assert_eq!(calibrate(136).1 - calibrate(135).1, 9.0 / 128.0);
        assert_eq!(calibrate(118).1 - calibrate(119).1, -10.0 / 128.0);
    }
}
