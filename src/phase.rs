//! Lunar phase approximation from a timestamp.
//!
//! This is a stylized model: elapsed time since a reference new moon is
//! folded into one synodic period and swept through |sin|, giving a
//! symmetric 0 -> 1 -> 0 curve per cycle. It conflates phase angle with
//! brightness and ignores orbital eccentricity, which is exactly the level
//! of fidelity the lighting toy needs.

use std::time::{SystemTime, UNIX_EPOCH};

/// Length of one synodic lunar period, in seconds.
pub const LUNAR_PERIOD_SECS: f64 = 2_551_443.0;

/// Reference new moon: 2000-01-06T18:14:00Z, as Unix seconds.
pub const NEW_MOON_EPOCH_UNIX_SECS: f64 = 947_182_440.0;

/// Approximate lunar phase for a Unix timestamp, in [0, 1].
/// 0 is a new moon, 1 the peak of the sweep half a period later.
pub fn lunar_phase(unix_secs: f64) -> f32 {
    let elapsed = (unix_secs - NEW_MOON_EPOCH_UNIX_SECS) % LUNAR_PERIOD_SECS;
    ((elapsed / LUNAR_PERIOD_SECS) * std::f64::consts::PI).sin().abs() as f32
}

/// Lunar phase at the current wall-clock time.
pub fn phase_now() -> f32 {
    let unix_secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    lunar_phase(unix_secs)
}
