use crate::constants::{
    MAX_FIR_ORDER, MAX_FREQ_RATIO, MAX_GAIN, MAX_Q, MIN_FREQ_RATIO, MIN_GAIN, MIN_Q,
};

/// Saturate `value` to `[min, max]`.
///
/// NaN is neither below `min` nor above `max` and is returned unchanged.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Normalized frequency `freq / sample_rate`, kept strictly inside (0, Nyquist).
///
/// Zero, negative and above-Nyquist frequencies saturate at the bounds, as do
/// zero or negative sample rates. A ratio with no direction at all (0/0, ∞/∞)
/// is treated as the lowest frequency.
pub fn clamp_frequency_ratio(freq: f32, sample_rate: f32) -> f32 {
    let ratio = freq / sample_rate;
    if ratio.is_nan() && !freq.is_nan() && !sample_rate.is_nan() {
        return MIN_FREQ_RATIO;
    }
    clamp(ratio, MIN_FREQ_RATIO, MAX_FREQ_RATIO)
}

/// Resonance bounded to `[ε, 1000 - ε]`.
pub fn clamp_q(q: f32) -> f32 {
    clamp(q, MIN_Q, MAX_Q)
}

/// Coefficient table length bounded to `[1, 65536]`.
pub fn clamp_order(order: usize) -> usize {
    order.clamp(1, MAX_FIR_ORDER)
}

/// Convert decibels to linear amplitude gain.
pub fn db_to_gain(db: f32) -> f32 {
    clamp(10.0f32.powf(db * 0.05), 0.0, f32::MAX)
}

/// Linear gain bounded to `[MIN_GAIN, MAX_GAIN]` for coefficient derivation.
pub fn clamp_gain(gain: f32) -> f32 {
    clamp(gain, MIN_GAIN, MAX_GAIN)
}

/// Convert linear amplitude gain to decibels.
///
/// The result never drops below `f32::MIN_POSITIVE`, so attenuating gains map
/// to a tiny positive value rather than a negative dB figure.
pub fn gain_to_db(gain: f32) -> f32 {
    clamp(20.0 * gain.log10(), f32::MIN_POSITIVE, f32::MAX)
}
