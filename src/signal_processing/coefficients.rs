//! Second-order coefficient design
//!
//! Each shape maps (Q, gain, frequency, sample rate) to a normalized biquad
//! coefficient set through the bilinear transform, using the canonical
//! second-order filters from DAFX (2nd ed., p. 50). The prewarped frequency
//! term is `K = tan(π · f / fs)`; every other term is derived from `K` and `Q`
//! once and reused across the five coefficients.
//!
//! All derivations are pure and recompute the whole set; callers never patch
//! individual coefficients.

use num_complex::Complex64;
use serde::Serialize;
use std::f32::consts::{PI, SQRT_2};

use super::filter::FrequencyResponse;
use super::math::{clamp_frequency_ratio, clamp_gain, clamp_q, db_to_gain};

/// Normalized biquad coefficients (`a0` is always 1).
///
/// Transfer function:
/// `H(z) = (b0 + b1·z⁻¹ + b2·z⁻²) / (1 + a1·z⁻¹ + a2·z⁻²)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BiquadCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoefficients {
    /// Pass-through coefficient set.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    pub fn is_finite(&self) -> bool {
        [self.b0, self.b1, self.b2, self.a1, self.a2]
            .iter()
            .all(|c| c.is_finite())
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl FrequencyResponse for BiquadCoefficients {
    fn frequency_response(&self, freq: f32, sample_rate: f32) -> Complex64 {
        let omega = std::f64::consts::TAU * freq as f64 / sample_rate as f64;
        let z1 = Complex64::from_polar(1.0, -omega);
        let z2 = z1 * z1;
        let re = |c: f32| Complex64::new(c as f64, 0.0);
        (re(self.b0) + re(self.b1) * z1 + re(self.b2) * z2)
            / (re(1.0) + re(self.a1) * z1 + re(self.a2) * z2)
    }
}

/// Prewarped frequency term of the bilinear transform.
fn prewarp(freq: f32, sample_rate: f32) -> f32 {
    (PI * clamp_frequency_ratio(freq, sample_rate)).tan()
}

/// Second-order allpass: unity magnitude, phase rotates through -360° around
/// `freq` with a slope set by `q`.
pub fn allpass(q: f32, freq: f32, sample_rate: f32) -> BiquadCoefficients {
    let q = clamp_q(q);
    let k = prewarp(freq, sample_rate);
    let kkq = k * k * q;
    let r_denominator = 1.0 / (kkq + k + q);

    let outer = ((kkq - k) + q) * r_denominator;
    let middle = 2.0 * (kkq - q) * r_denominator;

    BiquadCoefficients {
        b0: outer,
        b1: middle,
        b2: 1.0,
        a1: middle,
        a2: outer,
    }
}

/// Second-order lowpass with resonance `q` (Butterworth at 1/√2).
pub fn lowpass(q: f32, freq: f32, sample_rate: f32) -> BiquadCoefficients {
    let q = clamp_q(q);
    let k = prewarp(freq, sample_rate);
    let kkq = k * k * q;
    let r_denominator = 1.0 / (kkq + k + q);

    let b0 = kkq * r_denominator;

    BiquadCoefficients {
        b0,
        b1: 2.0 * kkq * r_denominator,
        b2: b0,
        a1: 2.0 * (kkq - q) * r_denominator,
        a2: ((kkq - k) + q) * r_denominator,
    }
}

/// Second-order high shelf, boosting or cutting everything above `freq` by
/// `db`.
///
/// Boost (`G > 1`) and cut (`G <= 1`) use different denominators so the poles
/// stay put for boosts and the zeros stay put for cuts. 0 dB takes the cut
/// branch, which reduces to a pass-through.
pub fn highshelf(db: f32, freq: f32, sample_rate: f32) -> BiquadCoefficients {
    let g = clamp_gain(db_to_gain(db));
    let k = prewarp(freq, sample_rate);
    let g2 = 2.0 * g;
    let kk = k * k;
    let sqrt_2g_k = g2.sqrt() * k;
    let sqrt_2_k = SQRT_2 * k;

    if g > 1.0 {
        let r_denominator = 1.0 / (1.0 + sqrt_2_k + kk);

        BiquadCoefficients {
            b0: (g + sqrt_2g_k + kk) * r_denominator,
            b1: 2.0 * (kk - g) * r_denominator,
            b2: (g - sqrt_2g_k + kk) * r_denominator,
            a1: 2.0 * (kk - 1.0) * r_denominator,
            a2: (1.0 - sqrt_2_k + kk) * r_denominator,
        }
    } else {
        let r_denominator = 1.0 / (1.0 + sqrt_2g_k + g * kk);

        BiquadCoefficients {
            b0: g * (1.0 + sqrt_2_k + kk) * r_denominator,
            b1: g2 * (kk - 1.0) * r_denominator,
            b2: g * (1.0 - sqrt_2_k + kk) * r_denominator,
            a1: (g2 * kk - 2.0) * r_denominator,
            a2: (1.0 - sqrt_2g_k + g * kk) * r_denominator,
        }
    }
}

/// Second-order peaking filter centered on `freq`, `db` high, `q` wide.
///
/// `b1 == a1` in both branches; 0 dB takes the cut branch.
pub fn peak(q: f32, db: f32, freq: f32, sample_rate: f32) -> BiquadCoefficients {
    let q = clamp_q(q);
    let g = clamp_gain(db_to_gain(db));
    let k = prewarp(freq, sample_rate);
    let kk = k * k;
    let k_r_q = k / q;

    if g > 1.0 {
        let kg_r_q = g * k_r_q;
        let r_denominator = 1.0 / (1.0 + k_r_q + kk);
        let b1 = 2.0 * (kk - 1.0) * r_denominator;

        BiquadCoefficients {
            b0: (1.0 + kg_r_q + kk) * r_denominator,
            b1,
            b2: (1.0 - kg_r_q + kk) * r_denominator,
            a1: b1,
            a2: (1.0 - k_r_q + kk) * r_denominator,
        }
    } else {
        let k_r_qg = k_r_q / g;
        let r_denominator = 1.0 / (1.0 + k_r_qg + kk);
        let b1 = 2.0 * (kk - 1.0) * r_denominator;

        BiquadCoefficients {
            b0: (1.0 + k_r_q + kk) * r_denominator,
            b1,
            b2: (1.0 - k_r_q + kk) * r_denominator,
            a1: b1,
            a2: (1.0 - k_r_qg + kk) * r_denominator,
        }
    }
}
