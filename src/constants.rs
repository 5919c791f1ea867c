//! Filter defaults and parameter bounds
//!
//! These constants define the default creation parameters shared by every
//! filter type and the ranges that control-rate parameters are clamped to
//! before coefficients are derived.

/// Default resonance: Butterworth (1/√2).
pub const DEFAULT_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Default cutoff / center frequency in Hz.
pub const DEFAULT_FREQ: f32 = 1000.0;

/// Default shelf / peak gain in dB.
pub const DEFAULT_DB: f32 = 0.0;

/// Sample rate assumed until the host announces the running rate.
pub const DEFAULT_SAMPLE_RATE: f32 = 44100.0;

/// Default host block size in samples.
pub const DEFAULT_BLOCK_SIZE: usize = 64;

/// Lowest frequency/sample-rate ratio handed to the bilinear transform.
pub const MIN_FREQ_RATIO: f32 = f32::EPSILON;

/// Highest frequency/sample-rate ratio (just below Nyquist).
pub const MAX_FREQ_RATIO: f32 = 0.5 - f32::EPSILON;

/// Lowest resonance. Keeps `K / Q` and the allpass/lowpass denominators finite.
pub const MIN_Q: f32 = f32::EPSILON;

/// Highest resonance.
pub const MAX_Q: f32 = 1000.0 - f32::EPSILON;

/// Lowest linear gain handed to the shelf and peak derivations (-400 dB).
/// Keeps `K / (Q·G)` finite in the peak cut branch.
pub const MIN_GAIN: f32 = 1e-20;

/// Highest linear gain handed to the shelf and peak derivations (+400 dB).
/// Keeps `2·(K² - G)` and `K·G / Q` finite in the boost branches.
pub const MAX_GAIN: f32 = 1e20;

/// Longest coefficient table an FIR filter will convolve with.
pub const MAX_FIR_ORDER: usize = 65536;
