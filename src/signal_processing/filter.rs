use num_complex::Complex64;

/// Common trait for block-processing audio filters
///
/// Implemented by `BiquadFilter`, `FirFilter` and `FilterInstance`.
/// Block processing never allocates.
pub trait Filter {
    /// Filter `input` into `output`, sample by sample, carrying delay state
    /// across calls. Both slices are expected to have the same length; only
    /// the common prefix is processed.
    fn process(&mut self, input: &[f32], output: &mut [f32]);

    /// Filter a buffer of samples in-place
    fn process_buffer(&mut self, buffer: &mut [f32]);

    /// Called once the host knows the running sample rate.
    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    /// Clear delay state, keeping coefficients.
    fn reset(&mut self);
}

/// Evaluation of a filter's transfer function on the unit circle
pub trait FrequencyResponse {
    /// Complex response `H(e^{jω})` at `freq` Hz.
    fn frequency_response(&self, freq: f32, sample_rate: f32) -> Complex64;

    /// Linear magnitude at `freq` Hz.
    fn magnitude(&self, freq: f32, sample_rate: f32) -> f64 {
        self.frequency_response(freq, sample_rate).norm()
    }

    /// Magnitude in dB at `freq` Hz.
    fn magnitude_db(&self, freq: f32, sample_rate: f32) -> f64 {
        20.0 * self.magnitude(freq, sample_rate).log10()
    }

    /// Phase in radians at `freq` Hz.
    fn phase(&self, freq: f32, sample_rate: f32) -> f64 {
        self.frequency_response(freq, sample_rate).arg()
    }
}
