use num_complex::Complex64;
use std::fmt;
use std::str::FromStr;

use super::biquad_core::BiquadState;
use super::coefficients::{self, BiquadCoefficients};
use super::filter::{Filter, FrequencyResponse};
use crate::constants::{DEFAULT_DB, DEFAULT_FREQ, DEFAULT_Q, DEFAULT_SAMPLE_RATE};
use crate::error::{FilterError, Result};

/// A control-rate biquad parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// Resonance (dimensionless)
    Q,
    /// Cutoff or center frequency in Hz
    Freq,
    /// Shelf or peak gain in dB
    Db,
}

impl Param {
    pub fn name(&self) -> &'static str {
        match self {
            Param::Q => "Q",
            Param::Freq => "freq",
            Param::Db => "dB",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Param {
    type Err = FilterError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Q" | "q" => Ok(Param::Q),
            "freq" => Ok(Param::Freq),
            "dB" | "db" => Ok(Param::Db),
            other => Err(FilterError::InvalidMessage(format!(
                "unknown parameter '{}'",
                other
            ))),
        }
    }
}

/// The four second-order shapes and the raw (unclamped) parameters each owns
///
/// Shapes differ only in which parameters they carry and which coefficient
/// derivation they feed them to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BiquadShape {
    Allpass { q: f32, freq: f32 },
    Lowpass { q: f32, freq: f32 },
    Highshelf { db: f32, freq: f32 },
    Peak { q: f32, db: f32, freq: f32 },
}

impl BiquadShape {
    /// Allpass from ordered creation arguments `(Q, freq)`.
    pub fn allpass(args: &[f32]) -> Self {
        BiquadShape::Allpass {
            q: arg_or(args, 0, DEFAULT_Q),
            freq: arg_or(args, 1, DEFAULT_FREQ),
        }
    }

    /// Lowpass from ordered creation arguments `(Q, freq)`.
    pub fn lowpass(args: &[f32]) -> Self {
        BiquadShape::Lowpass {
            q: arg_or(args, 0, DEFAULT_Q),
            freq: arg_or(args, 1, DEFAULT_FREQ),
        }
    }

    /// Highshelf from ordered creation arguments `(dB, freq)`.
    pub fn highshelf(args: &[f32]) -> Self {
        BiquadShape::Highshelf {
            db: arg_or(args, 0, DEFAULT_DB),
            freq: arg_or(args, 1, DEFAULT_FREQ),
        }
    }

    /// Peak from ordered creation arguments `(Q, dB, freq)`.
    pub fn peak(args: &[f32]) -> Self {
        BiquadShape::Peak {
            q: arg_or(args, 0, DEFAULT_Q),
            db: arg_or(args, 1, DEFAULT_DB),
            freq: arg_or(args, 2, DEFAULT_FREQ),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BiquadShape::Allpass { .. } => "allpass",
            BiquadShape::Lowpass { .. } => "lowpass",
            BiquadShape::Highshelf { .. } => "highshelf",
            BiquadShape::Peak { .. } => "peak",
        }
    }

    /// Derive the full coefficient set for this shape at `sample_rate`.
    pub fn coefficients(&self, sample_rate: f32) -> BiquadCoefficients {
        match *self {
            BiquadShape::Allpass { q, freq } => coefficients::allpass(q, freq, sample_rate),
            BiquadShape::Lowpass { q, freq } => coefficients::lowpass(q, freq, sample_rate),
            BiquadShape::Highshelf { db, freq } => coefficients::highshelf(db, freq, sample_rate),
            BiquadShape::Peak { q, db, freq } => coefficients::peak(q, db, freq, sample_rate),
        }
    }

    /// Current raw value of `param`, if this shape has it.
    pub fn get(&self, param: Param) -> Option<f32> {
        let mut shape = *self;
        shape.slot(param).copied()
    }

    fn slot(&mut self, param: Param) -> Option<&mut f32> {
        match (self, param) {
            (BiquadShape::Allpass { q, .. }, Param::Q)
            | (BiquadShape::Lowpass { q, .. }, Param::Q)
            | (BiquadShape::Peak { q, .. }, Param::Q) => Some(q),
            (BiquadShape::Highshelf { db, .. }, Param::Db)
            | (BiquadShape::Peak { db, .. }, Param::Db) => Some(db),
            (BiquadShape::Allpass { freq, .. }, Param::Freq)
            | (BiquadShape::Lowpass { freq, .. }, Param::Freq)
            | (BiquadShape::Highshelf { freq, .. }, Param::Freq)
            | (BiquadShape::Peak { freq, .. }, Param::Freq) => Some(freq),
            _ => None,
        }
    }
}

fn arg_or(args: &[f32], index: usize, default: f32) -> f32 {
    args.get(index).copied().unwrap_or(default)
}

/// Second-order IIR filter: allpass, lowpass, highshelf or peak
///
/// Parameters are stored raw and clamped only when coefficients are derived.
/// Every setter recomputes the whole coefficient set synchronously, as does
/// announcing the sample rate; block processing only reads the coefficients.
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    shape: BiquadShape,
    sample_rate: f32,
    coefs: BiquadCoefficients,
    state: BiquadState,
}

impl BiquadFilter {
    /// Create a filter at the placeholder sample rate (44100 Hz).
    pub fn new(shape: BiquadShape) -> Self {
        Self::with_sample_rate(shape, DEFAULT_SAMPLE_RATE)
    }

    pub fn with_sample_rate(shape: BiquadShape, sample_rate: f32) -> Self {
        let mut filter = Self {
            shape,
            sample_rate,
            coefs: BiquadCoefficients::IDENTITY,
            state: BiquadState::new(),
        };
        filter.update_coefficients();
        filter
    }

    pub fn shape(&self) -> &BiquadShape {
        &self.shape
    }

    pub fn name(&self) -> &'static str {
        self.shape.name()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coefs
    }

    /// Set one parameter and recompute coefficients
    ///
    /// Any value is accepted and clamped during derivation.
    ///
    /// # Errors
    /// Returns `FilterError::UnsupportedParameter` if the shape has no such
    /// parameter (`Q` on a highshelf, `dB` on an allpass or lowpass). The
    /// filter is left untouched in that case.
    pub fn set(&mut self, param: Param, value: f32) -> Result<()> {
        let name = self.shape.name();
        let slot = self
            .shape
            .slot(param)
            .ok_or(FilterError::UnsupportedParameter {
                filter: name,
                param: param.name(),
            })?;
        *slot = value;
        self.update_coefficients();
        Ok(())
    }

    pub fn set_q(&mut self, q: f32) -> Result<()> {
        self.set(Param::Q, q)
    }

    pub fn set_freq(&mut self, freq: f32) -> Result<()> {
        self.set(Param::Freq, freq)
    }

    pub fn set_db(&mut self, db: f32) -> Result<()> {
        self.set(Param::Db, db)
    }

    /// Recompute the coefficient set from the current parameters
    ///
    /// A NaN parameter or sample rate yields a non-finite set; the previous
    /// set is kept so the delay state never takes on NaN.
    fn update_coefficients(&mut self) {
        let coefs = self.shape.coefficients(self.sample_rate);
        if !coefs.is_finite() {
            log::warn!(
                "{}: non-finite coefficients for {:?} at {} Hz, keeping previous set",
                self.shape.name(),
                self.shape,
                self.sample_rate
            );
            return;
        }
        self.coefs = coefs;
        log::trace!(
            "{} coefficients at {} Hz: {:?}",
            self.shape.name(),
            self.sample_rate,
            self.coefs
        );
    }
}

impl Filter for BiquadFilter {
    fn process(&mut self, input: &[f32], output: &mut [f32]) {
        let len = input.len().min(output.len());
        self.state
            .process_block(&self.coefs, &input[..len], &mut output[..len]);
    }

    fn process_buffer(&mut self, buffer: &mut [f32]) {
        self.state.process_buffer(&self.coefs, buffer);
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        log::debug!("{}: sample rate {} Hz", self.shape.name(), sample_rate);
        self.sample_rate = sample_rate;
        self.update_coefficients();
    }

    fn reset(&mut self) {
        self.state.reset();
    }
}

impl FrequencyResponse for BiquadFilter {
    fn frequency_response(&self, freq: f32, sample_rate: f32) -> Complex64 {
        self.coefs.frequency_response(freq, sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_creation_defaults() {
        assert_eq!(
            BiquadShape::allpass(&[]),
            BiquadShape::Allpass {
                q: DEFAULT_Q,
                freq: DEFAULT_FREQ
            }
        );
        assert_eq!(
            BiquadShape::peak(&[3.0]),
            BiquadShape::Peak {
                q: 3.0,
                db: DEFAULT_DB,
                freq: DEFAULT_FREQ
            }
        );
        assert_eq!(
            BiquadShape::highshelf(&[-6.0, 8000.0]),
            BiquadShape::Highshelf {
                db: -6.0,
                freq: 8000.0
            }
        );
    }

    #[test]
    fn test_get_reports_only_owned_parameters() {
        let peak = BiquadShape::peak(&[2.0, -3.0, 750.0]);
        assert_eq!(peak.get(Param::Q), Some(2.0));
        assert_eq!(peak.get(Param::Db), Some(-3.0));
        assert_eq!(peak.get(Param::Freq), Some(750.0));

        let shelf = BiquadShape::highshelf(&[4.0, 6000.0]);
        assert_eq!(shelf.get(Param::Q), None);
        assert_eq!(shelf.get(Param::Db), Some(4.0));

        for shape in [BiquadShape::allpass(&[0.5, 300.0]), BiquadShape::lowpass(&[0.5, 300.0])] {
            assert_eq!(shape.get(Param::Q), Some(0.5));
            assert_eq!(shape.get(Param::Freq), Some(300.0));
            assert_eq!(shape.get(Param::Db), None);
        }
    }

    #[test]
    fn test_new_uses_placeholder_rate() {
        let filter = BiquadFilter::new(BiquadShape::lowpass(&[]));
        assert_eq!(filter.sample_rate(), DEFAULT_SAMPLE_RATE);
        assert_eq!(
            *filter.coefficients(),
            coefficients::lowpass(DEFAULT_Q, DEFAULT_FREQ, DEFAULT_SAMPLE_RATE)
        );
    }

    #[test]
    fn test_setter_recomputes_whole_set() {
        let mut filter = BiquadFilter::new(BiquadShape::peak(&[]));
        filter.set_q(4.0).unwrap();
        filter.set_db(12.0).unwrap();
        filter.set_freq(3000.0).unwrap();
        assert_eq!(
            *filter.coefficients(),
            coefficients::peak(4.0, 12.0, 3000.0, DEFAULT_SAMPLE_RATE)
        );
    }

    #[test]
    fn test_setter_is_idempotent() {
        let mut filter = BiquadFilter::new(BiquadShape::highshelf(&[]));
        filter.set_db(7.5).unwrap();
        let first = *filter.coefficients();
        filter.set_db(7.5).unwrap();
        assert_eq!(first, *filter.coefficients());
    }

    #[test]
    fn test_unsupported_parameter_rejected() {
        let mut filter = BiquadFilter::new(BiquadShape::highshelf(&[3.0]));
        let before = *filter.coefficients();
        let err = filter.set_q(2.0).unwrap_err();
        assert_eq!(
            err,
            FilterError::UnsupportedParameter {
                filter: "highshelf",
                param: "Q"
            }
        );
        assert_eq!(before, *filter.coefficients());

        let mut filter = BiquadFilter::new(BiquadShape::lowpass(&[]));
        assert!(filter.set_db(6.0).is_err());
    }

    #[test]
    fn test_sample_rate_announcement_recomputes() {
        let mut filter = BiquadFilter::new(BiquadShape::allpass(&[2.0, 500.0]));
        filter.set_sample_rate(96000.0);
        assert_eq!(filter.sample_rate(), 96000.0);
        assert_eq!(
            *filter.coefficients(),
            coefficients::allpass(2.0, 500.0, 96000.0)
        );
    }

    #[test]
    fn test_out_of_range_parameters_are_clamped() {
        let mut filter = BiquadFilter::new(BiquadShape::lowpass(&[]));
        filter.set_freq(1e9).unwrap();
        filter.set_q(0.0).unwrap();
        assert!(filter.coefficients().is_finite());
        assert_eq!(filter.shape().get(Param::Freq), Some(1e9));
    }

    #[test]
    fn test_extreme_gain_recovers_after_restore() {
        for shape in [BiquadShape::peak(&[]), BiquadShape::highshelf(&[])] {
            for db in [-1000.0, 1000.0] {
                let mut filter = BiquadFilter::new(shape);
                filter.set_db(db).unwrap();
                assert!(filter.coefficients().is_finite(), "{} at {} dB", shape.name(), db);

                let mut buffer = [1.0, -0.5, 0.25, 0.0];
                filter.process_buffer(&mut buffer);
                assert!(buffer.iter().all(|y| y.is_finite()));

                filter.set_db(0.0).unwrap();
                let mut buffer = [0.5; 64];
                filter.process_buffer(&mut buffer);
                assert!(
                    buffer.iter().all(|y| y.is_finite()),
                    "{} after {} dB: {:?}",
                    shape.name(),
                    db,
                    buffer
                );
            }
        }
    }

    #[test]
    fn test_nan_parameter_keeps_previous_coefficients() {
        let mut filter = BiquadFilter::new(BiquadShape::lowpass(&[]));
        let before = *filter.coefficients();
        filter.set_freq(f32::NAN).unwrap();
        assert_eq!(*filter.coefficients(), before);

        let mut buffer = [1.0, 0.0, 0.0, 0.0];
        filter.process_buffer(&mut buffer);
        assert!(buffer.iter().all(|y| y.is_finite()));

        filter.set_freq(2000.0).unwrap();
        assert_eq!(
            *filter.coefficients(),
            coefficients::lowpass(DEFAULT_Q, 2000.0, DEFAULT_SAMPLE_RATE)
        );

        let filter = BiquadFilter::new(BiquadShape::peak(&[f32::NAN]));
        assert_eq!(*filter.coefficients(), BiquadCoefficients::IDENTITY);
    }

    #[test]
    fn test_lowpass_attenuates_above_cutoff() {
        let filter = BiquadFilter::with_sample_rate(BiquadShape::lowpass(&[]), 48000.0);
        assert_abs_diff_eq!(filter.magnitude_db(1000.0, 48000.0), -3.0103, epsilon = 0.01);
        assert!(filter.magnitude_db(10000.0, 48000.0) < -25.0);
        assert_abs_diff_eq!(filter.magnitude_db(10.0, 48000.0), 0.0, epsilon = 0.01);
    }

    #[test]
    fn test_peak_gain_at_center() {
        let filter = BiquadFilter::with_sample_rate(BiquadShape::peak(&[1.0, 9.0, 2000.0]), 48000.0);
        assert_abs_diff_eq!(filter.magnitude_db(2000.0, 48000.0), 9.0, epsilon = 0.01);
    }

    #[test]
    fn test_highshelf_plateau() {
        let filter = BiquadFilter::with_sample_rate(BiquadShape::highshelf(&[-12.0, 1000.0]), 48000.0);
        assert_abs_diff_eq!(filter.magnitude_db(20.0, 48000.0), 0.0, epsilon = 0.05);
        assert_abs_diff_eq!(filter.magnitude_db(20000.0, 48000.0), -12.0, epsilon = 0.1);
    }

    #[test]
    fn test_param_parsing() {
        assert_eq!("Q".parse::<Param>().unwrap(), Param::Q);
        assert_eq!("freq".parse::<Param>().unwrap(), Param::Freq);
        assert_eq!("dB".parse::<Param>().unwrap(), Param::Db);
        assert!("gain".parse::<Param>().is_err());
    }
}
