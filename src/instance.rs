use num_complex::Complex64;

use crate::config::{FilterKind, FilterSpec};
use crate::constants::{DEFAULT_DB, DEFAULT_FREQ, DEFAULT_Q};
use crate::error::{FilterError, Result};
use crate::message::ControlMessage;
use crate::signal_processing::{
    BiquadFilter, BiquadShape, Filter, FirFilter, FrequencyResponse, Param,
};
use crate::table::TableSource;

/// Any one of the five filter types
#[derive(Debug)]
pub enum FilterInstance {
    Biquad(BiquadFilter),
    Fir(FirFilter),
}

impl FilterInstance {
    /// Instantiate from ordered creation arguments
    ///
    /// Biquads read floats from `args` in their creation order; the FIR reads
    /// its table name from `table`.
    pub fn from_args(
        kind: FilterKind,
        args: &[f32],
        table: Option<&str>,
        tables: &impl TableSource,
    ) -> Self {
        match kind {
            FilterKind::Allpass => Self::biquad(BiquadShape::allpass(args)),
            FilterKind::Lowpass => Self::biquad(BiquadShape::lowpass(args)),
            FilterKind::Highshelf => Self::biquad(BiquadShape::highshelf(args)),
            FilterKind::Peak => Self::biquad(BiquadShape::peak(args)),
            FilterKind::Fir => FilterInstance::Fir(FirFilter::with_table(table, tables)),
        }
    }

    /// Instantiate from a configuration entry.
    pub fn from_spec(spec: &FilterSpec, tables: &impl TableSource) -> Self {
        let q = spec.q.unwrap_or(DEFAULT_Q);
        let db = spec.db.unwrap_or(DEFAULT_DB);
        let freq = spec.freq.unwrap_or(DEFAULT_FREQ);

        let shape = match spec.kind {
            FilterKind::Allpass => BiquadShape::Allpass { q, freq },
            FilterKind::Lowpass => BiquadShape::Lowpass { q, freq },
            FilterKind::Highshelf => BiquadShape::Highshelf { db, freq },
            FilterKind::Peak => BiquadShape::Peak { q, db, freq },
            FilterKind::Fir => {
                return FilterInstance::Fir(FirFilter::with_table(spec.table.as_deref(), tables));
            }
        };
        Self::biquad(shape)
    }

    fn biquad(shape: BiquadShape) -> Self {
        FilterInstance::Biquad(BiquadFilter::new(shape))
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            FilterInstance::Biquad(filter) => match filter.shape() {
                BiquadShape::Allpass { .. } => FilterKind::Allpass,
                BiquadShape::Lowpass { .. } => FilterKind::Lowpass,
                BiquadShape::Highshelf { .. } => FilterKind::Highshelf,
                BiquadShape::Peak { .. } => FilterKind::Peak,
            },
            FilterInstance::Fir(_) => FilterKind::Fir,
        }
    }

    /// Dispatch a control message to the matching setter
    ///
    /// # Errors
    /// `UnsupportedParameter` when the filter has no such parameter or
    /// message, or the FIR binding error for `set`.
    pub fn handle(&mut self, message: &ControlMessage, tables: &impl TableSource) -> Result<()> {
        match (self, message) {
            (FilterInstance::Biquad(filter), ControlMessage::Q(v)) => filter.set(Param::Q, *v),
            (FilterInstance::Biquad(filter), ControlMessage::Freq(v)) => {
                filter.set(Param::Freq, *v)
            }
            (FilterInstance::Biquad(filter), ControlMessage::Db(v)) => filter.set(Param::Db, *v),
            (FilterInstance::Fir(filter), ControlMessage::Set(name)) => {
                filter.set_table(name.as_deref(), tables).map(|_| ())
            }
            (instance, message) => Err(FilterError::UnsupportedParameter {
                filter: instance.name(),
                param: message.selector(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterInstance::Biquad(filter) => filter.name(),
            FilterInstance::Fir(_) => FilterKind::Fir.name(),
        }
    }

    pub fn as_biquad(&self) -> Option<&BiquadFilter> {
        match self {
            FilterInstance::Biquad(filter) => Some(filter),
            FilterInstance::Fir(_) => None,
        }
    }

    pub fn as_fir(&self) -> Option<&FirFilter> {
        match self {
            FilterInstance::Fir(filter) => Some(filter),
            FilterInstance::Biquad(_) => None,
        }
    }
}

impl Filter for FilterInstance {
    fn process(&mut self, input: &[f32], output: &mut [f32]) {
        match self {
            FilterInstance::Biquad(filter) => filter.process(input, output),
            FilterInstance::Fir(filter) => filter.process(input, output),
        }
    }

    fn process_buffer(&mut self, buffer: &mut [f32]) {
        match self {
            FilterInstance::Biquad(filter) => filter.process_buffer(buffer),
            FilterInstance::Fir(filter) => filter.process_buffer(buffer),
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        match self {
            FilterInstance::Biquad(filter) => filter.set_sample_rate(sample_rate),
            FilterInstance::Fir(filter) => filter.set_sample_rate(sample_rate),
        }
    }

    fn reset(&mut self) {
        match self {
            FilterInstance::Biquad(filter) => filter.reset(),
            FilterInstance::Fir(filter) => filter.reset(),
        }
    }
}

impl FrequencyResponse for FilterInstance {
    fn frequency_response(&self, freq: f32, sample_rate: f32) -> Complex64 {
        match self {
            FilterInstance::Biquad(filter) => filter.frequency_response(freq, sample_rate),
            FilterInstance::Fir(filter) => filter.frequency_response(freq, sample_rate),
        }
    }
}
