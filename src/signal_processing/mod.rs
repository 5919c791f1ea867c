pub mod biquad;
pub mod biquad_core;
pub mod coefficients;
pub mod filter;
pub mod fir;
pub mod fir_core;
pub mod math;

pub use biquad::{BiquadFilter, BiquadShape, Param};
pub use biquad_core::BiquadState;
pub use coefficients::BiquadCoefficients;
pub use filter::{Filter, FrequencyResponse};
pub use fir::FirFilter;
pub use fir_core::FirHistory;
pub use math::{
    clamp, clamp_frequency_ratio, clamp_gain, clamp_order, clamp_q, db_to_gain, gain_to_db,
};
