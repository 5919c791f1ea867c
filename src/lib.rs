pub mod config;
pub mod constants;
pub mod error;
pub mod instance;
pub mod message;
pub mod output;
pub mod signal_processing;
pub mod table;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{FilterKind, FilterSpec, HofConfig};
pub use error::{FilterError, Result};
pub use instance::FilterInstance;
pub use message::ControlMessage;
pub use signal_processing::{BiquadFilter, BiquadShape, Filter, FirFilter, FrequencyResponse};
pub use table::{TableData, TableRegistry, TableSource};
