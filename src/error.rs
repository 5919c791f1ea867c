use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("{0}: no such array")]
    TableNotFound(String),

    #[error("{0}: bad array template for fir~")]
    BadTableTemplate(String),

    #[error("{0}: array is empty")]
    EmptyTable(String),

    #[error("not enough memory for fir~")]
    OutOfMemory,

    #[error("{filter} has no parameter '{param}'")]
    UnsupportedParameter {
        filter: &'static str,
        param: &'static str,
    },

    #[error("Invalid control message: {0}")]
    InvalidMessage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
