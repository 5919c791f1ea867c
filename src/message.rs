//! Textual control messages
//!
//! One selector and one argument, as a patching host sends them:
//!
//! ```
//! use hofilter::message::ControlMessage;
//!
//! let msg: ControlMessage = "freq 440".parse().unwrap();
//! assert_eq!(msg, ControlMessage::Freq(440.0));
//! let msg: ControlMessage = "set taps".parse().unwrap();
//! assert_eq!(msg, ControlMessage::Set(Some("taps".to_string())));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::FilterError;
use crate::signal_processing::Param;

#[derive(Debug, Clone, PartialEq)]
pub enum ControlMessage {
    /// `Q <float>`
    Q(f32),
    /// `freq <float>`
    Freq(f32),
    /// `dB <float>`
    Db(f32),
    /// `set [table-name]`
    Set(Option<String>),
}

impl ControlMessage {
    pub fn selector(&self) -> &'static str {
        match self {
            ControlMessage::Q(_) => Param::Q.name(),
            ControlMessage::Freq(_) => Param::Freq.name(),
            ControlMessage::Db(_) => Param::Db.name(),
            ControlMessage::Set(_) => "set",
        }
    }
}

impl fmt::Display for ControlMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlMessage::Q(v) | ControlMessage::Freq(v) | ControlMessage::Db(v) => {
                write!(f, "{} {}", self.selector(), v)
            }
            ControlMessage::Set(Some(name)) => write!(f, "set {}", name),
            ControlMessage::Set(None) => f.write_str("set"),
        }
    }
}

impl FromStr for ControlMessage {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let selector = parts
            .next()
            .ok_or_else(|| FilterError::InvalidMessage("empty message".to_string()))?;
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(FilterError::InvalidMessage(format!(
                "too many arguments: {}",
                s.trim()
            )));
        }

        if selector == "set" {
            return Ok(ControlMessage::Set(arg.map(str::to_string)));
        }

        let param: Param = selector.parse()?;
        let value: f32 = arg
            .ok_or_else(|| FilterError::InvalidMessage(format!("{} needs a value", selector)))?
            .parse()
            .map_err(|_| FilterError::InvalidMessage(format!("bad value: {}", s.trim())))?;

        Ok(match param {
            Param::Q => ControlMessage::Q(value),
            Param::Freq => ControlMessage::Freq(value),
            Param::Db => ControlMessage::Db(value),
        })
    }
}
