mod csv;
mod json;
mod text;

use serde::Serialize;

use crate::signal_processing::BiquadCoefficients;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Coefficients of one filter, as reported by the CLI
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CoefficientReport {
    Biquad(BiquadCoefficients),
    Fir { taps: Vec<f32> },
    None,
}

/// One point of a frequency response
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResponsePoint {
    pub freq_hz: f32,
    pub magnitude_db: f64,
    pub phase_rad: f64,
}

pub trait Formatter {
    fn coefficients(&self, label: &str, coefs: &CoefficientReport) -> String;

    fn response(&self, label: &str, point: &ResponsePoint) -> String;

    fn sample(&self, label: &str, index: usize, value: f32) -> String;

    fn response_header(&self) -> Option<&'static str> {
        None
    }

    fn sample_header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

/// Log-spaced frequency grid from `min_hz` to `max_hz` inclusive.
pub fn log_frequencies(min_hz: f32, max_hz: f32, points: usize) -> Vec<f32> {
    match points {
        0 => Vec::new(),
        1 => vec![min_hz],
        _ => {
            let (lo, hi) = (min_hz.ln(), max_hz.ln());
            let step = (hi - lo) / (points - 1) as f32;
            (0..points).map(|i| (lo + step * i as f32).exp()).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_log_frequencies_endpoints() {
        let grid = log_frequencies(20.0, 20000.0, 31);
        assert_eq!(grid.len(), 31);
        assert_relative_eq!(grid[0], 20.0, max_relative = 1e-5);
        assert_relative_eq!(grid[30], 20000.0, max_relative = 1e-5);
        assert_relative_eq!(grid[10], 200.0, max_relative = 1e-4);
        assert!(grid.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_log_frequencies_degenerate() {
        assert!(log_frequencies(20.0, 20000.0, 0).is_empty());
        assert_eq!(log_frequencies(20.0, 20000.0, 1), vec![20.0]);
    }

    #[test]
    fn test_formatters_cover_all_reports() {
        let reports = [
            CoefficientReport::Biquad(BiquadCoefficients::IDENTITY),
            CoefficientReport::Fir {
                taps: vec![0.5, 0.5],
            },
            CoefficientReport::None,
        ];
        for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Csv] {
            let formatter = create_formatter(format);
            for report in &reports {
                assert!(!formatter.coefficients("f", report).is_empty());
            }
        }
    }
}
