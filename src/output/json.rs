use serde_json::json;

use super::{CoefficientReport, Formatter, ResponsePoint};

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn coefficients(&self, label: &str, coefs: &CoefficientReport) -> String {
        json!({ "filter": label, "coefficients": coefs }).to_string()
    }

    fn response(&self, label: &str, point: &ResponsePoint) -> String {
        json!({
            "filter": label,
            "freq_hz": point.freq_hz,
            "magnitude_db": point.magnitude_db,
            "phase_rad": point.phase_rad,
        })
        .to_string()
    }

    fn sample(&self, label: &str, index: usize, value: f32) -> String {
        json!({ "filter": label, "n": index, "y": value }).to_string()
    }
}
