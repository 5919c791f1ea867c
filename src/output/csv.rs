use super::{CoefficientReport, Formatter, ResponsePoint};

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn coefficients(&self, label: &str, coefs: &CoefficientReport) -> String {
        match coefs {
            CoefficientReport::Biquad(c) => format!(
                "filter,b0,b1,b2,a1,a2\n{},{},{},{},{},{}",
                label, c.b0, c.b1, c.b2, c.a1, c.a2
            ),
            CoefficientReport::Fir { taps } => {
                let mut out = String::from("filter,k,h");
                for (k, h) in taps.iter().enumerate() {
                    out.push_str(&format!("\n{},{},{}", label, k, h));
                }
                out
            }
            CoefficientReport::None => String::from("filter,k,h"),
        }
    }

    fn response(&self, label: &str, point: &ResponsePoint) -> String {
        format!(
            "{},{},{:.6},{:.6}",
            label, point.freq_hz, point.magnitude_db, point.phase_rad
        )
    }

    fn sample(&self, label: &str, index: usize, value: f32) -> String {
        format!("{},{},{}", label, index, value)
    }

    fn response_header(&self) -> Option<&'static str> {
        Some("filter,freq_hz,magnitude_db,phase_rad")
    }

    fn sample_header(&self) -> Option<&'static str> {
        Some("filter,n,y")
    }
}
