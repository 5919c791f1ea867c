use super::{CoefficientReport, Formatter, ResponsePoint};

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn coefficients(&self, label: &str, coefs: &CoefficientReport) -> String {
        match coefs {
            CoefficientReport::Biquad(c) => format!(
                "{}:\n  b0 = {:>12.9}\n  b1 = {:>12.9}\n  b2 = {:>12.9}\n  a1 = {:>12.9}\n  a2 = {:>12.9}",
                label, c.b0, c.b1, c.b2, c.a1, c.a2
            ),
            CoefficientReport::Fir { taps } => {
                let mut out = format!("{}: order {}", label, taps.len());
                for (k, h) in taps.iter().enumerate() {
                    out.push_str(&format!("\n  h[{}] = {:>12.9}", k, h));
                }
                out
            }
            CoefficientReport::None => format!("{}: no coefficients (output muted)", label),
        }
    }

    fn response(&self, label: &str, point: &ResponsePoint) -> String {
        format!(
            "{}: {:>10.1} Hz {:>9.3} dB {:>7.3} rad",
            label, point.freq_hz, point.magnitude_db, point.phase_rad
        )
    }

    fn sample(&self, label: &str, index: usize, value: f32) -> String {
        format!("{}: [{:>5}] {:>14.9}", label, index, value)
    }
}
