//! Double-precision reference implementations and test signals

use crate::signal_processing::{BiquadCoefficients, Filter};

/// `y(n) = Σ h(k)·x(n-k)` with `x(n < 0) = 0`, evaluated directly.
pub fn direct_convolution(taps: &[f32], input: &[f32]) -> Vec<f64> {
    (0..input.len())
        .map(|n| {
            taps.iter()
                .enumerate()
                .take(n + 1)
                .map(|(k, &h)| h as f64 * input[n - k] as f64)
                .sum()
        })
        .collect()
}

/// Direct-form I evaluation of a biquad from rest, with an explicit shift
/// register instead of ping-pong slots.
pub fn biquad_reference(coefs: &BiquadCoefficients, input: &[f32]) -> Vec<f64> {
    let (b0, b1, b2) = (coefs.b0 as f64, coefs.b1 as f64, coefs.b2 as f64);
    let (a1, a2) = (coefs.a1 as f64, coefs.a2 as f64);
    let (mut x1, mut x2, mut y1, mut y2) = (0.0, 0.0, 0.0, 0.0);

    input
        .iter()
        .map(|&x| {
            let x = x as f64;
            let y = b0 * x + b1 * x1 + b2 * x2 - a1 * y1 - a2 * y2;
            x2 = x1;
            x1 = x;
            y2 = y1;
            y1 = y;
            y
        })
        .collect()
}

/// Unit impulse of `len` samples.
pub fn impulse(len: usize) -> Vec<f32> {
    let mut signal = vec![0.0; len];
    if let Some(first) = signal.first_mut() {
        *first = 1.0;
    }
    signal
}

/// Deterministic broadband test signal.
pub fn chirp(len: usize) -> Vec<f32> {
    (0..len)
        .map(|n| {
            let t = n as f32;
            (0.001 * t * t).sin() * 0.5 + if n % 7 == 0 { 0.25 } else { -0.05 }
        })
        .collect()
}

/// Process `input` through `filter` in consecutive blocks of `block_size`.
pub fn run_blocks<F: Filter>(filter: &mut F, input: &[f32], block_size: usize) -> Vec<f32> {
    let mut output = vec![0.0; input.len()];
    for (block_in, block_out) in input.chunks(block_size).zip(output.chunks_mut(block_size)) {
        filter.process(block_in, block_out);
    }
    output
}
