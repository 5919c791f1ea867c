use super::coefficients::BiquadCoefficients;

/// Delay state shared by every second-order filter shape
///
/// Two ping-pong slots per direction instead of a shift register: the write
/// pointer toggles between 0 and 1 each sample, so slot `1 - wptr` always
/// holds the previous sample and slot `wptr` the one before it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BiquadState {
    feedforward: [f32; 2],
    feedback: [f32; 2],
    wptr: usize,
}

impl BiquadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one sample through the recurrence
    ///
    /// `y = x·b0 + x[n-1]·b1 + x[n-2]·b2 - y[n-1]·a1 - y[n-2]·a2`
    #[inline]
    pub fn tick(&mut self, coefs: &BiquadCoefficients, sample: f32) -> f32 {
        let rptr1 = self.wptr;
        let rptr0 = 1 - rptr1;

        let output = sample * coefs.b0
            + self.feedforward[rptr0] * coefs.b1
            + self.feedforward[rptr1] * coefs.b2
            - self.feedback[rptr0] * coefs.a1
            - self.feedback[rptr1] * coefs.a2;

        self.feedback[self.wptr] = output;
        self.feedforward[self.wptr] = sample;
        self.wptr = rptr0;

        output
    }

    /// Filter `input` into `output` in order
    pub fn process_block(&mut self, coefs: &BiquadCoefficients, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());
        for (out, &sample) in output.iter_mut().zip(input) {
            *out = self.tick(coefs, sample);
        }
    }

    /// Filter a buffer in-place
    pub fn process_buffer(&mut self, coefs: &BiquadCoefficients, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.tick(coefs, *sample);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
