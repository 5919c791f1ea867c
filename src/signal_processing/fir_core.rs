use crate::error::{FilterError, Result};

/// Circular input history for nth-order FIR convolution
///
/// Holds the most recent `order` input samples. `pos` is the slot the next
/// sample will be written to, which is also the oldest sample held. The tap
/// coefficients are not owned here; they are passed to every call so the
/// caller can borrow them from wherever they live.
#[derive(Debug, Clone, PartialEq)]
pub struct FirHistory {
    delay_line: Vec<f32>,
    pos: usize,
}

impl FirHistory {
    /// Allocate a zeroed history of `order` samples
    ///
    /// # Errors
    /// Returns `FilterError::OutOfMemory` if the buffer cannot be allocated.
    pub fn zeroed(order: usize) -> Result<Self> {
        let mut delay_line = Vec::new();
        delay_line
            .try_reserve_exact(order)
            .map_err(|_| FilterError::OutOfMemory)?;
        delay_line.resize(order, 0.0);
        Ok(Self { delay_line, pos: 0 })
    }

    /// Number of samples held (the filter order)
    pub fn order(&self) -> usize {
        self.delay_line.len()
    }

    /// Resize the history to `order` samples
    ///
    /// The most recent `min(old, new)` samples are kept in chronological
    /// order; slots older than anything captured start at zero.
    ///
    /// # Errors
    /// Returns `FilterError::OutOfMemory` if growing fails. The history is
    /// left unchanged in that case.
    pub fn resize(&mut self, order: usize) -> Result<()> {
        let old = self.order();
        if order > old {
            self.delay_line
                .try_reserve_exact(order - old)
                .map_err(|_| FilterError::OutOfMemory)?;
        }

        // oldest .. newest
        self.delay_line.rotate_left(self.pos);

        if order > old {
            self.delay_line.resize(order, 0.0);
            self.delay_line.rotate_right(order - old);
        } else {
            self.delay_line.drain(..old - order);
        }
        self.pos = 0;
        Ok(())
    }

    /// Convolve one sample: `y = Σ h[k]·x[n-k]`
    ///
    /// Taps beyond the order are ignored. With an empty history, or fewer
    /// taps than the order, the output is silence and the history is left
    /// untouched.
    #[inline]
    pub fn process(&mut self, taps: &[f32], sample: f32) -> f32 {
        let n = self.delay_line.len();
        if n == 0 || taps.len() < n {
            return 0.0;
        }

        let mut output = taps[0] * sample;

        // Walk the ring backwards from the newest sample in two contiguous
        // ranges instead of taking a modulo per tap. Slot `pos` holds the
        // sample about to fall out of the window and is skipped.
        let mut tap_i = 1usize;
        for delay_idx in (0..self.pos).rev() {
            output += taps[tap_i] * self.delay_line[delay_idx];
            tap_i += 1;
        }
        for delay_idx in ((self.pos + 1)..n).rev() {
            output += taps[tap_i] * self.delay_line[delay_idx];
            tap_i += 1;
        }

        self.delay_line[self.pos] = sample;
        self.pos += 1;
        if self.pos == n {
            self.pos = 0;
        }
        output
    }

    /// Convolve `input` into `output` in order
    pub fn process_block(&mut self, taps: &[f32], input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());
        for (out, &sample) in output.iter_mut().zip(input) {
            *out = self.process(taps, sample);
        }
    }

    /// Convolve a buffer in-place
    pub fn process_buffer(&mut self, taps: &[f32], buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(taps, *sample);
        }
    }

    pub fn reset(&mut self) {
        self.delay_line.fill(0.0);
        self.pos = 0;
    }
}
