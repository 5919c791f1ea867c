use num_complex::Complex64;
use std::sync::{Arc, RwLock, RwLockReadGuard, TryLockError, Weak};

use super::filter::{Filter, FrequencyResponse};
use super::fir_core::FirHistory;
use super::math::clamp_order;
use crate::error::{FilterError, Result};
use crate::table::{TableData, TableSource};

/// A live binding to an external coefficient table
#[derive(Debug)]
struct FirBinding {
    name: String,
    table: Weak<RwLock<TableData>>,
    /// Table length at bind time; a table resized by its owner no longer
    /// matches the history and is not convolved with.
    table_len: usize,
    history: FirHistory,
}

#[derive(Debug, Default)]
enum FirState {
    #[default]
    NoCoefficients,
    Bound(FirBinding),
}

/// nth-order FIR filter convolving with a borrowed coefficient table
///
/// The coefficients are read from the table on every block and are never
/// copied, freed or written by the filter; only the input history is owned.
/// Without a usable table the filter outputs silence.
#[derive(Debug, Default)]
pub struct FirFilter {
    state: FirState,
}

impl FirFilter {
    /// Create a filter with no coefficients.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter from its optional creation argument (a table name)
    ///
    /// A failed binding is logged and leaves the filter silent.
    pub fn with_table(name: Option<&str>, tables: &impl TableSource) -> Self {
        let mut filter = Self::new();
        // Already logged; the filter stays silent.
        let _ = filter.set_table(name, tables);
        filter
    }

    /// Bind to the table `name`, returning the new order
    ///
    /// `None` or an empty name unbinds the filter without error. Binding a
    /// table keeps the most recent input history (see `FirHistory::resize`).
    /// Tables longer than `MAX_FIR_ORDER` are truncated to their first
    /// `MAX_FIR_ORDER` coefficients.
    ///
    /// # Errors
    /// `TableNotFound`, `BadTableTemplate`, `EmptyTable` or `OutOfMemory`.
    /// On any error the failure is logged, the history is released, and the
    /// filter outputs zeros until a later bind succeeds.
    pub fn set_table(&mut self, name: Option<&str>, tables: &impl TableSource) -> Result<usize> {
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            log::debug!("fir~: no table, output muted");
            self.clear();
            return Ok(0);
        };

        match self.bind(name, tables) {
            Ok(order) => {
                log::debug!("fir~: bound to '{}' (order {})", name, order);
                Ok(order)
            }
            Err(e) => {
                log::error!("{}", e);
                self.clear();
                Err(e)
            }
        }
    }

    fn bind(&mut self, name: &str, tables: &impl TableSource) -> Result<usize> {
        let table = tables
            .find_table(name)
            .ok_or_else(|| FilterError::TableNotFound(name.to_string()))?;

        let table_len = {
            let data = table.read().unwrap_or_else(|e| e.into_inner());
            match &*data {
                TableData::Floats(values) if values.is_empty() => {
                    return Err(FilterError::EmptyTable(name.to_string()));
                }
                TableData::Floats(values) => values.len(),
                TableData::Structured { .. } => {
                    return Err(FilterError::BadTableTemplate(name.to_string()));
                }
            }
        };

        let order = clamp_order(table_len);
        if order < table_len {
            log::warn!(
                "{}: {} coefficients, using the first {}",
                name,
                table_len,
                order
            );
        }

        let history = match std::mem::take(&mut self.state) {
            FirState::Bound(FirBinding { mut history, .. }) => {
                history.resize(order)?;
                history
            }
            FirState::NoCoefficients => FirHistory::zeroed(order)?,
        };

        self.state = FirState::Bound(FirBinding {
            name: name.to_string(),
            table: Arc::downgrade(&table),
            table_len,
            history,
        });
        Ok(order)
    }

    /// Drop the binding and release the history buffer.
    pub fn clear(&mut self) {
        self.state = FirState::NoCoefficients;
    }

    /// Current order (0 when there are no coefficients).
    pub fn order(&self) -> usize {
        match &self.state {
            FirState::Bound(binding) => binding.history.order(),
            FirState::NoCoefficients => 0,
        }
    }

    pub fn table_name(&self) -> Option<&str> {
        match &self.state {
            FirState::Bound(binding) => Some(&binding.name),
            FirState::NoCoefficients => None,
        }
    }

    pub fn has_coefficients(&self) -> bool {
        matches!(self.state, FirState::Bound(_))
    }

    /// Copy of the coefficients currently in effect, if the table is usable.
    pub fn coefficients(&self) -> Option<Vec<f32>> {
        let FirState::Bound(binding) = &self.state else {
            return None;
        };
        let table = binding.table.upgrade()?;
        let data = table.read().unwrap_or_else(|e| e.into_inner());
        usable_taps(&data, binding.table_len, binding.history.order()).map(<[f32]>::to_vec)
    }
}

/// Read the table without waiting on its owner
///
/// A poisoned lock still holds whatever the owner last wrote and is read as
/// usual, the same as at bind time. Only a held write lock yields `None`.
fn try_read_table(table: &RwLock<TableData>) -> Option<RwLockReadGuard<'_, TableData>> {
    match table.try_read() {
        Ok(data) => Some(data),
        Err(TryLockError::Poisoned(e)) => Some(e.into_inner()),
        Err(TryLockError::WouldBlock) => None,
    }
}

/// The tap slice to convolve with, or `None` if the table no longer matches
/// what was bound.
fn usable_taps(data: &TableData, table_len: usize, order: usize) -> Option<&[f32]> {
    data.as_floats()
        .filter(|values| values.len() == table_len)
        .map(|values| &values[..order])
}

impl Filter for FirFilter {
    fn process(&mut self, input: &[f32], output: &mut [f32]) {
        let len = input.len().min(output.len());
        let (input, output) = (&input[..len], &mut output[..len]);

        let FirState::Bound(binding) = &mut self.state else {
            output.fill(0.0);
            return;
        };
        let Some(table) = binding.table.upgrade() else {
            output.fill(0.0);
            return;
        };
        // Never wait on the owner from the audio thread.
        let Some(data) = try_read_table(&table) else {
            output.fill(0.0);
            return;
        };
        match usable_taps(&data, binding.table_len, binding.history.order()) {
            Some(taps) => binding.history.process_block(taps, input, output),
            None => output.fill(0.0),
        }
    }

    fn process_buffer(&mut self, buffer: &mut [f32]) {
        let FirState::Bound(binding) = &mut self.state else {
            buffer.fill(0.0);
            return;
        };
        let Some(table) = binding.table.upgrade() else {
            buffer.fill(0.0);
            return;
        };
        let Some(data) = try_read_table(&table) else {
            buffer.fill(0.0);
            return;
        };
        match usable_taps(&data, binding.table_len, binding.history.order()) {
            Some(taps) => binding.history.process_buffer(taps, buffer),
            None => buffer.fill(0.0),
        }
    }

    fn reset(&mut self) {
        if let FirState::Bound(binding) = &mut self.state {
            binding.history.reset();
        }
    }
}

impl FrequencyResponse for FirFilter {
    /// `H(e^{jω}) = Σ h[k]·e^{-jωk}`; zero when there are no coefficients.
    fn frequency_response(&self, freq: f32, sample_rate: f32) -> Complex64 {
        let Some(taps) = self.coefficients() else {
            return Complex64::new(0.0, 0.0);
        };
        let omega = std::f64::consts::TAU * freq as f64 / sample_rate as f64;
        taps.iter()
            .enumerate()
            .map(|(k, &h)| Complex64::from_polar(h as f64, -omega * k as f64))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_FIR_ORDER;
    use crate::table::TableRegistry;
    use approx::assert_abs_diff_eq;

    fn registry() -> TableRegistry {
        let mut tables = TableRegistry::new();
        tables.insert_floats("avg", vec![0.5, 0.5]);
        tables.insert_floats("three", vec![1.0, 2.0, 3.0]);
        tables.insert(
            "points",
            TableData::Structured {
                template: "point".to_string(),
                len: 8,
            },
        );
        tables.insert_floats("empty", vec![]);
        tables
    }

    #[test]
    fn test_unbound_outputs_zeros() {
        let mut filter = FirFilter::new();
        let mut output = [1.0f32; 16];
        filter.process(&[0.3; 16], &mut output);
        assert!(output.iter().all(|&y| y == 0.0));
        assert_eq!(filter.order(), 0);
    }

    #[test]
    fn test_bind_sets_order() {
        let tables = registry();
        let mut filter = FirFilter::new();
        assert_eq!(filter.set_table(Some("three"), &tables), Ok(3));
        assert_eq!(filter.order(), 3);
        assert_eq!(filter.table_name(), Some("three"));
        assert_eq!(filter.coefficients(), Some(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_missing_table_degrades_to_silence() {
        let tables = registry();
        let mut filter = FirFilter::with_table(Some("avg"), &tables);
        assert!(filter.has_coefficients());

        let err = filter.set_table(Some("nope"), &tables).unwrap_err();
        assert_eq!(err, FilterError::TableNotFound("nope".to_string()));
        assert_eq!(err.to_string(), "nope: no such array");
        assert!(!filter.has_coefficients());
        assert_eq!(filter.order(), 0);

        let mut output = [1.0f32; 4];
        filter.process(&[1.0; 4], &mut output);
        assert_eq!(output, [0.0; 4]);
    }

    #[test]
    fn test_structured_table_rejected() {
        let tables = registry();
        let mut filter = FirFilter::with_table(Some("avg"), &tables);
        let err = filter.set_table(Some("points"), &tables).unwrap_err();
        assert_eq!(err, FilterError::BadTableTemplate("points".to_string()));
        assert!(!filter.has_coefficients());
    }

    #[test]
    fn test_empty_table_rejected() {
        let tables = registry();
        let mut filter = FirFilter::new();
        assert_eq!(
            filter.set_table(Some("empty"), &tables),
            Err(FilterError::EmptyTable("empty".to_string()))
        );
        assert_eq!(filter.order(), 0);
    }

    #[test]
    fn test_absent_name_unbinds_without_error() {
        let tables = registry();
        let mut filter = FirFilter::with_table(Some("avg"), &tables);
        assert_eq!(filter.set_table(None, &tables), Ok(0));
        assert!(!filter.has_coefficients());
        assert_eq!(filter.set_table(Some(""), &tables), Ok(0));
    }

    #[test]
    fn test_dropped_table_goes_silent() {
        let mut tables = registry();
        let mut filter = FirFilter::with_table(Some("avg"), &tables);
        tables.remove("avg");

        let mut output = [1.0f32; 4];
        filter.process(&[1.0; 4], &mut output);
        assert_eq!(output, [0.0; 4]);
        // Still bound by name until re-bound.
        assert!(filter.has_coefficients());
        assert!(filter.coefficients().is_none());
    }

    #[test]
    fn test_resized_table_goes_silent_until_rebound() {
        let mut tables = registry();
        let table = tables.insert_floats("live", vec![1.0, 1.0]);
        let mut filter = FirFilter::with_table(Some("live"), &tables);

        *table.write().unwrap() = TableData::Floats(vec![1.0, 1.0, 1.0]);
        let mut output = [1.0f32; 3];
        filter.process(&[1.0; 3], &mut output);
        assert_eq!(output, [0.0; 3]);

        filter.set_table(Some("live"), &tables).unwrap();
        filter.reset();
        filter.process(&[1.0; 3], &mut output);
        assert_eq!(output, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_owner_edits_take_effect_next_block() {
        let mut tables = registry();
        let table = tables.insert_floats("live", vec![1.0, 0.0]);
        let mut filter = FirFilter::with_table(Some("live"), &tables);

        let mut output = [0.0f32; 2];
        filter.process(&[1.0, 0.0], &mut output);
        assert_eq!(output, [1.0, 0.0]);

        if let TableData::Floats(values) = &mut *table.write().unwrap() {
            values[0] = 2.0;
        }
        filter.process(&[1.0, 0.0], &mut output);
        assert_eq!(output, [2.0, 0.0]);
    }

    #[test]
    fn test_locked_table_mutes_block() {
        let tables = registry();
        let mut filter = FirFilter::with_table(Some("avg"), &tables);
        let table = tables.find_table("avg").unwrap();

        let _guard = table.write().unwrap();
        let mut output = [1.0f32; 2];
        filter.process(&[1.0, 1.0], &mut output);
        assert_eq!(output, [0.0, 0.0]);
    }

    fn poison(table: &crate::table::SharedTable) {
        let owner = Arc::clone(table);
        let _ = std::thread::spawn(move || {
            let _guard = owner.write().unwrap();
            panic!("owner failed while writing");
        })
        .join();
        assert!(table.is_poisoned());
    }

    #[test]
    fn test_poisoned_table_still_convolves() {
        let tables = registry();
        let table = tables.find_table("avg").unwrap();

        let mut before = FirFilter::with_table(Some("avg"), &tables);
        poison(&table);
        let mut after = FirFilter::with_table(Some("avg"), &tables);

        for filter in [&mut before, &mut after] {
            assert_eq!(filter.order(), 2);
            assert_eq!(filter.coefficients(), Some(vec![0.5, 0.5]));

            let mut output = [0.0f32; 3];
            filter.process(&[2.0, 4.0, 0.0], &mut output);
            assert_eq!(output, [1.0, 3.0, 2.0]);

            let mut buffer = [2.0, 2.0];
            filter.process_buffer(&mut buffer);
            assert_eq!(buffer, [1.0, 2.0]);
        }
    }

    #[test]
    fn test_oversized_table_truncated() {
        let mut tables = TableRegistry::new();
        let mut values = vec![0.0; MAX_FIR_ORDER + 10];
        values[0] = 1.0;
        tables.insert_floats("huge", values);
        let mut filter = FirFilter::new();
        assert_eq!(filter.set_table(Some("huge"), &tables), Ok(MAX_FIR_ORDER));

        let mut output = [0.0f32; 3];
        filter.process(&[0.25, 0.5, 0.75], &mut output);
        assert_eq!(output, [0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_in_place_matches_block() {
        let tables = registry();
        let input = [1.0, -1.0, 2.0, 0.5, 0.0, 3.0];

        let mut a = FirFilter::with_table(Some("three"), &tables);
        let mut output = [0.0f32; 6];
        a.process(&input, &mut output);

        let mut b = FirFilter::with_table(Some("three"), &tables);
        let mut buffer = input;
        b.process_buffer(&mut buffer);

        assert_eq!(output, buffer);
    }

    #[test]
    fn test_moving_average_response() {
        let tables = registry();
        let filter = FirFilter::with_table(Some("avg"), &tables);
        assert_abs_diff_eq!(filter.magnitude(0.0, 48000.0), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(filter.magnitude(24000.0, 48000.0), 0.0, epsilon = 1e-9);
        assert_eq!(FirFilter::new().magnitude(1000.0, 48000.0), 0.0);
    }
}
