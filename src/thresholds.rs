//! Threshold tables: ordered step functions from a scalar in [0, 1] to a
//! categorical value.

use log::warn;

use crate::error::{GenError, Result};

/// One step of a threshold table.
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdEntry<T> {
    /// Inclusive upper bound of this step.
    pub upper_bound: f32,
    pub value: T,
}

impl<T> ThresholdEntry<T> {
    pub fn new(upper_bound: f32, value: T) -> Self {
        Self { upper_bound, value }
    }
}

/// A non-empty table sorted by ascending `upper_bound`.
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdTable<T> {
    entries: Vec<ThresholdEntry<T>>,
}

impl<T> ThresholdTable<T> {
    /// Build a table. `label` only appears in errors and log messages.
    ///
    /// Out-of-order entries are stably sorted by bound. A table whose last
    /// bound is below 1.0 is accepted, but values above it will hit the
    /// first-entry fallback in [`classify`](Self::classify).
    pub fn new(label: &str, mut entries: Vec<ThresholdEntry<T>>) -> Result<Self> {
        if entries.is_empty() {
            return Err(GenError::EmptyTable(label.to_string()));
        }
        if let Some(pos) = entries.iter().position(|e| !e.upper_bound.is_finite()) {
            return Err(GenError::NonFiniteBound {
                table: label.to_string(),
                name: format!("entry #{pos}"),
            });
        }

        let sorted = entries
            .windows(2)
            .all(|pair| pair[0].upper_bound <= pair[1].upper_bound);
        if !sorted {
            warn!("threshold table `{label}` is not in ascending order, sorting it");
            entries.sort_by(|a, b| a.upper_bound.total_cmp(&b.upper_bound));
        }

        let table = Self { entries };
        if !table.covers_unit_interval() {
            warn!(
                "threshold table `{label}` ends at {:.3} < 1.0; higher values fall back to its first entry",
                table.last().upper_bound
            );
        }
        Ok(table)
    }

    /// First entry whose bound is at or above `value`.
    pub fn find(&self, value: f32) -> Option<&T> {
        self.entries
            .iter()
            .find(|e| value <= e.upper_bound)
            .map(|e| &e.value)
    }

    /// Like [`find`](Self::find), but falls back to the first entry when
    /// no bound covers `value`.
    pub fn classify(&self, value: f32) -> &T {
        self.find(value).unwrap_or(&self.first().value)
    }

    /// Whether the final bound reaches 1.0, making the fallback unreachable
    /// for normalized input.
    pub fn covers_unit_interval(&self) -> bool {
        self.last().upper_bound >= 1.0
    }

    pub fn entries(&self) -> &[ThresholdEntry<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn first(&self) -> &ThresholdEntry<T> {
        &self.entries[0]
    }

    pub fn last(&self) -> &ThresholdEntry<T> {
        &self.entries[self.entries.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(bounds: &[(f32, &'static str)]) -> ThresholdTable<&'static str> {
        let entries = bounds
            .iter()
            .map(|&(b, v)| ThresholdEntry::new(b, v))
            .collect();
        ThresholdTable::new("test", entries).unwrap()
    }

    #[test]
    fn test_empty_table_rejected() {
        let result = ThresholdTable::<u8>::new("empty", Vec::new());
        assert!(matches!(result, Err(GenError::EmptyTable(ref l)) if l == "empty"));
    }

    #[test]
    fn test_nan_bound_rejected() {
        let result = ThresholdTable::new("bad", vec![ThresholdEntry::new(f32::NAN, 1u8)]);
        assert!(matches!(result, Err(GenError::NonFiniteBound { .. })));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let t = table(&[(0.3, "water"), (0.6, "sand"), (1.0, "rock")]);
        assert_eq!(*t.classify(0.3), "water");
        assert_eq!(*t.classify(0.30001), "sand");
        assert_eq!(*t.classify(0.6), "sand");
        assert_eq!(*t.classify(0.9), "rock");
    }

    #[test]
    fn test_monotonic_endpoints() {
        let t = table(&[(0.0, "floor"), (0.5, "mid"), (1.0, "top")]);
        assert_eq!(*t.classify(0.0), "floor", "classify(0) returns the first bound >= 0");
        assert_eq!(*t.classify(1.0), "top", "classify(1) returns the last entry");

        let t = table(&[(0.2, "low"), (0.7, "high")]);
        assert_eq!(*t.classify(0.0), "low");
        assert_eq!(*t.classify(0.7), "high", "largest bound covers values up to it");
    }

    #[test]
    fn test_uncovered_value_falls_back_to_first_entry() {
        let t = table(&[(0.2, "first"), (0.5, "second")]);
        assert!(!t.covers_unit_interval());
        assert_eq!(t.find(0.9), None);
        assert_eq!(*t.classify(0.9), "first");
    }

    #[test]
    fn test_unsorted_table_is_sorted() {
        let t = table(&[(1.0, "c"), (0.2, "a"), (0.5, "b")]);
        let bounds: Vec<f32> = t.entries().iter().map(|e| e.upper_bound).collect();
        assert_eq!(bounds, vec![0.2, 0.5, 1.0]);
        assert_eq!(*t.classify(0.4), "b");
    }

    #[test]
    fn test_equal_bounds_first_wins() {
        let t = table(&[(0.5, "a"), (0.5, "b"), (1.0, "c")]);
        assert_eq!(*t.classify(0.5), "a");
        assert_eq!(t.len(), 3);
    }
}
