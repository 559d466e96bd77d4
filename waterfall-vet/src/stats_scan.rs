//! Single-pass statistics over profile samples.
//!
//! The decision rule needs the mean of the whole profile and the peak of two of
//! its segments. Both come from one scan that also remembers where the peak
//! sits, so diagnostics can point at the row that triggered a detection.
//!
//! Scanning stops at the first NaN; every accessor then reports the index of
//! that sample instead of a poisoned value.

use thiserror::Error;

/// Error types for StatsScan operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("NaN value encountered at index {0}")]
    NaNEncountered(usize),
    #[error("No data provided (empty slice)")]
    NoData,
}

/// Peak value and the index it was found at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub index: usize,
    pub value: f64,
}

/// Max, sum and count of a slice, gathered in a single pass.
#[derive(Debug, Clone)]
pub struct StatsScan {
    max: Option<Peak>,
    sum: f64,
    count: usize,
    nan_index: Option<usize>,
}

impl StatsScan {
    pub fn new(data: &[f64]) -> Self {
        let mut scan = Self {
            max: None,
            sum: 0.0,
            count: 0,
            nan_index: None,
        };

        for (index, &value) in data.iter().enumerate() {
            if value.is_nan() {
                scan.nan_index = Some(index);
                break;
            }

            scan.sum += value;
            scan.count += 1;

            // Ties keep the earliest index
            if scan.max.map_or(true, |peak| value > peak.value) {
                scan.max = Some(Peak { index, value });
            }
        }

        scan
    }

    fn checked<V>(&self, value: Option<V>) -> Result<V, StatsError> {
        match self.nan_index {
            Some(index) => Err(StatsError::NaNEncountered(index)),
            None => value.ok_or(StatsError::NoData),
        }
    }

    pub fn max(&self) -> Result<f64, StatsError> {
        self.checked(self.max.map(|peak| peak.value))
    }

    /// Largest value and its position within the scanned slice
    pub fn peak(&self) -> Result<Peak, StatsError> {
        self.checked(self.max)
    }

    /// Arithmetic mean of the scanned values
    pub fn mean(&self) -> Result<f64, StatsError> {
        let count = (self.count > 0).then_some(self.count);
        self.checked(count).map(|count| self.sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_basic_stats() {
        let scanner = StatsScan::new(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]);

        assert_eq!(scanner.max().unwrap(), 9.0);

        // Mean = 31/8
        assert_relative_eq!(scanner.mean().unwrap(), 3.875, epsilon = 1e-12);
    }

    #[test]
    fn test_peak_reports_first_occurrence() {
        let scanner = StatsScan::new(&[0.0, 7.5, -2.0, 7.5]);
        assert_eq!(
            scanner.peak().unwrap(),
            Peak {
                index: 1,
                value: 7.5
            }
        );
    }

    #[test]
    fn test_nan_handling() {
        let scanner = StatsScan::new(&[1.0, 2.0, f64::NAN, 3.0, 4.0]);

        assert_eq!(scanner.max(), Err(StatsError::NaNEncountered(2)));
        assert_eq!(scanner.mean(), Err(StatsError::NaNEncountered(2)));
        assert_eq!(scanner.peak(), Err(StatsError::NaNEncountered(2)));
    }

    #[test]
    fn test_no_data() {
        let scanner = StatsScan::new(&[]);

        assert_eq!(scanner.max(), Err(StatsError::NoData));
        assert_eq!(scanner.mean(), Err(StatsError::NoData));
        assert_eq!(scanner.peak(), Err(StatsError::NoData));
    }

    #[test]
    fn test_negative_values() {
        let scanner = StatsScan::new(&[-5.0, -1.0, -10.0, -3.0]);

        assert_eq!(scanner.max().unwrap(), -1.0);
        assert_eq!(scanner.peak().unwrap().index, 1);
        assert_relative_eq!(scanner.mean().unwrap(), -4.75, epsilon = 1e-12);
    }
}
