//! Temporal cross-validation splitting

use crate::error::{ForecastError, Result};
use std::ops::Range;

/// One expanding-window fold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    /// Rows to train on, always strictly before the validation slice
    pub train: Range<usize>,
    /// Rows to validate on
    pub valid: Range<usize>,
}

/// Sequential splitter for time-ordered data
///
/// Folds expand forward: every fold trains on all rows strictly before its
/// validation slice, so no fold ever trains on data chronologically after the
/// rows it validates. Rows are never shuffled.
#[derive(Debug, Clone)]
pub struct TimeSeriesSplit {
    n_splits: usize,
}

impl TimeSeriesSplit {
    /// Create a splitter producing `n_splits` folds (at least 2)
    pub fn new(n_splits: usize) -> Result<Self> {
        if n_splits < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "Cross-validation requires at least 2 splits, got {}",
                n_splits
            )));
        }
        Ok(Self { n_splits })
    }

    /// Number of folds this splitter produces
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Split `n_rows` ordered rows into expanding-window folds
    ///
    /// The validation span is `n_rows / (n_splits + 1)` rows; the spans tile
    /// the tail of the data. Too few rows to give every fold a non-empty
    /// training and validation slice is an error, never a silent degrade.
    pub fn split(&self, n_rows: usize) -> Result<Vec<Fold>> {
        let span = n_rows / (self.n_splits + 1);
        if span == 0 {
            return Err(ForecastError::InsufficientDataError {
                required: self.n_splits + 1,
                actual: n_rows,
            });
        }

        let folds = (0..self.n_splits)
            .map(|fold| {
                let valid_start = n_rows - (self.n_splits - fold) * span;
                Fold {
                    train: 0..valid_start,
                    valid: valid_start..valid_start + span,
                }
            })
            .collect();
        Ok(folds)
    }
}
