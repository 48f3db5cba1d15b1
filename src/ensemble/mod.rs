//! Ensembles combining multiple base forecasters into one estimator
//!
//! Both ensembles satisfy the same [`Forecaster`] contract as the wrappers
//! they contain, so they are interchangeable with single models inside a
//! pipeline.
//!
//! [`Forecaster`]: crate::wrappers::Forecaster

use crate::data::{Target, TimeSeriesFrame, PREDICTION_COLUMN};
use crate::error::{ForecastError, Result};
use crate::wrappers::BoxedForecaster;
use std::collections::HashSet;

mod simple;
mod stacking;

pub use simple::{Aggregation, SimpleEnsemble};
pub use stacking::StackingEnsemble;

/// Reject empty collections and duplicate base-learner names
pub(crate) fn validate_base_learners(base_learners: &[BoxedForecaster]) -> Result<()> {
    if base_learners.is_empty() {
        return Err(ForecastError::EmptyEnsembleError);
    }
    let mut names = HashSet::new();
    for learner in base_learners {
        if !names.insert(learner.name().to_string()) {
            return Err(ForecastError::InvalidParameter(format!(
                "Duplicate base learner name '{}'",
                learner.name()
            )));
        }
    }
    Ok(())
}

/// Fit every base learner on the same data, failing fast with context
pub(crate) fn fit_base_learners(
    base_learners: &mut [BoxedForecaster],
    x: &TimeSeriesFrame,
    y: &Target,
) -> Result<()> {
    for learner in base_learners.iter_mut() {
        let outcome = learner.fit(x, y);
        outcome.map_err(|e| e.in_base_learner(learner.name(), "fit"))?;
    }
    Ok(())
}

/// Collect one prediction column per base learner, indexed by position
pub(crate) fn predict_base_learners(
    base_learners: &[BoxedForecaster],
    x: &TimeSeriesFrame,
) -> Result<Vec<Vec<f64>>> {
    let mut columns = Vec::with_capacity(base_learners.len());
    for learner in base_learners.iter() {
        let frame = learner
            .predict(x)
            .map_err(|e| e.in_base_learner(learner.name(), "predict"))?;
        let column = frame
            .column_values(PREDICTION_COLUMN)
            .map_err(|e| e.in_base_learner(learner.name(), "predict"))?;
        columns.push(column);
    }
    Ok(columns)
}

/// Transpose per-learner columns into per-row feature vectors
pub(crate) fn stack_rows(columns: &[Vec<f64>], n_rows: usize) -> Vec<Vec<f64>> {
    (0..n_rows)
        .map(|row| columns.iter().map(|column| column[row]).collect())
        .collect()
}
