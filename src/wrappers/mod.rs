//! Adapters exposing every native engine through one fit/predict contract
//!
//! Ensemble and pipeline code only ever sees the [`Forecaster`] trait; each
//! wrapper owns the translation of frequency handling, exogenous schema checks
//! and output shaping for its engine family.

use crate::data::{Target, TimeSeriesFrame};
use crate::error::{ForecastError, Result};
use polars::prelude::DataType;

mod additive;
mod regression;
mod sarima;
mod smoothing;
mod tbats;

pub use additive::AdditiveWrapper;
pub use regression::RegressionWrapper;
pub use sarima::SarimaWrapper;
pub use smoothing::SmoothingWrapper;
pub use tbats::TbatsWrapper;

/// Common interface for all forecasting models
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
/// Implementations store fitted state internally; re-fitting replaces that
/// state. Neither `fit` nor `predict` modifies the caller's frame or target.
pub trait Forecaster {
    /// Fit the model on a frame and an aligned target
    fn fit(&mut self, x: &TimeSeriesFrame, y: &Target) -> Result<()>;

    /// Predict one value per row of `x`, aligned to its time index
    fn predict(&self, x: &TimeSeriesFrame) -> Result<TimeSeriesFrame>;

    /// Name of this forecaster
    fn name(&self) -> &str;

    /// Check whether the model has been fitted
    fn is_fitted(&self) -> bool;

    /// Fit the model and predict over the same frame
    fn fit_transform(&mut self, x: &TimeSeriesFrame, y: &Target) -> Result<TimeSeriesFrame> {
        self.fit(x, y)?;
        self.predict(x)
    }
}

/// Type alias for boxed forecaster trait objects
pub type BoxedForecaster = Box<dyn Forecaster>;

/// Where a requested timestamp falls relative to the fitted window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepAt {
    /// Row index inside the training window
    InSample(usize),
    /// Steps past the end of the training window, 1-based
    Future(usize),
}

/// Fit-time metadata shared by every wrapper
#[derive(Debug, Clone)]
pub(crate) struct FitMeta {
    start_millis: i64,
    freq_millis: i64,
    n_obs: usize,
    exog_schema: Vec<(String, DataType)>,
}

impl FitMeta {
    /// Validate fit inputs and capture index and schema metadata
    pub(crate) fn capture(x: &TimeSeriesFrame, y: &Target) -> Result<Self> {
        if x.is_empty() {
            return Err(ForecastError::DataError(
                "Cannot fit on an empty frame".to_string(),
            ));
        }
        if y.len() != x.len() {
            return Err(ForecastError::DataError(format!(
                "Target length {} does not match frame length {}",
                y.len(),
                x.len()
            )));
        }
        let freq_millis = x.frequency_millis()?;
        let start_millis = x.time_millis()?[0];
        Ok(Self {
            start_millis,
            freq_millis,
            n_obs: x.len(),
            exog_schema: x.exogenous_columns(),
        })
    }

    /// Check that predict-time exogenous columns match the fit-time schema
    pub(crate) fn check_exogenous(&self, x: &TimeSeriesFrame) -> Result<()> {
        let seen = x.exogenous_columns();
        if seen != self.exog_schema {
            let expected: Vec<String> = self
                .exog_schema
                .iter()
                .map(|(name, dtype)| format!("{}: {}", name, dtype))
                .collect();
            let got: Vec<String> = seen
                .iter()
                .map(|(name, dtype)| format!("{}: {}", name, dtype))
                .collect();
            return Err(ForecastError::ColumnMismatchError(format!(
                "fit saw [{}], predict got [{}]",
                expected.join(", "),
                got.join(", ")
            )));
        }
        Ok(())
    }

    /// Map each requested timestamp onto the fitted time grid
    pub(crate) fn offsets(&self, x: &TimeSeriesFrame) -> Result<Vec<StepAt>> {
        x.time_millis()?
            .into_iter()
            .map(|millis| {
                let relative = millis - self.start_millis;
                if relative < 0 || relative % self.freq_millis != 0 {
                    return Err(ForecastError::DataError(format!(
                        "Timestamp {} ms does not fall on the fitted time grid",
                        millis
                    )));
                }
                let index = (relative / self.freq_millis) as usize;
                if index < self.n_obs {
                    Ok(StepAt::InSample(index))
                } else {
                    Ok(StepAt::Future(index - self.n_obs + 1))
                }
            })
            .collect()
    }

    /// Requested timestamps as row positions on the fitted grid
    pub(crate) fn ordinals(&self, x: &TimeSeriesFrame) -> Result<Vec<f64>> {
        Ok(self
            .offsets(x)?
            .into_iter()
            .map(|step| match step {
                StepAt::InSample(index) => index as f64,
                StepAt::Future(k) => (self.n_obs - 1 + k) as f64,
            })
            .collect())
    }
}

/// Largest future step among the requested offsets
pub(crate) fn max_future_step(offsets: &[StepAt]) -> usize {
    offsets
        .iter()
        .map(|step| match step {
            StepAt::InSample(_) => 0,
            StepAt::Future(k) => *k,
        })
        .max()
        .unwrap_or(0)
}

/// Pick per-row values out of fitted and forecast series by offset
pub(crate) fn map_offsets(offsets: &[StepAt], fitted: &[f64], forecast: &[f64]) -> Vec<f64> {
    offsets
        .iter()
        .map(|step| match step {
            StepAt::InSample(index) => fitted[*index],
            StepAt::Future(k) => forecast[k - 1],
        })
        .collect()
}

pub(crate) fn not_fitted(name: &str) -> ForecastError {
    ForecastError::NotFittedError(name.to_string())
}
