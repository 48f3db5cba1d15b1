//! Regression adapter: turns any generic regression estimator into a forecaster

use crate::data::{Target, TimeSeriesFrame};
use crate::error::Result;
use crate::regression::RegressionEstimator;
use crate::wrappers::{not_fitted, FitMeta, Forecaster};

/// Forecaster backed by a generic regression estimator
///
/// Features are the position of each row on the fitted time grid plus the
/// frame's exogenous columns, so a fitted linear estimator extrapolates trends
/// and responds to exogenous flags such as holiday markers.
pub struct RegressionWrapper {
    name: String,
    estimator: Box<dyn RegressionEstimator>,
    meta: Option<FitMeta>,
}

impl RegressionWrapper {
    /// Wrap a regression estimator
    pub fn new(estimator: Box<dyn RegressionEstimator>) -> Self {
        Self {
            name: "regression".to_string(),
            estimator,
            meta: None,
        }
    }

    /// Rename this wrapper
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    fn assemble(ordinals: &[f64], exogenous: &[Vec<f64>]) -> Vec<Vec<f64>> {
        ordinals
            .iter()
            .zip(exogenous.iter())
            .map(|(ordinal, row)| {
                let mut features = Vec::with_capacity(1 + row.len());
                features.push(*ordinal);
                features.extend_from_slice(row);
                features
            })
            .collect()
    }
}

impl Forecaster for RegressionWrapper {
    fn fit(&mut self, x: &TimeSeriesFrame, y: &Target) -> Result<()> {
        let meta = FitMeta::capture(x, y)?;
        let ordinals: Vec<f64> = (0..x.len()).map(|i| i as f64).collect();
        let features = Self::assemble(&ordinals, &x.exogenous_row_matrix()?);
        self.estimator.fit(&features, &y.to_vec()?)?;
        self.meta = Some(meta);
        Ok(())
    }

    fn predict(&self, x: &TimeSeriesFrame) -> Result<TimeSeriesFrame> {
        let meta = self.meta.as_ref().ok_or_else(|| not_fitted(&self.name))?;
        meta.check_exogenous(x)?;
        let ordinals = meta.ordinals(x)?;
        let features = Self::assemble(&ordinals, &x.exogenous_row_matrix()?);
        x.prediction_frame(self.estimator.predict(&features)?)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_fitted(&self) -> bool {
        self.meta.is_some()
    }
}
