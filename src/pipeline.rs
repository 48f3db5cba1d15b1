//! Sequential composition of transformers and one terminal estimator

use crate::data::{Target, TimeSeriesFrame};
use crate::error::{ForecastError, Result};
use crate::feature_extraction::Transform;
use crate::wrappers::BoxedForecaster;

/// Ordered chain of named transformers with at most one terminal estimator
///
/// The pipeline only threads frames through its stages: transformers run left
/// to right, then the estimator sees the transformed frame. Any forecaster —
/// a single wrapper or an ensemble — can be the terminal estimator, and the
/// pipeline code does not care which.
pub struct Pipeline {
    steps: Vec<(String, Box<dyn Transform>)>,
    estimator: Option<BoxedForecaster>,
}

impl Pipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            estimator: None,
        }
    }

    /// Append a named transformer stage
    pub fn add_transformer(mut self, name: &str, step: Box<dyn Transform>) -> Self {
        self.steps.push((name.to_string(), step));
        self
    }

    /// Set the terminal estimator
    pub fn with_estimator(mut self, estimator: BoxedForecaster) -> Self {
        self.estimator = Some(estimator);
        self
    }

    /// Names of the transformer stages, in order
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Fit every stage in order, then the estimator
    pub fn fit(&mut self, x: &TimeSeriesFrame, y: &Target) -> Result<()> {
        let mut current = x.clone();
        for (name, step) in self.steps.iter_mut() {
            current = step
                .fit_transform(&current, Some(y))
                .map_err(|e| pipeline_context(e, name))?;
        }
        if let Some(estimator) = self.estimator.as_mut() {
            estimator.fit(&current, y)?;
        }
        Ok(())
    }

    /// Transform through the fitted stages and predict with the estimator
    pub fn predict(&self, x: &TimeSeriesFrame) -> Result<TimeSeriesFrame> {
        let current = self.apply_transforms(x)?;
        let estimator = self.estimator.as_ref().ok_or_else(|| {
            ForecastError::InvalidParameter(
                "Pipeline has no estimator; use fit_transform for transform-only pipelines"
                    .to_string(),
            )
        })?;
        estimator.predict(&current)
    }

    /// Fit the transformer stages and return the transformed frame
    ///
    /// Also fits the estimator when one is present, mirroring `fit`.
    pub fn fit_transform(&mut self, x: &TimeSeriesFrame, y: Option<&Target>) -> Result<TimeSeriesFrame> {
        let mut current = x.clone();
        for (name, step) in self.steps.iter_mut() {
            current = step
                .fit_transform(&current, y)
                .map_err(|e| pipeline_context(e, name))?;
        }
        if let Some(estimator) = self.estimator.as_mut() {
            let target = y.ok_or_else(|| {
                ForecastError::InvalidParameter(
                    "Pipeline with an estimator needs a target for fit_transform".to_string(),
                )
            })?;
            estimator.fit(&current, target)?;
        }
        Ok(current)
    }

    fn apply_transforms(&self, x: &TimeSeriesFrame) -> Result<TimeSeriesFrame> {
        let mut current = x.clone();
        for (name, step) in self.steps.iter() {
            current = step
                .transform(&current)
                .map_err(|e| pipeline_context(e, name))?;
        }
        Ok(current)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn pipeline_context(error: ForecastError, step: &str) -> ForecastError {
    match error {
        ForecastError::NotFittedError(name) => {
            ForecastError::NotFittedError(format!("{} (pipeline step '{}')", name, step))
        }
        other => other,
    }
}
