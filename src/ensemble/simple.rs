//! Aggregating ensemble without a learned combiner

use crate::data::{Target, TimeSeriesFrame};
use crate::ensemble::{fit_base_learners, predict_base_learners, stack_rows, validate_base_learners};
use crate::error::Result;
use crate::wrappers::{not_fitted, BoxedForecaster, Forecaster};
use statrs::statistics::{Data, OrderStatistics};
use std::fmt;

/// How per-learner predictions collapse into one value per row
pub enum Aggregation {
    /// Arithmetic mean across base learners
    Mean,
    /// Median across base learners
    Median,
    /// User-supplied reducer over the ordered per-learner values of one row
    Custom(Box<dyn Fn(&[f64]) -> f64 + Send + Sync>),
}

impl Aggregation {
    fn reduce(&self, row: &[f64]) -> f64 {
        match self {
            Aggregation::Mean => row.iter().sum::<f64>() / row.len() as f64,
            Aggregation::Median => {
                let mut data = Data::new(row.to_vec());
                data.median()
            }
            Aggregation::Custom(reducer) => reducer(row),
        }
    }
}

impl Default for Aggregation {
    fn default() -> Self {
        Aggregation::Mean
    }
}

impl fmt::Debug for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Mean => write!(f, "Mean"),
            Aggregation::Median => write!(f, "Median"),
            Aggregation::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Ensemble aggregating independent base-learner predictions
///
/// Every base learner is fit on the same data in isolation; `predict` runs
/// them all and collapses their columns row by row with the configured
/// aggregation.
pub struct SimpleEnsemble {
    name: String,
    base_learners: Vec<BoxedForecaster>,
    aggregation: Aggregation,
    fitted: bool,
}

impl SimpleEnsemble {
    /// Create an ensemble over uniquely named base learners
    pub fn new(base_learners: Vec<BoxedForecaster>) -> Result<Self> {
        validate_base_learners(&base_learners)?;
        Ok(Self {
            name: "simple_ensemble".to_string(),
            base_learners,
            aggregation: Aggregation::default(),
            fitted: false,
        })
    }

    /// Rename this ensemble
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Select the aggregation function
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Names of the base learners, in position order
    pub fn base_learner_names(&self) -> Vec<&str> {
        self.base_learners.iter().map(|l| l.name()).collect()
    }
}

impl Forecaster for SimpleEnsemble {
    fn fit(&mut self, x: &TimeSeriesFrame, y: &Target) -> Result<()> {
        validate_base_learners(&self.base_learners)?;
        fit_base_learners(&mut self.base_learners, x, y)?;
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, x: &TimeSeriesFrame) -> Result<TimeSeriesFrame> {
        if !self.fitted {
            return Err(not_fitted(&self.name));
        }
        let columns = predict_base_learners(&self.base_learners, x)?;
        let values = stack_rows(&columns, x.len())
            .iter()
            .map(|row| self.aggregation.reduce(row))
            .collect();
        x.prediction_frame(values)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}
