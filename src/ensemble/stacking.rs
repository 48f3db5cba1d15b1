//! Stacking ensemble with a learned meta-model and leakage-free meta-features

use crate::data::{Target, TimeSeriesFrame};
use crate::ensemble::{
    fit_base_learners, predict_base_learners, stack_rows, validate_base_learners,
};
use crate::error::Result;
use crate::model_selection::TimeSeriesSplit;
use crate::regression::RegressionEstimator;
use crate::wrappers::{not_fitted, BoxedForecaster, Forecaster};

const DEFAULT_SPLITS: usize = 3;

/// Ensemble whose combiner is a regression meta-model
///
/// `fit` first walks expanding-window folds: base learners are fit on each
/// fold's training slice and predict its validation slice, and those
/// out-of-fold predictions become the meta-model's training features. The base
/// learners are then re-fit on the whole history; that final fit is what
/// `predict` uses, keeping meta-feature generation separate from the instances
/// that produce future predictions.
pub struct StackingEnsemble {
    name: String,
    base_learners: Vec<BoxedForecaster>,
    meta_model: Box<dyn RegressionEstimator>,
    n_splits: usize,
    fitted: bool,
}

impl StackingEnsemble {
    /// Create a stacking ensemble over uniquely named base learners
    pub fn new(
        base_learners: Vec<BoxedForecaster>,
        meta_model: Box<dyn RegressionEstimator>,
    ) -> Result<Self> {
        validate_base_learners(&base_learners)?;
        Ok(Self {
            name: "stacking_ensemble".to_string(),
            base_learners,
            meta_model,
            n_splits: DEFAULT_SPLITS,
            fitted: false,
        })
    }

    /// Rename this ensemble
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Override the number of cross-validation folds (at least 2)
    pub fn with_splits(mut self, n_splits: usize) -> Result<Self> {
        TimeSeriesSplit::new(n_splits)?;
        self.n_splits = n_splits;
        Ok(self)
    }
}

impl Forecaster for StackingEnsemble {
    fn fit(&mut self, x: &TimeSeriesFrame, y: &Target) -> Result<()> {
        validate_base_learners(&self.base_learners)?;
        // Fold layout is computed up front so short series fail before any
        // base learner is touched.
        let folds = TimeSeriesSplit::new(self.n_splits)?.split(x.len())?;
        let target_values = y.to_vec()?;

        let mut meta_features = Vec::new();
        let mut meta_target = Vec::new();
        for fold in &folds {
            let train_x = x.slice(fold.train.start, fold.train.len());
            let train_y = y.slice(fold.train.start, fold.train.len());
            let valid_x = x.slice(fold.valid.start, fold.valid.len());

            fit_base_learners(&mut self.base_learners, &train_x, &train_y)?;
            let columns = predict_base_learners(&self.base_learners, &valid_x)?;

            meta_features.extend(stack_rows(&columns, valid_x.len()));
            meta_target.extend_from_slice(&target_values[fold.valid.start..fold.valid.end]);
        }

        self.meta_model.fit(&meta_features, &meta_target)?;

        // Final re-fit on the full history; this is the state predict uses.
        fit_base_learners(&mut self.base_learners, x, y)?;
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, x: &TimeSeriesFrame) -> Result<TimeSeriesFrame> {
        if !self.fitted {
            return Err(not_fitted(&self.name));
        }
        let columns = predict_base_learners(&self.base_learners, x)?;
        let features = stack_rows(&columns, x.len());
        x.prediction_frame(self.meta_model.predict(&features)?)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}
