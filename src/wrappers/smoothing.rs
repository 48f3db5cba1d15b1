//! Exponential smoothing adapter

use crate::data::{Target, TimeSeriesFrame};
use crate::error::Result;
use crate::models::smoothing::{SmoothingSpec, TrainedSmoothing, TrendComponent};
use crate::wrappers::{map_offsets, max_future_step, not_fitted, FitMeta, Forecaster};

/// Exponential smoothing forecaster behind the uniform contract
#[derive(Debug)]
pub struct SmoothingWrapper {
    name: String,
    alpha: f64,
    beta: f64,
    trend: TrendComponent,
    state: Option<State>,
}

#[derive(Debug)]
struct State {
    meta: FitMeta,
    model: TrainedSmoothing,
}

impl SmoothingWrapper {
    /// Create a wrapper with default smoothing parameters and no trend
    pub fn new() -> Self {
        Self {
            name: "smoothing".to_string(),
            alpha: 0.3,
            beta: 0.1,
            trend: TrendComponent::None,
            state: None,
        }
    }

    /// Rename this wrapper
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Select the trend component
    pub fn with_trend(mut self, trend: TrendComponent) -> Self {
        self.trend = trend;
        self
    }

    /// Override the smoothing parameters
    pub fn with_smoothing(mut self, alpha: f64, beta: f64) -> Result<Self> {
        SmoothingSpec::new(alpha, beta, self.trend)?;
        self.alpha = alpha;
        self.beta = beta;
        Ok(self)
    }
}

impl Default for SmoothingWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Forecaster for SmoothingWrapper {
    fn fit(&mut self, x: &TimeSeriesFrame, y: &Target) -> Result<()> {
        let meta = FitMeta::capture(x, y)?;
        let values = y.to_vec()?;
        let model = SmoothingSpec::new(self.alpha, self.beta, self.trend)?.train(&values)?;
        self.state = Some(State { meta, model });
        Ok(())
    }

    fn predict(&self, x: &TimeSeriesFrame) -> Result<TimeSeriesFrame> {
        let state = self.state.as_ref().ok_or_else(|| not_fitted(&self.name))?;
        state.meta.check_exogenous(x)?;
        let offsets = state.meta.offsets(x)?;
        let forecast = state.model.forecast(max_future_step(&offsets));
        x.prediction_frame(map_offsets(&offsets, state.model.fitted(), &forecast))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_fitted(&self) -> bool {
        self.state.is_some()
    }
}
