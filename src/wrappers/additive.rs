//! Additive-component adapter

use crate::data::{Target, TimeSeriesFrame};
use crate::error::Result;
use crate::models::additive::{ComponentSpec, FittedComponents};
use crate::wrappers::{not_fitted, FitMeta, Forecaster};

/// Additive trend-and-seasonality forecaster behind the uniform contract
#[derive(Debug)]
pub struct AdditiveWrapper {
    name: String,
    weekly_seasonality: bool,
    yearly_seasonality: bool,
    fourier_order: usize,
    state: Option<State>,
}

#[derive(Debug)]
struct State {
    meta: FitMeta,
    model: FittedComponents,
}

impl AdditiveWrapper {
    /// Create a wrapper with weekly and yearly seasonality enabled
    pub fn new() -> Self {
        Self {
            name: "additive".to_string(),
            weekly_seasonality: true,
            yearly_seasonality: true,
            fourier_order: 3,
            state: None,
        }
    }

    /// Rename this wrapper
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Enable or disable day-of-week effects
    pub fn with_weekly_seasonality(mut self, enabled: bool) -> Self {
        self.weekly_seasonality = enabled;
        self
    }

    /// Enable or disable yearly Fourier effects
    pub fn with_yearly_seasonality(mut self, enabled: bool) -> Self {
        self.yearly_seasonality = enabled;
        self
    }

    /// Number of yearly Fourier harmonics
    pub fn with_fourier_order(mut self, order: usize) -> Self {
        self.fourier_order = order;
        self
    }
}

impl Default for AdditiveWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Forecaster for AdditiveWrapper {
    fn fit(&mut self, x: &TimeSeriesFrame, y: &Target) -> Result<()> {
        let meta = FitMeta::capture(x, y)?;
        let values = y.to_vec()?;
        let spec = ComponentSpec {
            weekly: self.weekly_seasonality,
            yearly: self.yearly_seasonality,
            fourier_order: self.fourier_order,
        };
        let model = spec.fit(&x.timestamps()?, &values)?;
        self.state = Some(State { meta, model });
        Ok(())
    }

    fn predict(&self, x: &TimeSeriesFrame) -> Result<TimeSeriesFrame> {
        let state = self.state.as_ref().ok_or_else(|| not_fitted(&self.name))?;
        state.meta.check_exogenous(x)?;
        // The engine is timestamp-aware, offsets are only needed to enforce
        // the fitted grid.
        state.meta.offsets(x)?;
        let values = state.model.predict_at(&x.timestamps()?);
        x.prediction_frame(values)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_fitted(&self) -> bool {
        self.state.is_some()
    }
}
