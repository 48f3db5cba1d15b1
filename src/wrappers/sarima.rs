//! Seasonal ARIMA adapter

use crate::data::{Target, TimeSeriesFrame};
use crate::error::Result;
use crate::models::sarima::SarimaEngine;
use crate::wrappers::{map_offsets, max_future_step, not_fitted, FitMeta, Forecaster};

/// ARIMA-family forecaster behind the uniform contract
#[derive(Debug)]
pub struct SarimaWrapper {
    name: String,
    order: (usize, usize, usize),
    seasonal_order: (usize, usize, usize, usize),
    state: Option<State>,
}

#[derive(Debug)]
struct State {
    meta: FitMeta,
    engine: SarimaEngine,
}

impl SarimaWrapper {
    /// Create a wrapper for `order` (p, d, q) and `seasonal_order` (P, D, Q, s)
    pub fn new(
        order: (usize, usize, usize),
        seasonal_order: (usize, usize, usize, usize),
    ) -> Result<Self> {
        SarimaEngine::new(order, seasonal_order)?;
        Ok(Self {
            name: "sarima".to_string(),
            order,
            seasonal_order,
            state: None,
        })
    }

    /// Rename this wrapper
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl Forecaster for SarimaWrapper {
    fn fit(&mut self, x: &TimeSeriesFrame, y: &Target) -> Result<()> {
        let meta = FitMeta::capture(x, y)?;
        let values = y.to_vec()?;
        // A fresh engine per fit; fitted state is never shared across instances.
        let mut engine = SarimaEngine::new(self.order, self.seasonal_order)?;
        engine.fit(&values)?;
        self.state = Some(State { meta, engine });
        Ok(())
    }

    fn predict(&self, x: &TimeSeriesFrame) -> Result<TimeSeriesFrame> {
        let state = self.state.as_ref().ok_or_else(|| not_fitted(&self.name))?;
        state.meta.check_exogenous(x)?;
        let offsets = state.meta.offsets(x)?;
        let fitted = state
            .engine
            .fitted_values()
            .ok_or_else(|| not_fitted(&self.name))?;
        let forecast = state.engine.forecast(max_future_step(&offsets))?;
        x.prediction_frame(map_offsets(&offsets, fitted, &forecast))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_fitted(&self) -> bool {
        self.state.is_some()
    }
}
