//! BATS-family adapter

use crate::data::{Target, TimeSeriesFrame};
use crate::error::{ForecastError, Result};
use crate::models::tbats::{BatsConfig, BatsFit};
use crate::wrappers::{map_offsets, max_future_step, not_fitted, FitMeta, Forecaster};

/// BATS/TBATS-style forecaster behind the uniform contract
#[derive(Debug)]
pub struct TbatsWrapper {
    name: String,
    use_box_cox: bool,
    use_arma_errors: bool,
    seasonal_periods: Vec<usize>,
    seed: Option<u64>,
    state: Option<State>,
}

#[derive(Debug)]
struct State {
    meta: FitMeta,
    model: BatsFit,
}

impl TbatsWrapper {
    /// Create a wrapper with Box-Cox and ARMA error correction enabled
    pub fn new() -> Self {
        Self {
            name: "tbats".to_string(),
            use_box_cox: true,
            use_arma_errors: true,
            seasonal_periods: Vec::new(),
            seed: None,
            state: None,
        }
    }

    /// Rename this wrapper
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Enable or disable the Box-Cox transform search
    pub fn with_box_cox(mut self, enabled: bool) -> Self {
        self.use_box_cox = enabled;
        self
    }

    /// Enable or disable AR(1) error correction
    pub fn with_arma_errors(mut self, enabled: bool) -> Self {
        self.use_arma_errors = enabled;
        self
    }

    /// Set the seasonal cycle lengths
    pub fn with_seasonal_periods(mut self, periods: Vec<usize>) -> Result<Self> {
        for &period in &periods {
            if period < 2 {
                return Err(ForecastError::InvalidParameter(format!(
                    "Seasonal period must be at least 2, got {}",
                    period
                )));
            }
        }
        self.seasonal_periods = periods;
        Ok(self)
    }

    /// Seed for the engine's parameter search; forwarded unchanged
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for TbatsWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Forecaster for TbatsWrapper {
    fn fit(&mut self, x: &TimeSeriesFrame, y: &Target) -> Result<()> {
        let meta = FitMeta::capture(x, y)?;
        let values = y.to_vec()?;
        let config = BatsConfig {
            use_box_cox: self.use_box_cox,
            use_arma_errors: self.use_arma_errors,
            seasonal_periods: self.seasonal_periods.clone(),
            seed: self.seed,
        };
        let model = config.fit(&values)?;
        self.state = Some(State { meta, model });
        Ok(())
    }

    fn predict(&self, x: &TimeSeriesFrame) -> Result<TimeSeriesFrame> {
        let state = self.state.as_ref().ok_or_else(|| not_fitted(&self.name))?;
        state.meta.check_exogenous(x)?;
        let offsets = state.meta.offsets(x)?;
        let forecast = state.model.project(max_future_step(&offsets));
        x.prediction_frame(map_offsets(&offsets, state.model.in_sample(), &forecast))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_fitted(&self) -> bool {
        self.state.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PREDICTION_COLUMN;
    use chrono::{Duration, TimeZone, Utc};

    fn daily_frame(n: usize) -> TimeSeriesFrame {
        let timestamps: Vec<_> = (0..n)
            .map(|i| {
                Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap() + Duration::days(i as i64)
            })
            .collect();
        TimeSeriesFrame::from_index(timestamps).unwrap()
    }

    #[test]
    fn test_seeded_predictions_are_stable() {
        let frame = daily_frame(30);
        let target = Target::Values((0..30).map(|i| 20.0 + (i % 7) as f64).collect());

        let mut first = TbatsWrapper::new().with_seed(7);
        let mut second = TbatsWrapper::new().with_seed(7);
        first.fit(&frame, &target).unwrap();
        second.fit(&frame, &target).unwrap();

        let future = crate::utils::future_frame(&frame, 5).unwrap();
        let a = first.predict(&future).unwrap();
        let b = second.predict(&future).unwrap();
        assert_eq!(
            a.column_values(PREDICTION_COLUMN).unwrap(),
            b.column_values(PREDICTION_COLUMN).unwrap()
        );
    }

    #[test]
    fn test_invalid_period_rejected() {
        assert!(TbatsWrapper::new().with_seasonal_periods(vec![1]).is_err());
    }

    #[test]
    fn test_flags_disable_components() {
        let frame = daily_frame(30);
        let target = Target::Values((0..30).map(|i| 20.0 + 0.3 * i as f64).collect());

        let mut wrapper = TbatsWrapper::new()
            .with_box_cox(false)
            .with_arma_errors(false);
        wrapper.fit(&frame, &target).unwrap();

        let prediction = wrapper.predict(&frame.tail(4)).unwrap();
        assert_eq!(prediction.len(), 4);
    }
}
