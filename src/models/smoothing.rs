//! Exponential smoothing engines (simple and Holt linear trend)

use crate::error::{ForecastError, Result};

/// Trend component handled by the smoothing engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendComponent {
    /// Flat forecasts from the last smoothed level
    #[default]
    None,
    /// Holt's linear trend
    Additive,
}

/// Smoothing configuration, untrained
#[derive(Debug, Clone)]
pub struct SmoothingSpec {
    alpha: f64,
    beta: f64,
    trend: TrendComponent,
}

impl SmoothingSpec {
    /// Create a smoothing specification
    ///
    /// `alpha` smooths the level, `beta` the trend; both must lie strictly
    /// between 0 and 1.
    pub fn new(alpha: f64, beta: f64, trend: TrendComponent) -> Result<Self> {
        if alpha <= 0.0 || alpha >= 1.0 {
            return Err(ForecastError::InvalidParameter(
                "Alpha must be between 0 and 1".to_string(),
            ));
        }
        if beta <= 0.0 || beta >= 1.0 {
            return Err(ForecastError::InvalidParameter(
                "Beta must be between 0 and 1".to_string(),
            ));
        }
        Ok(Self { alpha, beta, trend })
    }

    /// Trend component of this specification
    pub fn trend(&self) -> TrendComponent {
        self.trend
    }

    /// Run the smoothing recursions over a series
    pub fn train(&self, values: &[f64]) -> Result<TrainedSmoothing> {
        if values.is_empty() {
            return Err(ForecastError::DataError(
                "Empty time series data".to_string(),
            ));
        }

        let mut level = values[0];
        let mut slope = match self.trend {
            TrendComponent::Additive if values.len() > 1 => values[1] - values[0],
            _ => 0.0,
        };

        let mut fitted = Vec::with_capacity(values.len());
        fitted.push(level);

        for &value in &values[1..] {
            fitted.push(level + slope);
            match self.trend {
                TrendComponent::None => {
                    level = self.alpha * value + (1.0 - self.alpha) * level;
                }
                TrendComponent::Additive => {
                    let previous_level = level;
                    level = self.alpha * value + (1.0 - self.alpha) * (level + slope);
                    slope = self.beta * (level - previous_level) + (1.0 - self.beta) * slope;
                }
            }
        }

        Ok(TrainedSmoothing {
            trend: self.trend,
            level,
            slope,
            fitted,
        })
    }
}

/// Trained smoothing state
#[derive(Debug, Clone)]
pub struct TrainedSmoothing {
    trend: TrendComponent,
    level: f64,
    slope: f64,
    fitted: Vec<f64>,
}

impl TrainedSmoothing {
    /// One-step-ahead predictions over the training series
    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    /// Forecast `horizon` steps past the end of the training series
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        (1..=horizon)
            .map(|k| match self.trend {
                TrendComponent::None => self.level,
                TrendComponent::Additive => self.level + k as f64 * self.slope,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_flat_forecast_without_trend() {
        let spec = SmoothingSpec::new(0.5, 0.1, TrendComponent::None).unwrap();
        let trained = spec.train(&[10.0, 12.0, 11.0, 13.0]).unwrap();

        let forecast = trained.forecast(3);
        assert_eq!(forecast.len(), 3);
        assert_approx_eq!(forecast[0], forecast[1]);
        assert_approx_eq!(forecast[1], forecast[2]);
    }

    #[test]
    fn test_additive_trend_extends_slope() {
        let values: Vec<f64> = (0..20).map(|i| 5.0 + 2.0 * i as f64).collect();
        let spec = SmoothingSpec::new(0.8, 0.5, TrendComponent::Additive).unwrap();
        let trained = spec.train(&values).unwrap();

        let forecast = trained.forecast(2);
        assert_approx_eq!(forecast[1] - forecast[0], 2.0, 0.1);
    }

    #[test]
    fn test_fitted_matches_input_length() {
        let spec = SmoothingSpec::new(0.3, 0.1, TrendComponent::None).unwrap();
        let trained = spec.train(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(trained.fitted().len(), 3);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(SmoothingSpec::new(1.5, 0.1, TrendComponent::None).is_err());
        assert!(SmoothingSpec::new(0.3, 0.0, TrendComponent::None).is_err());
    }

    #[test]
    fn test_empty_series_rejected() {
        let spec = SmoothingSpec::new(0.3, 0.1, TrendComponent::None).unwrap();
        assert!(spec.train(&[]).is_err());
    }
}
