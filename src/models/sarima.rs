//! Seasonal ARIMA engine with least-squares coefficient estimation

use crate::error::{ForecastError, Result};
use crate::regression::least_squares;

/// Seasonal ARIMA engine
///
/// Coefficients are estimated in two least-squares stages: autoregressive lags
/// first, then a joint pass that adds lagged residuals for the moving-average
/// part. Differencing (plain and seasonal) is unwound when producing fitted
/// values and forecasts.
#[derive(Debug, Clone)]
pub struct SarimaEngine {
    p: usize,
    d: usize,
    q: usize,
    seasonal_p: usize,
    seasonal_d: usize,
    seasonal_q: usize,
    season: usize,
    state: Option<FittedSarima>,
}

#[derive(Debug, Clone)]
struct FittedSarima {
    coefficients: Vec<f64>,
    ar_lags: Vec<usize>,
    ma_lags: Vec<usize>,
    stages: Vec<(usize, Vec<f64>)>,
    work: Vec<f64>,
    residuals: Vec<f64>,
    fitted: Vec<f64>,
}

impl SarimaEngine {
    /// Create an engine for `order` (p, d, q) and `seasonal_order` (P, D, Q, s)
    pub fn new(order: (usize, usize, usize), seasonal_order: (usize, usize, usize, usize)) -> Result<Self> {
        let (p, d, q) = order;
        let (seasonal_p, seasonal_d, seasonal_q, season) = seasonal_order;
        if (seasonal_p > 0 || seasonal_d > 0 || seasonal_q > 0) && season < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "Seasonal order requires a season length of at least 2, got {}",
                season
            )));
        }
        Ok(Self {
            p,
            d,
            q,
            seasonal_p,
            seasonal_d,
            seasonal_q,
            season,
            state: None,
        })
    }

    fn ar_lags(&self) -> Vec<usize> {
        let mut lags: Vec<usize> = (1..=self.p).collect();
        lags.extend((1..=self.seasonal_p).map(|k| k * self.season));
        lags.sort_unstable();
        lags.dedup();
        lags
    }

    fn ma_lags(&self) -> Vec<usize> {
        let mut lags: Vec<usize> = (1..=self.q).collect();
        lags.extend((1..=self.seasonal_q).map(|k| k * self.season));
        lags.sort_unstable();
        lags.dedup();
        lags
    }

    /// Estimate coefficients from a series
    pub fn fit(&mut self, values: &[f64]) -> Result<()> {
        let mut stages = Vec::new();
        let mut work = values.to_vec();
        for _ in 0..self.d {
            stages.push((1, work.clone()));
            work = difference(&work, 1)?;
        }
        for _ in 0..self.seasonal_d {
            stages.push((self.season, work.clone()));
            work = difference(&work, self.season)?;
        }

        let ar_lags = self.ar_lags();
        let ma_lags = self.ma_lags();
        let max_ar = ar_lags.last().copied().unwrap_or(0);
        let max_lag = max_ar.max(ma_lags.last().copied().unwrap_or(0));
        let params = 1 + ar_lags.len() + ma_lags.len();
        let required = self.d + self.seasonal_d * self.season + max_lag + params + 1;
        if values.len() < required {
            return Err(ForecastError::InsufficientDataError {
                required,
                actual: values.len(),
            });
        }

        // Stage one: autoregressive lags only.
        let ar_coefficients = fit_lagged(&work, &ar_lags, &[], &[])?;
        let mut residuals = vec![0.0; work.len()];
        for t in max_ar..work.len() {
            let predicted = predict_lagged(&ar_coefficients, &work, &ar_lags, &residuals, &[], t);
            residuals[t] = work[t] - predicted;
        }

        // Stage two: joint fit with lagged residuals for the MA part.
        let coefficients = if ma_lags.is_empty() {
            ar_coefficients
        } else {
            fit_lagged(&work, &ar_lags, &residuals, &ma_lags)?
        };

        let mut fitted_work = work.clone();
        let mut final_residuals = vec![0.0; work.len()];
        for t in max_lag..work.len() {
            let predicted =
                predict_lagged(&coefficients, &work, &ar_lags, &final_residuals, &ma_lags, t);
            fitted_work[t] = predicted;
            final_residuals[t] = work[t] - predicted;
        }

        let fitted = integrate_fitted(values, &stages, &fitted_work);

        self.state = Some(FittedSarima {
            coefficients,
            ar_lags,
            ma_lags,
            stages,
            work,
            residuals: final_residuals,
            fitted,
        });
        Ok(())
    }

    /// One-step-ahead predictions over the training series, if fitted
    pub fn fitted_values(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.fitted.as_slice())
    }

    /// Check whether the engine holds estimated coefficients
    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Forecast `horizon` steps past the end of the training series
    pub fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| ForecastError::NotFittedError("sarima engine".to_string()))?;

        let mut extended = state.work.clone();
        let n = state.work.len();
        for k in 0..horizon {
            let t = n + k;
            let value = predict_lagged(
                &state.coefficients,
                &extended,
                &state.ar_lags,
                &state.residuals,
                &state.ma_lags,
                t,
            );
            extended.push(value);
        }
        let mut forecast_level: Vec<f64> = extended[n..].to_vec();

        // Unwind the differencing, most recent stage first.
        for (lag, series) in state.stages.iter().rev() {
            let mut upper = series.clone();
            for value in &forecast_level {
                let base = upper[upper.len() - lag];
                upper.push(base + value);
            }
            forecast_level = upper[series.len()..].to_vec();
        }
        Ok(forecast_level)
    }
}

fn difference(values: &[f64], lag: usize) -> Result<Vec<f64>> {
    if values.len() <= lag {
        return Err(ForecastError::InsufficientDataError {
            required: lag + 1,
            actual: values.len(),
        });
    }
    Ok((lag..values.len()).map(|t| values[t] - values[t - lag]).collect())
}

fn fit_lagged(
    work: &[f64],
    ar_lags: &[usize],
    residuals: &[f64],
    ma_lags: &[usize],
) -> Result<Vec<f64>> {
    let max_lag = ar_lags
        .last()
        .copied()
        .unwrap_or(0)
        .max(ma_lags.last().copied().unwrap_or(0));

    let mut features = Vec::new();
    let mut target = Vec::new();
    for t in max_lag..work.len() {
        let mut row = Vec::with_capacity(ar_lags.len() + ma_lags.len());
        for &lag in ar_lags {
            row.push(work[t - lag]);
        }
        for &lag in ma_lags {
            row.push(residuals[t - lag]);
        }
        features.push(row);
        target.push(work[t]);
    }
    if features.is_empty() {
        return Err(ForecastError::InsufficientDataError {
            required: max_lag + 1,
            actual: work.len(),
        });
    }
    least_squares(&features, &target)
}

fn predict_lagged(
    coefficients: &[f64],
    work: &[f64],
    ar_lags: &[usize],
    residuals: &[f64],
    ma_lags: &[usize],
    t: usize,
) -> f64 {
    let mut value = coefficients[0];
    let mut index = 1;
    for &lag in ar_lags {
        value += coefficients[index] * work[t - lag];
        index += 1;
    }
    for &lag in ma_lags {
        let residual = if t >= lag && t - lag < residuals.len() {
            residuals[t - lag]
        } else {
            0.0
        };
        value += coefficients[index] * residual;
        index += 1;
    }
    value
}

fn integrate_fitted(values: &[f64], stages: &[(usize, Vec<f64>)], fitted_work: &[f64]) -> Vec<f64> {
    let total_offset: usize = stages.iter().map(|(lag, _)| lag).sum();
    let mut fitted = values.to_vec();
    for t in total_offset..values.len() {
        let mut value = fitted_work[t - total_offset];
        let mut index = t - total_offset;
        for (lag, series) in stages.iter().rev() {
            value += series[index];
            index += lag;
        }
        fitted[t] = value;
    }
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trending_series(n: usize) -> Vec<f64> {
        (0..n).map(|i| 10.0 + 1.5 * i as f64).collect()
    }

    #[test]
    fn test_fit_and_forecast_linear_trend() {
        let mut engine = SarimaEngine::new((1, 1, 0), (0, 0, 0, 0)).unwrap();
        engine.fit(&trending_series(40)).unwrap();

        let forecast = engine.forecast(3).unwrap();
        assert_eq!(forecast.len(), 3);
        // Differencing a linear trend leaves a constant step of 1.5.
        for (k, value) in forecast.iter().enumerate() {
            let expected = 10.0 + 1.5 * (40 + k) as f64;
            assert!((value - expected).abs() < 0.5, "forecast {} was {}", k, value);
        }
    }

    #[test]
    fn test_fitted_values_cover_series() {
        let mut engine = SarimaEngine::new((2, 0, 1), (0, 0, 0, 0)).unwrap();
        let series: Vec<f64> = (0..50).map(|i| (i as f64 * 0.3).sin() * 4.0 + 20.0).collect();
        engine.fit(&series).unwrap();
        assert_eq!(engine.fitted_values().unwrap().len(), series.len());
    }

    #[test]
    fn test_insufficient_data_rejected() {
        let mut engine = SarimaEngine::new((1, 1, 1), (1, 1, 1, 2)).unwrap();
        let result = engine.fit(&[1.0, 2.0, 3.0]);
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientDataError { .. })
        ));
    }

    #[test]
    fn test_seasonal_order_requires_season() {
        let result = SarimaEngine::new((1, 0, 0), (1, 0, 0, 0));
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn test_forecast_before_fit_fails() {
        let engine = SarimaEngine::new((1, 0, 0), (0, 0, 0, 0)).unwrap();
        assert!(matches!(
            engine.forecast(2),
            Err(ForecastError::NotFittedError(_))
        ));
    }
}
