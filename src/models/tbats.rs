//! BATS-family engine: Box-Cox transform, seasonal effects, damped trend,
//! optional AR(1) error correction

use crate::error::{ForecastError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for the BATS-family engine
#[derive(Debug, Clone)]
pub struct BatsConfig {
    /// Search for a Box-Cox transform before fitting
    pub use_box_cox: bool,
    /// Correct residuals with an AR(1) term
    pub use_arma_errors: bool,
    /// Seasonal cycle lengths, e.g. `[7]` for weekly patterns in daily data
    pub seasonal_periods: Vec<usize>,
    /// Seed for the smoothing-parameter search; passed through unchanged
    pub seed: Option<u64>,
}

impl Default for BatsConfig {
    fn default() -> Self {
        Self {
            use_box_cox: true,
            use_arma_errors: true,
            seasonal_periods: Vec::new(),
            seed: None,
        }
    }
}

impl BatsConfig {
    /// Fit the engine to a series
    pub fn fit(&self, values: &[f64]) -> Result<BatsFit> {
        if values.len() < 4 {
            return Err(ForecastError::InsufficientDataError {
                required: 4,
                actual: values.len(),
            });
        }
        for &period in &self.seasonal_periods {
            if period < 2 {
                return Err(ForecastError::InvalidParameter(format!(
                    "Seasonal period must be at least 2, got {}",
                    period
                )));
            }
            if values.len() < 2 * period {
                return Err(ForecastError::InsufficientDataError {
                    required: 2 * period,
                    actual: values.len(),
                });
            }
        }

        let lambda = if self.use_box_cox && values.iter().all(|&v| v > 0.0) {
            Some(select_lambda(values))
        } else {
            None
        };
        let transformed: Vec<f64> = values.iter().map(|&v| box_cox(v, lambda)).collect();

        // Remove seasonal effects period by period, phase means around a
        // least-squares trend line.
        let mut working = transformed.clone();
        let mut seasonal = Vec::with_capacity(self.seasonal_periods.len());
        for &period in &self.seasonal_periods {
            let effects = phase_effects(&working, period);
            for (t, value) in working.iter_mut().enumerate() {
                *value -= effects[t % period];
            }
            seasonal.push((period, effects));
        }

        let (alpha, beta, phi) = self.search_smoothing(&working);
        let (level, slope, mut fitted_work) = damped_holt(&working, alpha, beta, phi);

        let mut ar1 = 0.0;
        let mut last_residual = 0.0;
        if self.use_arma_errors {
            let residuals: Vec<f64> = working
                .iter()
                .zip(fitted_work.iter())
                .map(|(actual, fitted)| actual - fitted)
                .collect();
            ar1 = lag1_autocorrelation(&residuals);
            for t in 1..fitted_work.len() {
                fitted_work[t] += ar1 * residuals[t - 1];
            }
            last_residual = working[working.len() - 1] - fitted_work[fitted_work.len() - 1];
        }

        let fitted = (0..values.len())
            .map(|t| {
                let mut z = fitted_work[t];
                for (period, effects) in &seasonal {
                    z += effects[t % period];
                }
                inverse_box_cox(z, lambda)
            })
            .collect();

        Ok(BatsFit {
            lambda,
            seasonal,
            level,
            slope,
            damping: phi,
            ar1,
            last_residual,
            n_obs: values.len(),
            fitted,
        })
    }

    fn search_smoothing(&self, values: &[f64]) -> (f64, f64, f64) {
        let mut candidates = vec![
            (0.2, 0.05, 0.9),
            (0.3, 0.1, 0.98),
            (0.5, 0.1, 0.9),
            (0.8, 0.3, 0.8),
        ];
        let mut rng = StdRng::seed_from_u64(self.seed.unwrap_or(0));
        for _ in 0..8 {
            candidates.push((
                rng.gen_range(0.05..0.95),
                rng.gen_range(0.01..0.5),
                rng.gen_range(0.7..0.99),
            ));
        }

        let mut best = candidates[0];
        let mut best_sse = f64::INFINITY;
        for &(alpha, beta, phi) in &candidates {
            let (_, _, fitted) = damped_holt(values, alpha, beta, phi);
            let sse: f64 = values
                .iter()
                .zip(fitted.iter())
                .map(|(actual, predicted)| (actual - predicted).powi(2))
                .sum();
            if sse < best_sse {
                best_sse = sse;
                best = (alpha, beta, phi);
            }
        }
        best
    }
}

/// Fitted BATS-family state
#[derive(Debug, Clone)]
pub struct BatsFit {
    lambda: Option<f64>,
    seasonal: Vec<(usize, Vec<f64>)>,
    level: f64,
    slope: f64,
    damping: f64,
    ar1: f64,
    last_residual: f64,
    n_obs: usize,
    fitted: Vec<f64>,
}

impl BatsFit {
    /// One-step-ahead predictions over the training series
    pub fn in_sample(&self) -> &[f64] {
        &self.fitted
    }

    /// Forecast `horizon` steps past the end of the training series
    pub fn project(&self, horizon: usize) -> Vec<f64> {
        let mut damped_sum = 0.0;
        let mut damping_power = 1.0;
        (1..=horizon)
            .map(|k| {
                damping_power *= self.damping;
                damped_sum += damping_power;
                let mut z = self.level + damped_sum * self.slope;
                for (period, effects) in &self.seasonal {
                    z += effects[(self.n_obs + k - 1) % period];
                }
                z += self.ar1.powi(k as i32) * self.last_residual;
                inverse_box_cox(z, self.lambda)
            })
            .collect()
    }
}

fn box_cox(value: f64, lambda: Option<f64>) -> f64 {
    match lambda {
        None => value,
        Some(l) if l.abs() < 1e-9 => value.ln(),
        Some(l) => (value.powf(l) - 1.0) / l,
    }
}

fn inverse_box_cox(value: f64, lambda: Option<f64>) -> f64 {
    match lambda {
        None => value,
        Some(l) if l.abs() < 1e-9 => value.exp(),
        Some(l) => (l * value + 1.0).max(1e-9).powf(1.0 / l),
    }
}

fn select_lambda(values: &[f64]) -> f64 {
    let grid = [0.0, 0.25, 0.5, 0.75, 1.0];
    let mut best = 1.0;
    let mut best_score = f64::INFINITY;
    for &lambda in &grid {
        let transformed: Vec<f64> = values.iter().map(|&v| box_cox(v, Some(lambda))).collect();
        let diffs: Vec<f64> = transformed.windows(2).map(|w| w[1] - w[0]).collect();
        let mean = diffs.iter().sum::<f64>() / diffs.len() as f64;
        let variance =
            diffs.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / diffs.len() as f64;
        let scale = transformed.iter().map(|v| v.abs()).sum::<f64>() / transformed.len() as f64;
        let score = variance / (scale * scale + 1.0);
        if score < best_score {
            best_score = score;
            best = lambda;
        }
    }
    best
}

fn phase_effects(values: &[f64], period: usize) -> Vec<f64> {
    // Phase means of the detrended series, centered to sum to zero.
    let n = values.len() as f64;
    let mean_t = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var = 0.0;
    for (t, &y) in values.iter().enumerate() {
        let dt = t as f64 - mean_t;
        cov += dt * (y - mean_y);
        var += dt * dt;
    }
    let slope = if var > 0.0 { cov / var } else { 0.0 };

    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (t, &y) in values.iter().enumerate() {
        let detrended = y - (mean_y + slope * (t as f64 - mean_t));
        sums[t % period] += detrended;
        counts[t % period] += 1;
    }
    let mut effects: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(sum, &count)| if count > 0 { sum / count as f64 } else { 0.0 })
        .collect();
    let center = effects.iter().sum::<f64>() / period as f64;
    for effect in &mut effects {
        *effect -= center;
    }
    effects
}

fn damped_holt(values: &[f64], alpha: f64, beta: f64, phi: f64) -> (f64, f64, Vec<f64>) {
    let mut level = values[0];
    let mut slope = if values.len() > 1 {
        values[1] - values[0]
    } else {
        0.0
    };
    let mut fitted = Vec::with_capacity(values.len());
    fitted.push(level);
    for &value in &values[1..] {
        fitted.push(level + phi * slope);
        let previous_level = level;
        level = alpha * value + (1.0 - alpha) * (level + phi * slope);
        slope = beta * (level - previous_level) + (1.0 - beta) * phi * slope;
    }
    (level, slope, fitted)
}

fn lag1_autocorrelation(residuals: &[f64]) -> f64 {
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for t in 1..residuals.len() {
        numerator += residuals[t] * residuals[t - 1];
        denominator += residuals[t - 1] * residuals[t - 1];
    }
    if denominator > 1e-12 {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn seasonal_series(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 50.0 + 0.5 * i as f64 + 5.0 * ((i % 7) as f64 - 3.0))
            .collect()
    }

    #[test]
    fn test_fit_and_project() {
        let config = BatsConfig {
            seasonal_periods: vec![7],
            ..BatsConfig::default()
        };
        let fit = config.fit(&seasonal_series(70)).unwrap();

        assert_eq!(fit.in_sample().len(), 70);
        let projection = fit.project(7);
        assert_eq!(projection.len(), 7);
        assert!(projection.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_seed_makes_fit_deterministic() {
        let config = BatsConfig {
            seed: Some(42),
            ..BatsConfig::default()
        };
        let series = seasonal_series(40);
        let first = config.fit(&series).unwrap();
        let second = config.fit(&series).unwrap();
        assert_eq!(first.project(5), second.project(5));
    }

    #[test]
    fn test_box_cox_round_trip() {
        for &lambda in &[Some(0.0), Some(0.5), Some(1.0), None] {
            let value = 42.5;
            assert_approx_eq!(inverse_box_cox(box_cox(value, lambda), lambda), value, 1e-9);
        }
    }

    #[test]
    fn test_short_series_rejected() {
        let config = BatsConfig::default();
        assert!(matches!(
            config.fit(&[1.0, 2.0]),
            Err(ForecastError::InsufficientDataError { .. })
        ));
    }

    #[test]
    fn test_period_longer_than_series_rejected() {
        let config = BatsConfig {
            seasonal_periods: vec![30],
            ..BatsConfig::default()
        };
        let result = config.fit(&seasonal_series(20));
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientDataError { .. })
        ));
    }
}
