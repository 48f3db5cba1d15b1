//! Additive-component engine: linear trend plus calendar seasonalities
//!
//! Unlike the other engines this one is timestamp-aware: it fits and predicts
//! against actual dates, so weekly and yearly effects survive gaps in the
//! requested horizon.

use crate::error::{ForecastError, Result};
use crate::regression::least_squares;
use chrono::{DateTime, Datelike, Utc};

const MILLIS_PER_DAY: f64 = 86_400_000.0;
const DAYS_PER_YEAR: f64 = 365.25;

/// Component selection for the additive engine
#[derive(Debug, Clone)]
pub struct ComponentSpec {
    /// Day-of-week effects
    pub weekly: bool,
    /// Yearly effects as Fourier terms
    pub yearly: bool,
    /// Number of yearly Fourier harmonics
    pub fourier_order: usize,
}

impl Default for ComponentSpec {
    fn default() -> Self {
        Self {
            weekly: true,
            yearly: true,
            fourier_order: 3,
        }
    }
}

impl ComponentSpec {
    /// Fit trend and seasonal components against timestamps
    pub fn fit(&self, timestamps: &[DateTime<Utc>], values: &[f64]) -> Result<FittedComponents> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::DataError(format!(
                "Timestamps ({}) and values ({}) differ in length",
                timestamps.len(),
                values.len()
            )));
        }
        let columns = self.feature_columns();
        let required = columns + 2;
        if values.len() < required {
            return Err(ForecastError::InsufficientDataError {
                required,
                actual: values.len(),
            });
        }

        let origin_millis = timestamps[0].timestamp_millis();
        let features: Vec<Vec<f64>> = timestamps
            .iter()
            .map(|ts| self.feature_row(ts, origin_millis))
            .collect();
        let coefficients = least_squares(&features, values)?;

        let fitted = features
            .iter()
            .map(|row| evaluate(&coefficients, row))
            .collect();

        Ok(FittedComponents {
            spec: self.clone(),
            origin_millis,
            coefficients,
            fitted,
        })
    }

    fn feature_columns(&self) -> usize {
        let mut columns = 1;
        if self.weekly {
            columns += 6;
        }
        if self.yearly {
            columns += 2 * self.fourier_order;
        }
        columns
    }

    fn feature_row(&self, timestamp: &DateTime<Utc>, origin_millis: i64) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.feature_columns());
        let days = (timestamp.timestamp_millis() - origin_millis) as f64 / MILLIS_PER_DAY;
        row.push(days);

        if self.weekly {
            // Monday is the reference day, the other six get a dummy each.
            let weekday = timestamp.weekday().num_days_from_monday() as usize;
            for day in 1..7 {
                row.push(if weekday == day { 1.0 } else { 0.0 });
            }
        }

        if self.yearly {
            let day_of_year = timestamp.ordinal0() as f64;
            for harmonic in 1..=self.fourier_order {
                let angle =
                    2.0 * std::f64::consts::PI * harmonic as f64 * day_of_year / DAYS_PER_YEAR;
                row.push(angle.sin());
                row.push(angle.cos());
            }
        }
        row
    }
}

/// Fitted additive components
#[derive(Debug, Clone)]
pub struct FittedComponents {
    spec: ComponentSpec,
    origin_millis: i64,
    coefficients: Vec<f64>,
    fitted: Vec<f64>,
}

impl FittedComponents {
    /// Predictions over the training timestamps
    pub fn in_sample(&self) -> &[f64] {
        &self.fitted
    }

    /// Evaluate the components at arbitrary timestamps
    pub fn predict_at(&self, timestamps: &[DateTime<Utc>]) -> Vec<f64> {
        timestamps
            .iter()
            .map(|ts| {
                let row = self.spec.feature_row(ts, self.origin_millis);
                evaluate(&self.coefficients, &row)
            })
            .collect()
    }
}

fn evaluate(coefficients: &[f64], row: &[f64]) -> f64 {
    let mut value = coefficients[0];
    for (beta, x) in coefficients[1..].iter().zip(row.iter()) {
        value += beta * x;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use chrono::{Duration, TimeZone};

    fn daily(n: usize) -> Vec<DateTime<Utc>> {
        (0..n)
            .map(|i| {
                Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap() + Duration::days(i as i64)
            })
            .collect()
    }

    #[test]
    fn test_recovers_trend_without_seasonality() {
        let spec = ComponentSpec {
            weekly: false,
            yearly: false,
            fourier_order: 0,
        };
        let timestamps = daily(30);
        let values: Vec<f64> = (0..30).map(|i| 100.0 + 2.0 * i as f64).collect();
        let fit = spec.fit(&timestamps, &values).unwrap();

        let future = vec![timestamps[29] + Duration::days(1)];
        let predicted = fit.predict_at(&future);
        assert_approx_eq!(predicted[0], 160.0, 1e-6);
    }

    #[test]
    fn test_weekly_effects_repeat() {
        let spec = ComponentSpec {
            weekly: true,
            yearly: false,
            fourier_order: 0,
        };
        let timestamps = daily(28);
        // Saturday and Sunday dip by 10.
        let values: Vec<f64> = timestamps
            .iter()
            .map(|ts| {
                if ts.weekday().num_days_from_monday() >= 5 {
                    40.0
                } else {
                    50.0
                }
            })
            .collect();
        let fit = spec.fit(&timestamps, &values).unwrap();

        let next_week = daily(35)[28..].to_vec();
        let predicted = fit.predict_at(&next_week);
        for (ts, value) in next_week.iter().zip(predicted.iter()) {
            let expected = if ts.weekday().num_days_from_monday() >= 5 {
                40.0
            } else {
                50.0
            };
            assert_approx_eq!(*value, expected, 0.5);
        }
    }

    #[test]
    fn test_too_short_series_rejected() {
        let spec = ComponentSpec::default();
        let timestamps = daily(4);
        let values = vec![1.0; 4];
        assert!(matches!(
            spec.fit(&timestamps, &values),
            Err(ForecastError::InsufficientDataError { .. })
        ));
    }
}
