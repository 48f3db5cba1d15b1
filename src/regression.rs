//! Generic regression estimators used by the regression wrapper and stacking

use crate::error::{ForecastError, Result};

/// Generic regression contract over row-major feature matrices
///
/// Anything implementing this trait can back a [`RegressionWrapper`] or serve
/// as the meta-model of a stacking ensemble.
///
/// [`RegressionWrapper`]: crate::wrappers::RegressionWrapper
pub trait RegressionEstimator: Send {
    /// Fit the estimator on feature rows against a target
    fn fit(&mut self, features: &[Vec<f64>], target: &[f64]) -> Result<()>;

    /// Predict a value for each feature row
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>>;

    /// Name of the estimator
    fn name(&self) -> &str;
}

/// Ordinary least squares linear regression
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    coefficients: Vec<f64>,
}

impl LinearRegression {
    /// Create an unfitted linear regression
    pub fn new() -> Self {
        Self {
            coefficients: Vec::new(),
        }
    }

    /// Fitted coefficients, intercept first
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

impl RegressionEstimator for LinearRegression {
    fn fit(&mut self, features: &[Vec<f64>], target: &[f64]) -> Result<()> {
        if features.is_empty() {
            return Err(ForecastError::DataError(
                "Cannot fit a regression on zero rows".to_string(),
            ));
        }
        if features.len() != target.len() {
            return Err(ForecastError::DataError(format!(
                "Feature rows ({}) do not match target length ({})",
                features.len(),
                target.len()
            )));
        }
        self.coefficients = least_squares(features, target)?;
        Ok(())
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        if self.coefficients.is_empty() {
            return Err(ForecastError::NotFittedError(self.name().to_string()));
        }
        let dim = self.coefficients.len() - 1;
        features
            .iter()
            .map(|row| {
                if row.len() != dim {
                    return Err(ForecastError::DataError(format!(
                        "Feature row has {} columns, model was fitted with {}",
                        row.len(),
                        dim
                    )));
                }
                let mut value = self.coefficients[0];
                for (beta, x) in self.coefficients[1..].iter().zip(row.iter()) {
                    value += beta * x;
                }
                Ok(value)
            })
            .collect()
    }

    fn name(&self) -> &str {
        "linear_regression"
    }
}

/// Solve an ordinary least squares problem, returning intercept-first coefficients
///
/// Builds the normal equations over a design matrix with a leading intercept
/// column and solves them by Gaussian elimination with partial pivoting. A tiny
/// ridge term on the non-intercept diagonal keeps the system solvable when
/// feature columns are collinear.
pub(crate) fn least_squares(features: &[Vec<f64>], target: &[f64]) -> Result<Vec<f64>> {
    let n = features.len();
    let width = features[0].len();
    for row in features {
        if row.len() != width {
            return Err(ForecastError::DataError(
                "Feature rows have inconsistent widths".to_string(),
            ));
        }
    }
    let dim = width + 1;

    let design_row = |i: usize, j: usize| -> f64 {
        if j == 0 {
            1.0
        } else {
            features[i][j - 1]
        }
    };

    let mut xtx = vec![vec![0.0; dim]; dim];
    let mut xty = vec![0.0; dim];
    for i in 0..n {
        for j in 0..dim {
            let xij = design_row(i, j);
            xty[j] += xij * target[i];
            for k in j..dim {
                xtx[j][k] += xij * design_row(i, k);
            }
        }
    }
    for j in 0..dim {
        for k in 0..j {
            xtx[j][k] = xtx[k][j];
        }
    }
    for j in 1..dim {
        xtx[j][j] += 1e-8;
    }

    solve(xtx, xty)
}

fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let mut pivot = col;
        for row in col + 1..n {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if a[pivot][col].abs() < 1e-12 {
            return Err(ForecastError::DataError(
                "Singular design matrix in least squares fit".to_string(),
            ));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for col in (0..n).rev() {
        let mut value = b[col];
        for k in col + 1..n {
            value -= a[col][k] * x[k];
        }
        x[col] = value / a[col][col];
    }
    Ok(x)
}
