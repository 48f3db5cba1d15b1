//! # Forecast Stack
//!
//! A Rust library that puts heterogeneous time series forecasting models
//! behind one fit/predict contract so they can be composed into pipelines and
//! ensembles.
//!
//! ## Features
//!
//! - Time-indexed frames backed by polars, with frequency inference and
//!   exogenous column handling
//! - Wrapper adapters for exponential smoothing, seasonal ARIMA, BATS-family
//!   and additive-component engines, plus a wrapper for any generic
//!   regression estimator
//! - Simple ensembles (mean, median or custom aggregation) and stacking
//!   ensembles with leakage-free temporal cross-validation
//! - Holiday feature extraction and sequential pipeline composition
//! - Forecast accuracy metrics
//!
//! Every wrapper and ensemble implements the same [`Forecaster`] trait, so an
//! ensemble can stand in wherever a single model is expected and vice versa.
//! No stage ever mutates the caller's frame or target.
//!
//! ## Quick Start
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use forecast_stack::{
//!     BoxedForecaster, Forecaster, SimpleEnsemble, SmoothingWrapper, Target, TimeSeriesFrame,
//!     TrendComponent,
//! };
//!
//! let timestamps: Vec<_> = (0..30i64)
//!     .map(|i| Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap() + Duration::days(i))
//!     .collect();
//! let x = TimeSeriesFrame::from_index(timestamps).unwrap();
//! let y = Target::Values((0..30).map(|i| 10.0 + 0.5 * i as f64).collect());
//!
//! let base_learners: Vec<BoxedForecaster> = vec![
//!     Box::new(SmoothingWrapper::new().with_name("ses")),
//!     Box::new(
//!         SmoothingWrapper::new()
//!             .with_name("holt")
//!             .with_trend(TrendComponent::Additive),
//!     ),
//! ];
//! let mut ensemble = SimpleEnsemble::new(base_learners).unwrap();
//! ensemble.fit(&x, &y).unwrap();
//!
//! let prediction = ensemble.predict(&x.tail(5)).unwrap();
//! assert_eq!(prediction.len(), 5);
//! ```

pub mod data;
pub mod ensemble;
pub mod error;
pub mod feature_extraction;
pub mod metrics;
pub mod model_selection;
pub mod models;
pub mod pipeline;
pub mod regression;
pub mod utils;
pub mod wrappers;

// Re-export commonly used types
pub use crate::data::{Target, TimeSeriesFrame, PREDICTION_COLUMN};
pub use crate::ensemble::{Aggregation, SimpleEnsemble, StackingEnsemble};
pub use crate::error::{ForecastError, Result};
pub use crate::feature_extraction::{Country, HolidayTransformer, Transform, HOLIDAY_COLUMN};
pub use crate::metrics::{evaluate_forecast, ForecastMetrics};
pub use crate::model_selection::TimeSeriesSplit;
pub use crate::models::smoothing::TrendComponent;
pub use crate::pipeline::Pipeline;
pub use crate::regression::{LinearRegression, RegressionEstimator};
pub use crate::wrappers::{
    AdditiveWrapper, BoxedForecaster, Forecaster, RegressionWrapper, SarimaWrapper,
    SmoothingWrapper, TbatsWrapper,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
