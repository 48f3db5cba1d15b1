//! Ensemble walkthrough: simple aggregation and stacking over one series.
//!
//! Run with: cargo run --example ensemble_forecast

use chrono::{Duration, TimeZone, Utc};
use forecast_stack::models::smoothing::TrendComponent;
use forecast_stack::{
    Aggregation, BoxedForecaster, Forecaster, LinearRegression, SimpleEnsemble, SmoothingWrapper,
    StackingEnsemble, Target, TimeSeriesFrame, PREDICTION_COLUMN,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn learners() -> Vec<BoxedForecaster> {
    vec![
        Box::new(SmoothingWrapper::new().with_name("ses")),
        Box::new(
            SmoothingWrapper::new()
                .with_name("holt")
                .with_trend(TrendComponent::Additive),
        ),
    ]
}

fn main() {
    let mut rng = StdRng::seed_from_u64(21);

    let timestamps: Vec<_> = (0..120i64)
        .map(|i| Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap() + Duration::days(i))
        .collect();
    let values: Vec<f64> = (0..120)
        .map(|i| 80.0 + 0.6 * i as f64 + 4.0 * ((i % 7) as f64 - 3.0) + rng.gen_range(-2.0..2.0))
        .collect();

    let frame = TimeSeriesFrame::from_index(timestamps).expect("valid daily index");
    let target = Target::Values(values);

    // Mean aggregation over two smoothing variants.
    let mut mean_ensemble = SimpleEnsemble::new(learners()).expect("non-empty ensemble");
    mean_ensemble.fit(&frame, &target).expect("fit succeeds");

    let future = forecast_stack::utils::future_frame(&frame, 7).unwrap();
    let mean_forecast = mean_ensemble.predict(&future).expect("predict succeeds");
    println!("Mean ensemble, next 7 days:");
    for value in mean_forecast.column_values(PREDICTION_COLUMN).unwrap() {
        println!("  {:.2}", value);
    }

    // Median is robust to one learner going astray.
    let mut median_ensemble = SimpleEnsemble::new(learners())
        .expect("non-empty ensemble")
        .with_aggregation(Aggregation::Median);
    median_ensemble.fit(&frame, &target).expect("fit succeeds");
    let median_forecast = median_ensemble.predict(&future).expect("predict succeeds");
    println!("Median ensemble, day 7: {:.2}", median_forecast.column_values(PREDICTION_COLUMN).unwrap()[6]);

    // Stacking learns the combination from out-of-fold predictions.
    let mut stacked = StackingEnsemble::new(learners(), Box::new(LinearRegression::new()))
        .expect("non-empty ensemble");
    stacked.fit(&frame, &target).expect("fit succeeds");
    let stacked_forecast = stacked.predict(&future).expect("predict succeeds");
    println!("Stacking ensemble, next 7 days:");
    for value in stacked_forecast.column_values(PREDICTION_COLUMN).unwrap() {
        println!("  {:.2}", value);
    }
}
