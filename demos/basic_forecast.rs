//! Basic forecasting walkthrough: build a frame, fit a wrapper, score it.
//!
//! Run with: cargo run --example basic_forecast

use chrono::{Duration, TimeZone, Utc};
use forecast_stack::models::smoothing::TrendComponent;
use forecast_stack::{
    evaluate_forecast, Forecaster, SmoothingWrapper, Target, TimeSeriesFrame, PREDICTION_COLUMN,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() {
    let mut rng = StdRng::seed_from_u64(7);

    let timestamps: Vec<_> = (0..90i64)
        .map(|i| Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap() + Duration::days(i))
        .collect();
    let values: Vec<f64> = (0..90)
        .map(|i| 200.0 + 1.5 * i as f64 + rng.gen_range(-3.0..3.0))
        .collect();

    let frame = TimeSeriesFrame::from_index(timestamps).expect("valid daily index");
    let target = Target::Values(values.clone());

    let mut model = SmoothingWrapper::new()
        .with_name("holt")
        .with_trend(TrendComponent::Additive);
    model.fit(&frame, &target).expect("fit succeeds");

    // Score the in-sample fit.
    let in_sample = model.predict(&frame).expect("predict succeeds");
    let predicted = in_sample.column_values(PREDICTION_COLUMN).unwrap();
    let metrics = evaluate_forecast(&predicted, &values).unwrap();
    println!("{}", metrics);

    // Forecast the next two weeks.
    let future = forecast_stack::utils::future_frame(&frame, 14).unwrap();
    let forecast = model.predict(&future).expect("forecast succeeds");
    println!("14-day forecast:");
    for (ts, value) in future
        .timestamps()
        .unwrap()
        .iter()
        .zip(forecast.column_values(PREDICTION_COLUMN).unwrap())
    {
        println!("  {}  {:.2}", ts.date_naive(), value);
    }
}
