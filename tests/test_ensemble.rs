use chrono::{DateTime, Duration, TimeZone, Utc};
use forecast_stack::models::smoothing::TrendComponent;
use forecast_stack::{
    Aggregation, BoxedForecaster, ForecastError, Forecaster, Result, SimpleEnsemble,
    SmoothingWrapper, Target, TimeSeriesFrame, PREDICTION_COLUMN,
};

fn daily_frame(n: usize) -> TimeSeriesFrame {
    let timestamps: Vec<DateTime<Utc>> = (0..n)
        .map(|i| Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap() + Duration::days(i as i64))
        .collect();
    TimeSeriesFrame::from_index(timestamps).unwrap()
}

/// Forecaster that always predicts one constant, for aggregation checks
struct ConstantForecaster {
    name: String,
    value: f64,
    fitted: bool,
}

impl ConstantForecaster {
    fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            fitted: false,
        }
    }
}

impl Forecaster for ConstantForecaster {
    fn fit(&mut self, _x: &TimeSeriesFrame, _y: &Target) -> Result<()> {
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, x: &TimeSeriesFrame) -> Result<TimeSeriesFrame> {
        if !self.fitted {
            return Err(ForecastError::NotFittedError(self.name.clone()));
        }
        x.prediction_frame(vec![self.value; x.len()])
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

#[test]
fn test_mean_aggregation_averages_constant_learners() {
    let a = 10.0;
    let b = 16.0;
    let learners: Vec<BoxedForecaster> = vec![
        Box::new(ConstantForecaster::new("a", a)),
        Box::new(ConstantForecaster::new("b", b)),
    ];

    let frame = daily_frame(12);
    let target = Target::Values(vec![0.0; 12]);

    let mut ensemble = SimpleEnsemble::new(learners).unwrap();
    ensemble.fit(&frame, &target).unwrap();

    let prediction = ensemble.predict(&frame).unwrap();
    let values = prediction.column_values(PREDICTION_COLUMN).unwrap();
    assert_eq!(values.len(), 12);
    for value in values {
        assert_eq!(value, (a + b) / 2.0);
    }
}

#[test]
fn test_median_aggregation_ignores_outlier() {
    let learners: Vec<BoxedForecaster> = vec![
        Box::new(ConstantForecaster::new("low", 10.0)),
        Box::new(ConstantForecaster::new("mid", 11.0)),
        Box::new(ConstantForecaster::new("outlier", 1000.0)),
    ];

    let frame = daily_frame(6);
    let target = Target::Values(vec![0.0; 6]);

    let mut ensemble = SimpleEnsemble::new(learners)
        .unwrap()
        .with_aggregation(Aggregation::Median);
    ensemble.fit(&frame, &target).unwrap();

    let values = ensemble
        .predict(&frame)
        .unwrap()
        .column_values(PREDICTION_COLUMN)
        .unwrap();
    for value in values {
        assert_eq!(value, 11.0);
    }
}

#[test]
fn test_custom_aggregation_receives_learner_order() {
    let learners: Vec<BoxedForecaster> = vec![
        Box::new(ConstantForecaster::new("first", 1.0)),
        Box::new(ConstantForecaster::new("second", 2.0)),
    ];

    let frame = daily_frame(4);
    let target = Target::Values(vec![0.0; 4]);

    // Picks the first learner's value, so order must be by position.
    let mut ensemble = SimpleEnsemble::new(learners)
        .unwrap()
        .with_aggregation(Aggregation::Custom(Box::new(|row| row[0])));
    ensemble.fit(&frame, &target).unwrap();

    let values = ensemble
        .predict(&frame)
        .unwrap()
        .column_values(PREDICTION_COLUMN)
        .unwrap();
    for value in values {
        assert_eq!(value, 1.0);
    }
}

#[test]
fn test_idempotent_prediction() {
    let learners: Vec<BoxedForecaster> = vec![
        Box::new(SmoothingWrapper::new().with_name("ses")),
        Box::new(
            SmoothingWrapper::new()
                .with_name("holt")
                .with_trend(TrendComponent::Additive),
        ),
    ];

    let frame = daily_frame(25);
    let target = Target::Values((0..25).map(|i| 30.0 + 0.7 * i as f64).collect());

    let mut ensemble = SimpleEnsemble::new(learners).unwrap();
    ensemble.fit(&frame, &target).unwrap();

    let tail = frame.tail(8);
    let first = ensemble.predict(&tail).unwrap();
    let second = ensemble.predict(&tail).unwrap();
    assert!(first.frame_equal(&second));
}

#[test]
fn test_two_smoothing_learners_full_horizon() {
    let learners: Vec<BoxedForecaster> = vec![
        Box::new(
            SmoothingWrapper::new()
                .with_name("smoot_exp1")
                .with_trend(TrendComponent::Additive),
        ),
        Box::new(SmoothingWrapper::new().with_name("smoot_exp2")),
    ];

    let frame = daily_frame(30);
    let target = Target::Values((0..30).map(|i| 50.0 + 1.2 * i as f64).collect());

    let mut ensemble = SimpleEnsemble::new(learners).unwrap();
    ensemble.fit(&frame, &target).unwrap();

    let future = forecast_stack::utils::future_frame(&frame, 10).unwrap();
    let prediction = ensemble.predict(&future).unwrap();
    let values = prediction.column_values(PREDICTION_COLUMN).unwrap();

    assert_eq!(values.len(), 10);
    assert!(values.iter().all(|v| v.is_finite()));
}

#[test]
fn test_base_learner_failure_is_surfaced_with_context() {
    /// Forecaster whose fit always fails
    struct FailingForecaster;

    impl Forecaster for FailingForecaster {
        fn fit(&mut self, _x: &TimeSeriesFrame, _y: &Target) -> Result<()> {
            Err(ForecastError::DataError("native fit exploded".to_string()))
        }

        fn predict(&self, _x: &TimeSeriesFrame) -> Result<TimeSeriesFrame> {
            Err(ForecastError::NotFittedError("broken".to_string()))
        }

        fn name(&self) -> &str {
            "broken"
        }

        fn is_fitted(&self) -> bool {
            false
        }
    }

    let learners: Vec<BoxedForecaster> = vec![
        Box::new(SmoothingWrapper::new().with_name("ok")),
        Box::new(FailingForecaster),
    ];

    let frame = daily_frame(10);
    let target = Target::Values(vec![1.0; 10]);

    let mut ensemble = SimpleEnsemble::new(learners).unwrap();
    let error = ensemble.fit(&frame, &target).unwrap_err();
    match error {
        ForecastError::BaseLearnerError { name, stage, .. } => {
            assert_eq!(name, "broken");
            assert_eq!(stage, "fit");
        }
        other => panic!("expected BaseLearnerError, got {:?}", other),
    }
}
