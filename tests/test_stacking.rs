use chrono::{DateTime, Duration, TimeZone, Utc};
use forecast_stack::models::smoothing::TrendComponent;
use forecast_stack::{
    BoxedForecaster, ForecastError, Forecaster, LinearRegression, Result, SmoothingWrapper,
    StackingEnsemble, Target, TimeSeriesFrame, PREDICTION_COLUMN,
};
use std::cell::RefCell;
use std::rc::Rc;

fn daily_frame(n: usize) -> TimeSeriesFrame {
    let timestamps: Vec<DateTime<Utc>> = (0..n)
        .map(|i| Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap() + Duration::days(i as i64))
        .collect();
    TimeSeriesFrame::from_index(timestamps).unwrap()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    FitEnd(i64),
    PredictStart(i64),
}

/// Forecaster that records the time windows it is fit on and asked to predict
struct ProbeForecaster {
    name: String,
    log: Rc<RefCell<Vec<Event>>>,
    fitted: bool,
}

impl Forecaster for ProbeForecaster {
    fn fit(&mut self, x: &TimeSeriesFrame, _y: &Target) -> Result<()> {
        let millis = x.time_millis()?;
        self.log
            .borrow_mut()
            .push(Event::FitEnd(*millis.last().unwrap()));
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, x: &TimeSeriesFrame) -> Result<TimeSeriesFrame> {
        let millis = x.time_millis()?;
        self.log
            .borrow_mut()
            .push(Event::PredictStart(*millis.first().unwrap()));
        x.prediction_frame(vec![1.0; x.len()])
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

#[test]
fn test_meta_features_never_leak_training_rows() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let learners: Vec<BoxedForecaster> = vec![
        Box::new(ProbeForecaster {
            name: "probe".to_string(),
            log: Rc::clone(&log),
            fitted: false,
        }),
        Box::new(
            SmoothingWrapper::new()
                .with_name("holt")
                .with_trend(TrendComponent::Additive),
        ),
    ];

    let frame = daily_frame(40);
    let target = Target::Values((0..40).map(|i| 10.0 + 0.5 * i as f64).collect());

    let mut ensemble =
        StackingEnsemble::new(learners, Box::new(LinearRegression::new())).unwrap();
    ensemble.fit(&frame, &target).unwrap();

    // Every out-of-fold predict must start strictly after the training window
    // that immediately preceded it; the final event is the full re-fit.
    let events = log.borrow();
    let mut pairs = 0;
    let mut last_fit_end = None;
    for event in events.iter() {
        match event {
            Event::FitEnd(end) => last_fit_end = Some(*end),
            Event::PredictStart(start) => {
                let fit_end = last_fit_end.expect("predict before any fit");
                assert!(
                    *start > fit_end,
                    "out-of-fold prediction started at {} inside window ending {}",
                    start,
                    fit_end
                );
                pairs += 1;
            }
        }
    }
    assert_eq!(pairs, 3, "expected one out-of-fold predict per fold");
    assert!(matches!(events.last(), Some(Event::FitEnd(_))));
}

#[test]
fn test_insufficient_data_for_two_folds() {
    let learners: Vec<BoxedForecaster> = vec![
        Box::new(
            SmoothingWrapper::new()
                .with_name("smoot_exp1")
                .with_trend(TrendComponent::Additive),
        ),
        Box::new(SmoothingWrapper::new().with_name("smoot_exp2")),
    ];

    let frame = daily_frame(3);
    let target = Target::Values(vec![1.0, 2.0, 3.0]);

    let mut ensemble =
        StackingEnsemble::new(learners, Box::new(LinearRegression::new())).unwrap();
    let result = ensemble.fit(&frame, &target);
    assert!(matches!(
        result,
        Err(ForecastError::InsufficientDataError { .. })
    ));
}

#[test]
fn test_stacked_forecast_tracks_trend() {
    let learners: Vec<BoxedForecaster> = vec![
        Box::new(
            SmoothingWrapper::new()
                .with_name("holt")
                .with_trend(TrendComponent::Additive),
        ),
        Box::new(SmoothingWrapper::new().with_name("ses")),
    ];

    let frame = daily_frame(60);
    let target = Target::Values((0..60).map(|i| 20.0 + 1.0 * i as f64).collect());

    let mut ensemble =
        StackingEnsemble::new(learners, Box::new(LinearRegression::new())).unwrap();
    ensemble.fit(&frame, &target).unwrap();

    let future = forecast_stack::utils::future_frame(&frame, 5).unwrap();
    let values = ensemble
        .predict(&future)
        .unwrap()
        .column_values(PREDICTION_COLUMN)
        .unwrap();

    // The Holt learner tracks the slope, so the combined forecast should keep
    // rising past the last training value.
    assert!(values[4] > values[0]);
    assert!(values[0] > 60.0);
}

#[test]
fn test_idempotent_prediction_after_stacking_fit() {
    let learners: Vec<BoxedForecaster> = vec![
        Box::new(SmoothingWrapper::new().with_name("ses")),
        Box::new(
            SmoothingWrapper::new()
                .with_name("holt")
                .with_trend(TrendComponent::Additive),
        ),
    ];

    let frame = daily_frame(40);
    let target = Target::Values((0..40).map(|i| 10.0 + 0.5 * i as f64).collect());

    let mut ensemble =
        StackingEnsemble::new(learners, Box::new(LinearRegression::new())).unwrap();
    ensemble.fit(&frame, &target).unwrap();

    let tail = frame.tail(6);
    let first = ensemble.predict(&tail).unwrap();
    let second = ensemble.predict(&tail).unwrap();
    assert!(first.frame_equal(&second));
}
