//! Utility functions for building forecast horizons

use crate::data::TimeSeriesFrame;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};

/// Create future timestamps continuing a series
pub fn future_timestamps(
    last_timestamp: DateTime<Utc>,
    horizon: usize,
    step: Duration,
) -> Vec<DateTime<Utc>> {
    let mut timestamps = Vec::with_capacity(horizon);
    let mut current = last_timestamp;
    for _ in 0..horizon {
        current = current + step;
        timestamps.push(current);
    }
    timestamps
}

/// Build a frame holding the next `horizon` timestamps after `frame`
///
/// The frame's frequency must be inferable. The result carries only the time
/// index, so it suits forecasters fitted without exogenous columns.
pub fn future_frame(frame: &TimeSeriesFrame, horizon: usize) -> Result<TimeSeriesFrame> {
    let step = frame.infer_frequency()?;
    let timestamps = frame.timestamps()?;
    let last = *timestamps.last().ok_or_else(|| {
        ForecastError::DataError("Cannot extend an empty frame".to_string())
    })?;
    TimeSeriesFrame::from_index(future_timestamps(last, horizon, step))
}
