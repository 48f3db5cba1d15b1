//! Time series frames and targets shared by every pipeline stage

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Name of the value column produced by `predict`
pub const PREDICTION_COLUMN: &str = "prediction";

/// Time-indexed table of numeric columns
///
/// Wraps a polars `DataFrame` together with the name of its time column. The
/// time column may hold epoch-millisecond integers, a temporal dtype, or
/// ISO-formatted strings; every other column is treated as an exogenous
/// feature. All operations take `&self` and hand back new frames, so a
/// caller's frame is never modified by a pipeline stage.
#[derive(Debug, Clone)]
pub struct TimeSeriesFrame {
    df: DataFrame,
    time_column: String,
}

impl TimeSeriesFrame {
    /// Create a frame from an existing DataFrame and the name of its time column
    ///
    /// Fails if the column is missing, cannot be read as timestamps, or is not
    /// strictly increasing.
    pub fn new(df: DataFrame, time_column: &str) -> Result<Self> {
        let frame = Self {
            df,
            time_column: time_column.to_string(),
        };
        let millis = frame.time_millis()?;
        for pair in millis.windows(2) {
            if pair[1] <= pair[0] {
                return Err(ForecastError::DataError(format!(
                    "Time column '{}' is not strictly increasing",
                    frame.time_column
                )));
            }
        }
        Ok(frame)
    }

    /// Create a frame holding only a time index
    pub fn from_index(timestamps: Vec<DateTime<Utc>>) -> Result<Self> {
        let date_series = Series::new(
            "date",
            timestamps
                .iter()
                .map(|d| d.timestamp_millis())
                .collect::<Vec<i64>>(),
        );
        let df = DataFrame::new(vec![date_series])?;
        Self::new(df, "date")
    }

    /// Load a frame from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P, time_column: &str) -> Result<Self> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;
        Self::new(df, time_column)
    }

    /// Get the underlying DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Get the time column name
    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Check whether the frame has no rows
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Read the time column as epoch milliseconds
    pub fn time_millis(&self) -> Result<Vec<i64>> {
        let col = self.df.column(&self.time_column).map_err(|_| {
            ForecastError::DataError(format!(
                "Time column '{}' not found in frame",
                self.time_column
            ))
        })?;

        match col.dtype() {
            DataType::Int64 => Ok(col.i64()?.into_iter().flatten().collect()),
            DataType::Datetime(unit, _) => {
                let raw: Vec<i64> = col.datetime()?.into_iter().flatten().collect();
                let millis = match unit {
                    TimeUnit::Nanoseconds => raw.iter().map(|v| v / 1_000_000).collect(),
                    TimeUnit::Microseconds => raw.iter().map(|v| v / 1_000).collect(),
                    TimeUnit::Milliseconds => raw,
                };
                Ok(millis)
            }
            DataType::Date => Ok(col
                .date()?
                .into_iter()
                .flatten()
                .map(|days| i64::from(days) * 86_400_000)
                .collect()),
            DataType::Utf8 => col
                .utf8()?
                .into_iter()
                .flatten()
                .map(parse_timestamp_millis)
                .collect(),
            other => Err(ForecastError::DataError(format!(
                "Time column '{}' has unsupported dtype {}",
                self.time_column, other
            ))),
        }
    }

    /// Read the time column as UTC timestamps
    pub fn timestamps(&self) -> Result<Vec<DateTime<Utc>>> {
        self.time_millis()?
            .into_iter()
            .map(|ms| {
                Utc.timestamp_millis_opt(ms).single().ok_or_else(|| {
                    ForecastError::DataError(format!("Timestamp {} ms is out of range", ms))
                })
            })
            .collect()
    }

    /// Infer the fixed frequency of the time index
    ///
    /// Fails with a frequency error when there are fewer than two rows or the
    /// spacing between consecutive timestamps is not constant.
    pub fn infer_frequency(&self) -> Result<Duration> {
        Ok(Duration::milliseconds(self.frequency_millis()?))
    }

    pub(crate) fn frequency_millis(&self) -> Result<i64> {
        let millis = self.time_millis()?;
        if millis.len() < 2 {
            return Err(ForecastError::FrequencyError(format!(
                "Need at least 2 observations to infer a frequency, got {}",
                millis.len()
            )));
        }
        let step = millis[1] - millis[0];
        if step <= 0 {
            return Err(ForecastError::FrequencyError(
                "Time index is not increasing".to_string(),
            ));
        }
        for (i, pair) in millis.windows(2).enumerate() {
            if pair[1] - pair[0] != step {
                return Err(ForecastError::FrequencyError(format!(
                    "Irregular spacing between rows {} and {}",
                    i,
                    i + 1
                )));
            }
        }
        Ok(step)
    }

    /// Names and dtypes of the exogenous columns, in frame order
    pub fn exogenous_columns(&self) -> Vec<(String, DataType)> {
        self.df
            .get_columns()
            .iter()
            .filter(|s| s.name() != self.time_column)
            .map(|s| (s.name().to_string(), s.dtype().clone()))
            .collect()
    }

    /// Read a column as f64 values
    pub fn column_values(&self, name: &str) -> Result<Vec<f64>> {
        let col = self.df.column(name).map_err(|_| {
            ForecastError::DataError(format!("Column '{}' not found in frame", name))
        })?;
        let casted = col.cast(&DataType::Float64).map_err(|_| {
            ForecastError::DataError(format!("Column '{}' cannot be read as f64", name))
        })?;
        Ok(casted.f64()?.into_iter().flatten().collect())
    }

    /// Exogenous columns as a row-major feature matrix
    pub fn exogenous_row_matrix(&self) -> Result<Vec<Vec<f64>>> {
        let mut columns = Vec::new();
        for (name, _) in self.exogenous_columns() {
            columns.push(self.column_values(&name)?);
        }
        let mut rows = vec![Vec::with_capacity(columns.len()); self.len()];
        for column in &columns {
            for (row, value) in rows.iter_mut().zip(column.iter()) {
                row.push(*value);
            }
        }
        Ok(rows)
    }

    /// Return a new frame with an extra column appended
    pub fn with_column(&self, series: Series) -> Result<Self> {
        let df = self.df.hstack(&[series])?;
        Ok(Self {
            df,
            time_column: self.time_column.clone(),
        })
    }

    /// Return a contiguous row slice as a new frame
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        Self {
            df: self.df.slice(offset as i64, len),
            time_column: self.time_column.clone(),
        }
    }

    /// Return the last `n` rows as a new frame
    pub fn tail(&self, n: usize) -> Self {
        let n = n.min(self.len());
        self.slice(self.len() - n, n)
    }

    /// Compare two frames for equal schema and values
    pub fn frame_equal(&self, other: &Self) -> bool {
        self.time_column == other.time_column && self.df.frame_equal(&other.df)
    }

    /// Build a prediction frame aligned to this frame's time index
    pub fn prediction_frame(&self, values: Vec<f64>) -> Result<TimeSeriesFrame> {
        if values.len() != self.len() {
            return Err(ForecastError::DataError(format!(
                "Prediction length {} does not match frame length {}",
                values.len(),
                self.len()
            )));
        }
        let time = self.df.column(&self.time_column)?.clone();
        let prediction = Series::new(PREDICTION_COLUMN, values);
        let df = DataFrame::new(vec![time, prediction])?;
        Ok(Self {
            df,
            time_column: self.time_column.clone(),
        })
    }
}

fn parse_timestamp_millis(raw: &str) -> Result<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc().timestamp_millis());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let dt = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
            ForecastError::DataError(format!("Cannot build a timestamp from '{}'", raw))
        })?;
        return Ok(dt.and_utc().timestamp_millis());
    }
    Err(ForecastError::DataError(format!(
        "Cannot parse '{}' as a timestamp",
        raw
    )))
}

/// Forecast target aligned to a frame's rows
///
/// Either a named tabular column or a flat numeric array, mirroring the two
/// container shapes callers hand in. The variant is part of the contract: no
/// stage converts one into the other, and every contract method takes the
/// target by reference.
#[derive(Debug, Clone)]
pub enum Target {
    /// Single named column
    Series(Series),
    /// Flat numeric array
    Values(Vec<f64>),
}

impl Target {
    /// Number of target rows
    pub fn len(&self) -> usize {
        match self {
            Target::Series(s) => s.len(),
            Target::Values(v) => v.len(),
        }
    }

    /// Check whether the target has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the target as f64 values
    pub fn to_vec(&self) -> Result<Vec<f64>> {
        match self {
            Target::Series(s) => {
                let casted = s.cast(&DataType::Float64).map_err(|_| {
                    ForecastError::DataError(format!(
                        "Target column '{}' cannot be read as f64",
                        s.name()
                    ))
                })?;
                Ok(casted.f64()?.into_iter().flatten().collect())
            }
            Target::Values(v) => Ok(v.clone()),
        }
    }

    /// Return a contiguous row slice, preserving the container variant
    pub fn slice(&self, offset: usize, len: usize) -> Target {
        match self {
            Target::Series(s) => Target::Series(s.slice(offset as i64, len)),
            Target::Values(v) => {
                let end = (offset + len).min(v.len());
                Target::Values(v[offset.min(v.len())..end].to_vec())
            }
        }
    }

    /// Compare two targets for equal variant and values
    pub fn equals(&self, other: &Target) -> bool {
        match (self, other) {
            (Target::Series(a), Target::Series(b)) => a.series_equal(b),
            (Target::Values(a), Target::Values(b)) => a == b,
            _ => false,
        }
    }
}
