//! Feature transformers that derive extra columns from the time index

use crate::data::{Target, TimeSeriesFrame};
use crate::error::{ForecastError, Result};
use chrono::{Datelike, Duration, NaiveDate};
use polars::prelude::{NamedFrom, Series};

/// Name of the column added by [`HolidayTransformer`]
pub const HOLIDAY_COLUMN: &str = "holiday";

/// Common interface for feature transformers
///
/// A transformer learns from the frame during `fit` and hands back a new frame
/// with extra columns from `transform`, leaving the input and the target
/// untouched. A sequence of transformers composes left to right.
pub trait Transform {
    /// Learn any stateful parameters from the frame
    fn fit(&mut self, x: &TimeSeriesFrame, y: Option<&Target>) -> Result<()>;

    /// Return a new frame with generated columns appended
    fn transform(&self, x: &TimeSeriesFrame) -> Result<TimeSeriesFrame>;

    /// Fit on the frame and transform it in one call
    fn fit_transform(&mut self, x: &TimeSeriesFrame, y: Option<&Target>) -> Result<TimeSeriesFrame> {
        self.fit(x, y)?;
        self.transform(x)
    }

    /// Name of this transformer
    fn name(&self) -> &str;
}

/// Supported holiday calendars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Country {
    Germany,
    UnitedStates,
    UnitedKingdom,
}

impl Country {
    /// Resolve an ISO-3166 country code
    pub fn from_code(code: &str) -> Result<Self> {
        match code.to_ascii_uppercase().as_str() {
            "DE" => Ok(Country::Germany),
            "US" => Ok(Country::UnitedStates),
            "GB" | "UK" => Ok(Country::UnitedKingdom),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unsupported country code '{}'",
                other
            ))),
        }
    }

    /// Public holidays of this country for one year
    pub fn holidays(&self, year: i32) -> Vec<NaiveDate> {
        let fixed: &[(u32, u32)] = match self {
            Country::Germany => &[(1, 1), (5, 1), (10, 3), (12, 25), (12, 26)],
            Country::UnitedStates => &[(1, 1), (7, 4), (11, 11), (12, 25)],
            Country::UnitedKingdom => &[(1, 1), (12, 25), (12, 26)],
        };
        let mut days: Vec<NaiveDate> = fixed
            .iter()
            .filter_map(|&(month, day)| NaiveDate::from_ymd_opt(year, month, day))
            .collect();

        if let Some(easter) = easter_sunday(year) {
            let moving: &[i64] = match self {
                // Good Friday, Easter Monday, Ascension, Whit Monday.
                Country::Germany => &[-2, 1, 39, 50],
                Country::UnitedStates => &[],
                Country::UnitedKingdom => &[-2, 1],
            };
            days.extend(moving.iter().map(|&offset| easter + Duration::days(offset)));
        }
        days.sort_unstable();
        days
    }
}

/// Easter Sunday by the anonymous Gregorian computus
fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Adds a 0/1 holiday flag column derived from a country calendar
#[derive(Debug, Clone)]
pub struct HolidayTransformer {
    country: Country,
    fitted: bool,
}

impl HolidayTransformer {
    /// Create a transformer for a country
    pub fn new(country: Country) -> Self {
        Self {
            country,
            fitted: false,
        }
    }

    /// Create a transformer from an ISO country code
    pub fn from_code(code: &str) -> Result<Self> {
        Ok(Self::new(Country::from_code(code)?))
    }

    /// The configured country
    pub fn country(&self) -> Country {
        self.country
    }
}

impl Transform for HolidayTransformer {
    fn fit(&mut self, x: &TimeSeriesFrame, _y: Option<&Target>) -> Result<()> {
        // The calendar is fixed per country; fit only checks the index reads.
        x.timestamps()?;
        self.fitted = true;
        Ok(())
    }

    fn transform(&self, x: &TimeSeriesFrame) -> Result<TimeSeriesFrame> {
        if !self.fitted {
            return Err(ForecastError::NotFittedError(self.name().to_string()));
        }
        let timestamps = x.timestamps()?;
        let mut years: Vec<i32> = timestamps.iter().map(|ts| ts.year()).collect();
        years.sort_unstable();
        years.dedup();

        let mut holidays = Vec::new();
        for year in years {
            holidays.extend(self.country.holidays(year));
        }

        let flags: Vec<f64> = timestamps
            .iter()
            .map(|ts| {
                if holidays.contains(&ts.date_naive()) {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();
        x.with_column(Series::new(HOLIDAY_COLUMN, flags))
    }

    fn name(&self) -> &str {
        "holiday_transformer"
    }
}
