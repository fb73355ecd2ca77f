//! Historic quote models

use chrono::NaiveDate;

/// One row of a company's historic price table.
///
/// The series is kept ascending by date with one row per trading day. The
/// usual `low <= min(open, close) <= max(open, close) <= high` relationship
/// is assumed from the source and not validated here; a malformed price cell
/// propagates as NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyQuote {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
}
