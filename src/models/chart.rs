//! Chart generation models

/// Box geometry for one trading day.
///
/// The box spans the day's open and close, the whiskers mark the day's true
/// extremes. Median and outliers are deliberately absent: the renderer draws
/// neither for this chart type.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlotSpec {
    pub lower_box: f64,
    pub upper_box: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub label: String,
}

/// Box color, a pure function of sign(close - open).
///
/// A day that closes exactly where it opened counts as `Down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxColor {
    Up,
    Down,
}
