use std::path::{Path, PathBuf};

use chrono::Local;
use plotters::prelude::*;
use tracing::info;

use crate::models::{BoxColor, BoxPlotSpec, DailyQuote};
use crate::utils::errors::AppError;

/// Convert a series of daily quotes into box geometry plus a parallel color
/// sequence, one entry per quote, order preserved.
///
/// The box spans open and close; the whiskers always mark the day's true
/// extremes regardless of which edge the open ended up on. A day that closes
/// exactly where it opened takes the else-branch and counts as `Down` - the
/// chart has always shown flat days red and downstream color expectations
/// may depend on it.
pub fn build_box_plots(quotes: &[DailyQuote]) -> (Vec<BoxPlotSpec>, Vec<BoxColor>) {
    let mut specs = Vec::with_capacity(quotes.len());
    let mut colors = Vec::with_capacity(quotes.len());

    for quote in quotes {
        let (lower_box, upper_box, color) = if quote.open < quote.close {
            (quote.open, quote.close, BoxColor::Up)
        } else {
            (quote.close, quote.open, BoxColor::Down)
        };
        specs.push(BoxPlotSpec {
            lower_box,
            upper_box,
            whisker_low: quote.low,
            whisker_high: quote.high,
            label: quote.date.format("%d-%m-%Y").to_string(),
        });
        colors.push(color);
    }

    (specs, colors)
}

/// `output/{ISO date} {Company}.png`. A second run on the same day for the
/// same company silently overwrites the earlier image; accepted behavior.
pub fn output_path(company: &str) -> PathBuf {
    let file_name = format!("{} {}.png", Local::now().date_naive(), company);
    PathBuf::from("output").join(file_name)
}

/// Render the box plots to a PNG. Box i is filled green for `Up` days and
/// red for `Down` days, with the whisker line spanning the day's extremes
/// and the date label rotated under each box.
pub fn render_chart(
    specs: &[BoxPlotSpec],
    colors: &[BoxColor],
    company: &str,
    path: &Path,
) -> Result<(), AppError> {
    if specs.is_empty() {
        return Err(AppError::Chart("no quotes to draw".to_string()));
    }

    // Scale the y axis to the whisker extremes with some padding
    let min_price = specs
        .iter()
        .map(|s| s.whisker_low)
        .fold(f64::INFINITY, f64::min);
    let max_price = specs
        .iter()
        .map(|s| s.whisker_high)
        .fold(f64::NEG_INFINITY, f64::max);
    let padding = (max_price - min_price).max(1e-8) * 0.1;
    let y_range = (min_price - padding)..(max_price + padding);

    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| AppError::Chart(format!("Failed to fill canvas: {}", e)))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} - VALUES FOR THE LAST MONTH", company),
            ("sans-serif", 30.0).into_font(),
        )
        .margin(15)
        .x_label_area_size(90)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..specs.len() as f64, y_range)
        .map_err(|e| AppError::Chart(format!("Failed to build chart: {}", e)))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Price value (EUR)")
        .x_labels(specs.len())
        .x_label_formatter(&|x| {
            specs
                .get(x.floor() as usize)
                .map(|s| s.label.clone())
                .unwrap_or_default()
        })
        .x_label_style(
            ("sans-serif", 12)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .draw()
        .map_err(|e| AppError::Chart(format!("Failed to draw mesh: {}", e)))?;

    for (i, (spec, color)) in specs.iter().zip(colors.iter()).enumerate() {
        let x = i as f64;
        let center = x + 0.5;
        let fill = match color {
            BoxColor::Up => GREEN,
            BoxColor::Down => RED,
        };

        // Whisker line with end caps at the day's extremes
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(center, spec.whisker_low), (center, spec.whisker_high)],
                BLACK.stroke_width(1),
            )))
            .map_err(|e| AppError::Chart(format!("Failed to draw whisker: {}", e)))?;
        for cap in [spec.whisker_low, spec.whisker_high] {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x + 0.35, cap), (x + 0.65, cap)],
                    BLACK.stroke_width(1),
                )))
                .map_err(|e| AppError::Chart(format!("Failed to draw whisker cap: {}", e)))?;
        }

        // The box itself, open to close
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x + 0.2, spec.lower_box), (x + 0.8, spec.upper_box)],
                fill.filled(),
            )))
            .map_err(|e| AppError::Chart(format!("Failed to draw box: {}", e)))?;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x + 0.2, spec.lower_box), (x + 0.8, spec.upper_box)],
                BLACK.stroke_width(1),
            )))
            .map_err(|e| AppError::Chart(format!("Failed to draw box outline: {}", e)))?;
    }

    root.present()
        .map_err(|e| AppError::Chart(format!("Failed to render chart: {}", e)))?;
    info!("Chart saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn quote(open: f64, close: f64, low: f64, high: f64) -> DailyQuote {
        DailyQuote {
            date: NaiveDate::from_ymd_opt(2022, 1, 3).unwrap(),
            open,
            close,
            low,
            high,
        }
    }

    #[test]
    fn rising_day_is_green_with_open_at_the_bottom() {
        let (specs, colors) = build_box_plots(&[quote(10.0, 10.5, 9.8, 10.7)]);

        assert_eq!(colors, vec![BoxColor::Up]);
        assert_eq!(specs[0].lower_box, 10.0);
        assert_eq!(specs[0].upper_box, 10.5);
        assert_eq!(specs[0].whisker_low, 9.8);
        assert_eq!(specs[0].whisker_high, 10.7);
        assert_eq!(specs[0].label, "03-01-2022");
    }

    #[test]
    fn falling_day_is_red_with_close_at_the_bottom() {
        let (specs, colors) = build_box_plots(&[quote(10.5, 10.0, 9.8, 10.7)]);

        assert_eq!(colors, vec![BoxColor::Down]);
        assert_eq!(specs[0].lower_box, 10.0);
        assert_eq!(specs[0].upper_box, 10.5);
    }

    // The tie-break is easy to get backwards: a flat day takes the
    // else-branch and stays red, with a degenerate box.
    #[test]
    fn flat_day_counts_as_down() {
        let (specs, colors) = build_box_plots(&[quote(10.5, 10.5, 10.0, 11.0)]);

        assert_eq!(colors, vec![BoxColor::Down]);
        assert_eq!(specs[0].lower_box, 10.5);
        assert_eq!(specs[0].upper_box, 10.5);
        assert_eq!(specs[0].whisker_low, 10.0);
        assert_eq!(specs[0].whisker_high, 11.0);
    }

    #[test]
    fn whiskers_are_the_day_extremes_on_both_branches() {
        let (specs, _) = build_box_plots(&[
            quote(10.0, 10.5, 9.8, 10.7),
            quote(10.5, 10.0, 9.9, 10.6),
        ]);

        assert_eq!(specs[0].whisker_low, 9.8);
        assert_eq!(specs[0].whisker_high, 10.7);
        assert_eq!(specs[1].whisker_low, 9.9);
        assert_eq!(specs[1].whisker_high, 10.6);
    }

    #[test]
    fn one_descriptor_per_quote_in_order() {
        let quotes = vec![
            quote(1.0, 2.0, 0.5, 2.5),
            quote(2.0, 1.0, 0.5, 2.5),
            quote(3.0, 3.0, 2.0, 4.0),
        ];
        let (specs, colors) = build_box_plots(&quotes);

        assert_eq!(specs.len(), 3);
        assert_eq!(colors, vec![BoxColor::Up, BoxColor::Down, BoxColor::Down]);
    }

    #[test]
    fn nan_prices_pass_through_untouched() {
        let (specs, colors) = build_box_plots(&[quote(f64::NAN, 10.0, 9.0, 11.0)]);

        // NaN < close is false, so the else-branch applies
        assert_eq!(colors, vec![BoxColor::Down]);
        assert_eq!(specs[0].lower_box, 10.0);
        assert!(specs[0].upper_box.is_nan());
    }

    #[test]
    fn output_path_is_dated_and_named_after_the_company() {
        let path = output_path("Telefónica");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();

        assert_eq!(path.parent().unwrap(), Path::new("output"));
        assert!(name.ends_with(" Telefónica.png"));
    }

    #[test]
    fn empty_series_is_a_chart_error() {
        let err = render_chart(&[], &[], "Acciona", Path::new("unused.png")).unwrap_err();
        assert!(matches!(err, AppError::Chart(_)));
    }
}
