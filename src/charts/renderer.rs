//! Static Chart Renderer
//! Draws chart models with plotters into an in-memory RGB image.
//!
//! Layout follows the seaborn originals:
//! - count plots: one bar per category, side-by-side bars per hue level,
//!   legend in the upper right
//! - histogram: translucent bars with the density curve on top
//! - heatmap: coolwarm cells, first column in the top row, values to two
//!   decimals

use crate::charts::palette::{coolwarm, Palette, PURPLE};
use crate::charts::{Chart, ChartBody, ChartError, CountChart, HeatmapChart, HistogramChart};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;

const FONT: &str = "sans-serif";
const TITLE_SIZE: f64 = 20.0;
const ANNOTATION_SIZE: f64 = 14.0;

/// Share of a category slot covered by its bars
const BAR_GROUP_WIDTH: f64 = 0.8;

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a chart at its own figure size.
    pub fn render(chart: &Chart) -> Result<RgbImage, ChartError> {
        let (width, height) = chart.size;
        let mut buffer = vec![0u8; width as usize * height as usize * 3];

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;

            match &chart.body {
                ChartBody::Count(count) => Self::draw_count(&root, &chart.title, count)?,
                ChartBody::Histogram(hist) => Self::draw_histogram(&root, &chart.title, hist)?,
                ChartBody::Heatmap(heatmap) => Self::draw_heatmap(&root, &chart.title, heatmap)?,
            }

            root.present().map_err(render_err)?;
        }

        RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| ChartError::Render("pixel buffer does not match figure size".into()))
    }

    /// Axis range placing category `i` at `x = i`.
    fn category_range(n: usize) -> Range<f64> {
        -0.5..(n.max(1) as f64 - 0.5)
    }

    /// Label for a tick on a category axis. Only whole positions name a
    /// category; in-between ticks stay blank.
    fn category_label(labels: &[String], x: f64) -> String {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    fn draw_count<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        chart: &CountChart,
    ) -> Result<(), ChartError> {
        let n = chart.categories.len().max(1);
        let max_count = chart
            .series
            .iter()
            .flat_map(|s| s.counts.iter().copied())
            .max()
            .unwrap_or(0);
        let y_max = (max_count as f64 * 1.1).max(1.0);

        let categories = &chart.categories;
        let x_label = |x: &f64| Self::category_label(categories, *x);
        let y_label = |y: &f64| format!("{:.0}", y);

        let mut ctx = ChartBuilder::on(root)
            .caption(title, (FONT, TITLE_SIZE).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(Self::category_range(n), 0f64..y_max)
            .map_err(render_err)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&x_label)
            .y_label_formatter(&y_label)
            .x_desc(chart.x_column.as_str())
            .y_desc("count")
            .draw()
            .map_err(render_err)?;

        let slot = BAR_GROUP_WIDTH / chart.series.len().max(1) as f64;
        let offset = BAR_GROUP_WIDTH / 2.0;

        for (s_idx, series) in chart.series.iter().enumerate() {
            let hued = series.label.is_some();
            let palette = chart.palette;
            let bars = series.counts.iter().enumerate().map(|(c_idx, &count)| {
                let color = Self::bar_color(palette, hued, s_idx, c_idx);
                let left = c_idx as f64 - offset + s_idx as f64 * slot;
                Rectangle::new([(left, 0.0), (left + slot, count as f64)], color.filled())
            });

            let anno = ctx.draw_series(bars).map_err(render_err)?;
            if let Some(label) = &series.label {
                let color = palette.color(s_idx);
                anno.label(label.as_str())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
            }
        }

        if chart.hue_column.is_some() && !chart.series.is_empty() {
            ctx.configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(render_err)?;
        }

        Ok(())
    }

    fn draw_histogram<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        chart: &HistogramChart,
    ) -> Result<(), ChartError> {
        let (x_min, x_max) = match (chart.bins.first(), chart.bins.last()) {
            (Some(first), Some(last)) => (first.lower, last.upper),
            _ => (0.0, 1.0),
        };
        let max_count = chart.bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
        let max_density = chart.density.iter().map(|(_, y)| *y).fold(0.0, f64::max);
        let y_max = (max_count.max(max_density) * 1.1).max(1.0);

        let mut ctx = ChartBuilder::on(root)
            .caption(title, (FONT, TITLE_SIZE).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)
            .map_err(render_err)?;

        ctx.configure_mesh()
            .x_desc(chart.column.as_str())
            .y_desc("Count")
            .draw()
            .map_err(render_err)?;

        ctx.draw_series(chart.bins.iter().map(|bin| {
            Rectangle::new(
                [(bin.lower, 0.0), (bin.upper, bin.count as f64)],
                PURPLE.mix(0.5).filled(),
            )
        }))
        .map_err(render_err)?;

        ctx.draw_series(chart.bins.iter().map(|bin| {
            Rectangle::new(
                [(bin.lower, 0.0), (bin.upper, bin.count as f64)],
                PURPLE.stroke_width(1),
            )
        }))
        .map_err(render_err)?;

        if !chart.density.is_empty() {
            ctx.draw_series(LineSeries::new(
                chart.density.iter().copied(),
                PURPLE.stroke_width(2),
            ))
            .map_err(render_err)?;
        }

        Ok(())
    }

    fn draw_heatmap<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        chart: &HeatmapChart,
    ) -> Result<(), ChartError> {
        let labels = &chart.labels;
        let n = labels.len().max(1);

        // Row 0 is drawn at the top.
        let flipped: Vec<String> = labels.iter().rev().cloned().collect();
        let x_label = |x: &f64| Self::category_label(labels, *x);
        let y_label = |y: &f64| Self::category_label(&flipped, *y);

        let mut ctx = ChartBuilder::on(root)
            .caption(title, (FONT, TITLE_SIZE).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(90)
            .build_cartesian_2d(Self::category_range(n), Self::category_range(n))
            .map_err(render_err)?;

        ctx.configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&x_label)
            .y_label_formatter(&y_label)
            .draw()
            .map_err(render_err)?;

        let last = labels.len().saturating_sub(1);
        let cells = chart.matrix.iter().enumerate().flat_map(|(i, row)| {
            row.iter().enumerate().map(move |(j, &value)| {
                let y = (last - i) as f64;
                Rectangle::new(
                    [(j as f64 - 0.5, y - 0.5), (j as f64 + 0.5, y + 0.5)],
                    coolwarm(value).filled(),
                )
            })
        });
        ctx.draw_series(cells).map_err(render_err)?;

        let style = (FONT, ANNOTATION_SIZE)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        let annotations = chart.matrix.iter().enumerate().flat_map(|(i, row)| {
            let style = style.clone();
            row.iter().enumerate().map(move |(j, &value)| {
                let y = (last - i) as f64;
                Text::new(
                    Self::annotation(value),
                    (j as f64, y),
                    style.clone(),
                )
            })
        });
        ctx.draw_series(annotations).map_err(render_err)?;

        Ok(())
    }

    /// Cell annotation, two decimals.
    fn annotation(value: f64) -> String {
        if value.is_nan() {
            "nan".to_string()
        } else {
            format!("{:.2}", value)
        }
    }

    /// Hued series share one colour; plain bars cycle per category.
    fn bar_color(palette: Palette, hued: bool, series: usize, category: usize) -> RGBColor {
        if hued {
            palette.color(series)
        } else {
            palette.color(category)
        }
    }
}
