//! Static Chart Renderer
//! Writes the box plot to a PNG with plotters.
//!
//! Layout: caption on top, one box per category along x, values on y.
//! Boxes span Q1..Q3 with a median line, whiskers end at the last data
//! points within 1.5 IQR, points beyond are drawn as hollow circles.

use crate::charts::{ChartData, ChartError, PALETTE_RGB};
use crate::stats::BoxStats;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::fs;
use std::path::Path;

const BOX_HALF_WIDTH: f64 = 0.3;
const CAP_HALF_WIDTH: f64 = 0.15;
const Y_PADDING: f64 = 0.1;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `chart` as a PNG of `size` pixels at `path`, creating parent directories.
    pub fn render_boxplot(
        chart: &ChartData,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), ChartError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ChartError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let boxes = chart.box_stats();
        let labels: Vec<String> = boxes.iter().map(|b| b.label.clone()).collect();
        let (y_min, y_max) = Self::get_y_range(&boxes);
        let n = boxes.len().max(1);

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(Self::render_err)?;

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..n as f64 - 0.5, y_min..y_max)
            .map_err(Self::render_err)?;

        let label_for = |x: &f64| {
            let idx = x.round();
            if idx >= 0.0 && (idx as usize) < labels.len() && (x - idx).abs() < 1e-6 {
                labels[idx as usize].clone()
            } else {
                String::new()
            }
        };

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_desc(chart.group_col.as_str())
            .y_desc(chart.value_col.as_str())
            .x_label_formatter(&label_for)
            .y_label_formatter(&|y: &f64| format!("{:.0}", y))
            .draw()
            .map_err(Self::render_err)?;

        for (i, stats) in boxes.iter().enumerate() {
            let (r, g, b) = PALETTE_RGB[i % PALETTE_RGB.len()];
            let color = RGBColor(r, g, b);
            Self::draw_box(&mut ctx, i as f64, stats, color)?;
        }

        root.present().map_err(Self::render_err)?;
        log::info!("Wrote box plot to {}", path.display());
        Ok(())
    }

    fn draw_box<DB: DrawingBackend>(
        ctx: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        x: f64,
        stats: &BoxStats,
        color: RGBColor,
    ) -> Result<(), ChartError> {
        let left = x - BOX_HALF_WIDTH;
        let right = x + BOX_HALF_WIDTH;

        // box
        ctx.draw_series(std::iter::once(Rectangle::new(
            [(left, stats.q1), (right, stats.q3)],
            color.mix(0.6).filled(),
        )))
        .map_err(Self::render_err)?;
        ctx.draw_series(std::iter::once(Rectangle::new(
            [(left, stats.q1), (right, stats.q3)],
            BLACK.stroke_width(1),
        )))
        .map_err(Self::render_err)?;

        // median, whiskers and caps
        let lines = [
            vec![(left, stats.median), (right, stats.median)],
            vec![(x, stats.q3), (x, stats.whisker_high)],
            vec![(x, stats.q1), (x, stats.whisker_low)],
            vec![(x - CAP_HALF_WIDTH, stats.whisker_high), (x + CAP_HALF_WIDTH, stats.whisker_high)],
            vec![(x - CAP_HALF_WIDTH, stats.whisker_low), (x + CAP_HALF_WIDTH, stats.whisker_low)],
        ];
        ctx.draw_series(
            lines
                .into_iter()
                .map(|points| PathElement::new(points, BLACK.stroke_width(1))),
        )
        .map_err(Self::render_err)?;

        ctx.draw_series(
            stats
                .outliers
                .iter()
                .map(|&y| Circle::new((x, y), 3, BLACK.stroke_width(1))),
        )
        .map_err(Self::render_err)?;

        Ok(())
    }

    fn get_y_range(boxes: &[BoxStats]) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for stats in boxes {
            let low = stats.outliers.first().copied().unwrap_or(stats.whisker_low);
            let high = stats.outliers.last().copied().unwrap_or(stats.whisker_high);
            min = min.min(low.min(stats.whisker_low));
            max = max.max(high.max(stats.whisker_high));
        }
        if min.is_infinite() || max.is_infinite() {
            return (0.0, 1.0);
        }
        let pad = if max > min { (max - min) * Y_PADDING } else { 1.0 };
        (min - pad, max + pad)
    }

    fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
        ChartError::Render(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonthOrder;
    use crate::stats::StatsCalculator;
    use anyhow::Result;
    use polars::prelude::*;
    use tempfile::tempdir;

    #[test]
    fn renders_png_into_nested_directory() -> Result<()> {
        let df = DataFrame::new(vec![
            Column::new("month".into(), vec!["Jan", "Jan", "Jan", "Feb", "Feb", "Feb"]),
            Column::new("401k_amount".into(), vec![500.0, 520.0, 900.0, 600.0, 610.0, 640.0]),
        ])?;
        let chart = ChartData::from_dataframe(&df, "month", "401k_amount", MonthOrder::Appearance)?;

        let dir = tempdir()?;
        let path = dir.path().join("reports").join("figures").join("box.png");
        StaticChartRenderer::render_boxplot(&chart, &path, (600, 300))?;

        assert!(path.parent().is_some_and(|p| p.is_dir()));
        assert!(path.is_file());
        assert!(std::fs::metadata(&path)?.len() > 0);
        Ok(())
    }

    #[test]
    fn y_range_covers_outliers_with_padding() {
        let boxes = vec![
            StatsCalculator::compute_box_stats("Jan", &[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).expect("non-empty"),
            StatsCalculator::compute_box_stats("Feb", &[0.0, 10.0]).expect("non-empty"),
        ];

        let (low, high) = StaticChartRenderer::get_y_range(&boxes);
        assert!(low < 0.0);
        assert!(high > 100.0);
    }

    #[test]
    fn y_range_without_boxes() {
        assert_eq!(StaticChartRenderer::get_y_range(&[]), (0.0, 1.0));
    }

    #[test]
    fn y_range_of_constant_values() {
        let boxes = vec![StatsCalculator::compute_box_stats("Jan", &[5.0, 5.0]).expect("non-empty")];
        assert_eq!(StaticChartRenderer::get_y_range(&boxes), (4.0, 6.0));
    }
}
