use crate::config::RenderOptions;
use crate::error::Result;
use crate::model::{ChartData, RenderKind};

use super::{DiagramData, Frame, Layout, LineLayout, chart_title, grid_lines};

const MARKER_RADIUS: f64 = 4.0;

/// Lays out `datasets[0]` as a polyline over the plot area.
///
/// The value axis spans the dataset's own min..max; a flat series (or a
/// single point) collapses onto the bottom of the plot instead of dividing
/// by a zero range.
pub fn compute_line_layout(
    frame: &Frame,
    data: &ChartData,
    options: &RenderOptions,
) -> Result<Layout> {
    let dataset = data.primary()?;
    let palette = options.palette();
    let color = dataset
        .color
        .clone()
        .unwrap_or_else(|| palette.primary.clone());

    let (left, top, width, height) = frame.plot_area(options.show_title);
    let min = dataset.data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = dataset.data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max > min { max - min } else { 1.0 };

    let count = dataset.data.len();
    let points = dataset
        .data
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            let x = if count > 1 {
                left + idx as f64 / (count - 1) as f64 * width
            } else {
                left + width / 2.0
            };
            let y = top + height - (value - min) / range * height;
            (x, y)
        })
        .collect();

    if count == 0 {
        log::debug!("line chart '{}' has no points, drawing grid only", dataset.label);
    }

    Ok(Layout {
        kind: RenderKind::LineChart,
        width: frame.width,
        height: frame.height,
        background: palette.background.clone(),
        diagram: DiagramData::Line(LineLayout {
            title: chart_title(frame, options, "Trend", &palette.text),
            grid: grid_lines(left, left + width, top, height),
            grid_color: palette.grid,
            points,
            color,
            marker_radius: MARKER_RADIUS,
        }),
    })
}
