mod badge;
mod bar;
mod line;
mod metric;
mod pie;
mod trend;
pub(crate) mod types;
pub use types::*;

pub use badge::compute_badge_layout;
pub use bar::compute_bar_layout;
pub use line::compute_line_layout;
pub use metric::compute_metric_layout;
pub use pie::compute_pie_layout;
pub use trend::compute_trend_layout;

use crate::config::RenderOptions;
use crate::i18n::Messages;
use crate::model::Period;

/// Vertical space taken by the chart title when it is shown.
const TITLE_OFFSET: f64 = 30.0;
/// Grid lines are drawn at these fractions of the plot height.
const GRID_FRACTIONS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// Fixed canvas the geometry engine lays out into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub padding: f64,
}

impl Frame {
    pub fn new(width: u32, height: u32, padding: f64) -> Self {
        Self {
            width,
            height,
            padding: if padding.is_finite() { padding.max(0.0) } else { 0.0 },
        }
    }

    fn w(&self) -> f64 {
        self.width as f64
    }

    fn h(&self) -> f64 {
        self.height as f64
    }

    /// Plot rectangle `(left, top, width, height)` below an optional title band.
    fn plot_area(&self, show_title: bool) -> (f64, f64, f64, f64) {
        let title_offset = if show_title { TITLE_OFFSET } else { 0.0 };
        let width = (self.w() - self.padding * 2.0).max(0.0);
        let height = (self.h() - self.padding * 2.0 - title_offset).max(0.0);
        (self.padding, self.padding + title_offset, width, height)
    }
}

fn chart_title(frame: &Frame, options: &RenderOptions, fallback: &str, fill: &str) -> Option<TextRun> {
    options.show_title.then(|| {
        TextRun::new(
            frame.w() / 2.0,
            25.0,
            options.title.as_deref().unwrap_or(fallback),
            TextAnchor::Middle,
        )
        .styled(fill, 16.0, Some(600))
    })
}

/// Horizontal grid lines spanning `left..right` from `top` down `height`.
fn grid_lines(left: f64, right: f64, top: f64, height: f64) -> Vec<Segment> {
    GRID_FRACTIONS
        .iter()
        .map(|fraction| Segment::horizontal(left, right, top + fraction * height))
        .collect()
}

/// Period caption; only `day` is translatable.
pub fn period_label(period: Period, messages: &Messages) -> String {
    match period {
        Period::Day => messages
            .get_or("dateRange.today", period.default_label())
            .to_string(),
        _ => period.default_label().to_string(),
    }
}
