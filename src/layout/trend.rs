use crate::config::RenderOptions;
use crate::format::format_metric;
use crate::i18n::Messages;
use crate::model::{RenderKind, TemplateInput};

use super::{DiagramData, Layout, Segment, TextAnchor, TextRun, TrendLayout, period_label};

const PADDING: f64 = 40.0;
const GRID_RATIOS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// Trend chart over `series`, with the aggregate value printed underneath.
///
/// `synthetic` marks series that were synthesized rather than measured; it
/// is carried into the layout so dumps and callers can tell them apart.
pub fn compute_trend_layout(
    input: &TemplateInput,
    options: &RenderOptions,
    messages: &Messages,
    locale: &str,
    series: &[f64],
    synthetic: bool,
) -> Layout {
    let mut palette = options.palette();
    if let Some(color) = options.color.as_deref() {
        palette = palette.with_translucent_fill(color);
    }
    let formatted = format_metric(input.metric, input.value, messages, locale);

    let (w, h) = (options.width as f64, options.height as f64);
    let chart_width = (w - PADDING * 2.0).max(0.0);
    let chart_height = (h - PADDING * 2.0).max(0.0);
    let bottom = h - PADDING;

    let max = series.iter().copied().fold(0.0_f64, f64::max);
    let scale = chart_height / if max > 0.0 { max } else { 1.0 };
    let count = series.len();
    let points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            let x = if count > 1 {
                PADDING + idx as f64 / (count - 1) as f64 * chart_width
            } else {
                PADDING + chart_width / 2.0
            };
            (x, bottom - value.max(0.0) * scale)
        })
        .collect();

    let area = if points.is_empty() {
        Vec::new()
    } else {
        let mut area = points.clone();
        area.push((w - PADDING, bottom));
        area.push((PADDING, bottom));
        area
    };

    let grid = GRID_RATIOS
        .iter()
        .map(|ratio| Segment::horizontal(PADDING, w - PADDING, bottom - chart_height * ratio))
        .collect();

    let title = options.show_title.then(|| {
        let text = options
            .title
            .clone()
            .or_else(|| input.website_name.clone())
            .unwrap_or_default();
        TextRun::new(PADDING, PADDING - 10.0, text, TextAnchor::Start).with_class("title")
    });

    let (value, metric) = if options.show_values {
        (
            TextRun::new(PADDING, bottom + 35.0, formatted.value, TextAnchor::Start)
                .with_class("value"),
            Some(
                TextRun::new(PADDING, bottom + 55.0, formatted.label, TextAnchor::Start)
                    .with_class("metric"),
            ),
        )
    } else {
        (
            TextRun::new(PADDING, bottom + 45.0, formatted.value, TextAnchor::Start)
                .with_class("value"),
            None,
        )
    };

    let period = TextRun::new(
        w - PADDING,
        bottom + 55.0,
        period_label(input.period, messages),
        TextAnchor::End,
    )
    .with_class("period");

    Layout {
        kind: RenderKind::TrendChart,
        width: options.width,
        height: options.height,
        background: palette.background.clone(),
        diagram: DiagramData::Trend(TrendLayout {
            palette,
            synthetic,
            grid,
            points,
            area,
            title,
            value,
            metric,
            period,
        }),
    }
}
