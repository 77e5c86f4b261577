use crate::config::RenderOptions;
use crate::format::format_metric;
use crate::i18n::Messages;
use crate::model::{RenderKind, TemplateInput};

use super::{BadgeLayout, DiagramData, Layout, TextAnchor, TextRun, period_label};

const PADDING: f64 = 16.0;
const MIN_WIDTH: u32 = 200;
const TITLE_BAND: f64 = 25.0;
const VALUE_BAND: f64 = 40.0;
/// Baseline shift that visually centres an 18px line on its midpoint.
const LONE_VALUE_SHIFT: f64 = 6.0;

/// Height floor for the number of optional blocks shown.
fn min_height(show_title: bool, show_values: bool) -> u32 {
    match (show_title, show_values) {
        (true, true) => 90,
        (true, false) | (false, true) => 70,
        (false, false) => 50,
    }
}

/// Compact single-metric badge: optional title band, value block, period.
pub fn compute_badge_layout(
    input: &TemplateInput,
    options: &RenderOptions,
    messages: &Messages,
    locale: &str,
) -> Layout {
    let palette = options.palette();
    let formatted = format_metric(input.metric, input.value, messages, locale);

    let width = options.width.max(MIN_WIDTH);
    let height = options
        .height
        .max(min_height(options.show_title, options.show_values));
    let (w, h) = (width as f64, height as f64);

    let mut offset = PADDING;
    let title = options.show_title.then(|| {
        let text = options
            .title
            .clone()
            .or_else(|| input.website_name.clone())
            .unwrap_or_default();
        TextRun::new(PADDING, offset + 20.0, text, TextAnchor::Start).with_class("title")
    });
    if options.show_title {
        offset += TITLE_BAND;
    }

    let (value, metric) = if options.show_values {
        let value = TextRun::new(PADDING, offset + 35.0, formatted.value, TextAnchor::Start)
            .with_class("value");
        let metric = TextRun::new(
            PADDING,
            offset + VALUE_BAND + 15.0,
            formatted.label,
            TextAnchor::Start,
        )
        .with_class("metric");
        (value, Some(metric))
    } else {
        let y = offset + (h - offset) / 2.0 + LONE_VALUE_SHIFT;
        (
            TextRun::new(PADDING, y, formatted.value, TextAnchor::Start).with_class("value"),
            None,
        )
    };

    let period = TextRun::new(
        w - PADDING - 5.0,
        h - PADDING - 2.0,
        period_label(input.period, messages),
        TextAnchor::End,
    )
    .with_class("period");

    Layout {
        kind: RenderKind::Badge,
        width,
        height,
        background: palette.background.clone(),
        diagram: DiagramData::Badge(BadgeLayout {
            value_font_size: if options.show_values { 24.0 } else { 18.0 },
            palette,
            title,
            value,
            metric,
            period,
        }),
    }
}
