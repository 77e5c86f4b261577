use crate::config::RenderOptions;
use crate::format::compact_number;
use crate::model::{MetricData, RenderKind};

use super::{DiagramData, Frame, Layout, MetricLayout, TextAnchor, TextRun};

const CHANGE_UP: &str = "#10b981";
const CHANGE_DOWN: &str = "#ef4444";

pub fn compute_metric_layout(frame: &Frame, data: &MetricData, options: &RenderOptions) -> Layout {
    let palette = options.palette();
    let center_x = frame.w() / 2.0;
    let middle = frame.h() / 2.0;

    let title = options.show_title.then(|| {
        TextRun::new(
            center_x,
            30.0,
            options.title.as_deref().unwrap_or("Analytics"),
            TextAnchor::Middle,
        )
        .styled(&palette.text, 18.0, Some(600))
    });

    let (value_y, label_y) = if options.show_title {
        (middle + 10.0, middle + 50.0)
    } else {
        (middle, middle + 40.0)
    };
    let value = TextRun::new(center_x, value_y, compact_number(data.value), TextAnchor::Middle)
        .styled(&palette.primary, 48.0, Some(700));
    let label = TextRun::new(center_x, label_y, data.label.clone(), TextAnchor::Middle)
        .styled(&palette.text, 16.0, None)
        .with_opacity(0.8);

    let change = data
        .change
        .filter(|change| options.show_values && change.is_finite())
        .map(|change| {
            // -0.0 would otherwise print as "+-0.0%"
            let change = if change == 0.0 { 0.0 } else { change };
            let (fill, sign) = if change >= 0.0 {
                (CHANGE_UP, "+")
            } else {
                (CHANGE_DOWN, "")
            };
            TextRun::new(
                center_x,
                frame.h() - 30.0,
                format!("{sign}{change:.1}%"),
                TextAnchor::Middle,
            )
            .styled(fill, 14.0, Some(500))
        });

    Layout {
        kind: RenderKind::Metric,
        width: frame.width,
        height: frame.height,
        background: palette.background,
        diagram: DiagramData::Metric(MetricLayout {
            title,
            value,
            label,
            change,
        }),
    }
}
