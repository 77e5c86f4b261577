use crate::config::RenderOptions;
use crate::error::Result;
use crate::format::compact_number;
use crate::model::{ChartData, RenderKind};

use super::{
    BarLayout, BarRect, DiagramData, Frame, Layout, Segment, TextAnchor, TextRun, chart_title,
};

/// Share of each label slot taken by its bar; the rest is split as gap.
const BAR_FILL: f64 = 0.8;

/// Bars for `datasets[0]`, scaled against that dataset's own maximum.
pub fn compute_bar_layout(
    frame: &Frame,
    data: &ChartData,
    options: &RenderOptions,
) -> Result<Layout> {
    let dataset = data.primary()?;
    let palette = options.palette();
    let color = dataset
        .color
        .clone()
        .unwrap_or_else(|| palette.chart.bar.clone());

    let (left, top, width, height) = frame.plot_area(options.show_title);
    let bottom = top + height;
    let max = dataset.data.iter().copied().fold(0.0_f64, f64::max);
    let max = if max > 0.0 { max } else { 1.0 };

    let slot = width / data.labels.len().max(1) as f64;
    let bar_width = slot * BAR_FILL;

    let mut bars = Vec::with_capacity(dataset.data.len());
    let mut value_labels = Vec::new();
    for (idx, value) in dataset.data.iter().enumerate() {
        let bar_height = (value / max * height).max(0.0);
        let x = left + idx as f64 * slot + (slot - bar_width) / 2.0;
        let y = bottom - bar_height;
        bars.push(BarRect {
            x,
            y,
            width: bar_width,
            height: bar_height,
        });
        if options.show_values {
            value_labels.push(
                TextRun::new(
                    x + bar_width / 2.0,
                    y - 5.0,
                    compact_number(*value),
                    TextAnchor::Middle,
                )
                .styled(&palette.text, 12.0, None),
            );
        }
    }

    Ok(Layout {
        kind: RenderKind::BarChart,
        width: frame.width,
        height: frame.height,
        background: palette.background.clone(),
        diagram: DiagramData::Bar(BarLayout {
            title: chart_title(frame, options, "Analytics", &palette.text),
            baseline: Segment::horizontal(left, left + width, bottom),
            grid_color: palette.grid,
            bars,
            color,
            value_labels,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeName;

    fn bar(layout: &Layout) -> &BarLayout {
        match &layout.diagram {
            DiagramData::Bar(bar) => bar,
            other => panic!("unexpected diagram {other:?}"),
        }
    }

    fn chart(values: Vec<f64>) -> ChartData {
        let labels = (0..values.len()).map(|i| format!("b{i}")).collect();
        ChartData::single("views", labels, values)
    }

    #[test]
    fn bars_take_eighty_percent_of_each_slot() {
        let frame = Frame::new(440, 200, 20.0);
        let options = RenderOptions::new(440, 200, ThemeName::Light)
            .unwrap()
            .with_flags(false, false);
        let layout = compute_bar_layout(&frame, &chart(vec![50.0, 100.0]), &options).unwrap();
        let bars = &bar(&layout).bars;
        assert_eq!(bars.len(), 2);
        // slot = 400 / 2 = 200, bar = 160, gap = 20 on each side
        assert_eq!(bars[0].width, 160.0);
        assert_eq!(bars[0].x, 40.0);
        assert_eq!(bars[1].x, 240.0);
        assert_eq!(bars[1].height, 160.0);
        assert_eq!(bars[0].height, 80.0);
        assert_eq!(bars[0].y + bars[0].height, 180.0);
        assert!(bar(&layout).value_labels.is_empty());
    }

    #[test]
    fn value_labels_sit_above_bars() {
        let frame = Frame::new(400, 200, 40.0);
        let options = RenderOptions::new(400, 200, ThemeName::Light)
            .unwrap()
            .with_flags(false, true);
        let layout = compute_bar_layout(&frame, &chart(vec![2_500.0, 10.0]), &options).unwrap();
        let layout = bar(&layout);
        assert_eq!(layout.value_labels[0].text, "2.5K");
        assert_eq!(layout.value_labels[0].y, layout.bars[0].y - 5.0);
        assert_eq!(layout.value_labels[1].text, "10");
    }

    #[test]
    fn all_zero_bars_have_no_height() {
        let frame = Frame::new(400, 200, 40.0);
        let options = RenderOptions::new(400, 200, ThemeName::Dark).unwrap();
        let layout = compute_bar_layout(&frame, &chart(vec![0.0, 0.0, 0.0]), &options).unwrap();
        assert!(bar(&layout).bars.iter().all(|b| b.height == 0.0));
    }

    #[test]
    fn dataset_colour_wins_over_accent() {
        let frame = Frame::new(400, 200, 40.0);
        let options = RenderOptions::new(400, 200, ThemeName::Light)
            .unwrap()
            .with_color("#123456");
        let mut data = chart(vec![1.0]);
        assert_eq!(
            bar(&compute_bar_layout(&frame, &data, &options).unwrap()).color,
            "#123456"
        );
        data.datasets[0].color = Some("#abcdef".into());
        assert_eq!(
            bar(&compute_bar_layout(&frame, &data, &options).unwrap()).color,
            "#abcdef"
        );
    }
}
