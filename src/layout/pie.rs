use crate::config::RenderOptions;
use crate::error::Result;
use crate::model::{PieData, RenderKind};

use super::{DiagramData, Frame, Layout, PieLayout, PieSliceLayout, TextAnchor, TextRun, chart_title};

/// Used when the caller supplies no slice colours.
const DEFAULT_SLICE_COLORS: [&str; 8] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
];
const START_ANGLE: f64 = -90.0;
const LABEL_RADIUS: f64 = 0.7;

fn slice_color(colors: &[String], idx: usize) -> String {
    if colors.is_empty() {
        DEFAULT_SLICE_COLORS[idx % DEFAULT_SLICE_COLORS.len()].to_string()
    } else {
        colors[idx % colors.len()].clone()
    }
}

fn point_at(center: (f64, f64), radius: f64, degrees: f64) -> (f64, f64) {
    let radians = degrees.to_radians();
    (
        center.0 + radians.cos() * radius,
        center.1 + radians.sin() * radius,
    )
}

/// Slices run clockwise from 12 o'clock. Data summing to zero yields a
/// placeholder ring and no slices.
pub fn compute_pie_layout(frame: &Frame, data: &PieData, options: &RenderOptions) -> Result<Layout> {
    data.validate()?;
    let palette = options.palette();

    let center = (
        frame.w() / 2.0,
        frame.h() / 2.0 + if options.show_title { 15.0 } else { 0.0 },
    );
    let radius = frame.w().min(frame.h()) / 3.0;
    let total: f64 = data.data.iter().sum();

    let mut slices = Vec::with_capacity(data.data.len());
    let mut placeholder = None;
    if total > 0.0 {
        let mut angle = START_ANGLE;
        for (idx, value) in data.data.iter().enumerate() {
            let share = value / total;
            let sweep = share * 360.0;
            let end_angle = angle + sweep;
            let label = options.show_values.then(|| {
                let (x, y) = point_at(center, radius * LABEL_RADIUS, angle + sweep / 2.0);
                TextRun::new(x, y, format!("{}%", (share * 100.0).round()), TextAnchor::Middle)
                    .styled("white", 14.0, Some(600))
            });
            slices.push(PieSliceLayout {
                value: *value,
                start_angle: angle,
                end_angle,
                start: point_at(center, radius, angle),
                end: point_at(center, radius, end_angle),
                large_arc: sweep > 180.0,
                full_circle: sweep >= 360.0 - 1e-9,
                color: slice_color(&data.colors, idx),
                label,
            });
            angle = end_angle;
        }
    } else {
        log::debug!("pie data sums to zero, drawing placeholder ring");
        placeholder = Some(palette.grid.clone());
    }

    Ok(Layout {
        kind: RenderKind::PieChart,
        width: frame.width,
        height: frame.height,
        background: palette.background.clone(),
        diagram: DiagramData::Pie(PieLayout {
            title: chart_title(frame, options, "Distribution", &palette.text),
            center,
            radius,
            slices,
            placeholder,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeName;

    fn pie(layout: &Layout) -> &PieLayout {
        match &layout.diagram {
            DiagramData::Pie(pie) => pie,
            other => panic!("unexpected diagram {other:?}"),
        }
    }

    fn data(values: Vec<f64>, colors: &[&str]) -> PieData {
        PieData {
            labels: (0..values.len()).map(|i| format!("s{i}")).collect(),
            data: values,
            colors: colors.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn options() -> RenderOptions {
        RenderOptions::new(300, 300, ThemeName::Light)
            .unwrap()
            .with_flags(false, true)
    }

    #[test]
    fn equal_quarters_start_at_twelve_oclock() {
        let frame = Frame::new(300, 300, 40.0);
        let layout =
            compute_pie_layout(&frame, &data(vec![1.0; 4], &["#a", "#b"]), &options()).unwrap();
        let pie = pie(&layout);
        assert_eq!(pie.slices.len(), 4);
        let starts: Vec<f64> = pie.slices.iter().map(|s| s.start_angle).collect();
        assert_eq!(starts, vec![-90.0, 0.0, 90.0, 180.0]);
        assert!(pie.slices.iter().all(|s| s.sweep() == 90.0 && !s.large_arc));
        let colors: Vec<&str> = pie.slices.iter().map(|s| s.color.as_str()).collect();
        assert_eq!(colors, vec!["#a", "#b", "#a", "#b"]);
        assert_eq!(pie.radius, 100.0);
        let (x, y) = pie.slices[0].start;
        assert!((x - 150.0).abs() < 1e-9 && (y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn large_arc_flag_follows_sweep() {
        let frame = Frame::new(300, 300, 40.0);
        let layout = compute_pie_layout(&frame, &data(vec![3.0, 1.0], &[]), &options()).unwrap();
        let pie = pie(&layout);
        assert!(pie.slices[0].large_arc);
        assert!(!pie.slices[1].large_arc);
        assert_eq!(pie.slices[0].color, DEFAULT_SLICE_COLORS[0]);
        assert_eq!(pie.slices[0].label.as_ref().unwrap().text, "75%");
    }

    #[test]
    fn labels_sit_on_the_bisector_at_seventy_percent() {
        let frame = Frame::new(300, 300, 40.0);
        let layout = compute_pie_layout(&frame, &data(vec![1.0, 1.0], &[]), &options()).unwrap();
        let label = pie(&layout).slices[0].label.clone().unwrap();
        // first half spans -90..90, bisector at 0 degrees
        assert!((label.x - 220.0).abs() < 1e-9);
        assert!((label.y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn single_value_is_a_full_circle() {
        let frame = Frame::new(300, 300, 40.0);
        let layout =
            compute_pie_layout(&frame, &data(vec![0.0, 5.0], &["#a"]), &options()).unwrap();
        let pie = pie(&layout);
        assert!(!pie.slices[0].full_circle);
        assert!(pie.slices[1].full_circle);
    }

    #[test]
    fn zero_sum_draws_placeholder() {
        let frame = Frame::new(300, 300, 40.0);
        let layout =
            compute_pie_layout(&frame, &data(vec![0.0, 0.0, 0.0], &["#a"]), &options()).unwrap();
        let pie = pie(&layout);
        assert!(pie.slices.is_empty());
        assert_eq!(pie.placeholder.as_deref(), Some("#e5e7eb"));
    }

    #[test]
    fn title_shifts_centre_down() {
        let frame = Frame::new(300, 300, 40.0);
        let options = options().with_flags(true, false);
        let layout = compute_pie_layout(&frame, &data(vec![1.0], &[]), &options).unwrap();
        assert_eq!(pie(&layout).center, (150.0, 165.0));
        assert!(pie(&layout).slices[0].label.is_none());
    }
}
