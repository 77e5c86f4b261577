use serde::Serialize;

use crate::model::RenderKind;
use crate::theme::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// A single positioned line of text.
///
/// Styling is either inline (`fill`, `font_size`, ...) or through a `class`
/// defined in the document's `<style>` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub anchor: TextAnchor,
    pub class: Option<&'static str>,
    pub fill: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<u32>,
    pub opacity: Option<f64>,
}

impl TextRun {
    pub fn new(x: f64, y: f64, text: impl Into<String>, anchor: TextAnchor) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            anchor,
            class: None,
            fill: None,
            font_size: None,
            font_weight: None,
            opacity: None,
        }
    }

    pub fn styled(mut self, fill: &str, font_size: f64, font_weight: Option<u32>) -> Self {
        self.fill = Some(fill.to_string());
        self.font_size = Some(font_size);
        self.font_weight = font_weight;
        self
    }

    pub fn with_class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Segment {
    pub fn horizontal(x1: f64, x2: f64, y: f64) -> Self {
        Self { x1, y1: y, x2, y2: y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricLayout {
    pub title: Option<TextRun>,
    pub value: TextRun,
    pub label: TextRun,
    pub change: Option<TextRun>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineLayout {
    pub title: Option<TextRun>,
    pub grid: Vec<Segment>,
    pub grid_color: String,
    pub points: Vec<(f64, f64)>,
    pub color: String,
    pub marker_radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarLayout {
    pub title: Option<TextRun>,
    pub baseline: Segment,
    pub grid_color: String,
    pub bars: Vec<BarRect>,
    pub color: String,
    pub value_labels: Vec<TextRun>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSliceLayout {
    pub value: f64,
    /// Degrees, measured clockwise from 3 o'clock; the first slice starts at -90.
    pub start_angle: f64,
    pub end_angle: f64,
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub large_arc: bool,
    pub full_circle: bool,
    pub color: String,
    pub label: Option<TextRun>,
}

impl PieSliceLayout {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieLayout {
    pub title: Option<TextRun>,
    pub center: (f64, f64),
    pub radius: f64,
    pub slices: Vec<PieSliceLayout>,
    /// Outline drawn instead of slices when the data sums to zero.
    pub placeholder: Option<String>,
}

/// Class-based text of the badge template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeLayout {
    pub palette: Palette,
    pub value_font_size: f64,
    pub title: Option<TextRun>,
    pub value: TextRun,
    pub metric: Option<TextRun>,
    pub period: TextRun,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendLayout {
    pub palette: Palette,
    pub synthetic: bool,
    pub grid: Vec<Segment>,
    pub points: Vec<(f64, f64)>,
    /// Closed outline of the gradient-filled area under the line.
    pub area: Vec<(f64, f64)>,
    pub title: Option<TextRun>,
    pub value: TextRun,
    pub metric: Option<TextRun>,
    pub period: TextRun,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DiagramData {
    Metric(MetricLayout),
    Line(LineLayout),
    Bar(BarLayout),
    Pie(PieLayout),
    Badge(BadgeLayout),
    Trend(TrendLayout),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub kind: RenderKind,
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub diagram: DiagramData,
}
