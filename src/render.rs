use crate::layout::{
    BadgeLayout, BarLayout, DiagramData, Layout, LineLayout, MetricLayout, PieLayout, Segment,
    TextAnchor, TextRun, TrendLayout,
};
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

const FONT_STACK: &str = "-apple-system, BlinkMacSystemFont, sans-serif";

pub fn render_svg(layout: &Layout) -> String {
    let mut svg = String::new();
    let (width, height) = (layout.width, layout.height);

    let _ = write!(
        svg,
        "<svg width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" xmlns=\"http://www.w3.org/2000/svg\">",
    );

    match &layout.diagram {
        DiagramData::Metric(metric) => render_metric(&mut svg, layout, metric),
        DiagramData::Line(line) => render_line(&mut svg, layout, line),
        DiagramData::Bar(bar) => render_bar(&mut svg, layout, bar),
        DiagramData::Pie(pie) => render_pie(&mut svg, layout, pie),
        DiagramData::Badge(badge) => render_badge(&mut svg, layout, badge),
        DiagramData::Trend(trend) => render_trend(&mut svg, layout, trend),
    }

    svg.push_str("</svg>");
    svg
}

fn background(svg: &mut String, layout: &Layout, radius: u32) {
    let _ = write!(
        svg,
        "<rect width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"{radius}\"/>",
        layout.width,
        layout.height,
        escape_xml(&layout.background)
    );
}

fn render_metric(svg: &mut String, layout: &Layout, metric: &MetricLayout) {
    background(svg, layout, 8);
    if let Some(title) = &metric.title {
        svg.push_str(&text_svg(title));
    }
    svg.push_str(&text_svg(&metric.value));
    svg.push_str(&text_svg(&metric.label));
    if let Some(change) = &metric.change {
        svg.push_str(&text_svg(change));
    }
}

fn render_line(svg: &mut String, layout: &Layout, line: &LineLayout) {
    background(svg, layout, 8);
    if let Some(title) = &line.title {
        svg.push_str(&text_svg(title));
    }
    let grid_color = escape_xml(&line.grid_color);
    for segment in &line.grid {
        let _ = write!(
            svg,
            "<line {} stroke=\"{grid_color}\" stroke-width=\"1\" opacity=\"0.3\"/>",
            segment_attrs(segment)
        );
    }
    if line.points.is_empty() {
        return;
    }
    let color = escape_xml(&line.color);
    let _ = write!(
        svg,
        "<polyline points=\"{}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"3\" stroke-linejoin=\"round\" stroke-linecap=\"round\"/>",
        points_attr(&line.points)
    );
    for (x, y) in &line.points {
        let _ = write!(
            svg,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{color}\"/>",
            fmt_num(*x),
            fmt_num(*y),
            fmt_num(line.marker_radius)
        );
    }
}

fn render_bar(svg: &mut String, layout: &Layout, bar: &BarLayout) {
    background(svg, layout, 8);
    if let Some(title) = &bar.title {
        svg.push_str(&text_svg(title));
    }
    let _ = write!(
        svg,
        "<line {} stroke=\"{}\" stroke-width=\"1\"/>",
        segment_attrs(&bar.baseline),
        escape_xml(&bar.grid_color)
    );
    let color = escape_xml(&bar.color);
    for rect in &bar.bars {
        let _ = write!(
            svg,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{color}\" rx=\"4\"/>",
            fmt_num(rect.x),
            fmt_num(rect.y),
            fmt_num(rect.width),
            fmt_num(rect.height)
        );
    }
    for label in &bar.value_labels {
        svg.push_str(&text_svg(label));
    }
}

fn render_pie(svg: &mut String, layout: &Layout, pie: &PieLayout) {
    background(svg, layout, 8);
    if let Some(title) = &pie.title {
        svg.push_str(&text_svg(title));
    }
    let (cx, cy) = (fmt_num(pie.center.0), fmt_num(pie.center.1));
    let radius = fmt_num(pie.radius);
    if let Some(stroke) = &pie.placeholder {
        let _ = write!(
            svg,
            "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{radius}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\" stroke-dasharray=\"4 4\"/>",
            escape_xml(stroke)
        );
    }
    for slice in &pie.slices {
        let fill = escape_xml(&slice.color);
        let start = (fmt_num(slice.start.0), fmt_num(slice.start.1));
        let end = (fmt_num(slice.end.0), fmt_num(slice.end.1));
        // An arc whose endpoints coincide is not drawn at all.
        if slice.full_circle || (slice.large_arc && start == end) {
            let _ = write!(
                svg,
                "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{radius}\" fill=\"{fill}\"/>"
            );
        } else {
            let _ = write!(
                svg,
                "<path d=\"M {cx} {cy} L {} {} A {radius} {radius} 0 {} 1 {} {} Z\" fill=\"{fill}\"/>",
                start.0,
                start.1,
                u8::from(slice.large_arc),
                end.0,
                end.1
            );
        }
    }
    for label in pie.slices.iter().filter_map(|slice| slice.label.as_ref()) {
        svg.push_str(&text_svg(label));
    }
}

fn render_badge(svg: &mut String, layout: &Layout, badge: &BadgeLayout) {
    let palette = &badge.palette;
    let _ = write!(
        svg,
        "<style>.title {{ font: bold 14px {FONT_STACK}; fill: {text}; }} .value {{ font: bold {size}px {FONT_STACK}; fill: {primary}; }} .metric {{ font: 12px {FONT_STACK}; fill: {secondary}; }} .period {{ font: 11px {FONT_STACK}; fill: {secondary}; }}</style>",
        text = escape_xml(&palette.text),
        size = fmt_num(badge.value_font_size),
        primary = escape_xml(&palette.primary),
        secondary = escape_xml(&palette.secondary),
    );
    background(svg, layout, 6);
    if let Some(title) = &badge.title {
        svg.push_str(&text_svg(title));
    }
    svg.push_str(&text_svg(&badge.value));
    if let Some(metric) = &badge.metric {
        svg.push_str(&text_svg(metric));
    }
    svg.push_str(&text_svg(&badge.period));
}

fn render_trend(svg: &mut String, layout: &Layout, trend: &TrendLayout) {
    let palette = &trend.palette;
    let fill = escape_xml(&palette.chart.fill);
    let _ = write!(
        svg,
        "<defs><linearGradient id=\"fillGradient\" x1=\"0%\" y1=\"0%\" x2=\"0%\" y2=\"100%\"><stop offset=\"0%\" style=\"stop-color:{fill};stop-opacity:0.8\"/><stop offset=\"100%\" style=\"stop-color:{fill};stop-opacity:0\"/></linearGradient></defs>"
    );
    let _ = write!(
        svg,
        "<style>.title {{ font: bold 16px {FONT_STACK}; fill: {text}; }} .value {{ font: bold 32px {FONT_STACK}; fill: {primary}; }} .metric {{ font: 14px {FONT_STACK}; fill: {secondary}; }} .period {{ font: 12px {FONT_STACK}; fill: {secondary}; }} .grid-line {{ stroke: {grid}; stroke-width: 1; stroke-dasharray: 2,2; }} .chart-line {{ stroke: {line}; stroke-width: 3; fill: none; }} .chart-area {{ fill: url(#fillGradient); }}</style>",
        text = escape_xml(&palette.text),
        primary = escape_xml(&palette.primary),
        secondary = escape_xml(&palette.secondary),
        grid = escape_xml(&palette.grid),
        line = escape_xml(&palette.chart.line),
    );
    background(svg, layout, 8);
    if let Some(title) = &trend.title {
        svg.push_str(&text_svg(title));
    }
    for segment in &trend.grid {
        let _ = write!(svg, "<line {} class=\"grid-line\"/>", segment_attrs(segment));
    }
    if !trend.area.is_empty() {
        let _ = write!(
            svg,
            "<path d=\"{}\" class=\"chart-area\"/>",
            points_to_path(&trend.area, true)
        );
        let _ = write!(
            svg,
            "<polyline points=\"{}\" class=\"chart-line\"/>",
            points_attr(&trend.points)
        );
    }
    svg.push_str(&text_svg(&trend.value));
    if let Some(metric) = &trend.metric {
        svg.push_str(&text_svg(metric));
    }
    svg.push_str(&text_svg(&trend.period));
}

fn text_svg(run: &TextRun) -> String {
    let mut text = format!("<text x=\"{}\" y=\"{}\"", fmt_num(run.x), fmt_num(run.y));
    if run.anchor != TextAnchor::Start {
        let _ = write!(text, " text-anchor=\"{}\"", run.anchor.as_str());
    }
    if let Some(class) = run.class {
        let _ = write!(text, " class=\"{class}\"");
    }
    if let Some(fill) = &run.fill {
        let _ = write!(text, " fill=\"{}\"", escape_xml(fill));
    }
    if let Some(size) = run.font_size {
        let _ = write!(text, " font-size=\"{}\"", fmt_num(size));
    }
    if let Some(weight) = run.font_weight {
        let _ = write!(text, " font-weight=\"{weight}\"");
    }
    if let Some(opacity) = run.opacity {
        let _ = write!(text, " opacity=\"{}\"", fmt_num(opacity));
    }
    let _ = write!(text, ">{}</text>", escape_xml(&run.text));
    text
}

fn segment_attrs(segment: &Segment) -> String {
    format!(
        "x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"",
        fmt_num(segment.x1),
        fmt_num(segment.y1),
        fmt_num(segment.x2),
        fmt_num(segment.y2)
    )
}

fn points_attr(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{},{}", fmt_num(*x), fmt_num(*y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn points_to_path(points: &[(f64, f64)], close: bool) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    let _ = write!(d, "M {} {}", fmt_num(points[0].0), fmt_num(points[0].1));
    for point in points.iter().skip(1) {
        let _ = write!(d, " L {} {}", fmt_num(point.0), fmt_num(point.1));
    }
    if close {
        d.push_str(" Z");
    }
    d
}

/// Coordinate formatting: two decimals at most, no trailing zeros, and never
/// `NaN`/`inf` in the output.
pub(crate) fn fmt_num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut out = format!("{value:.2}");
    if out.contains('.') {
        while out.ends_with('0') {
            out.pop();
        }
        if out.ends_with('.') {
            out.pop();
        }
    }
    if out == "-0" { "0".to_string() } else { out }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, width: u32, height: u32) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Helvetica".to_string();
    opt.default_size = usvg::Size::from_wh(width as f32, height as f32)
        .ok_or_else(|| anyhow::anyhow!("Invalid PNG size {width}x{height}"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _width: u32, _height: u32) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
