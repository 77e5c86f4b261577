use crate::layout::{DiagramData, Layout, TextRun};
use crate::model::RenderKind;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump<'a> {
    pub kind: RenderKind,
    pub width: u32,
    pub height: u32,
    pub background: &'a str,
    /// Whether the plotted series was synthesized rather than measured.
    pub synthetic: bool,
    pub texts: Vec<TextDump<'a>>,
    pub diagram: &'a DiagramData,
}

#[derive(Debug, Serialize)]
pub struct TextDump<'a> {
    pub text: &'a str,
    pub x: f64,
    pub y: f64,
    pub anchor: &'static str,
}

impl<'a> LayoutDump<'a> {
    pub fn from_layout(layout: &'a Layout) -> Self {
        let texts = collect_texts(&layout.diagram)
            .into_iter()
            .map(|run| TextDump {
                text: &run.text,
                x: run.x,
                y: run.y,
                anchor: run.anchor.as_str(),
            })
            .collect();

        LayoutDump {
            kind: layout.kind,
            width: layout.width,
            height: layout.height,
            background: &layout.background,
            synthetic: matches!(&layout.diagram, DiagramData::Trend(trend) if trend.synthetic),
            texts,
            diagram: &layout.diagram,
        }
    }
}

/// Every text run of the diagram in document order.
fn collect_texts(diagram: &DiagramData) -> Vec<&TextRun> {
    let mut texts = Vec::new();
    match diagram {
        DiagramData::Metric(metric) => {
            texts.extend(metric.title.iter());
            texts.push(&metric.value);
            texts.push(&metric.label);
            texts.extend(metric.change.iter());
        }
        DiagramData::Line(line) => texts.extend(line.title.iter()),
        DiagramData::Bar(bar) => {
            texts.extend(bar.title.iter());
            texts.extend(bar.value_labels.iter());
        }
        DiagramData::Pie(pie) => {
            texts.extend(pie.title.iter());
            texts.extend(pie.slices.iter().filter_map(|slice| slice.label.as_ref()));
        }
        DiagramData::Badge(badge) => {
            texts.extend(badge.title.iter());
            texts.push(&badge.value);
            texts.extend(badge.metric.iter());
            texts.push(&badge.period);
        }
        DiagramData::Trend(trend) => {
            texts.extend(trend.title.iter());
            texts.push(&trend.value);
            texts.extend(trend.metric.iter());
            texts.push(&trend.period);
        }
    }
    texts
}

/// Writes one dump per layout as a JSON array.
pub fn write_layout_dump(path: &Path, layouts: &[Layout]) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dumps: Vec<LayoutDump<'_>> = layouts.iter().map(LayoutDump::from_layout).collect();
    serde_json::to_writer_pretty(writer, &dumps)?;
    Ok(())
}
