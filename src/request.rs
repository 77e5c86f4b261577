use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{Config, OptionOverrides};
use crate::error::Result;
use crate::i18n::MessageCatalog;
use crate::layout::{Layout, compute_badge_layout};
use crate::model::{ChartData, MetricData, PieData, RenderKind, TemplateInput};
use crate::render::render_svg;
use crate::renderer::{SvgRenderer, trend_chart_layout};
use crate::trend::SeriesStrategy;

/// What to draw, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RenderPayload {
    Metric {
        data: MetricData,
    },
    LineChart {
        data: ChartData,
    },
    BarChart {
        data: ChartData,
    },
    PieChart {
        data: PieData,
    },
    Badge {
        input: TemplateInput,
    },
    TrendChart {
        input: TemplateInput,
        #[serde(default)]
        series: SeriesStrategy,
    },
}

impl RenderPayload {
    pub fn kind(&self) -> RenderKind {
        match self {
            RenderPayload::Metric { .. } => RenderKind::Metric,
            RenderPayload::LineChart { .. } => RenderKind::LineChart,
            RenderPayload::BarChart { .. } => RenderKind::BarChart,
            RenderPayload::PieChart { .. } => RenderKind::PieChart,
            RenderPayload::Badge { .. } => RenderKind::Badge,
            RenderPayload::TrendChart { .. } => RenderKind::TrendChart,
        }
    }
}

/// One render job as read from JSON:
///
/// ```json
/// { "kind": "badge", "input": { "metric": "pageviews", "value": 12345 },
///   "options": { "theme": "dark" }, "locale": "de-DE" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    #[serde(flatten)]
    pub payload: RenderPayload,
    #[serde(default)]
    pub options: OptionOverrides,
    #[serde(default)]
    pub locale: Option<String>,
}

/// Parses a single request object or an array of them.
pub fn parse_requests(json: &str) -> serde_json::Result<Vec<RenderRequest>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect(),
        other => Ok(vec![serde_json::from_value(other)?]),
    }
}

/// Resolves options and messages for `request` and computes its layout.
pub fn layout_request<R: Rng + ?Sized>(
    request: &RenderRequest,
    config: &Config,
    catalog: &MessageCatalog,
    rng: &mut R,
) -> Result<Layout> {
    let options = request.options.resolve(&config.render)?;
    let locale = request
        .locale
        .as_deref()
        .unwrap_or(&config.locale.default_locale);

    let renderer = || {
        SvgRenderer::new(options.width, options.height)
            .map(|renderer| renderer.with_padding(config.render.padding))
    };

    match &request.payload {
        RenderPayload::Metric { data } => Ok(renderer()?.metric_layout(data, &options)),
        RenderPayload::LineChart { data } => renderer()?.line_chart_layout(data, &options),
        RenderPayload::BarChart { data } => renderer()?.bar_chart_layout(data, &options),
        RenderPayload::PieChart { data } => renderer()?.pie_chart_layout(data, &options),
        RenderPayload::Badge { input } => {
            let messages = catalog.messages(locale);
            Ok(compute_badge_layout(input, &options, &messages, locale))
        }
        RenderPayload::TrendChart { input, series } => {
            let messages = catalog.messages(locale);
            trend_chart_layout(input, &options, &messages, locale, series, rng)
        }
    }
}

pub fn render_request<R: Rng + ?Sized>(
    request: &RenderRequest,
    config: &Config,
    catalog: &MessageCatalog,
    rng: &mut R,
) -> Result<String> {
    let layout = layout_request(request, config, catalog, rng)?;
    log::debug!(
        "Rendered {:?} at {}x{}",
        request.payload.kind(),
        layout.width,
        layout.height
    );
    Ok(render_svg(&layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::model::{MetricKind, Period};
    use crate::theme::ThemeName;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn render(json: &str) -> Result<String> {
        let request: RenderRequest = serde_json::from_str(json).unwrap();
        render_request(
            &request,
            &Config::default(),
            &MessageCatalog::builtin(),
            &mut StdRng::seed_from_u64(0),
        )
    }

    #[test]
    fn badge_request_parses_with_defaults() {
        let request: RenderRequest = serde_json::from_str(
            r#"{"kind":"badge","input":{"metric":"pageviews","value":12345,"websiteName":"example.com"}}"#,
        )
        .unwrap();
        assert_eq!(request.payload.kind(), RenderKind::Badge);
        assert_eq!(request.options, OptionOverrides::default());
        let RenderPayload::Badge { input } = &request.payload else {
            panic!("expected badge payload");
        };
        assert_eq!(input.metric, MetricKind::Pageviews);
        assert_eq!(input.period, Period::Month);
    }

    #[test]
    fn trend_request_defaults_to_synthetic_series() {
        let request: RenderRequest = serde_json::from_str(
            r#"{"kind":"trend-chart","input":{"metric":"visitors","value":10}}"#,
        )
        .unwrap();
        assert!(matches!(
            request.payload,
            RenderPayload::TrendChart { series: SeriesStrategy::Synthetic, .. }
        ));

        let request: RenderRequest = serde_json::from_str(
            r#"{"kind":"trend-chart","input":{"metric":"visitors","value":10},
                "series":{"source":"real","values":[1,2,3]}}"#,
        )
        .unwrap();
        assert!(matches!(
            &request.payload,
            RenderPayload::TrendChart { series: SeriesStrategy::Real(values), .. } if values.len() == 3
        ));
    }

    #[test]
    fn unknown_metric_is_rejected_at_parse_time() {
        let err = serde_json::from_str::<RenderRequest>(
            r#"{"kind":"badge","input":{"metric":"revenue","value":1}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Unsupported metric: revenue"));
    }

    #[test]
    fn options_override_config() {
        let svg = render(
            r#"{"kind":"metric","data":{"value":42,"label":"Hits"},
                "options":{"width":600,"height":300,"theme":"dark","title":"Now"}}"#,
        )
        .unwrap();
        assert!(svg.starts_with("<svg width=\"600\" height=\"300\""));
        assert!(svg.contains(&format!("fill=\"{}\"", ThemeName::Dark.palette().background)));
        assert!(svg.contains(">Now</text>"));
    }

    #[test]
    fn zero_width_override_is_rejected() {
        let err = render(r#"{"kind":"metric","data":{"value":1,"label":"x"},"options":{"width":0}}"#)
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidDimensions { width: 0, .. }));
    }

    #[test]
    fn request_locale_selects_messages() {
        let svg = render(
            r#"{"kind":"badge","input":{"metric":"bounces","value":42.5,"period":"day"},"locale":"en-US"}"#,
        )
        .unwrap();
        assert!(svg.contains(">42.5%</text>"));
        assert!(svg.contains(">Bounce rate</text>"));
        assert!(svg.contains(">Today</text>"));
    }

    #[test]
    fn single_or_many_requests() {
        let one = parse_requests(r#"{"kind":"metric","data":{"value":1,"label":"a"}}"#).unwrap();
        assert_eq!(one.len(), 1);
        let many = parse_requests(
            r#"[{"kind":"metric","data":{"value":1,"label":"a"}},
                {"kind":"pie-chart","data":{"labels":["a"],"data":[1]}}]"#,
        )
        .unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].payload.kind(), RenderKind::PieChart);
        assert!(parse_requests(r#"{"kind":"donut"}"#).is_err());
    }
}
