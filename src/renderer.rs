use rand::Rng;

use crate::config::RenderOptions;
use crate::error::{RenderError, Result};
use crate::i18n::Messages;
use crate::layout::{
    Frame, Layout, compute_badge_layout, compute_bar_layout, compute_line_layout,
    compute_metric_layout, compute_pie_layout, compute_trend_layout,
};
use crate::model::{ChartData, MetricData, PieData, TemplateInput};
use crate::render::render_svg;
use crate::trend::SeriesStrategy;

pub const DEFAULT_PADDING: f64 = 40.0;

/// Fixed-size canvas for the metric and chart renderers.
///
/// The renderer holds no colour state; every call derives its own palette
/// from the options it is given, so one instance can be shared across
/// threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgRenderer {
    frame: Frame,
}

impl SvgRenderer {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        Ok(Self {
            frame: Frame::new(width, height, DEFAULT_PADDING),
        })
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.frame = Frame::new(self.frame.width, self.frame.height, padding);
        self
    }

    pub fn width(&self) -> u32 {
        self.frame.width
    }

    pub fn height(&self) -> u32 {
        self.frame.height
    }

    pub fn padding(&self) -> f64 {
        self.frame.padding
    }

    pub fn metric_layout(&self, data: &MetricData, options: &RenderOptions) -> Layout {
        compute_metric_layout(&self.frame, data, options)
    }

    pub fn line_chart_layout(&self, data: &ChartData, options: &RenderOptions) -> Result<Layout> {
        compute_line_layout(&self.frame, data, options)
    }

    pub fn bar_chart_layout(&self, data: &ChartData, options: &RenderOptions) -> Result<Layout> {
        compute_bar_layout(&self.frame, data, options)
    }

    pub fn pie_chart_layout(&self, data: &PieData, options: &RenderOptions) -> Result<Layout> {
        compute_pie_layout(&self.frame, data, options)
    }

    pub fn render_metric(&self, data: &MetricData, options: &RenderOptions) -> Result<String> {
        options.validate()?;
        Ok(render_svg(&self.metric_layout(data, options)))
    }

    pub fn render_line_chart(&self, data: &ChartData, options: &RenderOptions) -> Result<String> {
        options.validate()?;
        Ok(render_svg(&self.line_chart_layout(data, options)?))
    }

    pub fn render_bar_chart(&self, data: &ChartData, options: &RenderOptions) -> Result<String> {
        options.validate()?;
        Ok(render_svg(&self.bar_chart_layout(data, options)?))
    }

    pub fn render_pie_chart(&self, data: &PieData, options: &RenderOptions) -> Result<String> {
        options.validate()?;
        Ok(render_svg(&self.pie_chart_layout(data, options)?))
    }
}

/// Single-metric badge sized from `options`, never smaller than its content.
pub fn render_badge_svg(
    input: &TemplateInput,
    options: &RenderOptions,
    messages: &Messages,
    locale: &str,
) -> Result<String> {
    options.validate()?;
    Ok(render_svg(&compute_badge_layout(
        input, options, messages, locale,
    )))
}

/// Trend chart template. With [`SeriesStrategy::Synthetic`] the plotted
/// series is drawn from `rng` and only approximates a trend.
pub fn render_chart_svg<R: Rng + ?Sized>(
    input: &TemplateInput,
    options: &RenderOptions,
    messages: &Messages,
    locale: &str,
    series: &SeriesStrategy,
    rng: &mut R,
) -> Result<String> {
    Ok(render_svg(&trend_chart_layout(
        input, options, messages, locale, series, rng,
    )?))
}

pub(crate) fn trend_chart_layout<R: Rng + ?Sized>(
    input: &TemplateInput,
    options: &RenderOptions,
    messages: &Messages,
    locale: &str,
    series: &SeriesStrategy,
    rng: &mut R,
) -> Result<Layout> {
    options.validate()?;
    let values = series.resolve(input.value, input.period, rng);
    Ok(compute_trend_layout(
        input,
        options,
        messages,
        locale,
        &values,
        series.is_synthetic(),
    ))
}
