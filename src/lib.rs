//! Self-contained SVG rendering of web-analytics metrics and charts.
//!
//! Rendering is two-phase: a layout module computes a serializable
//! [`layout::Layout`], and [`render::render_svg`] turns it into markup.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod i18n;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod render;
pub mod renderer;
pub mod request;
pub mod theme;
pub mod trend;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, OptionOverrides, RenderConfig, RenderOptions, load_config};
pub use error::{LocaleError, RenderError, Result};
pub use format::{FormattedMetric, compact_number, format_metric};
pub use i18n::{MessageCatalog, Messages};
pub use model::{ChartData, Dataset, MetricData, MetricKind, Period, PieData, TemplateInput};
pub use renderer::{SvgRenderer, render_badge_svg, render_chart_svg};
pub use request::{RenderPayload, RenderRequest, layout_request, parse_requests, render_request};
pub use theme::{Palette, ThemeName};
pub use trend::{SeriesStrategy, synthesize_trend};
