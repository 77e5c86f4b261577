use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

static HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());
static RGB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgba?\(\s*([^,\s]+)\s*,\s*([^,\s]+)\s*,\s*([^,\s)]+)\s*(?:,\s*[^)]*)?\)$")
        .unwrap()
});

/// Alpha used for the area fill derived from a custom accent colour.
pub const FILL_ALPHA: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Light,
    Dark,
}

impl ThemeName {
    /// A fresh copy of the theme template. Callers own the result.
    pub fn palette(self) -> Palette {
        match self {
            ThemeName::Light => Palette::light(),
            ThemeName::Dark => Palette::dark(),
        }
    }
}

impl FromStr for ThemeName {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeName::Light),
            "dark" => Ok(ThemeName::Dark),
            other => Err(RenderError::UnsupportedTheme(other.to_string())),
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeName::Light => f.write_str("light"),
            ThemeName::Dark => f.write_str("dark"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartColors {
    pub line: String,
    pub fill: String,
    pub bar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub background: String,
    pub text: String,
    pub primary: String,
    pub secondary: String,
    pub grid: String,
    pub chart: ChartColors,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#333333".to_string(),
            primary: "#3b82f6".to_string(),
            secondary: "#64748b".to_string(),
            grid: "#e5e7eb".to_string(),
            chart: ChartColors {
                line: "#3b82f6".to_string(),
                fill: "rgba(59, 130, 246, 0.1)".to_string(),
                bar: "#3b82f6".to_string(),
            },
        }
    }

    pub fn dark() -> Self {
        Self {
            background: "#1f2937".to_string(),
            text: "#f3f4f6".to_string(),
            primary: "#60a5fa".to_string(),
            secondary: "#9ca3af".to_string(),
            grid: "#374151".to_string(),
            chart: ChartColors {
                line: "#60a5fa".to_string(),
                fill: "rgba(96, 165, 250, 0.1)".to_string(),
                bar: "#60a5fa".to_string(),
            },
        }
    }

    /// Replaces the accent (primary, line and bar) and returns the new palette.
    pub fn with_accent(mut self, color: &str) -> Self {
        self.primary = color.to_string();
        self.chart.line = color.to_string();
        self.chart.bar = color.to_string();
        self
    }

    /// Derives the chart fill from `color` at [`FILL_ALPHA`].
    ///
    /// Colours that are neither hex nor `rgb()`/`rgba()` keep the theme fill.
    pub fn with_translucent_fill(mut self, color: &str) -> Self {
        match translucent(color, FILL_ALPHA) {
            Some(fill) => self.chart.fill = fill,
            None => log::warn!("Cannot derive a fill colour from '{color}', keeping theme fill"),
        }
        self
    }
}

/// Converts a hex or `rgb()`/`rgba()` colour into an `rgba()` string with `alpha`.
pub fn translucent(color: &str, alpha: f32) -> Option<String> {
    let color = color.trim();
    if let Some((r, g, b)) = parse_hex(color) {
        return Some(format!("rgba({r}, {g}, {b}, {alpha})"));
    }
    let caps = RGB_RE.captures(color)?;
    Some(format!(
        "rgba({}, {}, {}, {alpha})",
        &caps[1], &caps[2], &caps[3]
    ))
}

pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let caps = HEX_RE.captures(color)?;
    let digits = caps.get(1)?.as_str();
    if digits.len() == 3 {
        let mut channels = digits
            .chars()
            .map(|c| u8::from_str_radix(&format!("{c}{c}"), 16).ok());
        return Some((channels.next()??, channels.next()??, channels.next()??));
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}
