use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};
use crate::i18n::DEFAULT_LOCALE;
use crate::theme::{Palette, ThemeName};

const PRELOAD_LOCALES: [&str; 7] = ["en-US", "en-GB", "de-DE", "fr-FR", "es-ES", "zh-CN", "ja-JP"];

/// Resolved per-call rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub theme: ThemeName,
    pub title: Option<String>,
    pub show_title: bool,
    pub show_values: bool,
    /// Custom accent; replaces the theme's primary colour when set.
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub grid_color: Option<String>,
}

impl RenderOptions {
    pub fn new(width: u32, height: u32, theme: ThemeName) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            theme,
            title: None,
            show_title: true,
            show_values: true,
            color: None,
            background_color: None,
            text_color: None,
            grid_color: None,
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_flags(mut self, show_title: bool, show_values: bool) -> Self {
        self.show_title = show_title;
        self.show_values = show_values;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Call-local palette: the theme template with this call's overrides.
    pub fn palette(&self) -> Palette {
        let mut palette = self.theme.palette();
        if let Some(color) = self.color.as_deref() {
            palette = palette.with_accent(color);
        }
        if let Some(background) = &self.background_color {
            palette.background = background.clone();
        }
        if let Some(text) = &self.text_color {
            palette.text = text.clone();
        }
        if let Some(grid) = &self.grid_color {
            palette.grid = grid.clone();
        }
        palette
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub theme: ThemeName,
    pub title: Option<String>,
    pub show_title: bool,
    pub show_values: bool,
    pub color: Option<String>,
    /// Inner padding of the chart renderers.
    pub padding: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 200,
            theme: ThemeName::Light,
            title: None,
            show_title: true,
            show_values: true,
            color: None,
            padding: 40.0,
        }
    }
}

impl RenderConfig {
    pub fn options(&self) -> Result<RenderOptions> {
        let mut options = RenderOptions::new(self.width, self.height, self.theme)?
            .with_flags(self.show_title, self.show_values);
        options.title = self.title.clone();
        options.color = self.color.clone();
        Ok(options)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocaleConfig {
    pub default_locale: String,
    pub messages_dir: Option<PathBuf>,
    /// Locales loaded eagerly at startup.
    pub preload: Vec<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            messages_dir: None,
            preload: PRELOAD_LOCALES.iter().map(|l| l.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub locale: LocaleConfig,
}

/// Per-request overrides layered on top of [`RenderConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub theme: Option<ThemeName>,
    pub title: Option<String>,
    pub show_title: Option<bool>,
    pub show_values: Option<bool>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub grid_color: Option<String>,
}

impl OptionOverrides {
    pub fn resolve(&self, base: &RenderConfig) -> Result<RenderOptions> {
        let mut options = RenderOptions::new(
            self.width.unwrap_or(base.width),
            self.height.unwrap_or(base.height),
            self.theme.unwrap_or(base.theme),
        )?
        .with_flags(
            self.show_title.unwrap_or(base.show_title),
            self.show_values.unwrap_or(base.show_values),
        );
        options.title = self.title.clone().or_else(|| base.title.clone());
        options.color = self.color.clone().or_else(|| base.color.clone());
        options.background_color = self.background_color.clone();
        options.text_color = self.text_color.clone();
        options.grid_color = self.grid_color.clone();
        Ok(options)
    }
}

/// Loads a JSON5 config file over the defaults; `None` yields the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)?;
    let config: Config = json5::from_str(&contents)
        .map_err(|err| anyhow::anyhow!("Invalid config {}: {err}", path.display()))?;
    config.render.options()?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}
