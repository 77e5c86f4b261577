use analytics_svg_renderer::{Config, MessageCatalog, RenderRequest, render_request};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HostOptions {
    default_locale: Option<String>,
    padding: Option<f64>,
}

fn build_config(options: HostOptions) -> Config {
    let mut config = Config::default();
    if let Some(locale) = options.default_locale {
        config.locale.default_locale = locale;
    }
    if let Some(padding) = options.padding {
        config.render.padding = padding;
    }
    config
}

fn render(request_json: &str, seed: u64, options: HostOptions) -> Result<String, String> {
    let request: RenderRequest =
        serde_json::from_str(request_json).map_err(|error| error.to_string())?;
    let config = build_config(options);
    let mut rng = StdRng::seed_from_u64(seed);
    render_request(&request, &config, &MessageCatalog::builtin(), &mut rng)
        .map_err(|error| error.to_string())
}

/// Renders one JSON render request with the built-in English messages.
/// `seed` drives synthetic trend series so the output is reproducible.
#[wasm_bindgen]
pub fn render_svg_request(
    request_json: &str,
    seed: u64,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<HostOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        HostOptions::default()
    };

    render(request_json, seed, options).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use crate::{HostOptions, render};

    #[test]
    fn renders_badge_request() {
        let svg = render(
            r#"{"kind":"badge","input":{"metric":"visitors","value":1234,"websiteName":"blog"}}"#,
            1,
            HostOptions::default(),
        )
        .expect("badge should render");

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(">1,234</text>"));
        assert!(svg.contains(">blog</text>"));
    }

    #[test]
    fn unknown_kind_is_reported() {
        let err = render(r#"{"kind":"gauge"}"#, 1, HostOptions::default()).unwrap_err();
        assert!(err.contains("gauge"));
    }
}
