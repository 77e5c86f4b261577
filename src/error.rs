use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid dimensions {width}x{height}: width and height must be positive")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Chart data has no datasets")]
    MissingDataset,

    #[error("Dataset '{dataset}' has {actual} values but there are {expected} labels")]
    LengthMismatch {
        dataset: String,
        expected: usize,
        actual: usize,
    },

    #[error("Pie value at index {index} is negative ({value})")]
    NegativeValue { index: usize, value: f64 },

    #[error("Value at index {index} of '{series}' is not a finite number")]
    NonFiniteValue { series: String, index: usize },

    #[error("Unsupported metric: {0} (expected pageviews, visitors, sessions, bounces or duration)")]
    UnsupportedMetric(String),

    #[error("Unsupported period: {0} (expected day, week, month or year)")]
    UnsupportedPeriod(String),

    #[error("Unsupported theme: {0} (expected light or dark)")]
    UnsupportedTheme(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum LocaleError {
    #[error("Invalid locale tag: {0:?}")]
    InvalidLocale(String),

    #[error("No messages directory configured for locale {0}")]
    NoDirectory(String),

    #[error("Failed to read locale file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse locale file: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = RenderError::UnsupportedMetric("events".to_string());
        assert!(err.to_string().contains("events"));

        let err = RenderError::LengthMismatch {
            dataset: "views".to_string(),
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "Dataset 'views' has 2 values but there are 3 labels"
        );
    }
}
