use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MetricKind {
    Pageviews,
    Visitors,
    Sessions,
    Bounces,
    Duration,
}

impl MetricKind {
    pub const ALL: [MetricKind; 5] = [
        MetricKind::Pageviews,
        MetricKind::Visitors,
        MetricKind::Sessions,
        MetricKind::Bounces,
        MetricKind::Duration,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Pageviews => "pageviews",
            MetricKind::Visitors => "visitors",
            MetricKind::Sessions => "sessions",
            MetricKind::Bounces => "bounces",
            MetricKind::Duration => "duration",
        }
    }

    /// Label used when no message bundle provides one.
    pub fn fallback_label(self) -> &'static str {
        match self {
            MetricKind::Pageviews => "Pageviews",
            MetricKind::Visitors => "Visitors",
            MetricKind::Sessions => "Sessions",
            MetricKind::Bounces => "Bounce Rate",
            MetricKind::Duration => "Avg. Duration",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            MetricKind::Pageviews => "#3b82f6",
            MetricKind::Visitors => "#10b981",
            MetricKind::Sessions => "#f59e0b",
            MetricKind::Bounces => "#ef4444",
            MetricKind::Duration => "#8b5cf6",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            MetricKind::Pageviews => "📊",
            MetricKind::Visitors => "👥",
            MetricKind::Sessions => "🔄",
            MetricKind::Bounces => "📉",
            MetricKind::Duration => "⏱️",
        }
    }

    /// Dotted message key of the label, e.g. `metrics.pageviews`.
    pub fn message_key(self) -> String {
        format!("metrics.{}", self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| RenderError::UnsupportedMetric(s.to_string()))
    }
}

impl TryFrom<String> for MetricKind {
    type Error = RenderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MetricKind> for String {
    fn from(kind: MetricKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }

    /// Number of buckets a trend over this period is drawn with.
    pub fn points(self) -> usize {
        match self {
            Period::Day => 24,
            Period::Week => 7,
            Period::Month => 30,
            Period::Year => 12,
        }
    }

    pub fn default_label(self) -> &'static str {
        match self {
            Period::Day => "Today",
            Period::Week => "Last 7 days",
            Period::Month => "Last 30 days",
            Period::Year => "Last 12 months",
        }
    }
}

impl FromStr for Period {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            other => Err(RenderError::UnsupportedPeriod(other.to_string())),
        }
    }
}

impl TryFrom<String> for Period {
    type Error = RenderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderKind {
    Metric,
    LineChart,
    BarChart,
    PieChart,
    Badge,
    TrendChart,
}

/// One point-in-time scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricData {
    pub value: f64,
    #[serde(default)]
    pub change: Option<f64>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Labelled series. Only the first dataset is plotted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    pub fn single(label: impl Into<String>, labels: Vec<String>, data: Vec<f64>) -> Self {
        Self {
            labels,
            datasets: vec![Dataset {
                label: label.into(),
                data,
                color: None,
            }],
        }
    }

    /// Checks label/data lengths and returns the plotted dataset.
    pub fn primary(&self) -> Result<&Dataset, RenderError> {
        let first = self.datasets.first().ok_or(RenderError::MissingDataset)?;
        for dataset in &self.datasets {
            if dataset.data.len() != self.labels.len() {
                return Err(RenderError::LengthMismatch {
                    dataset: dataset.label.clone(),
                    expected: self.labels.len(),
                    actual: dataset.data.len(),
                });
            }
            ensure_finite(&dataset.label, &dataset.data)?;
        }
        Ok(first)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieData {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
    #[serde(default)]
    pub colors: Vec<String>,
}

impl PieData {
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.data.len() != self.labels.len() {
            return Err(RenderError::LengthMismatch {
                dataset: "pie".to_string(),
                expected: self.labels.len(),
                actual: self.data.len(),
            });
        }
        ensure_finite("pie", &self.data)?;
        if let Some((index, value)) = self.data.iter().enumerate().find(|(_, v)| **v < 0.0) {
            return Err(RenderError::NegativeValue {
                index,
                value: *value,
            });
        }
        Ok(())
    }
}

/// Aggregate input of the badge and trend chart templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInput {
    pub metric: MetricKind,
    pub value: f64,
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    pub website_name: Option<String>,
}

pub(crate) fn ensure_finite(series: &str, values: &[f64]) -> Result<(), RenderError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(RenderError::NonFiniteValue {
            series: series.to_string(),
            index,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_kinds_round_trip_through_names() {
        for kind in MetricKind::ALL {
            assert_eq!(kind.as_str().parse::<MetricKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_metric_is_rejected() {
        let err = "events".parse::<MetricKind>().unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedMetric(name) if name == "events"));

        let err = serde_json::from_str::<MetricKind>("\"events\"").unwrap_err();
        assert!(err.to_string().contains("Unsupported metric: events"));
    }

    #[test]
    fn period_points_follow_bucket_sizes() {
        assert_eq!(Period::Day.points(), 24);
        assert_eq!(Period::Week.points(), 7);
        assert_eq!(Period::Month.points(), 30);
        assert_eq!(Period::Year.points(), 12);
        assert!("decade".parse::<Period>().is_err());
    }

    #[test]
    fn chart_data_rejects_length_mismatch() {
        let mut data = ChartData::single("views", vec!["a".into(), "b".into()], vec![1.0, 2.0]);
        assert!(data.primary().is_ok());
        data.datasets.push(Dataset {
            label: "visits".into(),
            data: vec![1.0],
            color: None,
        });
        assert!(matches!(
            data.primary(),
            Err(RenderError::LengthMismatch { actual: 1, expected: 2, .. })
        ));
    }

    #[test]
    fn chart_data_requires_a_dataset() {
        let data = ChartData {
            labels: vec![],
            datasets: vec![],
        };
        assert!(matches!(data.primary(), Err(RenderError::MissingDataset)));
    }

    #[test]
    fn pie_data_rejects_negative_and_nan() {
        let pie = PieData {
            labels: vec!["a".into(), "b".into()],
            data: vec![1.0, -2.0],
            colors: vec![],
        };
        assert!(matches!(pie.validate(), Err(RenderError::NegativeValue { index: 1, .. })));

        let pie = PieData {
            labels: vec!["a".into()],
            data: vec![f64::NAN],
            colors: vec![],
        };
        assert!(matches!(pie.validate(), Err(RenderError::NonFiniteValue { .. })));
    }
}
