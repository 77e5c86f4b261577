use serde::Serialize;

use crate::i18n::Messages;
use crate::model::MetricKind;

/// Values above this switch from grouped to abbreviated formatting.
const GROUPED_MAX: f64 = 999_999.0;

const COMPACT_UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedMetric {
    pub value: String,
    pub label: String,
    pub color: String,
}

/// Formats `value` as `kind` and resolves its label from `messages`.
pub fn format_metric(
    kind: MetricKind,
    value: f64,
    messages: &Messages,
    locale: &str,
) -> FormattedMetric {
    FormattedMetric {
        value: format_metric_value(kind, value, locale),
        label: messages
            .get_or(&kind.message_key(), kind.fallback_label())
            .to_string(),
        color: kind.color().to_string(),
    }
}

pub fn format_metric_value(kind: MetricKind, value: f64, locale: &str) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    match kind {
        MetricKind::Bounces => format!("{value:.1}%"),
        MetricKind::Duration => format_duration(value),
        _ if value > GROUPED_MAX => format_abbreviated(value, locale),
        _ => format_grouped(value, locale),
    }
}

/// Grouping and decimal separators for a BCP 47 tag such as `de-DE`.
pub fn separators(locale: &str) -> (&'static str, char) {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match language.as_str() {
        "de" | "es" | "it" | "nl" | "pt" | "id" | "tr" | "da" => (".", ','),
        "fr" | "ru" | "pl" | "cs" | "sv" | "fi" | "nb" | "uk" => ("\u{202f}", ','),
        _ => (",", '.'),
    }
}

/// `"0,0"`: rounded integer with locale thousands separators.
pub fn format_grouped(value: f64, locale: &str) -> String {
    let (group, _) = separators(locale);
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push_str(group);
        }
        out.push(ch);
    }
    out
}

/// `"0.0a"`: one decimal and a magnitude suffix, e.g. `1.2M`.
pub fn format_abbreviated(value: f64, locale: &str) -> String {
    let (_, decimal) = separators(locale);
    let abs = value.abs();
    let Some(mut idx) = COMPACT_UNITS.iter().position(|(unit, _)| abs >= *unit) else {
        return format!("{value:.1}").replace('.', &decimal.to_string());
    };
    let mut scaled = (abs / COMPACT_UNITS[idx].0 * 10.0).round() / 10.0;
    // 999_950 rounds to 1000.0K; promote to the next unit instead.
    if scaled >= 1000.0 && idx > 0 {
        idx -= 1;
        scaled = (abs / COMPACT_UNITS[idx].0 * 10.0).round() / 10.0;
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let body = format!("{scaled:.1}").replace('.', &decimal.to_string());
    format!("{sign}{body}{}", COMPACT_UNITS[idx].1)
}

/// Seconds as `1h 2m 3s`, skipping empty components.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0s".to_string();
    }
    let total = seconds.round() as u64;
    let days = total / 86_400;
    let hours = total % 86_400 / 3_600;
    let minutes = total % 3_600 / 60;
    let secs = total % 60;
    let parts: Vec<String> = [(days, "d"), (hours, "h"), (minutes, "m"), (secs, "s")]
        .into_iter()
        .filter(|(amount, _)| *amount > 0)
        .map(|(amount, unit)| format!("{amount}{unit}"))
        .collect();
    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}

/// Coarse number policy of the chart renderers: `1.5M`, `2.5K`, `42`.
///
/// Intentionally independent from [`format_metric_value`]; charts use a
/// fixed English short form regardless of locale.
pub fn compact_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{}", value.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_number_matches_chart_policy() {
        assert_eq!(compact_number(1_500_000.0), "1.5M");
        assert_eq!(compact_number(2_500.0), "2.5K");
        assert_eq!(compact_number(42.0), "42");
        assert_eq!(compact_number(41.6), "42");
        assert_eq!(compact_number(999.0), "999");
        assert_eq!(compact_number(f64::NAN), "0");
    }

    #[test]
    fn grouped_formatting_uses_locale_separators() {
        assert_eq!(format_grouped(12_345.0, "en-US"), "12,345");
        assert_eq!(format_grouped(999_999.0, "en-US"), "999,999");
        assert_eq!(format_grouped(12_345.0, "de-DE"), "12.345");
        assert_eq!(format_grouped(12_345.0, "fr-FR"), "12\u{202f}345");
        assert_eq!(format_grouped(-1_234.4, "en"), "-1,234");
        assert_eq!(format_grouped(7.0, "en-US"), "7");
    }

    #[test]
    fn large_values_are_abbreviated() {
        let msgs = Messages::defaults();
        assert_eq!(
            format_metric(MetricKind::Pageviews, 1_234_567.0, &msgs, "en-US").value,
            "1.2M"
        );
        assert_eq!(
            format_metric(MetricKind::Visitors, 1_000_000.0, &msgs, "en-US").value,
            "1.0M"
        );
        assert_eq!(format_abbreviated(2_500_000_000.0, "en-US"), "2.5B");
        assert_eq!(format_abbreviated(1_250_000.0, "de-DE"), "1,3M");
        assert_eq!(format_abbreviated(999_960_000.0, "en-US"), "1.0B");
    }

    #[test]
    fn bounces_and_duration_use_their_own_formats() {
        assert_eq!(format_metric_value(MetricKind::Bounces, 42.26, "en-US"), "42.3%");
        assert_eq!(format_metric_value(MetricKind::Duration, 90.0, "en-US"), "1m 30s");
        assert_eq!(format_duration(3_661.0), "1h 1m 1s");
        assert_eq!(format_duration(3_600.0), "1h");
        assert_eq!(format_duration(0.0), "0s");
        assert_eq!(format_duration(-5.0), "0s");
        assert_eq!(format_duration(90_061.0), "1d 1h 1m 1s");
    }

    #[test]
    fn labels_come_from_messages_with_fallback() {
        let msgs = Messages::defaults();
        let formatted = format_metric(MetricKind::Pageviews, 12_345.0, &msgs, "en-US");
        assert_eq!(formatted.value, "12,345");
        assert_eq!(formatted.label, "Page views");
        assert_eq!(formatted.color, "#3b82f6");

        let empty = Messages::default();
        let formatted = format_metric(MetricKind::Duration, 30.0, &empty, "en-US");
        assert_eq!(formatted.label, "Avg. Duration");
        assert_eq!(formatted.value, "30s");
    }

    #[test]
    fn non_finite_values_format_as_zero() {
        assert_eq!(format_metric_value(MetricKind::Sessions, f64::NAN, "en-US"), "0");
        assert_eq!(format_metric_value(MetricKind::Bounces, f64::INFINITY, "en-US"), "0.0%");
    }
}
