//! Locale message bundles used for metric and period labels.
//!
//! Bundles live on disk as `<dir>/<locale>.json` files that map message ids
//! (`label.page-views`) to a list of message parts. Only the ids the
//! renderers need are picked up; everything else in the file is ignored.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::LocaleError;

pub const DEFAULT_LOCALE: &str = "en-US";

/// BCP 47 style tags: `en`, `en-US`, `zh-Hant-TW`, `de-CH-1996`.
static LOCALE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{1,8}){0,4}$").unwrap());

pub fn is_valid_locale(locale: &str) -> bool {
    LOCALE_RE.is_match(locale)
}

const METRIC_MESSAGES: [(&str, &str, &str); 17] = [
    ("pageviews", "label.page-views", "Page views"),
    ("visitors", "label.unique-visitors", "Unique visitors"),
    ("sessions", "label.sessions", "Sessions"),
    ("events", "label.events", "Events"),
    ("bounces", "label.bounce-rate", "Bounce rate"),
    ("duration", "label.visit-duration", "Visit duration"),
    ("views", "label.views", "Views"),
    ("countries", "label.countries", "Countries"),
    ("browsers", "label.browsers", "Browsers"),
    ("os", "label.os", "OS"),
    ("devices", "label.devices", "Devices"),
    ("languages", "label.languages", "Languages"),
    ("referrers", "label.referrers", "Referrers"),
    ("screens", "label.screens", "Screens"),
    ("regions", "label.regions", "Regions"),
    ("cities", "label.cities", "Cities"),
    ("hosts", "label.hosts", "Hosts"),
];

const DATE_RANGE_MESSAGES: [(&str, &str, &str); 7] = [
    ("today", "label.today", "Today"),
    ("yesterday", "label.yesterday", "Yesterday"),
    ("thisWeek", "label.this-week", "This week"),
    ("thisMonth", "label.this-month", "This month"),
    ("thisYear", "label.this-year", "This year"),
    ("allTime", "label.all-time", "All time"),
    ("customRange", "label.custom-range", "Custom range"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDescriptor {
    pub id: String,
    pub default_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Messages {
    pub metrics: BTreeMap<String, MessageDescriptor>,
    pub date_range: BTreeMap<String, MessageDescriptor>,
}

impl Messages {
    /// Built-in English bundle.
    pub fn defaults() -> Self {
        Self {
            metrics: descriptors(&METRIC_MESSAGES),
            date_range: descriptors(&DATE_RANGE_MESSAGES),
        }
    }

    /// Looks up a dotted key such as `metrics.pageviews` or `dateRange.today`.
    pub fn get(&self, key: &str) -> Option<&str> {
        let (group, name) = key.split_once('.')?;
        let table = match group {
            "metrics" => &self.metrics,
            "dateRange" => &self.date_range,
            _ => return None,
        };
        table
            .get(name)
            .map(|descriptor| descriptor.default_message.as_str())
            .filter(|message| !message.is_empty())
    }

    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get(key).unwrap_or(fallback)
    }

    /// Reads the on-disk JSON shape: `{ "label.today": [{ "value": "Heute" }] }`.
    pub fn from_bundle(json: &serde_json::Value) -> Self {
        Self {
            metrics: extract(json, &METRIC_MESSAGES),
            date_range: extract(json, &DATE_RANGE_MESSAGES),
        }
    }

    /// Overlays `self` on the English defaults so every key resolves.
    pub fn merged_with_defaults(self) -> Self {
        let mut merged = Self::defaults();
        merged.metrics.extend(self.metrics);
        merged.date_range.extend(self.date_range);
        merged
    }
}

fn descriptors(table: &[(&str, &str, &str)]) -> BTreeMap<String, MessageDescriptor> {
    table
        .iter()
        .map(|(key, id, message)| {
            (
                key.to_string(),
                MessageDescriptor {
                    id: id.to_string(),
                    default_message: message.to_string(),
                },
            )
        })
        .collect()
}

fn extract(
    json: &serde_json::Value,
    table: &[(&str, &str, &str)],
) -> BTreeMap<String, MessageDescriptor> {
    let mut out = BTreeMap::new();
    for (key, id, _) in table {
        let Some(first) = json.get(*id).and_then(|parts| parts.get(0)) else {
            continue;
        };
        let message = first
            .get("value")
            .and_then(|v| v.as_str())
            .unwrap_or(*key)
            .to_string();
        let message_id = first
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or(*id)
            .to_string();
        out.insert(
            key.to_string(),
            MessageDescriptor {
                id: message_id,
                default_message: message,
            },
        );
    }
    out
}

/// Process-wide cache of message bundles, constructed once and shared.
///
/// Lookups never fail: a locale that cannot be loaded resolves to the English
/// defaults, and that fallback is cached until [`MessageCatalog::invalidate`]
/// or [`MessageCatalog::reload`] is called. Strings that are not locale tags
/// get the defaults without touching the disk or the cache.
#[derive(Debug, Default)]
pub struct MessageCatalog {
    dir: Option<PathBuf>,
    cache: RwLock<HashMap<String, Arc<Messages>>>,
}

impl MessageCatalog {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Catalog without a messages directory; every locale gets the defaults.
    pub fn builtin() -> Self {
        Self::new(None)
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn preload<S: AsRef<str>>(&self, locales: &[S]) {
        for locale in locales {
            let _ = self.messages(locale.as_ref());
        }
    }

    pub fn messages(&self, locale: &str) -> Arc<Messages> {
        if !is_valid_locale(locale) {
            log::warn!("Ignoring invalid locale {locale:?}");
            return Arc::new(Messages::defaults());
        }
        if let Some(hit) = self.cached(locale) {
            return hit;
        }
        let messages = match self.load(locale) {
            Ok(messages) => messages,
            Err(err) => {
                if self.dir.is_some() {
                    log::warn!("Failed to load messages for locale {locale}: {err}");
                }
                Messages::defaults()
            }
        };
        self.store(locale, messages)
    }

    /// Drops one locale, or every locale when `None`.
    pub fn invalidate(&self, locale: Option<&str>) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        match locale {
            Some(locale) => {
                cache.remove(locale);
            }
            None => cache.clear(),
        }
    }

    /// Re-reads a locale from disk, replacing whatever was cached.
    pub fn reload(&self, locale: &str) -> Result<(), LocaleError> {
        let messages = self.load(locale)?;
        self.store(locale, messages);
        Ok(())
    }

    pub fn cached_locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        locales.sort();
        locales
    }

    fn cached(&self, locale: &str) -> Option<Arc<Messages>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(locale)
            .cloned()
    }

    fn store(&self, locale: &str, messages: Messages) -> Arc<Messages> {
        let messages = Arc::new(messages);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(locale.to_string(), Arc::clone(&messages));
        messages
    }

    fn load(&self, locale: &str) -> Result<Messages, LocaleError> {
        if !is_valid_locale(locale) {
            return Err(LocaleError::InvalidLocale(locale.to_string()));
        }
        let dir = self
            .dir
            .as_ref()
            .ok_or_else(|| LocaleError::NoDirectory(locale.to_string()))?;
        let path = dir.join(format!("{locale}.json"));
        let contents = std::fs::read_to_string(&path).map_err(|source| LocaleError::Io {
            path: path.clone(),
            source,
        })?;
        let json: serde_json::Value =
            serde_json::from_str(&contents).map_err(|source| LocaleError::Parse {
                path: path.clone(),
                source,
            })?;
        log::debug!("Loaded messages for locale {locale} from {}", path.display());
        Ok(Messages::from_bundle(&json).merged_with_defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_locale(dir: &Path, locale: &str, body: &str) {
        fs::write(dir.join(format!("{locale}.json")), body).unwrap();
    }

    #[test]
    fn defaults_resolve_dotted_keys() {
        let messages = Messages::defaults();
        assert_eq!(messages.get("metrics.pageviews"), Some("Page views"));
        assert_eq!(messages.get("dateRange.today"), Some("Today"));
        assert_eq!(messages.get("metrics.unknown"), None);
        assert_eq!(messages.get("nope"), None);
        assert_eq!(messages.get_or("other.key", "fallback"), "fallback");
    }

    #[test]
    fn bundle_overrides_known_ids_only() {
        let dir = tempfile::tempdir().unwrap();
        write_locale(
            dir.path(),
            "de-DE",
            r#"{
                "label.page-views": [{ "type": 0, "value": "Seitenaufrufe" }],
                "label.today": [{ "type": 0, "value": "Heute" }],
                "label.something-else": [{ "type": 0, "value": "ignored" }]
            }"#,
        );
        let catalog = MessageCatalog::new(Some(dir.path().to_path_buf()));
        let messages = catalog.messages("de-DE");
        assert_eq!(messages.get("metrics.pageviews"), Some("Seitenaufrufe"));
        assert_eq!(messages.get("dateRange.today"), Some("Heute"));
        assert_eq!(messages.get("metrics.visitors"), Some("Unique visitors"));
    }

    #[test]
    fn missing_or_broken_locale_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_locale(dir.path(), "xx-XX", "{ not json");
        let catalog = MessageCatalog::new(Some(dir.path().to_path_buf()));
        assert_eq!(*catalog.messages("xx-XX"), Messages::defaults());
        assert_eq!(*catalog.messages("zz-ZZ"), Messages::defaults());
        assert!(matches!(
            catalog.reload("xx-XX"),
            Err(LocaleError::Parse { .. })
        ));
    }

    #[test]
    fn reload_picks_up_changed_files() {
        let dir = tempfile::tempdir().unwrap();
        write_locale(dir.path(), "fr-FR", r#"{"label.today": [{"value": "Aujourd'hui"}]}"#);
        let catalog = MessageCatalog::new(Some(dir.path().to_path_buf()));
        assert_eq!(catalog.messages("fr-FR").get("dateRange.today"), Some("Aujourd'hui"));

        write_locale(dir.path(), "fr-FR", r#"{"label.today": [{"value": "Ce jour"}]}"#);
        assert_eq!(catalog.messages("fr-FR").get("dateRange.today"), Some("Aujourd'hui"));
        catalog.reload("fr-FR").unwrap();
        assert_eq!(catalog.messages("fr-FR").get("dateRange.today"), Some("Ce jour"));
    }

    #[test]
    fn locale_must_be_a_tag() {
        for locale in ["en", "en-US", "zh-Hant-TW", "de-CH-1996"] {
            assert!(is_valid_locale(locale), "{locale}");
        }
        for locale in ["", "../secret", "en/US", "en-US.json", "e", "en_US", "..", "en-"] {
            assert!(!is_valid_locale(locale), "{locale}");
        }
    }

    #[test]
    fn path_like_locale_never_reads_outside_the_directory() {
        let root = tempfile::tempdir().unwrap();
        let messages_dir = root.path().join("messages");
        fs::create_dir(&messages_dir).unwrap();
        write_locale(
            root.path(),
            "secret",
            r#"{"label.page-views": [{"value": "LEAKED"}]}"#,
        );
        let catalog = MessageCatalog::new(Some(messages_dir));
        let messages = catalog.messages("../secret");
        assert_eq!(messages.get("metrics.pageviews"), Some("Page views"));
        assert!(catalog.cached_locales().is_empty());
        assert!(matches!(
            catalog.reload("../secret"),
            Err(LocaleError::InvalidLocale(_))
        ));
        assert!(catalog.cached_locales().is_empty());
    }

    #[test]
    fn poisoned_cache_still_invalidates_and_stores() {
        let catalog = Arc::new(MessageCatalog::builtin());
        catalog.preload(&["en-US"]);
        let poisoner = Arc::clone(&catalog);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.cache.write().unwrap();
            panic!("poison the cache lock");
        })
        .join();
        assert!(catalog.cache.is_poisoned());

        catalog.invalidate(None);
        assert!(catalog.cached_locales().is_empty());
        catalog.preload(&["en-GB"]);
        assert_eq!(catalog.cached_locales(), vec!["en-GB"]);
    }

    #[test]
    fn invalidate_empties_the_cache() {
        let catalog = MessageCatalog::builtin();
        catalog.preload(&["en-US", "en-GB"]);
        assert_eq!(catalog.cached_locales(), vec!["en-GB", "en-US"]);
        catalog.invalidate(Some("en-GB"));
        assert_eq!(catalog.cached_locales(), vec!["en-US"]);
        catalog.invalidate(None);
        assert!(catalog.cached_locales().is_empty());
    }
}
