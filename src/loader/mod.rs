//! List loading through a snapshot cache.

mod format;

pub use format::{ListFormat, DEFAULT_TLD_FILENAME};

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::{ListCache, NilListCache};
use crate::error::{PslError, Result, SourceErrorKind};
use crate::idn::{IdnaOptions, IDNA_DEFAULT};
use crate::parser::parse_list;
use crate::resolver::Rules;
use crate::rules::RuleData;
use crate::tld::TopLevelDomains;
use crate::types::ListSection;

/// Values that can be stored in a [`ListCache`]
trait Snapshot: Sized {
    const KIND: &'static str;

    fn from_snapshot(snapshot: &str) -> Result<Self>;

    fn to_snapshot(&self) -> Result<String>;
}

impl Snapshot for RuleData {
    const KIND: &'static str = "rules";

    fn from_snapshot(snapshot: &str) -> Result<Self> {
        RuleData::from_json(snapshot)
    }

    fn to_snapshot(&self) -> Result<String> {
        self.to_json()
    }
}

impl Snapshot for TopLevelDomains {
    const KIND: &'static str = "tlds";

    fn from_snapshot(snapshot: &str) -> Result<Self> {
        TopLevelDomains::from_json(snapshot)
    }

    fn to_snapshot(&self) -> Result<String> {
        self.to_json()
    }
}

/// Loads Public Suffix and TLD lists, consulting a cache first
pub struct ListManager {
    cache: Arc<dyn ListCache>,
    idna: IdnaOptions,
    format: Option<ListFormat>,
    data_dir: Option<PathBuf>,
}

impl ListManager {
    /// Create a manager with no cache
    pub fn new() -> Self {
        Self {
            cache: Arc::new(NilListCache),
            idna: IdnaOptions::default(),
            format: None,
            data_dir: None,
        }
    }

    /// Set the snapshot cache
    pub fn with_cache(mut self, cache: Arc<dyn ListCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Set IDNA options used for rule labels and for the resulting [`Rules`]
    pub fn with_idna_options(mut self, options: IdnaOptions) -> Self {
        self.idna = options;
        self
    }

    /// Set explicit list format (overrides auto-detection)
    pub fn with_format(mut self, format: ListFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set data directory holding lists under their default file names
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Load the Public Suffix List from the data directory
    pub fn rules(&self) -> Result<Rules> {
        let format = self.format.unwrap_or(ListFormat::Text);
        let path = self.data_path(format.default_filename())?;
        self.rules_from_path(path)
    }

    /// Load the TLD list from the data directory
    pub fn tlds(&self) -> Result<TopLevelDomains> {
        let path = self.data_path(DEFAULT_TLD_FILENAME)?;
        self.tlds_from_path(path)
    }

    /// Load a Public Suffix List file. The path is the cache URI, suffixed
    /// with the ASCII IDNA flags when they are not the default.
    pub fn rules_from_path(&self, path: impl AsRef<Path>) -> Result<Rules> {
        let path = path.as_ref();
        let uri = path.display().to_string();
        let format = self
            .format
            .or_else(|| ListFormat::detect(path))
            .unwrap_or(ListFormat::Text);

        let data: RuleData = self.load_cached(&uri, || {
            let text = read_source(path)?;
            match format {
                ListFormat::Text => parse_list(&text, &self.idna),
                ListFormat::Json => RuleData::from_json(&text),
            }
        })?;
        Ok(self.build_rules(&data))
    }

    /// Load Public Suffix List text, cached under `uri`.
    pub fn rules_from_str(&self, uri: &str, text: &str) -> Result<Rules> {
        let data: RuleData = self.load_cached(uri, || parse_list(text, &self.idna))?;
        Ok(self.build_rules(&data))
    }

    /// Load an IANA TLD list file. The path is the cache URI.
    pub fn tlds_from_path(&self, path: impl AsRef<Path>) -> Result<TopLevelDomains> {
        let path = path.as_ref();
        let uri = path.display().to_string();
        self.load_cached(&uri, || {
            let text = read_source(path)?;
            TopLevelDomains::parse(&text, &self.idna)
        })
    }

    /// Load IANA TLD list text, cached under `uri`.
    pub fn tlds_from_str(&self, uri: &str, text: &str) -> Result<TopLevelDomains> {
        self.load_cached(uri, || TopLevelDomains::parse(text, &self.idna))
    }

    fn data_path(&self, filename: &str) -> Result<PathBuf> {
        let dir = self
            .data_dir
            .as_ref()
            .ok_or_else(|| PslError::InvalidListSource {
                kind: SourceErrorKind::NotConfigured,
                message: "Data directory not configured".to_string(),
            })?;
        Ok(dir.join(filename))
    }

    fn build_rules(&self, data: &RuleData) -> Rules {
        let rules = Rules::from_rule_data(data).with_idna_options(self.idna);
        tracing::info!(
            icann = rules.tree().root(ListSection::Icann).descendant_count(),
            private = rules.tree().root(ListSection::Private).descendant_count(),
            "public suffix rules loaded"
        );
        rules
    }

    /// Cache key for `uri`. Parsed labels depend on the ASCII conversion
    /// flags, so non-default flags get their own entry.
    fn cache_key<'a>(&self, uri: &'a str) -> Cow<'a, str> {
        match self.idna.to_ascii {
            IDNA_DEFAULT => Cow::Borrowed(uri),
            flags => Cow::Owned(format!("{}#idna={:#x}", uri, flags)),
        }
    }

    /// Return the cached snapshot for `uri`, or load it and store a snapshot.
    ///
    /// An unreadable snapshot is discarded and the source is loaded instead.
    fn load_cached<T: Snapshot>(&self, uri: &str, load: impl FnOnce() -> Result<T>) -> Result<T> {
        let key = self.cache_key(uri);
        let uri = key.as_ref();
        if let Some(snapshot) = self.cache.fetch_by_uri(uri) {
            match T::from_snapshot(&snapshot) {
                Ok(value) => {
                    tracing::debug!(uri, kind = T::KIND, "snapshot cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(uri, kind = T::KIND, error = %e, "discarding unreadable snapshot");
                }
            }
        } else {
            tracing::debug!(uri, kind = T::KIND, "snapshot cache miss");
        }

        let value = load()?;
        let snapshot = value.to_snapshot()?;
        if !self.cache.store_by_uri(uri, &snapshot) {
            tracing::debug!(uri, kind = T::KIND, "snapshot not stored");
        }
        Ok(value)
    }
}

impl Default for ListManager {
    fn default() -> Self {
        Self::new()
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        PslError::file_error(format!(
            "Failed to read list file '{}': {}",
            path.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryListCache;
    use crate::types::Section;

    const LIST: &str = "// ===BEGIN ICANN DOMAINS===\ncom\nuk\nco.uk\n// ===END ICANN DOMAINS===\n\
                        // ===BEGIN PRIVATE DOMAINS===\ngithub.io\n// ===END PRIVATE DOMAINS===\n";

    #[test]
    fn test_rules_from_str_stores_snapshot() {
        let cache = Arc::new(MemoryListCache::new());
        let manager = ListManager::new().with_cache(cache.clone());

        let rules = manager.rules_from_str("memory://psl", LIST).unwrap();
        assert_eq!(cache.len(), 1);

        let snapshot = cache.fetch_by_uri("memory://psl").unwrap();
        let cached = Rules::from_rule_data(&RuleData::from_json(&snapshot).unwrap());
        assert_eq!(cached.tree(), rules.tree());
    }

    #[test]
    fn test_cache_hit_skips_source() {
        let cache = Arc::new(MemoryListCache::new());
        let manager = ListManager::new().with_cache(cache.clone());
        manager.rules_from_str("memory://psl", LIST).unwrap();

        // A snapshot is returned as-is, even if the text given now differs
        let rules = manager.rules_from_str("memory://psl", "").unwrap();
        let suffix = rules
            .public_suffix_of("www.example.co.uk", Section::Effective)
            .unwrap();
        assert_eq!(suffix.to_string(), "co.uk");
    }

    #[test]
    fn test_unreadable_snapshot_is_replaced() {
        let cache = Arc::new(MemoryListCache::new());
        cache.store_by_uri("memory://psl", "not json");
        let manager = ListManager::new().with_cache(cache.clone());

        let rules = manager.rules_from_str("memory://psl", LIST).unwrap();
        assert!(!rules.tree().is_empty());
        assert!(RuleData::from_json(&cache.fetch_by_uri("memory://psl").unwrap()).is_ok());
    }

    #[test]
    fn test_missing_data_dir() {
        let err = ListManager::new().rules().unwrap_err();
        assert!(matches!(
            err,
            PslError::InvalidListSource {
                kind: SourceErrorKind::NotConfigured,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let err = ListManager::new()
            .rules_from_path("/nonexistent/public_suffix_list.dat")
            .unwrap_err();
        assert!(matches!(
            err,
            PslError::InvalidListSource {
                kind: SourceErrorKind::FileError,
                ..
            }
        ));
    }

    #[test]
    fn test_snapshots_keyed_by_ascii_flags() {
        let cache = Arc::new(MemoryListCache::new());
        let strict = IdnaOptions::new(crate::idn::IDNA_USE_STD3_RULES, 0);

        ListManager::new()
            .with_cache(cache.clone())
            .rules_from_str("memory://psl", LIST)
            .unwrap();
        ListManager::new()
            .with_cache(cache.clone())
            .with_idna_options(strict)
            .rules_from_str("memory://psl", LIST)
            .unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.fetch_by_uri("memory://psl").is_some());
        assert!(cache.fetch_by_uri("memory://psl#idna=0x2").is_some());

        // Unicode flags do not affect parsing and share the default entry
        ListManager::new()
            .with_cache(cache.clone())
            .with_idna_options(IdnaOptions::default().with_unicode(crate::idn::IDNA_USE_STD3_RULES))
            .rules_from_str("memory://psl", LIST)
            .unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_idna_options_carried_to_rules() {
        let options = IdnaOptions::new(crate::idn::IDNA_USE_STD3_RULES, 0);
        let rules = ListManager::new()
            .with_idna_options(options)
            .rules_from_str("memory://psl", LIST)
            .unwrap();
        assert_eq!(rules.idna_options(), options);
    }
}
