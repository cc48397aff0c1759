//! Startup loading and lookup of per-locale catalogs.

use crate::phrases::Phrases;
use crate::table::PhraseTable;
use crate::{LocaleError, DEFAULT_LOCALE};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// All locale catalogs, loaded and verified once at startup.
#[derive(Debug, Clone)]
pub struct LocaleStore {
    catalogs: HashMap<String, Phrases>,
    default_locale: String,
}

impl LocaleStore {
    /// Loads every `*.lang` file under `dir`, keyed by file stem.
    ///
    /// A file that cannot be read is logged and skipped; a file missing a
    /// required phrase aborts the load. The default locale must end up
    /// present.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, LocaleError> {
        Self::load_dir_with_default(dir, DEFAULT_LOCALE)
    }

    pub fn load_dir_with_default(
        dir: impl AsRef<Path>,
        default_locale: &str,
    ) -> Result<Self, LocaleError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir)
            .map_err(|e| LocaleError::DirRead(dir.to_path_buf(), e))?;

        let mut catalogs = HashMap::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("lang") {
                continue;
            }
            let Some(locale) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let contents = match std::fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(e) => {
                    warn!(path = %path.display(), "skipping unreadable locale resource: {e}");
                    continue;
                }
            };
            let table = PhraseTable::parse(&contents);
            let phrases = Phrases::from_table(locale, &table)?;
            catalogs.insert(locale.to_string(), phrases);
        }

        if !catalogs.contains_key(default_locale) {
            return Err(LocaleError::MissingDefaultLocale(default_locale.to_string()));
        }

        info!(
            count = catalogs.len(),
            default = default_locale,
            "loaded locale catalogs"
        );

        Ok(Self {
            catalogs,
            default_locale: default_locale.to_string(),
        })
    }

    /// Returns the catalog for a locale tag, falling back to the default
    /// locale when the tag has no resource.
    pub fn phrases(&self, locale_tag: &str) -> &Phrases {
        self.catalogs.get(locale_tag).unwrap_or_else(|| {
            &self.catalogs[&self.default_locale]
        })
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.catalogs.keys().map(String::as_str)
    }
}
