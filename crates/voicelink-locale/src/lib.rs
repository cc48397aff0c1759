//! Localized phrase catalogs for spoken responses.
//!
//! Phrase resources are plain-text `.lang` files of `name=value` lines, one
//! file per locale tag (`en-US.lang`, `de-DE.lang`, ...). Every file is
//! loaded once at startup into a typed [`Phrases`] catalog; a locale missing
//! a required phrase fails startup instead of surfacing as a missing value
//! at request time. Requests for an unknown locale tag fall back to the
//! default locale.

mod phrases;
mod store;
mod table;

pub use phrases::{PhraseKey, Phrases};
pub use store::LocaleStore;
pub use table::PhraseTable;

use thiserror::Error;

/// Default locale tag used when a requested locale has no resource file.
pub const DEFAULT_LOCALE: &str = "en-US";

#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("locale directory {0:?} could not be read: {1}")]
    DirRead(std::path::PathBuf, #[source] std::io::Error),

    #[error("locale {locale:?} is missing required phrase {key:?}")]
    MissingPhrase { locale: String, key: &'static str },

    #[error("default locale {0:?} has no resource file")]
    MissingDefaultLocale(String),
}

/// Returns the region subtag of a locale tag (`"de-DE"` → `"DE"`).
///
/// Tags without a region part yield an empty string; numeric formatting
/// then falls back to the point-decimal convention.
pub fn region_of(locale_tag: &str) -> &str {
    locale_tag.split_once('-').map(|(_, region)| region).unwrap_or("")
}
