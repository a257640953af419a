//! Language registry: Single source of truth for the site's display languages.
//!
//! The site ships exactly two locales, English (canonical) and Hindi. The
//! registry is built once behind a `OnceLock` and never mutated afterwards.

use crate::i18n::strings::{LanguageStrings, ENGLISH_STRINGS, HINDI_STRINGS};
use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Code used in `data-lang` / `data-lang-target` attributes (e.g., "en", "hi")
    pub code: &'static str,

    /// Native name of the language (e.g., "English", "हिन्दी"), used in logs
    pub native_name: &'static str,

    /// Whether this is the canonical language used as text fallback (only one should be true)
    pub is_canonical: bool,

    /// Localized user-facing strings for this language
    pub strings: &'static LanguageStrings,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    ///
    /// # Returns
    /// * `Some(&LanguageConfig)` if the language exists
    /// * `None` if the language is not found
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get the canonical language configuration.
    ///
    /// # Panics
    /// Panics if no canonical language is found or if multiple canonical
    /// languages are defined (this indicates a configuration error).
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }
}

fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            native_name: "English",
            is_canonical: true,
            strings: &ENGLISH_STRINGS,
        },
        LanguageConfig {
            code: "hi",
            native_name: "हिन्दी",
            is_canonical: false,
            strings: &HINDI_STRINGS,
        },
    ]
}
