//! Internationalization (i18n) for the site's two display languages.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the supported languages and their metadata
//! - `language`: Type-safe `Language` validated against the registry
//! - `strings`: Localized form feedback texts
//!
//! # Example
//!
//! ```rust,ignore
//! use suryansh_site::i18n::{localized_text, Language, TextKey};
//!
//! let hindi = Language::from_code("hi")?;
//! let text = localized_text(hindi, TextKey::FormSuccess);
//! ```

mod language;
mod registry;
mod strings;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::{LanguageStrings, TextKey, ENGLISH_STRINGS, HINDI_STRINGS};

/// Resolve a text for `language`, falling back to the canonical language
/// when absent.
pub fn localized_text(language: Language, key: TextKey) -> &'static str {
    resolve(language.strings(), key)
}

fn resolve(strings: &LanguageStrings, key: TextKey) -> &'static str {
    strings
        .get(key)
        .or_else(|| Language::canonical().strings().get(key))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    static PARTIAL_HINDI: LanguageStrings = LanguageStrings {
        email_error: "",
        ..HINDI_STRINGS
    };

    #[test]
    fn test_text_in_active_language() {
        assert_eq!(
            localized_text(Language::HINDI, TextKey::NameError),
            HINDI_STRINGS.name_error
        );
        assert_eq!(
            localized_text(Language::ENGLISH, TextKey::FormSuccess),
            ENGLISH_STRINGS.form_success
        );
    }

    #[test]
    fn test_missing_text_falls_back_to_english() {
        assert_eq!(
            resolve(&PARTIAL_HINDI, TextKey::EmailError),
            ENGLISH_STRINGS.email_error
        );
        assert_eq!(
            resolve(&PARTIAL_HINDI, TextKey::ServiceError),
            HINDI_STRINGS.service_error
        );
    }

    #[test]
    fn test_every_key_resolves_to_non_empty_text() {
        let keys = [
            TextKey::FormSuccess,
            TextKey::NameError,
            TextKey::EmailError,
            TextKey::ServiceError,
            TextKey::MessageError,
        ];
        for language in [Language::ENGLISH, Language::HINDI] {
            for key in keys {
                assert!(!localized_text(language, key).is_empty(), "{}", key.as_str());
            }
        }
    }
}
