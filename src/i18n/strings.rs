/// Keys of the user-facing texts produced by the page controller.
///
/// Everything else on the page is bilingual markup toggled by the language
/// switcher; only the form feedback is generated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    FormSuccess,
    NameError,
    EmailError,
    ServiceError,
    MessageError,
}

impl TextKey {
    /// Stable identifier of the key, as used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextKey::FormSuccess => "form_success",
            TextKey::NameError => "name_error",
            TextKey::EmailError => "email_error",
            TextKey::ServiceError => "service_error",
            TextKey::MessageError => "message_error",
        }
    }
}

/// All localized user-facing strings for a language
///
/// An empty string marks a text the language does not provide; lookups then
/// fall back to the canonical language.
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    // ==================== Form Feedback ====================
    /// Shown above the inquiry form after a valid submission
    pub form_success: &'static str,

    // ==================== Validation Errors ====================
    /// Name shorter than 2 characters
    pub name_error: &'static str,

    /// Email not shaped like `local@domain.tld`
    pub email_error: &'static str,

    /// No service selected
    pub service_error: &'static str,

    /// Message shorter than 10 characters
    pub message_error: &'static str,
}

impl LanguageStrings {
    /// Look up a text, `None` when this language does not provide it.
    pub fn get(&self, key: TextKey) -> Option<&'static str> {
        let text = match key {
            TextKey::FormSuccess => self.form_success,
            TextKey::NameError => self.name_error,
            TextKey::EmailError => self.email_error,
            TextKey::ServiceError => self.service_error,
            TextKey::MessageError => self.message_error,
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ==================== English Strings ====================

/// English language strings (canonical)
pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    form_success: "Thank you for your inquiry! We will get back to you soon.",
    name_error: "Please enter a valid name (at least 2 characters).",
    email_error: "Please enter a valid email address.",
    service_error: "Please select a service.",
    message_error: "Please enter a message (at least 10 characters).",
};

// ==================== Hindi Strings ====================

/// Hindi language strings
pub const HINDI_STRINGS: LanguageStrings = LanguageStrings {
    form_success: "आपकी पूछताछ के लिए धन्यवाद! हम जल्द ही आपसे संपर्क करेंगे।",
    name_error: "कृपया एक वैध नाम दर्ज करें (कम से कम 2 अक्षर)।",
    email_error: "कृपया एक वैध ईमेल पता दर्ज करें।",
    service_error: "कृपया एक सेवा चुनें।",
    message_error: "कृपया एक संदेश दर्ज करें (कम से कम 10 अक्षर)।",
};
