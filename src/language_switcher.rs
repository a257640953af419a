//! Language switcher: `.lang-btn[data-lang]` controls and `[data-lang-target]` blocks.

use crate::dom::{Document, NodeId};
use crate::i18n::Language;
use tracing::{info, warn};

const BUTTONS: &str = ".lang-btn";
const TAGGED: &str = "[data-lang-target]";

/// Application state shared by the text-producing parts of the page.
///
/// The active language lives here rather than being read back from the
/// document; `body[data-lang]` is only a mirror for stylesheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SiteState {
    language: Language,
}

impl SiteState {
    pub fn new(language: Language) -> Self {
        SiteState { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn set_language(&mut self, language: Language) {
        self.language = language;
    }
}

#[derive(Debug, Clone)]
pub struct LanguageSwitcher {
    buttons: Vec<NodeId>,
}

impl LanguageSwitcher {
    /// Collect the toggle controls and apply `initial` to the page.
    pub fn init(document: &mut Document, state: &mut SiteState, initial: Language) -> Self {
        let switcher = LanguageSwitcher {
            buttons: document.query_all(BUTTONS),
        };
        switcher.set_language(document, state, initial);
        switcher
    }

    /// The toggle control a click on `target` lands on, if any.
    pub fn button_for(&self, document: &Document, target: NodeId) -> Option<NodeId> {
        document
            .closest(target, BUTTONS)
            .filter(|button| self.buttons.contains(button))
    }

    /// Handle activation of a toggle control.
    ///
    /// Controls naming an unsupported language leave the page untouched.
    pub fn activate(&self, document: &mut Document, state: &mut SiteState, button: NodeId) {
        let code = document
            .element(button)
            .attribute("data-lang")
            .unwrap_or_default()
            .to_string();
        info!("Language button clicked: {}", code);

        match Language::from_code(&code) {
            Ok(language) => self.set_language(document, state, language),
            Err(e) => warn!("Ignoring language toggle: {}", e),
        }
    }

    /// Make `language` active and update every view that depends on it.
    pub fn set_language(&self, document: &mut Document, state: &mut SiteState, language: Language) {
        info!("Setting language to: {} ({})", language.native_name(), language);
        state.set_language(language);

        for &button in &self.buttons {
            let element = document.element_mut(button);
            element.remove_class("active");
            if element.attribute("data-lang") == Some(language.code()) {
                element.add_class("active");
            }
        }

        let body = document.body();
        document
            .element_mut(body)
            .set_attribute("data-lang", language.code());

        apply_visibility(document, language);
        update_option_labels(document, language);
    }
}

/// Show blocks tagged with `language`, hide every other tagged block.
fn apply_visibility(document: &mut Document, language: Language) {
    for node in document.query_all(TAGGED) {
        let element = document.element_mut(node);
        if element.attribute("data-lang-target") == Some(language.code()) {
            element.remove_class("hidden");
            element.set_style("display", "");
        } else {
            element.add_class("hidden");
            element.set_style("display", "none");
        }
    }
}

/// Native select controls render an option's own label only, so copy the
/// localized text of the matching tagged child into it.
fn update_option_labels(document: &mut Document, language: Language) {
    for option in document.query_all("option") {
        let label = document
            .query_all_within(option, TAGGED)
            .into_iter()
            .filter(|&n| document.element(n).attribute("data-lang-target") == Some(language.code()))
            .map(|n| document.element(n).text().to_string())
            .last();

        if let Some(label) = label.filter(|l| !l.is_empty()) {
            document.element_mut(option).set_text(&label);
        }
    }
}
