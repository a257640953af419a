//! Inquiry form: validation, feedback message and live field checks.
//!
//! Submitting never leaves the page. A valid draft yields a localized
//! success message and an emptied form; an invalid one yields a single
//! message listing one localized error per failing field, with the user's
//! input kept.

use crate::dom::{Document, NodeId};
use crate::i18n::{localized_text, Language, TextKey};
use crate::timer::TimerQueue;
use regex::Regex;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info};

const FORM: &str = ".inquiry-form";
const CONTROLS: &str = "input, select, textarea";
const MESSAGE: &str = ".form-message";

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

/// `local@domain.tld`: one `@`, a dot after it, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
        .is_match(email)
}

/// The required fields of the inquiry form, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Service,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Service, Field::Message];

    /// The control's `name` attribute.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Service => "service",
            Field::Message => "message",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Whether `value` satisfies this field's rule.
    ///
    /// Lengths are counted in characters after trimming.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Field::Name => value.trim().chars().count() >= 2,
            Field::Email => is_valid_email(value),
            Field::Service => !value.is_empty(),
            Field::Message => value.trim().chars().count() >= 10,
        }
    }

    pub fn error_key(&self) -> TextKey {
        match self {
            Field::Name => TextKey::NameError,
            Field::Email => TextKey::EmailError,
            Field::Service => TextKey::ServiceError,
            Field::Message => TextKey::MessageError,
        }
    }
}

/// Field values captured for the duration of one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InquiryDraft {
    pub name: String,
    pub email: String,
    pub service: String,
    pub message: String,
}

impl InquiryDraft {
    /// Read the named controls of `form`; missing controls read as empty.
    pub fn from_form(document: &Document, form: NodeId) -> Self {
        let controls = document.query_all_within(form, CONTROLS);
        let read = |field: Field| {
            controls
                .iter()
                .find(|&&n| document.element(n).attribute("name") == Some(field.name()))
                .map(|&n| document.element(n).value().to_string())
                .unwrap_or_default()
        };
        InquiryDraft {
            name: read(Field::Name),
            email: read(Field::Email),
            service: read(Field::Service),
            message: read(Field::Message),
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Service => &self.service,
            Field::Message => &self.message,
        }
    }
}

/// Failing fields of `draft`, in reporting order.
pub fn validate_draft(draft: &InquiryDraft) -> Vec<Field> {
    Field::ALL
        .into_iter()
        .filter(|field| !field.accepts(draft.value(*field)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Valid,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected(Vec<Field>),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub fn class_name(&self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
        }
    }
}

/// Result of one submission: the outcome and the message element shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub outcome: SubmitOutcome,
    pub message: NodeId,
}

#[derive(Debug, Clone)]
pub struct FormController {
    form: NodeId,
    required: Vec<NodeId>,
    state: FormState,
}

impl FormController {
    /// Find the inquiry form and make all of its controls interactive.
    pub fn init(document: &mut Document) -> Option<Self> {
        let form = document.query(FORM)?;

        for node in document.query_all_within(form, "input, select, textarea, button") {
            let element = document.element_mut(node);
            element.remove_attribute("disabled");
            element.set_style("pointer-events", "auto");
        }

        Some(FormController {
            form,
            required: document.query_all_within(form, "[required]"),
            state: FormState::Idle,
        })
    }

    pub fn form(&self) -> NodeId {
        self.form
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Validate, show feedback and queue the success message's removal on
    /// `timers`.
    pub fn submit(
        &mut self,
        document: &Rc<RefCell<Document>>,
        timers: &TimerQueue,
        language: Language,
        dismiss_after: Duration,
    ) -> SubmitOutcome {
        let submission = self.process_submission(&mut document.borrow_mut(), language);

        if submission.outcome.is_accepted() {
            let document = Rc::clone(document);
            let message = submission.message;
            timers.set_timeout(dismiss_after, move || {
                let mut document = document.borrow_mut();
                if document.is_connected(message) {
                    debug!("Dismissing success message");
                    document.remove(message);
                }
            });
        }
        submission.outcome
    }

    /// The synchronous part of a submission: everything but the timer.
    pub fn process_submission(
        &mut self,
        document: &mut Document,
        language: Language,
    ) -> Submission {
        info!("Form submitted");
        self.state = FormState::Validating;

        let draft = InquiryDraft::from_form(document, self.form);
        debug!("Form data: {:?}", draft);

        let failing = validate_draft(&draft);
        if failing.is_empty() {
            self.state = FormState::Valid;
            let message = self.show_message(
                document,
                MessageKind::Success,
                localized_text(language, TextKey::FormSuccess),
            );
            self.reset(document);
            Submission {
                outcome: SubmitOutcome::Accepted,
                message,
            }
        } else {
            self.state = FormState::Invalid;
            let keys: Vec<&str> = failing
                .iter()
                .map(|field| field.error_key().as_str())
                .collect();
            info!("Form rejected: {}", keys.join(", "));
            let lines: Vec<&str> = failing
                .iter()
                .map(|field| localized_text(language, field.error_key()))
                .collect();
            let message = self.show_message(document, MessageKind::Error, &lines.join("<br>"));
            Submission {
                outcome: SubmitOutcome::Rejected(failing),
                message,
            }
        }
    }

    /// Re-check a required control on blur and flag it when invalid.
    ///
    /// Returns `None` when `target` is not one of the form's required controls.
    pub fn handle_blur(&self, document: &mut Document, target: NodeId) -> Option<bool> {
        if !self.required.contains(&target) {
            return None;
        }
        let element = document.element_mut(target);
        element.remove_class("error");

        let valid = element
            .attribute("name")
            .and_then(Field::from_name)
            .map(|field| field.accepts(element.value().trim()))
            .unwrap_or(true);
        if !valid {
            element.add_class("error");
        }
        Some(valid)
    }

    /// Clear the error flag of a required control regaining focus.
    pub fn handle_focus(&self, document: &mut Document, target: NodeId) {
        if self.required.contains(&target) {
            document.element_mut(target).remove_class("error");
        }
    }

    fn show_message(&self, document: &mut Document, kind: MessageKind, content: &str) -> NodeId {
        for existing in document.query_all(MESSAGE) {
            document.remove(existing);
        }

        let message = document.create_element("div");
        {
            let element = document.element_mut(message);
            element.set_class_name(&format!("form-message {}", kind.class_name()));
            element.set_text(content);
        }

        let parent = document
            .element(self.form)
            .parent()
            .unwrap_or_else(|| document.body());
        document.insert_before(parent, message, self.form);
        message
    }

    fn reset(&self, document: &mut Document) {
        for node in document.query_all_within(self.form, CONTROLS) {
            let element = document.element_mut(node);
            let keeps_value = element.tag() == "input"
                && matches!(
                    element.attribute("type"),
                    Some("submit" | "button" | "reset" | "hidden" | "checkbox" | "radio")
                );
            if !keeps_value {
                element.set_value("");
            }
        }
    }
}
