//! The page controller: wires every feature to the document once at startup
//! and routes browser events to them.
//!
//! Features are independent; each one tolerates its elements being absent.
//! Scroll, resize, anchor navigation and successful submissions queue timers
//! on the page's own [`TimerQueue`]. They run while [`Page::wait`] is awaited.

use crate::config::Config;
use crate::dom::{Document, NodeId, NodeSnapshot, Window};
use crate::form::{FormController, FormState, SubmitOutcome};
use crate::i18n::Language;
use crate::language_switcher::{LanguageSwitcher, SiteState};
use crate::lazy_images::LazyImageLoader;
use crate::menu::{self, MenuController};
use crate::observer::ObserverOptions;
use crate::reveal::RevealAnimator;
use crate::scroll;
use crate::tabs::TabController;
use crate::timer::{Debouncer, TimerQueue};
use serde::Serialize;
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tracing::info;

/// A browser event delivered to the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Click { target: NodeId },
    Submit { form: NodeId },
    Focus { target: NodeId },
    Blur { target: NodeId },
    Scroll { y: f64 },
    Resize { width: f64 },
    KeyDown { key: String },
}

/// Serializable state of the whole page.
#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub language: &'static str,
    pub window: Window,
    pub document: NodeSnapshot,
}

pub struct Page {
    document: Rc<RefCell<Document>>,
    config: Config,
    state: SiteState,
    language: LanguageSwitcher,
    tabs: TabController,
    form: Option<FormController>,
    menu: Option<MenuController>,
    reveal: RevealAnimator,
    lazy_images: LazyImageLoader,
    timers: TimerQueue,
    scroll_spy: Debouncer,
    resize: Debouncer,
}

impl Page {
    /// Run every feature initializer against `document` (the DOM-ready step).
    pub fn init(mut document: Document, config: Config) -> Self {
        let mut state = SiteState::new(config.default_language);
        let language = LanguageSwitcher::init(&mut document, &mut state, config.default_language);
        let tabs = TabController::init(&document);
        let form = FormController::init(&mut document);
        let menu = MenuController::init(&document);
        let reveal = RevealAnimator::init(
            &mut document,
            ObserverOptions {
                threshold: config.reveal_threshold,
                root_margin_bottom: config.reveal_bottom_margin,
            },
        );
        let lazy_images = LazyImageLoader::init(&document);

        let mut page = Page {
            document: Rc::new(RefCell::new(document)),
            config,
            state,
            language,
            tabs,
            form,
            menu,
            reveal,
            lazy_images,
            timers: TimerQueue::new(),
            scroll_spy: Debouncer::new("scroll-spy"),
            resize: Debouncer::new("resize"),
        };
        page.process_intersections();
        info!("Site controller ready");
        page
    }

    pub fn document(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    pub fn language(&self) -> Language {
        self.state.language()
    }

    pub fn set_language(&mut self, language: Language) {
        let mut document = self.document.borrow_mut();
        self.language.set_language(&mut document, &mut self.state, language);
    }

    pub fn form_state(&self) -> Option<FormState> {
        self.form.as_ref().map(FormController::state)
    }

    /// Type `value` into a form control.
    pub fn input(&mut self, target: NodeId, value: &str) {
        self.document
            .borrow_mut()
            .element_mut(target)
            .set_value(value);
    }

    pub fn dispatch(&mut self, event: Event) {
        match event {
            Event::Click { target } => self.click(target),
            Event::Submit { form } => {
                self.submit(form);
            }
            Event::Focus { target } => {
                if let Some(form) = &self.form {
                    form.handle_focus(&mut self.document.borrow_mut(), target);
                }
            }
            Event::Blur { target } => {
                if let Some(form) = &self.form {
                    form.handle_blur(&mut self.document.borrow_mut(), target);
                }
            }
            Event::Scroll { y } => {
                self.document.borrow_mut().window.scroll_y = y.max(0.0);
                self.scrolled();
            }
            Event::Resize { width } => self.resized(width),
            Event::KeyDown { key } => {
                if key == "Escape" {
                    menu::close(&mut self.document.borrow_mut());
                }
            }
        }
    }

    /// Submit the inquiry form; `None` when `form` is not the inquiry form.
    pub fn submit(&mut self, form: NodeId) -> Option<SubmitOutcome> {
        let controller = self.form.as_mut().filter(|c| c.form() == form)?;
        Some(controller.submit(
            &self.document,
            &self.timers,
            self.state.language(),
            self.config.success_dismiss,
        ))
    }

    /// Let `duration` pass, running the page timers that come due.
    pub async fn wait(&self, duration: Duration) {
        self.timers.advance(duration).await;
    }

    // Listener order follows registration order at startup; language and
    // menu toggles stop propagation before the document-level handler.
    fn click(&mut self, target: NodeId) {
        let mut navigated = false;
        {
            let mut document = self.document.borrow_mut();

            if let Some(button) = self.language.button_for(&document, target) {
                self.language.activate(&mut document, &mut self.state, button);
                return;
            }

            if let Some(trigger) = self.tabs.trigger_for(&document, target) {
                self.tabs.activate(&mut document, trigger);
            }

            if let Some(anchor) = scroll::anchor_for(&document, target) {
                if scroll::navigate(&mut document, anchor, self.config.anchor_gap).is_some() {
                    menu::close(&mut document);
                    navigated = true;
                }
            }

            if let Some(controller) = &self.menu {
                if controller.is_toggle(&document, target) {
                    menu::toggle(&mut document);
                } else {
                    if controller.is_menu_link(&document, target) {
                        menu::close(&mut document);
                    }
                    controller.handle_document_click(&mut document, target);
                }
            }
        }

        if navigated {
            self.scrolled();
        }
    }

    fn scrolled(&mut self) {
        self.process_intersections();

        let document = Rc::clone(&self.document);
        let offset = self.config.spy_offset;
        let delay = self.config.scroll_debounce;
        self.scroll_spy.schedule(&self.timers, delay, move || {
            scroll::update_active_nav(&mut document.borrow_mut(), offset);
        });
    }

    fn resized(&mut self, width: f64) {
        self.document.borrow_mut().window.inner_width = width;

        let document = Rc::clone(&self.document);
        let breakpoint = self.config.mobile_breakpoint;
        let delay = self.config.resize_debounce;
        self.resize.schedule(&self.timers, delay, move || {
            menu::close_if_wider_than(&mut document.borrow_mut(), breakpoint);
        });
    }

    fn process_intersections(&mut self) {
        let mut document = self.document.borrow_mut();
        self.reveal.process(&mut document);
        self.lazy_images.process(&mut document);
    }

    pub fn snapshot(&self) -> PageSnapshot {
        let document = self.document.borrow();
        PageSnapshot {
            language: self.state.language().code(),
            window: document.window.clone(),
            document: document.snapshot(),
        }
    }
}
