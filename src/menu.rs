//! Collapsible mobile navigation menu.
//!
//! The open state is mirrored on three elements that always change
//! together: `.nav-links` (`mobile-active`), `.mobile-menu-btn` (`active`)
//! and `body` (`menu-open`, used for scroll locking).

use crate::dom::{Document, NodeId};
use tracing::debug;

const PANEL: &str = ".nav-links";
const BUTTON: &str = ".mobile-menu-btn";
const REGION: &str = ".nav";

fn parts(document: &Document) -> Option<(NodeId, NodeId)> {
    Some((document.query(PANEL)?, document.query(BUTTON)?))
}

pub fn is_open(document: &Document) -> bool {
    document
        .query(PANEL)
        .map(|panel| document.element(panel).has_class("mobile-active"))
        .unwrap_or(false)
}

/// Open the menu; a no-op unless both the panel and the button exist.
pub fn open(document: &mut Document) {
    if let Some((panel, button)) = parts(document) {
        document.element_mut(panel).add_class("mobile-active");
        document.element_mut(button).add_class("active");
        let body = document.body();
        document.element_mut(body).add_class("menu-open");
    }
}

/// Close the menu; idempotent, and a no-op unless both parts exist.
pub fn close(document: &mut Document) {
    if let Some((panel, button)) = parts(document) {
        document.element_mut(panel).remove_class("mobile-active");
        document.element_mut(button).remove_class("active");
        let body = document.body();
        document.element_mut(body).remove_class("menu-open");
    }
}

pub fn toggle(document: &mut Document) {
    if is_open(document) {
        close(document);
    } else {
        open(document);
    }
}

/// Region boundary check: whether `target` is `region` or lies inside it.
pub fn is_within_region(document: &Document, target: NodeId, region: NodeId) -> bool {
    document.contains(region, target)
}

/// Close the menu when the viewport has grown past the mobile breakpoint.
pub fn close_if_wider_than(document: &mut Document, breakpoint: f64) {
    if document.window.inner_width > breakpoint {
        debug!(
            "Viewport {} wider than {}, closing menu",
            document.window.inner_width, breakpoint
        );
        close(document);
    }
}

/// Click wiring for the menu, present only when both parts exist.
#[derive(Debug, Clone)]
pub struct MenuController {
    button: NodeId,
    links: Vec<NodeId>,
}

impl MenuController {
    pub fn init(document: &Document) -> Option<Self> {
        let (panel, button) = parts(document)?;
        Some(MenuController {
            button,
            links: document.query_all_within(panel, ".nav-link"),
        })
    }

    pub fn is_toggle(&self, document: &Document, target: NodeId) -> bool {
        document.closest(target, BUTTON) == Some(self.button)
    }

    /// Whether `target` is one of the menu's navigation links.
    pub fn is_menu_link(&self, document: &Document, target: NodeId) -> bool {
        document
            .closest(target, ".nav-link")
            .map(|link| self.links.contains(&link))
            .unwrap_or(false)
    }

    /// Document-level click: close the open menu when clicking outside every
    /// `.nav` region. Without a region every click is outside.
    pub fn handle_document_click(&self, document: &mut Document, target: NodeId) {
        let inside = document
            .query_all(REGION)
            .into_iter()
            .any(|region| is_within_region(document, target, region));
        if !inside && is_open(document) {
            debug!("Click outside navigation, closing menu");
            close(document);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page() -> Document {
        Document::from_value(json!({
            "body": [
                { "tag": "header", "class": "header", "children": [
                    { "tag": "nav", "class": "nav", "children": [
                        { "tag": "button", "class": "mobile-menu-btn", "children": [
                            { "tag": "span" }, { "tag": "span" }, { "tag": "span" }
                        ]},
                        { "tag": "ul", "class": "nav-links", "children": [
                            { "tag": "li", "children": [
                                { "tag": "a", "class": "nav-link", "attrs": { "href": "#home" } }
                            ]}
                        ]}
                    ]}
                ]},
                { "tag": "main", "class": "content" }
            ]
        }))
        .unwrap()
    }

    fn flags(doc: &Document) -> (bool, bool, bool) {
        let panel = doc.query(PANEL).unwrap();
        let button = doc.query(BUTTON).unwrap();
        (
            doc.element(panel).has_class("mobile-active"),
            doc.element(button).has_class("active"),
            doc.element(doc.body()).has_class("menu-open"),
        )
    }

    #[test]
    fn test_open_close_keep_flags_in_sync() {
        let mut doc = page();
        open(&mut doc);
        assert_eq!(flags(&doc), (true, true, true));
        assert!(is_open(&doc));

        close(&mut doc);
        assert_eq!(flags(&doc), (false, false, false));

        close(&mut doc);
        assert_eq!(flags(&doc), (false, false, false));
    }

    #[test]
    fn test_toggle_flips() {
        let mut doc = page();
        toggle(&mut doc);
        assert!(is_open(&doc));
        toggle(&mut doc);
        assert!(!is_open(&doc));
    }

    #[test]
    fn test_missing_button_makes_menu_inert() {
        let mut doc = page();
        let button = doc.query(BUTTON).unwrap();
        doc.remove(button);

        open(&mut doc);
        assert!(!is_open(&doc));
        assert!(!doc.element(doc.body()).has_class("menu-open"));
        assert!(MenuController::init(&doc).is_none());
    }

    #[test]
    fn test_region_boundary() {
        let doc = page();
        let nav = doc.query(REGION).unwrap();
        let link = doc.query(".nav-link").unwrap();
        let content = doc.query(".content").unwrap();

        assert!(is_within_region(&doc, nav, nav));
        assert!(is_within_region(&doc, link, nav));
        assert!(!is_within_region(&doc, content, nav));
        assert!(!is_within_region(&doc, nav, link));
    }

    #[test]
    fn test_click_in_any_nav_keeps_menu_open() {
        let mut doc = Document::from_value(json!({
            "body": [
                { "tag": "header", "children": [
                    { "tag": "nav", "class": "nav", "children": [
                        { "tag": "button", "class": "mobile-menu-btn" },
                        { "tag": "ul", "class": "nav-links" }
                    ]}
                ]},
                { "tag": "footer", "children": [
                    { "tag": "nav", "class": "nav", "children": [
                        { "tag": "span", "class": "footer-label" }
                    ]}
                ]},
                { "tag": "main", "class": "content" }
            ]
        }))
        .unwrap();
        let menu = MenuController::init(&doc).unwrap();
        open(&mut doc);

        let label = doc.query(".footer-label").unwrap();
        menu.handle_document_click(&mut doc, label);
        assert!(is_open(&doc));

        let content = doc.query(".content").unwrap();
        menu.handle_document_click(&mut doc, content);
        assert!(!is_open(&doc));
    }

    #[test]
    fn test_outside_click_closes() {
        let mut doc = page();
        let menu = MenuController::init(&doc).unwrap();
        open(&mut doc);

        let link = doc.query(".nav-link").unwrap();
        menu.handle_document_click(&mut doc, link);
        assert!(is_open(&doc));

        let content = doc.query(".content").unwrap();
        menu.handle_document_click(&mut doc, content);
        assert_eq!(flags(&doc), (false, false, false));
    }

    #[test]
    fn test_toggle_and_link_detection() {
        let doc = page();
        let menu = MenuController::init(&doc).unwrap();
        let bar = doc.query_all("span")[1];
        let link = doc.query(".nav-link").unwrap();

        assert!(menu.is_toggle(&doc, bar));
        assert!(!menu.is_toggle(&doc, link));
        assert!(menu.is_menu_link(&doc, link));
        assert!(!menu.is_menu_link(&doc, bar));
    }

    #[test]
    fn test_close_if_wider_than_breakpoint() {
        let mut doc = page();
        open(&mut doc);
        doc.window.inner_width = 768.0;
        close_if_wider_than(&mut doc, 768.0);
        assert!(is_open(&doc));

        doc.window.inner_width = 1024.0;
        close_if_wider_than(&mut doc, 768.0);
        assert!(!is_open(&doc));
    }
}
