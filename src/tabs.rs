//! Service tabs: `.tab-btn[data-tab]` triggers and `.tab-content` panels.

use crate::dom::{Document, NodeId};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct TabController {
    triggers: Vec<NodeId>,
    panels: Vec<NodeId>,
}

impl TabController {
    pub fn init(document: &Document) -> Self {
        TabController {
            triggers: document.query_all(".tab-btn"),
            panels: document.query_all(".tab-content"),
        }
    }

    pub fn trigger_for(&self, document: &Document, target: NodeId) -> Option<NodeId> {
        document
            .closest(target, ".tab-btn")
            .filter(|trigger| self.triggers.contains(trigger))
    }

    /// Activate `trigger` and the panel it names, deactivating all others.
    ///
    /// A trigger naming no existing panel is still activated, leaving the
    /// content area empty.
    pub fn activate(&self, document: &mut Document, trigger: NodeId) {
        let name = document
            .element(trigger)
            .attribute("data-tab")
            .unwrap_or_default()
            .to_string();
        info!("Tab clicked: {}", name);

        for &node in self.triggers.iter().chain(self.panels.iter()) {
            document.element_mut(node).remove_class("active");
        }

        document.element_mut(trigger).add_class("active");
        match document.get_element_by_id(&name) {
            Some(panel) => document.element_mut(panel).add_class("active"),
            None => warn!("Tab '{}' has no matching panel", name),
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
                { "tag": "div", "class": "tabs", "children": [
                    { "tag": "button", "class": "tab-btn active", "attrs": { "data-tab": "electrical" } },
                    { "tag": "button", "class": "tab-btn", "attrs": { "data-tab": "plumbing" } },
                    { "tag": "button", "class": "tab-btn", "attrs": { "data-tab": "painting" } }
                ]},
                { "tag": "div", "id": "electrical", "class": "tab-content active" },
                { "tag": "div", "id": "plumbing", "class": "tab-content" }
            ]
        }))
        .unwrap()
    }

    fn active(doc: &Document) -> Vec<NodeId> {
        doc.query_all(".active")
    }

    #[test]
    fn test_activate_is_exclusive() {
        let mut doc = page();
        let tabs = TabController::init(&doc);
        let trigger = doc.query(".tab-btn[data-tab=plumbing]").unwrap();
        let panel = doc.get_element_by_id("plumbing").unwrap();

        tabs.activate(&mut doc, trigger);
        assert_eq!(active(&doc), vec![trigger, panel]);
    }

    #[test]
    fn test_repeated_activation_stays_exclusive() {
        let mut doc = page();
        let tabs = TabController::init(&doc);
        let trigger = doc.query(".tab-btn[data-tab=electrical]").unwrap();
        let panel = doc.get_element_by_id("electrical").unwrap();

        for _ in 0..3 {
            tabs.activate(&mut doc, trigger);
        }
        assert_eq!(active(&doc), vec![trigger, panel]);
    }

    #[test]
    fn test_missing_panel_activates_trigger_only() {
        let mut doc = page();
        let tabs = TabController::init(&doc);
        let trigger = doc.query(".tab-btn[data-tab=painting]").unwrap();

        tabs.activate(&mut doc, trigger);
        assert_eq!(active(&doc), vec![trigger]);
    }

    #[test]
    fn test_trigger_for_ignores_other_elements() {
        let doc = page();
        let tabs = TabController::init(&doc);
        let panel = doc.get_element_by_id("plumbing").unwrap();
        assert_eq!(tabs.trigger_for(&doc, panel), None);
    }
}
