//! Same-page anchor navigation and scroll-spy highlighting.

use crate::dom::{Document, NodeId, ScrollBehavior};
use tracing::{debug, info};

const ANCHORS: &str = "a[href^=\"#\"]";

/// Vertical box of a `section[id]`, as seen by the scroll-spy.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBox {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// Rendered height of the fixed `.header`, 0 when absent.
pub fn header_height(document: &Document) -> f64 {
    document
        .query(".header")
        .map(|header| document.offset_height(header))
        .unwrap_or(0.0)
}

/// Where to scroll so `target_top` lands `gap` below the fixed header.
pub fn anchor_scroll_position(target_top: f64, header_height: f64, gap: f64) -> f64 {
    target_top - header_height - gap
}

/// The section currently in view: the last one, in document order, whose
/// shifted range `[top - header - offset, top - header - offset + height)`
/// contains `scroll_y`.
pub fn current_section(
    sections: &[SectionBox],
    scroll_y: f64,
    header_height: f64,
    offset: f64,
) -> Option<&str> {
    sections
        .iter()
        .filter(|section| {
            let top = section.top - header_height - offset;
            scroll_y >= top && scroll_y < top + section.height
        })
        .last()
        .map(|section| section.id.as_str())
}

pub fn section_boxes(document: &Document) -> Vec<SectionBox> {
    document
        .query_all("section[id]")
        .into_iter()
        .map(|node| {
            let element = document.element(node);
            SectionBox {
                id: element.id().unwrap_or_default().to_string(),
                top: element.layout().top,
                height: element.layout().height,
            }
        })
        .collect()
}

/// Mark exactly the `.nav-link` pointing at the current section as active.
///
/// Returns the id of the current section, if any.
pub fn update_active_nav(document: &mut Document, offset: f64) -> Option<String> {
    let current = current_section(
        &section_boxes(document),
        document.window.scroll_y,
        header_height(document),
        offset,
    )
    .map(str::to_string);

    let expected = current.as_ref().map(|id| format!("#{}", id));
    for link in document.query_all(".nav-link[href^=\"#\"]") {
        let element = document.element_mut(link);
        element.remove_class("active-nav");
        if expected.is_some() && element.attribute("href") == expected.as_deref() {
            element.add_class("active-nav");
        }
    }
    debug!("Active section: {:?}", current);
    current
}

/// The same-page anchor a click on `target` lands on, if any.
pub fn anchor_for(document: &Document, target: NodeId) -> Option<NodeId> {
    document.closest(target, ANCHORS)
}

/// Smooth-scroll to the element `anchor` points at.
///
/// Returns the scroll position, or `None` when the destination does not
/// exist (nothing happens then).
pub fn navigate(document: &mut Document, anchor: NodeId, gap: f64) -> Option<f64> {
    let href = document.element(anchor).attribute("href")?.to_string();
    info!("Navigation clicked: {}", href);

    let destination = document.get_element_by_id(href.strip_prefix('#')?)?;
    let position = anchor_scroll_position(
        document.offset_top(destination),
        header_height(document),
        gap,
    );
    document.window.scroll_to(position, ScrollBehavior::Smooth);
    Some(position)
}
