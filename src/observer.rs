//! Viewport-intersection observation computed from layout boxes.
//!
//! Mirrors the browser contract closely enough for the page: the first
//! check after `observe` always reports the target, later checks report it
//! only when its intersecting state flips.

use crate::dom::{Document, NodeId};

/// Observer configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Minimum visible fraction of the target for it to count as intersecting
    pub threshold: f64,
    /// Added to the bottom edge of the viewport (negative shrinks it)
    pub root_margin_bottom: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        ObserverOptions {
            threshold: 0.0,
            root_margin_bottom: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

#[derive(Debug, Clone)]
pub struct IntersectionObserver {
    options: ObserverOptions,
    // (target, last reported state); `None` until the first check
    targets: Vec<(NodeId, Option<bool>)>,
}

impl IntersectionObserver {
    pub fn new(options: ObserverOptions) -> Self {
        IntersectionObserver {
            options,
            targets: Vec::new(),
        }
    }

    pub fn options(&self) -> ObserverOptions {
        self.options
    }

    pub fn observe(&mut self, target: NodeId) {
        if !self.is_observing(target) {
            self.targets.push((target, None));
        }
    }

    pub fn unobserve(&mut self, target: NodeId) {
        self.targets.retain(|(t, _)| *t != target);
    }

    pub fn is_observing(&self, target: NodeId) -> bool {
        self.targets.iter().any(|(t, _)| *t == target)
    }

    pub fn observed_count(&self) -> usize {
        self.targets.len()
    }

    /// Compute pending entries against the current viewport.
    pub fn take_records(&mut self, document: &Document) -> Vec<IntersectionEntry> {
        let mut entries = Vec::new();
        for (target, last) in self.targets.iter_mut() {
            let (is_intersecting, ratio) = if document.is_connected(*target) {
                measure(document, *target, self.options)
            } else {
                (false, 0.0)
            };
            if *last != Some(is_intersecting) {
                *last = Some(is_intersecting);
                entries.push(IntersectionEntry {
                    target: *target,
                    is_intersecting,
                    ratio,
                });
            }
        }
        entries
    }
}

fn measure(document: &Document, target: NodeId, options: ObserverOptions) -> (bool, f64) {
    let window = &document.window;
    let root_top = window.scroll_y;
    let root_bottom = window.scroll_y + window.inner_height + options.root_margin_bottom;
    let layout = document.element(target).layout();

    if layout.height <= 0.0 {
        let inside = layout.top >= root_top && layout.top <= root_bottom;
        return (inside, if inside { 1.0 } else { 0.0 });
    }

    let overlap = layout.bottom().min(root_bottom) - layout.top.max(root_top);
    if overlap < 0.0 {
        return (false, 0.0);
    }
    let ratio = (overlap / layout.height).clamp(0.0, 1.0);
    (ratio >= options.threshold, ratio)
}
