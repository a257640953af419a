//! Scroll-triggered reveal of cards, features, categories and stats.

use crate::dom::{Document, NodeId};
use crate::observer::{IntersectionObserver, ObserverOptions};
use tracing::debug;

pub const REVEAL_TARGETS: &str = ".service-card, .feature, .category, .stat";
pub const REVEALED: &str = "animate-in";

/// Presentation rules injected at startup: the reveal transition, form
/// feedback, active nav link and the mobile navigation layout.
pub const STYLESHEET: &str = r#"
.service-card, .feature, .category, .stat {
    opacity: 0;
    transform: translateY(20px);
    transition: all 0.6s ease-out;
}
.service-card.animate-in, .feature.animate-in, .category.animate-in, .stat.animate-in {
    opacity: 1;
    transform: translateY(0);
}
.form-message {
    padding: var(--space-16);
    border-radius: var(--radius-base);
    margin-bottom: var(--space-16);
    font-weight: var(--font-weight-medium);
    animation: slideIn 0.3s ease-out;
}
@keyframes slideIn {
    from { opacity: 0; transform: translateY(-10px); }
    to { opacity: 1; transform: translateY(0); }
}
.form-message.success {
    background-color: rgba(var(--color-success-rgb), 0.1);
    border: 1px solid rgba(var(--color-success-rgb), 0.3);
    color: var(--color-success);
}
.form-message.error {
    background-color: rgba(var(--color-error-rgb), 0.1);
    border: 1px solid rgba(var(--color-error-rgb), 0.3);
    color: var(--color-error);
}
.form-control.error {
    border-color: var(--color-error);
    background-color: rgba(var(--color-error-rgb), 0.05);
}
.nav-link.active-nav {
    background-color: var(--color-secondary);
    color: var(--color-primary);
}
input, select, textarea, button {
    pointer-events: auto !important;
}
@media (max-width: 768px) {
    .nav-links {
        position: fixed;
        top: 70px;
        left: 0;
        right: 0;
        background-color: var(--color-surface);
        border-top: 1px solid var(--color-border);
        box-shadow: var(--shadow-lg);
        flex-direction: column;
        padding: var(--space-16);
        transform: translateY(-100%);
        opacity: 0;
        visibility: hidden;
        transition: all var(--duration-normal) var(--ease-standard);
        z-index: 1000;
        max-height: calc(100vh - 70px);
        overflow-y: auto;
    }
    .nav-links.mobile-active {
        transform: translateY(0);
        opacity: 1;
        visibility: visible;
    }
    .nav-links li { margin: var(--space-8) 0; }
    .nav-link {
        display: block;
        padding: var(--space-12);
        text-align: center;
        border-radius: var(--radius-base);
    }
    .dropdown-menu {
        position: static;
        opacity: 1;
        visibility: visible;
        transform: none;
        box-shadow: none;
        border: 1px solid var(--color-border);
        background-color: var(--color-secondary);
        margin: var(--space-8) 0;
        border-radius: var(--radius-base);
    }
    .mobile-menu-btn.active span:nth-child(1) { transform: rotate(45deg) translate(5px, 5px); }
    .mobile-menu-btn.active span:nth-child(2) { opacity: 0; }
    .mobile-menu-btn.active span:nth-child(3) { transform: rotate(-45deg) translate(7px, -6px); }
    body.menu-open { overflow: hidden; }
}
"#;

/// Append the page stylesheet to `head` (or `body` when `head` is gone).
pub fn inject_stylesheet(document: &mut Document) -> NodeId {
    let style = document.create_element("style");
    document.element_mut(style).set_text(STYLESHEET);
    let parent = if document.is_connected(document.head()) {
        document.head()
    } else {
        document.body()
    };
    document.append_child(parent, style);
    style
}

#[derive(Debug, Clone)]
pub struct RevealAnimator {
    observer: Option<IntersectionObserver>,
}

impl RevealAnimator {
    /// Observe every reveal target, or reveal them all at once when the
    /// browser cannot observe intersections. Injects the stylesheet either way.
    pub fn init(document: &mut Document, options: ObserverOptions) -> Self {
        let targets = document.query_all(REVEAL_TARGETS);

        let observer = if document.window.supports_intersection_observer {
            let mut observer = IntersectionObserver::new(options);
            for &target in &targets {
                observer.observe(target);
            }
            Some(observer)
        } else {
            debug!("No intersection observer, revealing {} elements", targets.len());
            for &target in &targets {
                document.element_mut(target).add_class(REVEALED);
            }
            None
        };

        inject_stylesheet(document);
        RevealAnimator { observer }
    }

    /// Reveal targets that became visible. Reveals are permanent, so a
    /// revealed target is no longer observed.
    pub fn process(&mut self, document: &mut Document) -> usize {
        let Some(observer) = self.observer.as_mut() else {
            return 0;
        };
        let mut revealed = 0;
        for entry in observer.take_records(document) {
            if entry.is_intersecting {
                document.element_mut(entry.target).add_class(REVEALED);
                observer.unobserve(entry.target);
                revealed += 1;
            }
        }
        revealed
    }

    pub fn pending(&self) -> usize {
        self.observer
            .as_ref()
            .map(IntersectionObserver::observed_count)
            .unwrap_or(0)
    }
}
