//! Deferred image loading for `img[data-src]`.

use crate::dom::Document;
use crate::observer::{IntersectionObserver, ObserverOptions};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LazyImageLoader {
    observer: Option<IntersectionObserver>,
}

impl LazyImageLoader {
    /// Observe every deferred image. Without intersection observation the
    /// images keep their deferred source.
    pub fn init(document: &Document) -> Self {
        if !document.window.supports_intersection_observer {
            return LazyImageLoader { observer: None };
        }
        let mut observer = IntersectionObserver::new(ObserverOptions::default());
        for image in document.query_all("img[data-src]") {
            observer.observe(image);
        }
        LazyImageLoader {
            observer: Some(observer),
        }
    }

    /// Load images that reached the viewport; each loads at most once.
    pub fn process(&mut self, document: &mut Document) -> usize {
        let Some(observer) = self.observer.as_mut() else {
            return 0;
        };
        let mut loaded = 0;
        for entry in observer.take_records(document) {
            if !entry.is_intersecting {
                continue;
            }
            let element = document.element_mut(entry.target);
            let source = element.attribute("data-src").unwrap_or_default().to_string();
            if source.is_empty() {
                continue;
            }
            debug!("Loading deferred image {}", source);
            element.set_attribute("src", &source);
            element.remove_class("lazy");
            observer.unobserve(entry.target);
            loaded += 1;
        }
        loaded
    }

    pub fn pending(&self) -> usize {
        self.observer
            .as_ref()
            .map(IntersectionObserver::observed_count)
            .unwrap_or(0)
    }
}
