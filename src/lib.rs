//! Page controller for the Suryansh Enterprises marketing site.
//!
//! The site is a single page: a bilingual (English/Hindi) toggle, a tabbed
//! service catalogue, an inquiry form, smooth anchor navigation with
//! scroll-spy, a collapsible mobile menu, scroll-triggered reveals and
//! lazily loaded images. [`Page`] wires all of these to a [`Document`] and
//! routes browser [`Event`]s to them.

pub mod config;
pub mod dom;
pub mod error;
pub mod form;
pub mod i18n;
pub mod language_switcher;
pub mod lazy_images;
pub mod menu;
pub mod observer;
pub mod page;
pub mod reveal;
pub mod script;
pub mod scroll;
pub mod selector;
pub mod tabs;
pub mod timer;

pub use config::Config;
pub use dom::{Document, NodeId};
pub use error::{PageError, PageResult};
pub use i18n::Language;
pub use page::{Event, Page, PageSnapshot};
pub use script::{Session, Step};
