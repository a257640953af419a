//! Scripted user sessions replayed against a [`Page`].
//!
//! A session is a JSON document with a list of steps; elements are addressed
//! with selectors and the first match receives the event.

use crate::dom::NodeId;
use crate::error::{PageError, PageResult};
use crate::page::{Event, Page};
use crate::selector::SelectorList;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

fn default_form() -> String {
    ".inquiry-form".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    Click {
        target: String,
    },
    /// Type into a form control.
    Input {
        target: String,
        value: String,
    },
    Focus {
        target: String,
    },
    Blur {
        target: String,
    },
    Submit {
        #[serde(default = "default_form")]
        target: String,
    },
    Scroll {
        y: f64,
    },
    Resize {
        width: f64,
    },
    Key {
        key: String,
    },
    /// Let pending timers run.
    Wait {
        ms: u64,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Session {
    pub fn from_json(json: &str) -> PageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> PageResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| PageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Replay every step in order. Stops at the first step whose target
    /// cannot be resolved.
    pub async fn replay(&self, page: &mut Page) -> PageResult<()> {
        info!("Replaying {} steps", self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            debug!("Step {}: {:?}", index + 1, step);
            match step {
                Step::Click { target } => {
                    let target = resolve(page, target)?;
                    page.dispatch(Event::Click { target });
                }
                Step::Input { target, value } => {
                    let target = resolve(page, target)?;
                    page.input(target, value);
                }
                Step::Focus { target } => {
                    let target = resolve(page, target)?;
                    page.dispatch(Event::Focus { target });
                }
                Step::Blur { target } => {
                    let target = resolve(page, target)?;
                    page.dispatch(Event::Blur { target });
                }
                Step::Submit { target } => {
                    let form = resolve(page, target)?;
                    page.dispatch(Event::Submit { form });
                }
                Step::Scroll { y } => page.dispatch(Event::Scroll { y: *y }),
                Step::Resize { width } => page.dispatch(Event::Resize { width: *width }),
                Step::Key { key } => page.dispatch(Event::KeyDown { key: key.clone() }),
                Step::Wait { ms } => page.wait(Duration::from_millis(*ms)).await,
            }
        }
        Ok(())
    }
}

fn resolve(page: &Page, selector: &str) -> PageResult<NodeId> {
    SelectorList::parse(selector)?;
    page.document()
        .query(selector)
        .ok_or_else(|| PageError::UnknownTarget(selector.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dom::Document;
    use crate::menu;
    use serde_json::json;

    fn page() -> Page {
        let document = Document::from_value(json!({
            "body": [
                { "tag": "nav", "class": "nav", "children": [
                    { "tag": "button", "class": "mobile-menu-btn" },
                    { "tag": "ul", "class": "nav-links" }
                ]},
                { "tag": "form", "class": "inquiry-form", "children": [
                    { "tag": "input", "attrs": { "name": "name", "required": "" } }
                ]}
            ]
        }))
        .unwrap();
        Page::init(document, Config::default())
    }

    #[test]
    fn test_parse_session() {
        let session = Session::from_json(
            r#"{ "steps": [
                { "type": "click", "target": ".mobile-menu-btn" },
                { "type": "submit" },
                { "type": "wait", "ms": 300 }
            ] }"#,
        )
        .unwrap();
        assert_eq!(
            session.steps,
            vec![
                Step::Click {
                    target: ".mobile-menu-btn".into(),
                },
                Step::Submit {
                    target: ".inquiry-form".into(),
                },
                Step::Wait { ms: 300 },
            ]
        );
    }

    #[test]
    fn test_unknown_step_rejected() {
        let result = Session::from_json(r#"{ "steps": [ { "type": "hover", "target": "a" } ] }"#);
        assert!(matches!(result, Err(PageError::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Session::load(Path::new("/nonexistent/session.json"));
        assert!(matches!(result, Err(PageError::Io { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_drives_page() {
        let mut page = page();
        let session = Session::from_json(
            r#"{ "steps": [
                { "type": "click", "target": ".mobile-menu-btn" },
                { "type": "input", "target": "[name=name]", "value": "Asha" },
                { "type": "blur", "target": "[name=name]" }
            ] }"#,
        )
        .unwrap();
        session.replay(&mut page).await.unwrap();

        assert!(menu::is_open(&page.document()));
        let name = page.document().query("[name=name]").unwrap();
        assert_eq!(page.document().element(name).value(), "Asha");
        assert!(!page.document().element(name).has_class("error"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_stops_at_missing_target() {
        let mut page = page();
        let session = Session {
            steps: vec![
                Step::Click {
                    target: "#nowhere".into(),
                },
                Step::Click {
                    target: ".mobile-menu-btn".into(),
                },
            ],
        };
        let result = session.replay(&mut page).await;
        assert!(matches!(result, Err(PageError::UnknownTarget(s)) if s == "#nowhere"));
        assert!(!menu::is_open(&page.document()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_rejects_bad_selector() {
        let mut page = page();
        let session = Session {
            steps: vec![Step::Blur {
                target: "nav > ul".into(),
            }],
        };
        let result = session.replay(&mut page).await;
        assert!(matches!(result, Err(PageError::Selector { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_runs_page_timers() {
        let mut page = page();
        let session = Session::from_json(
            r#"{ "steps": [
                { "type": "click", "target": ".mobile-menu-btn" },
                { "type": "resize", "width": 1024 },
                { "type": "wait", "ms": 200 }
            ] }"#,
        )
        .unwrap();
        session.replay(&mut page).await.unwrap();
        assert!(menu::is_open(&page.document()));

        let settle = Session {
            steps: vec![Step::Wait { ms: 100 }],
        };
        settle.replay(&mut page).await.unwrap();
        assert!(!menu::is_open(&page.document()));
    }
}
