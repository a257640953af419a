//! In-memory document model the page controller operates on.
//!
//! Elements live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Ids are never reused and nodes are never freed: the arena
//! only grows, and a detached element stays readable through its handle.
//! A handle kept across events (for a timer, say) therefore stays
//! meaningful after its element is detached.

use crate::error::{PageError, PageResult};
use crate::selector::SelectorList;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

/// Rendered vertical box of an element, in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    pub top: f64,
    pub height: f64,
}

impl LayoutBox {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    value: String,
    layout: LayoutBox,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            text: String::new(),
            value: String::new(),
            layout: LayoutBox::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    // ==================== Class List ====================

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Replace the whole class list with the whitespace-separated `names`.
    pub fn set_class_name(&mut self, names: &str) {
        self.classes.clear();
        for name in names.split_whitespace() {
            self.add_class(name);
        }
    }

    // ==================== Attributes ====================

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Set an attribute; `class` is routed to the class list.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let name = name.to_lowercase();
        if name == "class" {
            self.set_class_name(value);
        } else {
            self.attributes.insert(name, value.to_string());
        }
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    // ==================== Inline Style ====================

    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    /// Set an inline style property; an empty value clears it.
    pub fn set_style(&mut self, property: &str, value: &str) {
        if value.is_empty() {
            self.styles.remove(property);
        } else {
            self.styles.insert(property.to_string(), value.to_string());
        }
    }

    /// Hidden by the `hidden` class or an inline `display: none`.
    pub fn is_hidden(&self) -> bool {
        self.has_class("hidden") || self.style("display") == Some("none")
    }

    // ==================== Content ====================

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Current value of a form control.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    pub fn layout(&self) -> LayoutBox {
        self.layout
    }

    pub fn set_layout(&mut self, layout: LayoutBox) {
        self.layout = layout;
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

// ==================== Window ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

/// Last programmatic scroll performed on the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// Viewport state and browser capabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Window {
    pub scroll_y: f64,
    pub inner_width: f64,
    pub inner_height: f64,
    pub supports_intersection_observer: bool,
    #[serde(skip_deserializing)]
    pub last_scroll: Option<ScrollRequest>,
}

impl Default for Window {
    fn default() -> Self {
        Window {
            scroll_y: 0.0,
            inner_width: 1280.0,
            inner_height: 800.0,
            supports_intersection_observer: true,
            last_scroll: None,
        }
    }
}

impl Window {
    /// Scroll the viewport; positions above the document start clamp to 0.
    pub fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let top = top.max(0.0);
        self.scroll_y = top;
        self.last_scroll = Some(ScrollRequest { top, behavior });
    }
}

// ==================== Fixtures ====================

/// Declarative element description used to build documents from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeSpec {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    /// Whitespace-separated class names
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

/// A whole page: window state plus the contents of `head` and `body`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageFixture {
    pub window: Window,
    pub head: Vec<NodeSpec>,
    pub body: Vec<NodeSpec>,
}

/// Serializable view of an element subtree, for inspection and output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub tag: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

// ==================== Document ====================

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    pub window: Window,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty `html > head + body` document.
    pub fn new() -> Self {
        let mut document = Document {
            nodes: vec![Element::new("html")],
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            window: Window::default(),
        };
        document.head = document.create_element("head");
        document.body = document.create_element("body");
        document.append_child(document.root, document.head);
        document.append_child(document.root, document.body);
        document
    }

    pub fn from_fixture(fixture: &PageFixture) -> Self {
        let mut document = Document::new();
        document.window = fixture.window.clone();
        for spec in &fixture.head {
            document.build(document.head, spec);
        }
        for spec in &fixture.body {
            document.build(document.body, spec);
        }
        document
    }

    pub fn from_json(json: &str) -> PageResult<Self> {
        let fixture: PageFixture = serde_json::from_str(json)?;
        Ok(Document::from_fixture(&fixture))
    }

    pub fn from_value(value: serde_json::Value) -> PageResult<Self> {
        let fixture: PageFixture = serde_json::from_value(value)?;
        Ok(Document::from_fixture(&fixture))
    }

    pub fn load(path: &Path) -> PageResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| PageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Document::from_json(&content)
    }

    /// Build `spec` (recursively) and append it to `parent`.
    pub fn build(&mut self, parent: NodeId, spec: &NodeSpec) -> NodeId {
        let node = self.create_element(&spec.tag);
        {
            let element = self.element_mut(node);
            if let Some(id) = &spec.id {
                element.set_attribute("id", id);
            }
            if let Some(class) = &spec.class {
                element.set_class_name(class);
            }
            for (name, value) in &spec.attrs {
                element.set_attribute(name, value);
            }
            element.set_text(&spec.text);
            element.set_value(&spec.value);
            element.set_layout(LayoutBox {
                top: spec.top,
                height: spec.height,
            });
        }
        self.append_child(parent, node);
        for child in &spec.children {
            self.build(node, child);
        }
        node
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn element(&self, node: NodeId) -> &Element {
        &self.nodes[node.0]
    }

    pub fn element_mut(&mut self, node: NodeId) -> &mut Element {
        &mut self.nodes[node.0]
    }

    // ==================== Tree Mutation ====================

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Element::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.remove(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` into `parent` right before `reference`, or at the end
    /// when `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.remove(child);
        self.nodes[child.0].parent = Some(parent);
        let children = &mut self.nodes[parent.0].children;
        match children.iter().position(|&c| c == reference) {
            Some(index) => children.insert(index, child),
            None => children.push(child),
        }
    }

    /// Detach `node` (and its subtree) from its parent.
    pub fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    // ==================== Traversal ====================

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.root, node)
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.nodes[n.0].parent;
        }
        false
    }

    /// Descendants of `node` in document order, `node` excluded.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[node.0].children.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            result.push(n);
            stack.extend(self.nodes[n.0].children.iter().rev().copied());
        }
        result
    }

    /// All connected elements matching `selectors`, in document order.
    ///
    /// An unparseable selector matches nothing.
    pub fn query_all(&self, selectors: &str) -> Vec<NodeId> {
        let Some(list) = parse_or_warn(selectors) else {
            return Vec::new();
        };
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .filter(|&n| list.matches(self.element(n)))
            .collect()
    }

    pub fn query(&self, selectors: &str) -> Option<NodeId> {
        self.query_all(selectors).into_iter().next()
    }

    /// Descendants of `scope` matching `selectors` (`scope` itself excluded).
    pub fn query_all_within(&self, scope: NodeId, selectors: &str) -> Vec<NodeId> {
        let Some(list) = parse_or_warn(selectors) else {
            return Vec::new();
        };
        self.descendants(scope)
            .into_iter()
            .filter(|&n| list.matches(self.element(n)))
            .collect()
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|&n| self.element(n).id() == Some(id))
    }

    /// Nearest inclusive ancestor of `node` matching `selectors`.
    pub fn closest(&self, node: NodeId, selectors: &str) -> Option<NodeId> {
        let list = parse_or_warn(selectors)?;
        let mut current = Some(node);
        while let Some(n) = current {
            if list.matches(self.element(n)) {
                return Some(n);
            }
            current = self.element(n).parent;
        }
        None
    }

    pub fn offset_top(&self, node: NodeId) -> f64 {
        self.element(node).layout.top
    }

    pub fn offset_height(&self, node: NodeId) -> f64 {
        self.element(node).layout.height
    }

    // ==================== Snapshots ====================

    pub fn snapshot(&self) -> NodeSnapshot {
        self.snapshot_of(self.root)
    }

    pub fn snapshot_of(&self, node: NodeId) -> NodeSnapshot {
        let element = self.element(node);
        NodeSnapshot {
            tag: element.tag.clone(),
            classes: element.classes.clone(),
            attributes: element.attributes.clone(),
            styles: element.styles.clone(),
            text: element.text.clone(),
            value: element.value.clone(),
            children: element
                .children
                .iter()
                .map(|&child| self.snapshot_of(child))
                .collect(),
        }
    }
}

fn parse_or_warn(selectors: &str) -> Option<SelectorList> {
    match SelectorList::parse(selectors) {
        Ok(list) => Some(list),
        Err(e) => {
            warn!("Ignoring selector: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn sample() -> Document {
        Document::from_value(json!({
            "window": { "inner_height": 600.0 },
            "body": [
                { "tag": "header", "class": "header", "height": 70.0 },
                { "tag": "nav", "class": "nav", "children": [
                    { "tag": "a", "class": "nav-link", "attrs": { "href": "#home" },
                      "children": [ { "tag": "span", "text": "Home" } ] }
                ]},
                { "tag": "section", "id": "home", "top": 0.0, "height": 500.0 },
                { "tag": "section", "id": "about", "top": 500.0, "height": 400.0 }
            ]
        }))
        .unwrap()
    }

    // ==================== Element Tests ====================

    #[test]
    fn test_class_list_has_no_duplicates() {
        let mut element = Element::new("div");
        element.add_class("active");
        element.add_class("active");
        assert_eq!(element.classes(), &["active".to_string()]);
        element.remove_class("active");
        assert!(!element.has_class("active"));
    }

    #[test]
    fn test_class_attribute_routes_to_class_list() {
        let mut element = Element::new("div");
        element.set_attribute("class", "form-message  success");
        assert!(element.has_class("form-message"));
        assert!(element.has_class("success"));
        assert!(!element.has_attribute("class"));
    }

    #[test]
    fn test_empty_style_value_clears_property() {
        let mut element = Element::new("p");
        element.set_style("display", "none");
        assert!(element.is_hidden());
        element.set_style("display", "");
        assert_eq!(element.style("display"), None);
        assert!(!element.is_hidden());
    }

    // ==================== Fixture Tests ====================

    #[test]
    fn test_fixture_builds_tree() {
        let doc = sample();
        let sections = doc.query_all("section[id]");
        assert_eq!(sections.len(), 2);
        assert_eq!(doc.offset_top(sections[1]), 500.0);
        assert_eq!(doc.window.inner_height, 600.0);
        assert!(doc.window.supports_intersection_observer);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            Document::from_json("{ not json"),
            Err(PageError::Json(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "body": [ {{ "tag": "form", "class": "inquiry-form" }} ] }}"#).unwrap();

        let doc = Document::load(file.path()).unwrap();
        assert!(doc.query(".inquiry-form").is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Document::load(Path::new("/nonexistent/page.json")).unwrap_err();
        assert!(matches!(err, PageError::Io { .. }));
    }

    // ==================== Traversal Tests ====================

    #[test]
    fn test_query_all_in_document_order() {
        let doc = sample();
        let tags: Vec<&str> = doc
            .query_all("header, section, nav")
            .into_iter()
            .map(|n| doc.element(n).tag())
            .collect();
        assert_eq!(tags, vec!["header", "nav", "section", "section"]);
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let doc = sample();
        assert!(doc.query_all("nav a").is_empty());
        assert!(doc.closest(doc.body(), "nav a").is_none());
    }

    #[test]
    fn test_closest_is_inclusive() {
        let doc = sample();
        let span = doc.query("span").unwrap();
        let link = doc.query(".nav-link").unwrap();
        assert_eq!(doc.closest(span, ".nav-link"), Some(link));
        assert_eq!(doc.closest(link, ".nav-link"), Some(link));
        assert!(doc.closest(span, ".header").is_none());
    }

    #[test]
    fn test_get_element_by_id() {
        let doc = sample();
        let about = doc.get_element_by_id("about").unwrap();
        assert_eq!(doc.element(about).tag(), "section");
        assert!(doc.get_element_by_id("missing").is_none());
        assert!(doc.get_element_by_id("").is_none());
    }

    // ==================== Mutation Tests ====================

    #[test]
    fn test_insert_before_and_remove() {
        let mut doc = sample();
        let body = doc.body();
        let nav = doc.query(".nav").unwrap();
        let message = doc.create_element("div");
        assert!(!doc.is_connected(message));

        doc.insert_before(body, message, nav);
        let children = doc.element(body).children().to_vec();
        let index = children.iter().position(|&c| c == nav).unwrap();
        assert_eq!(children[index - 1], message);
        assert!(doc.is_connected(message));

        doc.remove(message);
        assert!(!doc.is_connected(message));
        assert!(!doc.element(body).children().contains(&message));
    }

    #[test]
    fn test_removed_subtree_is_not_queried() {
        let mut doc = sample();
        let nav = doc.query(".nav").unwrap();
        doc.remove(nav);
        assert!(doc.query(".nav-link").is_none());
    }

    #[test]
    fn test_detached_nodes_keep_their_ids() {
        let mut doc = sample();
        let body = doc.body();
        let first = doc.create_element("div");
        doc.append_child(body, first);
        doc.element_mut(first).set_text("first");
        doc.remove(first);

        let second = doc.create_element("div");
        assert_ne!(first, second);
        assert_eq!(doc.element(first).text(), "first");
        assert!(!doc.is_connected(first));
    }

    // ==================== Window Tests ====================

    #[test]
    fn test_scroll_to_clamps_at_top() {
        let mut window = Window::default();
        window.scroll_to(-90.0, ScrollBehavior::Smooth);
        assert_eq!(window.scroll_y, 0.0);
        assert_eq!(
            window.last_scroll,
            Some(ScrollRequest {
                top: 0.0,
                behavior: ScrollBehavior::Smooth
            })
        );
    }

    #[test]
    fn test_snapshot_serializes_compactly() {
        let doc = sample();
        let json = serde_json::to_value(doc.snapshot_of(doc.query(".header").unwrap())).unwrap();
        assert_eq!(json, json!({ "tag": "header", "classes": ["header"] }));
    }
}
