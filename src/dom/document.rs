//! Document - In-memory element tree.
//!
//! Elements live in an arena and are addressed by [`ElementId`]. The document
//! always has a `<html>` root with `<head>` and `<body>` children. Detached
//! elements (created but never appended) exist in the arena but are not
//! reachable from queries.
//!
//! Accessors take an `ElementId` the document handed out. Passing a handle from
//! another document panics, the same as indexing out of bounds.

use std::collections::BTreeMap;

use super::selector::Selector;
use crate::error::Result;
use crate::types::{ElementFlags, ElementId, Rect, Style};

// =============================================================================
// Node
// =============================================================================

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: Style,
    text: String,
    value: String,
    flags: ElementFlags,
    rect: Rect,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// Whether the host is still parsing the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    Loading,
    #[default]
    Interactive,
}

// =============================================================================
// Document
// =============================================================================

/// The page's element tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: ElementId,
    head: ElementId,
    body: ElementId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with `<html>`, `<head>` and `<body>`.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: ElementId(0),
            head: ElementId(0),
            body: ElementId(0),
        };
        doc.root = doc.create_element("html");
        doc.head = doc.create_element("head");
        doc.body = doc.create_element("body");
        doc.append_child(doc.root, doc.head);
        doc.append_child(doc.root, doc.body);
        doc
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn head(&self) -> ElementId {
        self.head
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Number of elements in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, el: ElementId) -> &Node {
        &self.nodes[el.0]
    }

    fn node_mut(&mut self, el: ElementId) -> &mut Node {
        &mut self.nodes[el.0]
    }

    // -------------------------------------------------------------------------
    // Tree construction
    // -------------------------------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.to_ascii_lowercase(),
            ..Node::default()
        });
        id
    }

    fn detach(&mut self, child: ElementId) {
        if let Some(parent) = self.node(child).parent {
            self.node_mut(parent).children.retain(|c| *c != child);
            self.node_mut(child).parent = None;
        }
    }

    /// Append `child` as the last child of `parent`, moving it if attached.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Insert `child` as the first child of `parent`, moving it if attached.
    pub fn insert_first(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);
        self.node_mut(parent).children.insert(0, child);
        self.node_mut(child).parent = Some(parent);
    }

    pub fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.node(el).parent
    }

    pub fn children(&self, el: ElementId) -> &[ElementId] {
        &self.node(el).children
    }

    pub fn first_child(&self, el: ElementId) -> Option<ElementId> {
        self.node(el).children.first().copied()
    }

    /// Inclusive containment: an element contains itself.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    // -------------------------------------------------------------------------
    // Element data
    // -------------------------------------------------------------------------

    pub fn tag(&self, el: ElementId) -> &str {
        &self.node(el).tag
    }

    pub fn attribute(&self, el: ElementId, name: &str) -> Option<&str> {
        self.node(el).attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, el: ElementId, name: &str) -> bool {
        self.node(el).attributes.contains_key(name)
    }

    /// Set an attribute. `class` is routed to the class list.
    pub fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        if name == "class" {
            self.node_mut(el).classes = value.split_whitespace().map(str::to_string).collect();
            return;
        }
        self.node_mut(el)
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&mut self, el: ElementId, name: &str) -> Option<String> {
        self.node_mut(el).attributes.remove(name)
    }

    /// The `data-<key>` attribute.
    pub fn dataset(&self, el: ElementId, key: &str) -> Option<&str> {
        self.attribute(el, &format!("data-{key}"))
    }

    pub fn classes(&self, el: ElementId) -> &[String] {
        &self.node(el).classes
    }

    pub fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.node(el).classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, el: ElementId, class: &str) {
        if !self.has_class(el, class) {
            self.node_mut(el).classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, el: ElementId, class: &str) {
        self.node_mut(el).classes.retain(|c| c != class);
    }

    /// Toggle a class. Returns whether the class is now present.
    pub fn toggle_class(&mut self, el: ElementId, class: &str) -> bool {
        if self.has_class(el, class) {
            self.remove_class(el, class);
            false
        } else {
            self.add_class(el, class);
            true
        }
    }

    /// Add or remove a class depending on `on`.
    pub fn set_class(&mut self, el: ElementId, class: &str, on: bool) {
        if on {
            self.add_class(el, class);
        } else {
            self.remove_class(el, class);
        }
    }

    pub fn style(&self, el: ElementId) -> &Style {
        &self.node(el).style
    }

    pub fn style_mut(&mut self, el: ElementId) -> &mut Style {
        &mut self.node_mut(el).style
    }

    pub fn text(&self, el: ElementId) -> &str {
        &self.node(el).text
    }

    pub fn set_text(&mut self, el: ElementId, text: &str) {
        self.node_mut(el).text = text.to_string();
    }

    /// Current value of a form control.
    pub fn value(&self, el: ElementId) -> &str {
        &self.node(el).value
    }

    pub fn set_value(&mut self, el: ElementId, value: &str) {
        self.node_mut(el).value = value.to_string();
    }

    pub fn flags(&self, el: ElementId) -> ElementFlags {
        self.node(el).flags
    }

    pub fn set_flag(&mut self, el: ElementId, flag: ElementFlags, on: bool) {
        self.node_mut(el).flags.set(flag, on);
    }

    pub fn rect(&self, el: ElementId) -> Rect {
        self.node(el).rect
    }

    pub fn set_rect(&mut self, el: ElementId, rect: Rect) {
        self.node_mut(el).rect = rect;
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Attached elements under `root` (exclusive), in document order.
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(root).iter().rev().copied().collect();
        while let Some(el) = stack.pop() {
            out.push(el);
            stack.extend(self.children(el).iter().rev().copied());
        }
        out
    }

    /// All attached elements matching `selector`, in document order.
    pub fn query_all(&self, selector: &str) -> Result<Vec<ElementId>> {
        self.query_all_within(self.root, selector)
    }

    /// First attached element matching `selector`.
    pub fn query(&self, selector: &str) -> Result<Option<ElementId>> {
        Ok(self.query_all(selector)?.into_iter().next())
    }

    /// Elements under `root` matching `selector`, in document order.
    pub fn query_all_within(&self, root: ElementId, selector: &str) -> Result<Vec<ElementId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(root)
            .into_iter()
            .filter(|el| selector.matches(self, *el))
            .collect())
    }

    /// First element under `root` matching `selector`.
    pub fn query_within(&self, root: ElementId, selector: &str) -> Result<Option<ElementId>> {
        Ok(self.query_all_within(root, selector)?.into_iter().next())
    }

    /// Attached element with the given `id` attribute.
    pub fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.descendants(self.root)
            .into_iter()
            .find(|el| self.attribute(*el, "id") == Some(id))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Document {
        let mut doc = Document::new();
        let body = doc.body();
        for (tag, class) in [("section", "hero"), ("section", "about"), ("div", "stat")] {
            let el = doc.create_element(tag);
            doc.add_class(el, class);
            doc.append_child(body, el);
        }
        doc
    }

    #[test]
    fn test_new_document_has_head_and_body() {
        let doc = Document::new();
        assert_eq!(doc.tag(doc.head()), "head");
        assert_eq!(doc.tag(doc.body()), "body");
        assert_eq!(doc.parent(doc.body()), Some(doc.root()));
    }

    #[test]
    fn test_query_document_order() {
        let doc = setup();
        let sections = doc.query_all("section").unwrap();
        assert_eq!(sections.len(), 2);
        assert!(doc.has_class(sections[0], "hero"));
        assert_eq!(doc.query(".stat").unwrap().map(|el| doc.tag(el).to_string()), Some("div".into()));
    }

    #[test]
    fn test_detached_elements_not_queried() {
        let mut doc = setup();
        let orphan = doc.create_element("main");
        assert!(doc.query("main").unwrap().is_none());
        let body = doc.body();
        doc.append_child(body, orphan);
        assert_eq!(doc.query("main").unwrap(), Some(orphan));
    }

    #[test]
    fn test_insert_first_moves_node() {
        let mut doc = setup();
        let link = doc.create_element("a");
        let body = doc.body();
        doc.append_child(body, link);
        doc.insert_first(body, link);
        assert_eq!(doc.first_child(body), Some(link));
        assert_eq!(doc.children(body).iter().filter(|c| **c == link).count(), 1);
    }

    #[test]
    fn test_class_helpers() {
        let mut doc = setup();
        let hero = doc.query(".hero").unwrap().unwrap();
        assert!(doc.toggle_class(hero, "active"));
        assert!(doc.has_class(hero, "active"));
        assert!(!doc.toggle_class(hero, "active"));
        doc.add_class(hero, "x");
        doc.add_class(hero, "x");
        assert_eq!(doc.classes(hero).iter().filter(|c| *c == "x").count(), 1);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let doc = setup();
        let hero = doc.query(".hero").unwrap().unwrap();
        assert!(doc.contains(hero, hero));
        assert!(doc.contains(doc.body(), hero));
        assert!(!doc.contains(hero, doc.body()));
    }

    #[test]
    fn test_element_by_id() {
        let mut doc = setup();
        let hero = doc.query(".hero").unwrap().unwrap();
        doc.set_attribute(hero, "id", "main");
        assert_eq!(doc.element_by_id("main"), Some(hero));
        assert_eq!(doc.element_by_id("nowhere"), None);
    }
}
