//! Headless views, for rendering without a browser.

use std::cell::RefCell;
use std::rc::Rc;

use crate::reconcile::{ListView, ReadingFields, ReadingPanel};
use crate::transport::MessageDisplay;

struct MemoryNode {
    id: String,
    serial: usize,
    fields: Option<ReadingFields>,
    handler: Option<Rc<dyn Fn()>>,
}

/// A list view kept in memory. Nodes are identified by their id; the
/// template always sits after them.
#[derive(Default)]
pub struct MemoryListView {
    nodes: Vec<MemoryNode>,
    next_serial: usize,
    mutations: usize,
}

impl MemoryListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> Vec<String> {
        self.nodes.iter().map(|node| node.id.clone()).collect()
    }

    pub fn fields(&self, id: &str) -> Option<&ReadingFields> {
        self.node(id).and_then(|node| node.fields.as_ref())
    }

    pub fn handler(&self, id: &str) -> Option<Rc<dyn Fn()>> {
        self.node(id).and_then(|node| node.handler.clone())
    }

    /// Which clone a node is. Changes only when the node is re-created.
    pub fn serial(&self, id: &str) -> Option<usize> {
        self.node(id).map(|node| node.serial)
    }

    /// Insertions plus removals so far.
    pub fn mutations(&self) -> usize {
        self.mutations
    }

    fn node(&self, id: &str) -> Option<&MemoryNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut MemoryNode> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }
}

impl ListView for MemoryListView {
    type Node = String;

    fn rendered(&self) -> Vec<String> {
        self.ids()
    }

    fn node_id(&self, node: &String) -> Option<String> {
        Some(node.clone())
    }

    fn find(&self, id: &str) -> Option<String> {
        self.node(id).map(|node| node.id.clone())
    }

    fn insert_from_template(&mut self, id: &str) -> Option<String> {
        self.next_serial += 1;
        self.mutations += 1;
        self.nodes.push(MemoryNode {
            id: id.to_owned(),
            serial: self.next_serial,
            fields: None,
            handler: None,
        });
        Some(id.to_owned())
    }

    fn remove(&mut self, node: &String) {
        let before = self.nodes.len();
        self.nodes.retain(|n| &n.id != node);
        self.mutations += before - self.nodes.len();
    }

    fn fill(&mut self, node: &String, fields: &ReadingFields) {
        if let Some(node) = self.node_mut(node) {
            node.fields = Some(fields.clone());
        }
    }

    fn bind_activation(&mut self, node: &String, handler: Rc<dyn Fn()>) {
        if let Some(node) = self.node_mut(node) {
            node.handler = Some(handler);
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryPanel {
    pub shown: Option<ReadingFields>,
}

impl ReadingPanel for MemoryPanel {
    fn fill(&mut self, fields: &ReadingFields) {
        self.shown = Some(fields.clone());
    }
}

/// Remembers the last message shown.
#[derive(Debug, Default)]
pub struct MemoryMessages {
    shown: RefCell<Option<(u16, String, String)>>,
}

impl MemoryMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<(u16, String, String)> {
        self.shown.borrow().clone()
    }
}

impl MessageDisplay for MemoryMessages {
    fn show(&self, status: u16, phrase: &str, error: &str) {
        *self.shown.borrow_mut() = Some((status, phrase.to_owned(), error.to_owned()));
    }
}
