//! DOM Tree structure

use rustc_hash::FxHashMap;
use std::fmt;

use crate::error::{DomError, DomResult};
use crate::node::{ElementData, Node, NodeId, NodeType};

/// Text selection inside a form control (byte offsets into its value)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub node: NodeId,
    pub start: usize,
    pub end: usize,
}

/// DOM tree that owns all nodes
pub struct DomTree {
    /// All nodes in the tree, attached or not
    nodes: FxHashMap<NodeId, Node>,
    /// Next available node ID
    next_id: u32,
    /// Root document node
    document_id: NodeId,
    /// Element holding input focus
    focused: Option<NodeId>,
    /// Active text selection
    selection: Option<Selection>,
}

impl DomTree {
    /// Create a new empty DOM tree
    pub fn new() -> Self {
        let document_id = NodeId::new(0);
        let document = Node::new(document_id, NodeType::Document);

        let mut nodes = FxHashMap::default();
        nodes.insert(document_id, document);

        Self {
            nodes,
            next_id: 1,
            document_id,
            focused: None,
            selection: None,
        }
    }

    /// Get the document (root) node ID
    pub fn document_id(&self) -> NodeId {
        self.document_id
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Get element data for a node
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| n.as_element())
    }

    /// Get mutable element data for a node
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| n.as_element_mut())
    }

    fn element_or_err(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        let node = self.get_mut(id).ok_or(DomError::NodeNotFound(id.0))?;
        node.as_element_mut().ok_or(DomError::NotAnElement(id.0))
    }

    /// Create a new element node
    pub fn create_element(&mut self, tag_name: impl Into<String>) -> NodeId {
        let id = self.allocate_id();
        let node = Node::new(id, NodeType::Element(ElementData::new(tag_name)));
        self.nodes.insert(id, node);
        id
    }

    /// Create an element with a `class` attribute already set
    pub fn create_element_with_class(&mut self, tag_name: &str, class: &str) -> NodeId {
        let id = self.create_element(tag_name);
        if let Some(elem) = self.element_mut(id) {
            elem.set_attribute("class", class);
        }
        id
    }

    /// Create a new text node
    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        let id = self.allocate_id();
        let node = Node::new(id, NodeType::Text(content.into()));
        self.nodes.insert(id, node);
        id
    }

    fn allocate_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a child node to a parent, moving it if it is attached elsewhere
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) -> DomResult<()> {
        self.insert_before(parent_id, child_id, None)
    }

    /// Insert `child_id` into `parent_id` before `reference`, or at the end
    /// when `reference` is `None`. Like the DOM method, a child that is
    /// already attached is moved.
    pub fn insert_before(
        &mut self,
        parent_id: NodeId,
        child_id: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        if !self.nodes.contains_key(&parent_id) {
            return Err(DomError::NodeNotFound(parent_id.0));
        }
        if !self.nodes.contains_key(&child_id) {
            return Err(DomError::NodeNotFound(child_id.0));
        }
        if child_id == parent_id || self.is_ancestor(child_id, parent_id) {
            return Err(DomError::InvalidOperation(format!(
                "{} cannot be inserted into its own subtree",
                child_id
            )));
        }
        if reference == Some(child_id) {
            return Ok(());
        }
        if let Some(reference_id) = reference {
            let reference_parent = self.get(reference_id).and_then(|n| n.parent);
            if reference_parent != Some(parent_id) {
                return Err(DomError::InvalidOperation(format!(
                    "{} is not a child of {}",
                    reference_id, parent_id
                )));
            }
        }

        self.detach(child_id)?;

        let parent = self.get_mut(parent_id).ok_or(DomError::NodeNotFound(parent_id.0))?;
        let position = reference
            .and_then(|r| parent.children.iter().position(|&c| c == r))
            .unwrap_or(parent.children.len());
        parent.children.insert(position, child_id);

        let child = self.get_mut(child_id).ok_or(DomError::NodeNotFound(child_id.0))?;
        child.parent = Some(parent_id);

        Ok(())
    }

    /// Remove a node from its parent
    pub fn remove_child(&mut self, parent_id: NodeId, child_id: NodeId) -> DomResult<()> {
        let actual_parent = self.get(child_id).ok_or(DomError::NodeNotFound(child_id.0))?.parent;
        if actual_parent != Some(parent_id) {
            return Err(DomError::InvalidOperation(format!(
                "{} is not a child of {}",
                child_id, parent_id
            )));
        }
        self.detach(child_id)
    }

    /// Detach a node from wherever it is attached. Detached nodes stay in
    /// the arena until `destroy` is called.
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        let parent_id = self.get(id).ok_or(DomError::NodeNotFound(id.0))?.parent;
        if let Some(parent_id) = parent_id {
            if let Some(parent) = self.get_mut(parent_id) {
                parent.children.retain(|c| *c != id);
            }
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
        }
        Ok(())
    }

    /// Detach a node and drop it together with its subtree
    pub fn destroy(&mut self, id: NodeId) -> DomResult<()> {
        self.detach(id)?;
        let mut doomed = self.descendants(id);
        doomed.push(id);
        log::trace!("destroying {} and {} descendants", id, doomed.len() - 1);
        for node_id in doomed {
            self.nodes.remove(&node_id);
            if self.focused == Some(node_id) {
                self.focused = None;
            }
            if self.selection.map(|s| s.node) == Some(node_id) {
                self.selection = None;
            }
        }
        Ok(())
    }

    /// Get the parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id)
            .map(|n| n.children.to_vec())
            .unwrap_or_default()
    }

    /// Get element children of a node, skipping text
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id)
            .map(|n| {
                n.children
                    .iter()
                    .copied()
                    .filter(|&c| self.get(c).map(|c| c.is_element()).unwrap_or(false))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Previous sibling that is an element
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.element_children(self.parent(id)?);
        let index = siblings.iter().position(|&s| s == id)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    /// Next sibling that is an element
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.element_children(self.parent(id)?);
        let index = siblings.iter().position(|&s| s == id)?;
        siblings.get(index + 1).copied()
    }

    /// Check whether `ancestor` contains `id` (strictly)
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Check whether a node is attached to the document
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == self.document_id || self.is_ancestor(self.document_id, id)
    }

    /// Iterate over all descendants of a node (depth-first)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        self.collect_descendants(id, &mut result);
        result
    }

    fn collect_descendants(&self, id: NodeId, result: &mut Vec<NodeId>) {
        if let Some(node) = self.get(id) {
            for &child_id in &node.children {
                result.push(child_id);
                self.collect_descendants(child_id, result);
            }
        }
    }

    /// Get the text content of a node and all its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut result = String::new();
        self.collect_text(id, &mut result);
        result
    }

    fn collect_text(&self, id: NodeId, result: &mut String) {
        if let Some(node) = self.get(id) {
            match &node.node_type {
                NodeType::Text(text) => result.push_str(text),
                _ => {
                    for &child_id in &node.children {
                        self.collect_text(child_id, result);
                    }
                }
            }
        }
    }

    /// Replace the children of a node with a single text node
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        for child in self.children(id) {
            self.destroy(child)?;
        }
        if !text.is_empty() {
            let text_id = self.create_text(text);
            self.append_child(id, text_id)?;
        }
        Ok(())
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> DomResult<()> {
        self.element_or_err(id)?.set_attribute(name, value);
        Ok(())
    }

    /// Read an attribute from an element
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.get_attribute(name))
    }

    /// Check an element's class list
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).map(|e| e.has_class(class)).unwrap_or(false)
    }

    /// Add a class to an element
    pub fn add_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        self.element_or_err(id)?.add_class(class);
        Ok(())
    }

    /// Remove a class from an element
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        self.element_or_err(id)?.remove_class(class);
        Ok(())
    }

    /// Force a class on or off
    pub fn toggle_class(&mut self, id: NodeId, class: &str, on: bool) -> DomResult<()> {
        self.element_or_err(id)?.toggle_class(class, on);
        Ok(())
    }

    /// Set an inline style property on an element
    pub fn set_style(&mut self, id: NodeId, property: &str, value: impl Into<String>) -> DomResult<()> {
        self.element_or_err(id)?.set_style(property, value);
        Ok(())
    }

    /// Read an inline style property
    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.style(property))
    }

    /// Inner width of an element, 0 when unknown
    pub fn client_width(&self, id: NodeId) -> f32 {
        self.element(id).map(|e| e.client_width).unwrap_or(0.0)
    }

    /// Record the width the host's layout pass produced for an element
    pub fn set_client_width(&mut self, id: NodeId, width: f32) -> DomResult<()> {
        self.element_or_err(id)?.client_width = width.max(0.0);
        Ok(())
    }

    /// Give an element input focus
    pub fn focus(&mut self, id: NodeId) -> DomResult<()> {
        self.element_or_err(id)?;
        self.focused = Some(id);
        Ok(())
    }

    /// Drop input focus from `id` if it holds it
    pub fn blur(&mut self, id: NodeId) {
        if self.focused == Some(id) {
            self.focused = None;
            if self.selection.map(|s| s.node) == Some(id) {
                self.selection = None;
            }
        }
    }

    /// Element currently holding focus
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Select the whole `value` of a form control
    pub fn select_all(&mut self, id: NodeId) -> DomResult<()> {
        let len = self.element_or_err(id)?.get_attribute("value").map(str::len).unwrap_or(0);
        self.selection = Some(Selection { node: id, start: 0, end: len });
        Ok(())
    }

    /// Current text selection
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Get the number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (only has document node)
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Pretty print the tree for debugging
    pub fn pretty_print(&self) -> String {
        let mut output = String::new();
        self.print_node(self.document_id, 0, &mut output);
        output
    }

    fn print_node(&self, id: NodeId, depth: usize, output: &mut String) {
        let indent = "  ".repeat(depth);

        if let Some(node) = self.get(id) {
            match &node.node_type {
                NodeType::Document => {
                    output.push_str("#document\n");
                }
                NodeType::Element(elem) => {
                    let mut attrs: Vec<String> = elem
                        .attributes
                        .iter()
                        .map(|(k, v)| format!("{}=\"{}\"", k, v))
                        .collect();
                    attrs.sort();
                    if !elem.style.is_empty() {
                        attrs.push(format!("style=\"{}\"", elem.style_text()));
                    }
                    let attrs_str = if attrs.is_empty() {
                        String::new()
                    } else {
                        format!(" {}", attrs.join(" "))
                    };
                    output.push_str(&format!("{}<{}{}>\n", indent, elem.tag_name, attrs_str));
                }
                NodeType::Text(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        output.push_str(&format!("{}#text: {:?}\n", indent, trimmed));
                    }
                }
            }

            for &child_id in &node.children {
                self.print_node(child_id, depth + 1, output);
            }
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DomTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pretty_print())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip() -> (DomTree, NodeId, Vec<NodeId>) {
        let mut tree = DomTree::new();
        let content = tree.create_element("div");
        tree.append_child(tree.document_id(), content).unwrap();
        let tabs: Vec<NodeId> = (0..3)
            .map(|_| {
                let tab = tree.create_element("div");
                tree.append_child(content, tab).unwrap();
                tab
            })
            .collect();
        (tree, content, tabs)
    }

    #[test]
    fn test_create_elements() {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let body = tree.create_element("body");
        let text = tree.create_text("Hello, World!");

        tree.append_child(tree.document_id(), html).unwrap();
        tree.append_child(html, body).unwrap();
        tree.append_child(body, text).unwrap();

        assert_eq!(tree.len(), 4); // document + html + body + text
        assert_eq!(tree.text_content(body), "Hello, World!");
    }

    #[test]
    fn test_insert_before_moves_node() {
        let (mut tree, content, tabs) = strip();

        tree.insert_before(content, tabs[2], Some(tabs[0])).unwrap();
        assert_eq!(tree.children(content), vec![tabs[2], tabs[0], tabs[1]]);

        tree.insert_before(content, tabs[2], None).unwrap();
        assert_eq!(tree.children(content), vec![tabs[0], tabs[1], tabs[2]]);
    }

    #[test]
    fn test_insert_before_foreign_reference() {
        let (mut tree, content, tabs) = strip();
        let stray = tree.create_element("div");

        assert!(tree.insert_before(content, tabs[0], Some(stray)).is_err());
        assert!(tree.insert_before(tabs[0], content, None).is_err());
        assert_eq!(tree.children(content), tabs);
    }

    #[test]
    fn test_siblings() {
        let (mut tree, content, tabs) = strip();
        let text = tree.create_text(" ");
        tree.insert_before(content, text, Some(tabs[1])).unwrap();

        assert_eq!(tree.previous_element_sibling(tabs[1]), Some(tabs[0]));
        assert_eq!(tree.next_element_sibling(tabs[1]), Some(tabs[2]));
        assert_eq!(tree.previous_element_sibling(tabs[0]), None);
        assert_eq!(tree.next_element_sibling(tabs[2]), None);
    }

    #[test]
    fn test_destroy_drops_subtree() {
        let (mut tree, content, tabs) = strip();
        let title = tree.create_element("div");
        tree.append_child(tabs[1], title).unwrap();
        tree.set_text_content(title, "Example").unwrap();

        let before = tree.len();
        tree.destroy(tabs[1]).unwrap();

        assert_eq!(tree.len(), before - 3);
        assert!(tree.get(title).is_none());
        assert_eq!(tree.children(content), vec![tabs[0], tabs[2]]);
    }

    #[test]
    fn test_focus_and_select() {
        let mut tree = DomTree::new();
        let input = tree.create_element("input");
        tree.append_child(tree.document_id(), input).unwrap();
        tree.set_attribute(input, "value", "https://example.com").unwrap();

        tree.focus(input).unwrap();
        tree.select_all(input).unwrap();
        assert_eq!(tree.focused(), Some(input));
        assert_eq!(tree.selection(), Some(Selection { node: input, start: 0, end: 19 }));

        tree.blur(input);
        assert_eq!(tree.focused(), None);
        assert_eq!(tree.selection(), None);
    }
}
