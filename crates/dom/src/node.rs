//! DOM Node representation

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;

/// Unique identifier for a node in the DOM tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Type of DOM node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    /// Document root node
    Document,
    /// Element node
    Element(ElementData),
    /// Text content
    Text(String),
}

/// Element-specific data
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    /// Tag name (lowercase)
    pub tag_name: String,
    /// Element attributes, `class` included
    pub attributes: FxHashMap<String, String>,
    /// Inline style declarations in insertion order
    pub style: SmallVec<[(String, String); 4]>,
    /// Inner width as measured by the host's layout pass
    pub client_width: f32,
}

impl ElementData {
    /// Create a new element with the given tag name
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into().to_ascii_lowercase(),
            attributes: FxHashMap::default(),
            style: SmallVec::new(),
            client_width: 0.0,
        }
    }

    /// Get an attribute value
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(&name.to_ascii_lowercase()).map(|s| s.as_str())
    }

    /// Set an attribute value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into().to_ascii_lowercase(), value.into());
    }

    /// Remove an attribute
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(&name.to_ascii_lowercase())
    }

    /// Get the element's ID
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }

    /// Check if the element has a class
    pub fn has_class(&self, class: &str) -> bool {
        self.get_attribute("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Get all classes as a vector
    pub fn classes(&self) -> Vec<&str> {
        self.get_attribute("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Add a class; no-op when already present
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let mut classes: Vec<String> = self.classes().into_iter().map(str::to_string).collect();
        classes.push(class.to_string());
        self.set_attribute("class", classes.join(" "));
    }

    /// Remove a class; no-op when absent
    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let classes: Vec<&str> = self.classes().into_iter().filter(|c| *c != class).collect();
        let joined = classes.join(" ");
        self.set_attribute("class", joined);
    }

    /// Add or remove a class depending on `on`
    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    /// Get an inline style property
    pub fn style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Set an inline style property. An empty value removes it, like
    /// assigning `''` through CSSOM.
    pub fn set_style(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.style.retain(|(name, _)| name != property);
            return;
        }
        match self.style.iter_mut().find(|(name, _)| name == property) {
            Some(entry) => entry.1 = value,
            None => self.style.push((property.to_string(), value)),
        }
    }

    /// Serialize the inline style the way a `style` attribute would read
    pub fn style_text(&self) -> String {
        self.style
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A node in the DOM tree
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,
    /// Node type and associated data
    pub node_type: NodeType,
    /// Parent node ID (None for root and detached nodes)
    pub parent: Option<NodeId>,
    /// Child node IDs in document order
    pub children: SmallVec<[NodeId; 8]>,
}

impl Node {
    /// Create a new node
    pub fn new(id: NodeId, node_type: NodeType) -> Self {
        Self {
            id,
            node_type,
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// Check if this is a document node
    pub fn is_document(&self) -> bool {
        matches!(self.node_type, NodeType::Document)
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        matches!(self.node_type, NodeType::Element(_))
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        matches!(self.node_type, NodeType::Text(_))
    }

    /// Get element data if this is an element
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Get mutable element data if this is an element
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    pub fn as_text(&self) -> Option<&str> {
        match &self.node_type {
            NodeType::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Get the tag name if this is an element
    pub fn tag_name(&self) -> Option<&str> {
        self.as_element().map(|e| e.tag_name.as_str())
    }
}
