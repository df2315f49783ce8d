//! DOM query functionality (getElementById, querySelector by class, closest)

use crate::node::NodeId;
use crate::tree::DomTree;

/// Trait for querying the DOM
pub trait Queryable {
    /// Find an element by its ID attribute anywhere in the document
    fn get_element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Find elements by class name anywhere in the document
    fn get_elements_by_class_name(&self, class_name: &str) -> Vec<NodeId>;

    /// First descendant of `root` with the given ID
    fn query_id(&self, root: NodeId, id: &str) -> Option<NodeId>;

    /// First descendant of `root` carrying `class_name`, in document order
    fn query_class(&self, root: NodeId, class_name: &str) -> Option<NodeId>;

    /// All descendants of `root` carrying `class_name`, in document order
    fn query_all_class(&self, root: NodeId, class_name: &str) -> Vec<NodeId>;

    /// `id` itself or its nearest ancestor carrying `class_name`
    fn closest_class(&self, id: NodeId, class_name: &str) -> Option<NodeId>;
}

impl Queryable for DomTree {
    fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.query_id(self.document_id(), id)
    }

    fn get_elements_by_class_name(&self, class_name: &str) -> Vec<NodeId> {
        self.query_all_class(self.document_id(), class_name)
    }

    fn query_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&node_id| self.element(node_id).and_then(|e| e.id()) == Some(id))
    }

    fn query_class(&self, root: NodeId, class_name: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&node_id| self.has_class(node_id, class_name))
    }

    fn query_all_class(&self, root: NodeId, class_name: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&node_id| self.has_class(node_id, class_name))
            .collect()
    }

    fn closest_class(&self, id: NodeId, class_name: &str) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if self.has_class(node_id, class_name) {
                return Some(node_id);
            }
            current = self.parent(node_id);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_element_by_id() {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let div = tree.create_element("div");

        tree.set_attribute(div, "id", "test").unwrap();

        tree.append_child(tree.document_id(), html).unwrap();
        tree.append_child(html, div).unwrap();

        assert_eq!(tree.get_element_by_id("test"), Some(div));
        assert_eq!(tree.get_element_by_id("nonexistent"), None);
    }

    #[test]
    fn test_class_queries_are_scoped() {
        let mut tree = DomTree::new();
        let first = tree.create_element_with_class("div", "chrome-tabs");
        let second = tree.create_element_with_class("div", "chrome-tabs");
        let tab_a = tree.create_element_with_class("div", "chrome-tab");
        let tab_b = tree.create_element_with_class("div", "chrome-tab");
        let title = tree.create_element_with_class("div", "chrome-tab-title");

        tree.append_child(tree.document_id(), first).unwrap();
        tree.append_child(tree.document_id(), second).unwrap();
        tree.append_child(first, tab_a).unwrap();
        tree.append_child(second, tab_b).unwrap();
        tree.append_child(tab_b, title).unwrap();

        assert_eq!(tree.query_all_class(first, "chrome-tab"), vec![tab_a]);
        assert_eq!(tree.query_class(second, "chrome-tab"), Some(tab_b));
        assert_eq!(tree.get_elements_by_class_name("chrome-tab"), vec![tab_a, tab_b]);
        assert_eq!(tree.closest_class(title, "chrome-tab"), Some(tab_b));
        assert_eq!(tree.closest_class(title, "chrome-tab-close"), None);
    }
}
