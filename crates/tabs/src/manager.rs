//! Tab strip instances
//!
//! Hands out the instance ids that scope each strip's position rules, so
//! several strips can share one document.

use tabstrip_dom::{DomTree, NodeId};

use crate::options::TabStripOptions;
use crate::strip::TabStrip;

/// Creates tab strips with distinct instance ids
#[derive(Debug, Default)]
pub struct TabStripManager {
    next_instance_id: u32,
}

impl TabStripManager {
    /// Create a manager whose first strip gets instance id 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a new strip to the `.chrome-tabs` element `el`
    pub fn create(&mut self, dom: &mut DomTree, el: NodeId, options: TabStripOptions) -> TabStrip {
        let instance_id = self.next_instance_id;
        self.next_instance_id += 1;
        TabStrip::init(dom, el, options, instance_id)
    }

    /// Number of strips created so far
    pub fn instances(&self) -> u32 {
        self.next_instance_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes;
    use tabstrip_dom::Queryable;

    fn strip_element(dom: &mut DomTree) -> NodeId {
        let el = dom.create_element_with_class("div", classes::STRIP);
        let content = dom.create_element_with_class("div", classes::CONTENT);
        dom.append_child(dom.document_id(), el).unwrap();
        dom.append_child(el, content).unwrap();
        dom.set_client_width(content, 600.0).unwrap();
        el
    }

    #[test]
    fn test_instances_are_scoped() {
        let mut dom = DomTree::new();
        let first_el = strip_element(&mut dom);
        let second_el = strip_element(&mut dom);

        let mut manager = TabStripManager::new();
        let mut first = manager.create(&mut dom, first_el, TabStripOptions::default());
        let mut second = manager.create(&mut dom, second_el, TabStripOptions::default());

        assert_eq!(first.instance_id(), 0);
        assert_eq!(second.instance_id(), 1);
        assert_eq!(manager.instances(), 2);
        assert_eq!(dom.get_attribute(second_el, classes::INSTANCE_ATTR), Some("1"));

        first.add_tab(&mut dom, Default::default());
        second.add_tab(&mut dom, Default::default());
        second.add_tab(&mut dom, Default::default());

        assert_eq!(first.tabs(&dom).len(), 1);
        assert_eq!(second.tabs(&dom).len(), 2);
        assert_eq!(dom.query_all_class(dom.document_id(), classes::TAB).len(), 3);

        second.animation_frame(&mut dom, 16.0);
        let css = dom.text_content(second.style_element().unwrap());
        assert!(css.contains("[data-chrome-tabs-instance-id=\"1\"]"));
        assert!(!css.contains("[data-chrome-tabs-instance-id=\"0\"]"));
    }
}
