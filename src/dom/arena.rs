//! Arena-based DOM for HTML parsing and page assembly.
//!
//! All nodes live in one contiguous vector and link to each other by index.
//! Detached nodes stay allocated until the arena is dropped, so a
//! [`ArenaNodeId`] is never reused within one arena.

use html5ever::{LocalName, Namespace, QualName, ns};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaNodeId(pub u32);

impl ArenaNodeId {
    /// Sentinel value for no node.
    pub const NONE: ArenaNodeId = ArenaNodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }

    fn option(self) -> Option<ArenaNodeId> {
        self.is_some().then_some(self)
    }
}

/// Node type in the arena DOM.
#[derive(Debug, Clone)]
pub enum ArenaNodeData {
    /// Document root.
    Document,
    /// Element with name and attributes.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Pre-extracted id for fast matching.
        id: Option<String>,
        /// Pre-extracted classes for fast matching.
        classes: Vec<String>,
    },
    /// Text content.
    Text(String),
    Comment(String),
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
}

/// HTML attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// A node in the arena DOM.
#[derive(Debug, Clone)]
pub struct ArenaNode {
    pub data: ArenaNodeData,
    pub parent: ArenaNodeId,
    pub first_child: ArenaNodeId,
    pub last_child: ArenaNodeId,
    pub prev_sibling: ArenaNodeId,
    pub next_sibling: ArenaNodeId,
}

impl ArenaNode {
    fn new(data: ArenaNodeData) -> Self {
        Self {
            data,
            parent: ArenaNodeId::NONE,
            first_child: ArenaNodeId::NONE,
            last_child: ArenaNodeId::NONE,
            prev_sibling: ArenaNodeId::NONE,
            next_sibling: ArenaNodeId::NONE,
        }
    }
}

/// Arena-based DOM tree.
#[derive(Debug, Clone)]
pub struct ArenaDom {
    nodes: Vec<ArenaNode>,
    document: ArenaNodeId,
}

impl ArenaDom {
    /// Create a new empty DOM with a document root.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: ArenaNodeId::NONE,
        };
        dom.document = dom.alloc(ArenaNode::new(ArenaNodeData::Document));
        dom
    }

    fn alloc(&mut self, node: ArenaNode) -> ArenaNodeId {
        let id = ArenaNodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document root ID.
    pub fn document(&self) -> ArenaNodeId {
        self.document
    }

    /// Get a node by ID.
    pub fn get(&self, id: ArenaNodeId) -> Option<&ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: ArenaNodeId) -> Option<&mut ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create a new, detached element node.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> ArenaNodeId {
        // Pre-extract id and class for fast CSS matching
        let mut id = None;
        let mut classes = Vec::new();

        for attr in &attrs {
            if attr.name.local.as_ref() == "id" {
                id = Some(attr.value.clone());
            } else if attr.name.local.as_ref() == "class" {
                classes = split_classes(&attr.value);
            }
        }

        self.alloc(ArenaNode::new(ArenaNodeData::Element {
            name,
            attrs,
            id,
            classes,
        }))
    }

    /// Create a new text node.
    pub fn create_text(&mut self, text: String) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Text(text)))
    }

    /// Create a new comment node.
    pub fn create_comment(&mut self, text: String) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Comment(text)))
    }

    /// Create a doctype node.
    pub fn create_doctype(
        &mut self,
        name: String,
        public_id: String,
        system_id: String,
    ) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Doctype {
            name,
            public_id,
            system_id,
        }))
    }

    /// Append a child to a parent node.
    ///
    /// The child must be detached.
    pub fn append(&mut self, parent: ArenaNodeId, child: ArenaNodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = ArenaNodeId::NONE;
        }

        if last_child.is_some()
            && let Some(last_node) = self.get_mut(last_child)
        {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a detached node before a sibling.
    pub fn insert_before(&mut self, sibling: ArenaNodeId, new_node: ArenaNodeId) {
        let parent = self
            .get(sibling)
            .map(|n| n.parent)
            .unwrap_or(ArenaNodeId::NONE);
        let prev = self
            .get(sibling)
            .map(|n| n.prev_sibling)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Insert a detached node after a sibling.
    pub fn insert_after(&mut self, sibling: ArenaNodeId, new_node: ArenaNodeId) {
        let (parent, next) = match self.get(sibling) {
            Some(n) => (n.parent, n.next_sibling),
            None => return,
        };
        if next.is_some() {
            self.insert_before(next, new_node);
        } else if parent.is_some() {
            self.append(parent, new_node);
        }
    }

    /// Unlink a node (and its subtree) from its parent.
    pub fn detach(&mut self, target: ArenaNodeId) {
        let (parent, prev, next) = match self.get(target) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(target) {
            node.parent = ArenaNodeId::NONE;
            node.prev_sibling = ArenaNodeId::NONE;
            node.next_sibling = ArenaNodeId::NONE;
        }
    }

    /// Detach every child of a node.
    pub fn clear_children(&mut self, parent: ArenaNodeId) {
        let children: Vec<_> = self.children(parent).collect();
        for child in children {
            self.detach(child);
        }
    }

    /// Move all children of `node` to the end of `new_parent`.
    pub fn reparent_children(&mut self, node: ArenaNodeId, new_parent: ArenaNodeId) {
        let children: Vec<_> = self.children(node).collect();
        for child in children {
            self.detach(child);
            self.append(new_parent, child);
        }
    }

    /// Append text to an existing text node, or create new if last child isn't text.
    pub fn append_text(&mut self, parent: ArenaNodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let ArenaNodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Deep-copy the subtree rooted at `src_node` of `src` into this arena.
    ///
    /// The copy is returned detached.
    pub fn copy_from(&mut self, src: &ArenaDom, src_node: ArenaNodeId) -> ArenaNodeId {
        let Some(root) = src.get(src_node) else {
            return ArenaNodeId::NONE;
        };
        let copy = self.alloc(ArenaNode::new(root.data.clone()));

        // (source node, destination parent)
        let mut stack: Vec<(ArenaNodeId, ArenaNodeId)> =
            src.children(src_node).map(|child| (child, copy)).collect();
        stack.reverse();

        while let Some((src_id, dst_parent)) = stack.pop() {
            let Some(node) = src.get(src_id) else {
                continue;
            };
            let dst = self.alloc(ArenaNode::new(node.data.clone()));
            self.append(dst_parent, dst);

            let children: Vec<_> = src.children(src_id).collect();
            stack.extend(children.into_iter().rev().map(|child| (child, dst)));
        }

        copy
    }

    /// Get the number of allocated nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the DOM is empty (only has document root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: ArenaNodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(ArenaNodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// Iterate over the descendants of a node in document order.
    ///
    /// The node itself is not yielded.
    pub fn descendants(&self, root: ArenaNodeId) -> Descendants<'_> {
        let first = self
            .get(root)
            .map(|n| n.first_child)
            .unwrap_or(ArenaNodeId::NONE);
        Descendants {
            dom: self,
            root,
            next: first,
        }
    }

    /// Parent of a node, if attached.
    pub fn parent(&self, id: ArenaNodeId) -> Option<ArenaNodeId> {
        self.get(id).and_then(|n| n.parent.option())
    }

    /// Find the first element matching a predicate (DFS).
    #[cfg(test)]
    pub fn find<F>(&self, predicate: F) -> Option<ArenaNodeId>
    where
        F: Fn(&ArenaNode) -> bool,
    {
        std::iter::once(self.document)
            .chain(self.descendants(self.document))
            .find(|&id| self.get(id).is_some_and(&predicate))
    }

    /// Find element by tag name (first match).
    #[cfg(test)]
    pub fn find_by_tag(&self, tag: &str) -> Option<ArenaNodeId> {
        self.find(|node| {
            if let ArenaNodeData::Element { name, .. } = &node.data {
                name.local.as_ref() == tag
            } else {
                false
            }
        })
    }
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a ArenaDom,
    current: ArenaNodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = ArenaNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(ArenaNodeId::NONE);
        Some(id)
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct Descendants<'a> {
    dom: &'a ArenaDom,
    root: ArenaNodeId,
    next: ArenaNodeId,
}

impl Iterator for Descendants<'_> {
    type Item = ArenaNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.option()?;
        let node = self.dom.get(current)?;

        self.next = if node.first_child.is_some() {
            node.first_child
        } else {
            // Climb until a next sibling exists, stopping at the root
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    break ArenaNodeId::NONE;
                }
                let Some(n) = self.dom.get(cursor) else {
                    break ArenaNodeId::NONE;
                };
                if n.next_sibling.is_some() {
                    break n.next_sibling;
                }
                cursor = n.parent;
                if cursor.is_none() || cursor == self.root {
                    break ArenaNodeId::NONE;
                }
            }
        };

        Some(current)
    }
}

/// Convenience methods for element nodes.
impl ArenaDom {
    /// Get element's local name (tag).
    pub fn element_name(&self, id: ArenaNodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    /// Get element's namespace.
    pub fn element_namespace(&self, id: ArenaNodeId) -> Option<&Namespace> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { name, .. } => Some(&name.ns),
            _ => None,
        })
    }

    /// Get an attribute value.
    pub fn get_attr(&self, id: ArenaNodeId, attr_name: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == attr_name)
                .map(|a| a.value.as_str()),
            _ => None,
        })
    }

    /// Set (or replace) an attribute value, keeping the id/class caches in sync.
    pub fn set_attr(&mut self, id: ArenaNodeId, attr_name: &str, value: &str) {
        let Some(ArenaNode {
            data:
                ArenaNodeData::Element {
                    attrs,
                    id: elem_id,
                    classes,
                    ..
                },
            ..
        }) = self.get_mut(id)
        else {
            return;
        };

        match attrs.iter_mut().find(|a| a.name.local.as_ref() == attr_name) {
            Some(attr) => attr.value = value.to_string(),
            None => attrs.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(attr_name)),
                value: value.to_string(),
            }),
        }

        match attr_name {
            "id" => *elem_id = Some(value.to_string()),
            "class" => *classes = split_classes(value),
            _ => {}
        }
    }

    /// Get element's id attribute.
    pub fn element_id(&self, id: ArenaNodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { id, .. } => id.as_deref(),
            _ => None,
        })
    }

    /// Get element's classes.
    pub fn element_classes(&self, id: ArenaNodeId) -> &[String] {
        static EMPTY: &[String] = &[];
        self.get(id)
            .and_then(|n| match &n.data {
                ArenaNodeData::Element { classes, .. } => Some(classes.as_slice()),
                _ => None,
            })
            .unwrap_or(EMPTY)
    }

    /// Check if node is an element.
    pub fn is_element(&self, id: ArenaNodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, ArenaNodeData::Element { .. }))
    }

    /// Get text content of a text node.
    pub fn text_content(&self, id: ArenaNodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }
}

fn split_classes(value: &str) -> Vec<String> {
    value.split_whitespace().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_qname(local: &str) -> QualName {
        QualName::new(None, ns!(html), LocalName::from(local))
    }

    fn attr(name: &str, value: &str) -> Attribute {
        Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_create_elements() {
        let mut dom = ArenaDom::new();

        let div = dom.create_element(make_qname("div"), vec![attr("id", "main")]);
        dom.append(dom.document(), div);

        assert_eq!(dom.element_name(div).unwrap().as_ref(), "div");
        assert_eq!(dom.element_id(div), Some("main"));
        assert_eq!(dom.parent(div), Some(dom.document()));
    }

    #[test]
    fn test_append_children() {
        let mut dom = ArenaDom::new();

        let parent = dom.create_element(make_qname("div"), vec![]);
        let child1 = dom.create_element(make_qname("p"), vec![]);
        let child2 = dom.create_element(make_qname("p"), vec![]);

        dom.append(dom.document(), parent);
        dom.append(parent, child1);
        dom.append(parent, child2);

        let children: Vec<_> = dom.children(parent).collect();
        assert_eq!(children, vec![child1, child2]);
    }

    #[test]
    fn test_text_merging() {
        let mut dom = ArenaDom::new();

        let p = dom.create_element(make_qname("p"), vec![]);
        dom.append(dom.document(), p);

        dom.append_text(p, "Hello, ");
        dom.append_text(p, "World!");

        let children: Vec<_> = dom.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(dom.text_content(children[0]), Some("Hello, World!"));
    }

    #[test]
    fn test_detach_middle_and_edges() {
        let mut dom = ArenaDom::new();
        let ul = dom.create_element(make_qname("ul"), vec![]);
        dom.append(dom.document(), ul);
        let items: Vec<_> = (0..3)
            .map(|_| {
                let li = dom.create_element(make_qname("li"), vec![]);
                dom.append(ul, li);
                li
            })
            .collect();

        dom.detach(items[1]);
        assert_eq!(dom.children(ul).collect::<Vec<_>>(), vec![items[0], items[2]]);

        dom.detach(items[0]);
        dom.detach(items[2]);
        assert_eq!(dom.children(ul).count(), 0);
        assert_eq!(dom.parent(items[1]), None);
    }

    #[test]
    fn test_insert_after_last_appends() {
        let mut dom = ArenaDom::new();
        let body = dom.create_element(make_qname("body"), vec![]);
        dom.append(dom.document(), body);
        let a = dom.create_element(make_qname("div"), vec![]);
        dom.append(body, a);
        let b = dom.create_element(make_qname("nav"), vec![]);
        dom.insert_after(a, b);
        let c = dom.create_element(make_qname("p"), vec![]);
        dom.insert_after(a, c);

        assert_eq!(dom.children(body).collect::<Vec<_>>(), vec![a, c, b]);
    }

    #[test]
    fn test_descendants_preorder_stays_in_subtree() {
        let mut dom = ArenaDom::new();
        let outer = dom.create_element(make_qname("div"), vec![attr("id", "outer")]);
        let inner = dom.create_element(make_qname("div"), vec![attr("id", "inner")]);
        let leaf = dom.create_element(make_qname("p"), vec![attr("id", "leaf")]);
        let sibling = dom.create_element(make_qname("p"), vec![attr("id", "sibling")]);
        let after = dom.create_element(make_qname("p"), vec![attr("id", "after")]);

        dom.append(dom.document(), outer);
        dom.append(outer, inner);
        dom.append(inner, leaf);
        dom.append(outer, sibling);
        dom.append(dom.document(), after);

        let ids: Vec<_> = dom
            .descendants(outer)
            .filter_map(|id| dom.element_id(id))
            .collect();
        assert_eq!(ids, vec!["inner", "leaf", "sibling"]);
    }

    #[test]
    fn test_copy_from_other_arena() {
        let mut src = ArenaDom::new();
        let div = src.create_element(make_qname("div"), vec![attr("class", "sect1")]);
        src.append(src.document(), div);
        let h2 = src.create_element(make_qname("h2"), vec![attr("id", "_intro")]);
        src.append(div, h2);
        src.append_text(h2, "Intro");

        let mut dst = ArenaDom::new();
        let copy = dst.copy_from(&src, div);
        dst.append(dst.document(), copy);

        assert_eq!(dst.element_classes(copy), ["sect1".to_string()]);
        let heading = dst.children(copy).next().unwrap();
        assert_eq!(dst.element_id(heading), Some("_intro"));
        let text = dst.children(heading).next().unwrap();
        assert_eq!(dst.text_content(text), Some("Intro"));

        // the source is untouched
        assert_eq!(src.children(div).count(), 1);
    }

    #[test]
    fn test_set_attr_updates_caches() {
        let mut dom = ArenaDom::new();
        let a = dom.create_element(make_qname("a"), vec![attr("class", "link")]);

        dom.set_attr(a, "class", "link target-missing");
        dom.set_attr(a, "id", "_ref_1");

        assert_eq!(
            dom.element_classes(a),
            ["link".to_string(), "target-missing".to_string()]
        );
        assert_eq!(dom.element_id(a), Some("_ref_1"));
        assert_eq!(dom.get_attr(a, "id"), Some("_ref_1"));
    }
}
