//! Owned, parsed HTML documents.

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{LocalName, QualName, ns};

use super::arena::{ArenaDom, Attribute};
use super::serialize::{serialize_children, serialize_outer};
use super::tree_sink::ArenaSink;
use super::{Markup, NodeId, Selector};
use crate::util::{decode_text, extract_meta_charset};

/// A parsed HTML document backed by an arena DOM.
#[derive(Debug, Clone, Default)]
pub struct Document {
    dom: ArenaDom,
}

impl Document {
    /// Parse a complete HTML document. The doctype is kept.
    pub fn parse(html: &str) -> Self {
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                drop_doctype: false,
                ..Default::default()
            },
            ..Default::default()
        };

        let sink = parse_document(ArenaSink::new(), opts)
            .from_utf8()
            .one(html.as_bytes());
        if sink.error_count() > 0 {
            log::debug!("html parser recovered from {} errors", sink.error_count());
        }
        Self {
            dom: sink.into_dom(),
        }
    }

    /// Decode raw bytes and parse them.
    ///
    /// UTF-8 is tried first, then the `<meta charset>` label, then Windows-1252.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let text = decode_text(bytes, extract_meta_charset(bytes));
        Self::parse(&text)
    }

    /// The underlying arena.
    pub fn dom(&self) -> &ArenaDom {
        &self.dom
    }
}

impl Markup for Document {
    fn root(&self) -> NodeId {
        self.dom.document()
    }

    fn select(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        selector.select(&self.dom, scope)
    }

    fn select_first(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        selector.select_first(&self.dom, scope)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.dom
            .children(node)
            .filter(|&child| self.dom.is_element(child))
            .collect()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.dom.parent(node)
    }

    fn next_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let mut current = self.dom.get(node)?.next_sibling;
        while let Some(n) = self.dom.get(current) {
            if self.dom.is_element(current) {
                return Some(current);
            }
            current = n.next_sibling;
        }
        None
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.dom.element_name(node).map(|name| name.as_ref())
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.dom.get_attr(node, name)
    }

    fn text(&self, node: NodeId) -> String {
        self.dom
            .descendants(node)
            .filter_map(|id| self.dom.text_content(id))
            .collect()
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.dom.set_attr(node, name, value);
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.dom.element_classes(node).iter().any(|c| c == class)
    }

    fn detach(&mut self, node: NodeId) {
        self.dom.detach(node);
    }

    fn empty(&mut self, node: NodeId) {
        self.dom.clear_children(node);
    }

    fn snapshot(&self, node: NodeId) -> Self {
        let mut dom = ArenaDom::new();
        let target = dom.document();
        if node == self.dom.document() {
            for child in self.dom.children(node) {
                let copy = dom.copy_from(&self.dom, child);
                dom.append(target, copy);
            }
        } else {
            let copy = dom.copy_from(&self.dom, node);
            dom.append(target, copy);
        }
        Self { dom }
    }

    fn append_copy(&mut self, parent: NodeId, src: &Self, node: NodeId) -> NodeId {
        let copy = self.dom.copy_from(&src.dom, node);
        self.dom.append(parent, copy);
        copy
    }

    fn create_element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let attrs = attrs
            .iter()
            .map(|&(name, value)| Attribute {
                name: QualName::new(None, ns!(), LocalName::from(name)),
                value: value.to_string(),
            })
            .collect();
        self.dom
            .create_element(QualName::new(None, ns!(html), LocalName::from(tag)), attrs)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.dom.append(parent, child);
    }

    fn insert_before(&mut self, sibling: NodeId, node: NodeId) {
        self.dom.insert_before(sibling, node);
    }

    fn insert_after(&mut self, sibling: NodeId, node: NodeId) {
        self.dom.insert_after(sibling, node);
    }

    fn append_text(&mut self, parent: NodeId, text: &str) {
        self.dom.append_text(parent, text);
    }

    fn serialize(&self) -> String {
        serialize_children(&self.dom, self.dom.document())
    }

    fn outer_html(&self, node: NodeId) -> String {
        serialize_outer(&self.dom, node)
    }
}
