//! Markup tree facade.
//!
//! The chunking pipeline only talks to markup through the [`Markup`] trait:
//! selector queries, attribute access, structural edits, snapshots and
//! serialization. [`Document`] implements it over an arena DOM built by
//! html5ever.
//!
//! # Example
//!
//! ```
//! use adoc_chunker::dom::{Document, Markup, Selector};
//!
//! let doc = Document::parse(r#"<div id="content"><div class="sect1" id="c1"></div></div>"#);
//! let sect1 = Selector::parse("#content > .sect1").unwrap();
//!
//! let found = doc.select(doc.root(), &sect1);
//! assert_eq!(found.len(), 1);
//! assert_eq!(doc.attr(found[0], "id"), Some("c1"));
//! ```

mod arena;
mod document;
mod element_ref;
mod selector;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId};
pub use document::Document;
pub use element_ref::{ChunkSelectors, ElementRef};
pub use selector::Selector;

/// Node handle used by [`Markup`] implementations.
pub type NodeId = ArenaNodeId;

/// The capability set the chunker needs from a markup tree.
///
/// All node handles are only meaningful for the tree that produced them.
/// Queries return nodes in document order.
pub trait Markup: Clone {
    /// The document node.
    fn root(&self) -> NodeId;

    /// Descendants of `scope` (not `scope` itself) matching `selector`.
    fn select(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId>;

    fn select_first(&self, scope: NodeId, selector: &Selector) -> Option<NodeId>;

    /// Element children of `node`.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn next_element_sibling(&self, node: NodeId) -> Option<NodeId>;

    fn tag_name(&self, node: NodeId) -> Option<&str>;

    fn attr(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Concatenated text of all descendant text nodes.
    fn text(&self, node: NodeId) -> String;

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Unlink `node` and its subtree from the tree.
    fn detach(&mut self, node: NodeId);

    /// Detach every child of `node`.
    fn empty(&mut self, node: NodeId);

    /// A fresh tree whose root holds a deep copy of `node`.
    ///
    /// Snapshotting the root itself yields a compacted copy of the whole
    /// document.
    fn snapshot(&self, node: NodeId) -> Self;

    /// Deep-copy `node` from `src` and append the copy to `parent`.
    fn append_copy(&mut self, parent: NodeId, src: &Self, node: NodeId) -> NodeId;

    /// Create a detached HTML element.
    fn create_element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId;

    fn append_child(&mut self, parent: NodeId, child: NodeId);

    fn insert_before(&mut self, sibling: NodeId, node: NodeId);

    fn insert_after(&mut self, sibling: NodeId, node: NodeId);

    fn append_text(&mut self, parent: NodeId, text: &str);

    /// Serialize the whole tree.
    fn serialize(&self) -> String;

    /// Serialize `node` including its own tags.
    fn outer_html(&self, node: NodeId) -> String;

    fn id(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "id")
    }

    /// The first element under the root.
    ///
    /// For a [`snapshot`](Markup::snapshot) this is the copied node.
    fn top(&self) -> Option<NodeId> {
        self.children(self.root()).first().copied()
    }

    /// Add a class unless it is already present.
    fn add_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        let value = match self.attr(node, "class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {class}", existing.trim_end())
            }
            _ => class.to_string(),
        };
        self.set_attr(node, "class", &value);
    }

    /// Detach every descendant of `scope` matching `selector`.
    ///
    /// Returns the number of subtrees removed; matches nested inside an
    /// already removed subtree are not counted.
    fn remove_matching(&mut self, scope: NodeId, selector: &Selector) -> usize {
        let mut removed = 0;
        for node in self.select(scope, selector) {
            if !self.is_under(node, scope) {
                continue;
            }
            self.detach(node);
            removed += 1;
        }
        removed
    }

    /// Whether `ancestor` is a proper ancestor of `node`.
    fn is_under(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }
}
