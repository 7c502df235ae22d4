//! Splitting chapters into section pages.

use super::depth::DepthPolicy;
use super::markers::Markers;
use super::naming::{SectionPath, page_basename};
use crate::dom::{Markup, NodeId};

/// How much of a node's subtree belongs to its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    /// The node and everything below it.
    Whole,
    /// The node minus its `div.sect{child_level}` descendants, which get
    /// pages of their own.
    Shallow { child_level: u32 },
}

/// What a page was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    Preamble,
    Part(u32),
    Section(SectionPath),
}

/// One page the walk decided to emit, still pointing into the source tree.
#[derive(Debug, Clone)]
pub struct PageSlice {
    pub basename: String,
    pub kind: PageKind,
    pub is_first_page: bool,
    /// Source nodes appended to the page in order. Only the first one
    /// carries the page's top id.
    pub nodes: Vec<NodeId>,
    pub extent: Extent,
}

impl PageSlice {
    /// Section containers inside `nodes` that this page leaves out.
    pub fn excluded_sections<M: Markup>(&self, doc: &M, markers: &Markers) -> Vec<NodeId> {
        let Extent::Shallow { child_level } = self.extent else {
            return Vec::new();
        };
        let Some(children) = markers.section(child_level) else {
            return Vec::new();
        };
        self.nodes
            .iter()
            .flat_map(|&node| doc.select(node, children))
            .collect()
    }
}

/// Visit a chapter and its sections in pre-order, one slice per page.
///
/// A node whose resolved depth equals its own level becomes a single page
/// with its whole subtree. Any other node becomes a shallow page and its
/// next-level sections are visited in turn; the walk ends where no deeper
/// sections exist.
pub fn partition<M, F>(
    doc: &M,
    markers: &Markers,
    policy: &DepthPolicy,
    chapter_node: NodeId,
    chapter: u32,
    is_first_page: bool,
    mut visit: F,
) where
    M: Markup,
    F: FnMut(PageSlice),
{
    let mut stack = vec![(chapter_node, SectionPath::chapter(chapter), is_first_page)];

    while let Some((node, path, is_first_page)) = stack.pop() {
        let level = path.level();
        let max_level = policy.resolve(path.position());
        let basename = page_basename(path.basename(), is_first_page);

        if max_level == level {
            visit(PageSlice {
                basename,
                kind: PageKind::Section(path),
                is_first_page,
                nodes: vec![node],
                extent: Extent::Whole,
            });
            continue;
        }

        let child_level = level + 1;
        let children = markers
            .section(child_level)
            .map(|selector| doc.select(node, selector))
            .unwrap_or_default();

        for (i, &child) in children.iter().enumerate().rev() {
            stack.push((child, path.child(i as u32 + 1), false));
        }

        visit(PageSlice {
            basename,
            kind: PageKind::Section(path),
            is_first_page,
            nodes: vec![node],
            extent: Extent::Shallow { child_level },
        });
    }
}
