//! Dispatching the top-level blocks of `#content`.

use super::depth::DepthPolicy;
use super::markers::{CHAPTER_CLASS, Markers, PART_CLASS, PART_INTRO_CLASS, PREAMBLE_ID};
use super::naming::{PREAMBLE_BASENAME, page_basename, part_basename};
use super::partition::{Extent, PageKind, PageSlice, partition};
use crate::dom::{Markup, NodeId};
use crate::error::{Error, Result};

/// Callbacks for each kind of top-level block.
pub trait ContentProcessor<M: Markup> {
    fn preamble(&mut self, doc: &M, node: NodeId, is_first_page: bool);

    fn part(&mut self, doc: &M, node: NodeId, part: u32, is_first_page: bool);

    fn chapter(&mut self, doc: &M, node: NodeId, chapter: u32, is_first_page: bool);

    /// Called for blocks that are neither preamble, part nor chapter.
    fn unrecognized(&mut self, doc: &M, node: NodeId) {
        log::info!(
            "skipping unrecognized content: <{} id={:?} class={:?}>",
            doc.tag_name(node).unwrap_or("?"),
            doc.attr(node, "id").unwrap_or(""),
            doc.attr(node, "class").unwrap_or(""),
        );
    }
}

/// Counters threaded through one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkState {
    pub chapters: u32,
    pub parts: u32,
    pub first_page_taken: bool,
}

impl WalkState {
    /// True exactly once: for the first classified block.
    fn claim_first_page(&mut self) -> bool {
        !std::mem::replace(&mut self.first_page_taken, true)
    }
}

/// Walk the children of `#content` in document order.
///
/// Fails with [`Error::MalformedInput`] when the document has no content
/// container.
pub fn walk<M, P>(doc: &M, markers: &Markers, processor: &mut P) -> Result<WalkState>
where
    M: Markup,
    P: ContentProcessor<M>,
{
    let content = doc
        .select_first(doc.root(), &markers.content)
        .ok_or_else(|| Error::MalformedInput("no #content container".into()))?;

    let mut state = WalkState::default();
    for node in doc.children(content) {
        if doc.has_class(node, PART_INTRO_CLASS) {
            // Emitted together with its part heading
            continue;
        }
        if doc.has_class(node, CHAPTER_CLASS) {
            let first = state.claim_first_page();
            state.chapters += 1;
            processor.chapter(doc, node, state.chapters, first);
        } else if doc.has_class(node, PART_CLASS) {
            let first = state.claim_first_page();
            state.parts += 1;
            processor.part(doc, node, state.parts, first);
        } else if doc.id(node) == Some(PREAMBLE_ID) {
            let first = state.claim_first_page();
            processor.preamble(doc, node, first);
        } else {
            processor.unrecognized(doc, node);
        }
    }

    Ok(state)
}

/// Turns walk callbacks into [`PageSlice`]s, partitioning chapters.
struct SliceProcessor<'a, F> {
    markers: &'a Markers,
    policy: &'a DepthPolicy,
    visit: F,
}

impl<M, F> ContentProcessor<M> for SliceProcessor<'_, F>
where
    M: Markup,
    F: FnMut(&M, PageSlice),
{
    fn preamble(&mut self, doc: &M, node: NodeId, is_first_page: bool) {
        let slice = PageSlice {
            basename: page_basename(PREAMBLE_BASENAME.to_string(), is_first_page),
            kind: PageKind::Preamble,
            is_first_page,
            nodes: vec![node],
            extent: Extent::Whole,
        };
        (self.visit)(doc, slice);
    }

    fn part(&mut self, doc: &M, node: NodeId, part: u32, is_first_page: bool) {
        let mut nodes = vec![node];
        if let Some(intro) = doc.next_element_sibling(node)
            && doc.has_class(intro, PART_INTRO_CLASS)
        {
            nodes.push(intro);
        }
        let slice = PageSlice {
            basename: page_basename(part_basename(part), is_first_page),
            kind: PageKind::Part(part),
            is_first_page,
            nodes,
            extent: Extent::Whole,
        };
        (self.visit)(doc, slice);
    }

    fn chapter(&mut self, doc: &M, node: NodeId, chapter: u32, is_first_page: bool) {
        let visit = &mut self.visit;
        partition(
            doc,
            self.markers,
            self.policy,
            node,
            chapter,
            is_first_page,
            |slice| visit(doc, slice),
        );
    }
}

/// Visit every page of the document in emission order.
pub fn walk_pages<M, F>(
    doc: &M,
    markers: &Markers,
    policy: &DepthPolicy,
    visit: F,
) -> Result<WalkState>
where
    M: Markup,
    F: FnMut(&M, PageSlice),
{
    let mut processor = SliceProcessor {
        markers,
        policy,
        visit,
    };
    walk(doc, markers, &mut processor)
}
