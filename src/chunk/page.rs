//! Page skeleton and per-page assembly.

use super::footnotes::{FootnoteDefs, scope_footnotes};
use super::index::ChunkIndex;
use super::links::{RewriteStats, rewrite_links};
use super::markers::Markers;
use super::nav::{add_page_navigation, set_current_toc};
use super::partition::{Extent, PageSlice};
use crate::dom::Markup;
use crate::error::{Error, Result};

/// Appended to `<html>` on every page.
///
/// Scrolls the TOC so the current entry is visible and binds the arrow keys
/// to the navigation links.
pub const PAGE_SCRIPT: &str = r#"
(function () {
  const toc = document.getElementById('toc');
  const current = document.querySelectorAll('#toc .current');
  if (toc && current.length > 0) {
    const last = current[current.length - 1].getBoundingClientRect();
    const viewport = window.innerHeight || document.documentElement.clientHeight;
    if (last.top < 0 || last.bottom > viewport) {
      const first = current[0].getBoundingClientRect();
      toc.scrollTo({ top: first.top - 20, left: 0, behavior: 'smooth' });
    }
  }

  function follow(selector) {
    const link = document.querySelector(selector);
    if (link) {
      window.location.href = link.href;
    }
  }

  document.addEventListener('keydown', function (event) {
    if (event.key === 'ArrowRight') {
      event.preventDefault();
      follow('.nav-next');
    } else if (event.key === 'ArrowLeft') {
      event.preventDefault();
      follow('.nav-prev');
    }
  });
})();
"#;

/// The source document with every conventional content block removed.
///
/// Each page is a clone of the skeleton with its own content appended.
#[derive(Debug, Clone)]
pub struct Skeleton<M> {
    doc: M,
}

impl<M: Markup> Skeleton<M> {
    /// Clone `source` and strip the chapters, parts and preamble out of
    /// `#content`.
    ///
    /// In strict mode anything else left under `#content` is reported and
    /// dropped; otherwise it stays on every page.
    pub fn new(source: &M, markers: &Markers, strict_mode: bool) -> Result<Self> {
        let mut doc = source.clone();
        let root = doc.root();
        let content = doc
            .select_first(root, &markers.content)
            .ok_or_else(|| Error::MalformedInput("no #content container".into()))?;

        doc.remove_matching(root, &markers.skeleton_blocks);

        let leftovers = doc.children(content);
        if strict_mode && !leftovers.is_empty() {
            log::info!(
                "non-Asciidoctor content found under #content; \
                 it is left out of the pages (disable strict mode to keep it)"
            );
            for node in leftovers {
                for line in doc.outer_html(node).lines() {
                    let line = line.trim();
                    if !line.is_empty() {
                        log::info!("found content => {line}");
                    }
                }
            }
            doc.empty(content);
        }

        Ok(Self { doc })
    }

    pub fn doc(&self) -> &M {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut M {
        &mut self.doc
    }

    /// Drop the arena slots freed while stripping content.
    pub fn compact(&mut self) {
        self.doc = self.doc.snapshot(self.doc.root());
    }
}

/// Append the page script to `<html>`.
pub fn insert_script<M: Markup>(doc: &mut M, markers: &Markers) {
    let Some(html) = doc.select_first(doc.root(), &markers.html) else {
        return;
    };
    let script = doc.create_element("script", &[]);
    doc.append_text(script, PAGE_SCRIPT);
    doc.append_child(html, script);
}

/// A finished page, ready to serialize.
#[derive(Debug, Clone)]
pub struct AssembledPage<M> {
    pub doc: M,
    pub links: RewriteStats,
    pub footnotes: usize,
}

/// Builds pages from slices of the source against the shared index.
pub struct PageAssembler<'a, M> {
    pub skeleton: &'a Skeleton<M>,
    pub markers: &'a Markers,
    pub index: &'a ChunkIndex,
    pub footnotes: &'a FootnoteDefs,
}

impl<M: Markup> PageAssembler<'_, M> {
    /// Assemble one page.
    ///
    /// The slice's nodes are snapshotted out of `source`, so neither the
    /// source nor the skeleton is modified.
    pub fn assemble(&self, source: &M, slice: &PageSlice) -> Result<AssembledPage<M>> {
        let mut page = self.skeleton.doc().clone();
        let root = page.root();
        let content = page
            .select_first(root, &self.markers.content)
            .ok_or_else(|| Error::MalformedInput("page skeleton lost #content".into()))?;

        let mut links = RewriteStats::default();
        for &node in &slice.nodes {
            let mut fragment = source.snapshot(node);
            let Some(top) = fragment.top() else {
                continue;
            };
            if let Extent::Shallow { child_level } = slice.extent
                && let Some(children) = self.markers.section(child_level)
            {
                fragment.remove_matching(top, children);
            }

            let fragment_root = fragment.root();
            let stats = rewrite_links(&mut fragment, fragment_root, self.markers, &self.index.ids);
            links.resolved += stats.resolved;
            links.missing += stats.missing;

            page.append_copy(content, &fragment, top);
        }

        let footnotes = scope_footnotes(&mut page, self.markers, self.footnotes);
        add_page_navigation(&mut page, self.markers, &slice.basename, &self.index.navigation);
        set_current_toc(&mut page, self.markers, &slice.basename);
        insert_script(&mut page, self.markers);

        Ok(AssembledPage {
            doc: page,
            links,
            footnotes,
        })
    }
}
