//! First pass: where every id ends up, and the page order.

use std::collections::{HashMap, HashSet};

use super::depth::DepthPolicy;
use super::markers::{FOOTNOTE_DEF_PREFIX, Markers};
use super::naming::page_file;
use super::partition::PageSlice;
use super::walker::walk_pages;
use crate::dom::{Markup, NodeId};
use crate::error::Result;

/// Map from element id to the URL of the page that holds it.
///
/// Ids are recorded as `page.html#id`, except a page's own top id which
/// maps to plain `page.html`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdIndex {
    urls: HashMap<String, String>,
}

impl IdIndex {
    pub fn get(&self, id: &str) -> Option<&str> {
        self.urls.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.urls.iter().map(|(id, url)| (id.as_str(), url.as_str()))
    }

    fn insert(&mut self, id: &str, url: String) {
        self.urls.insert(id.to_string(), url);
    }
}

/// Page basenames in emission order, with reverse lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationTable {
    pages: Vec<String>,
    positions: HashMap<String, usize>,
}

impl NavigationTable {
    pub fn push(&mut self, basename: &str) {
        self.positions.insert(basename.to_string(), self.pages.len());
        self.pages.push(basename.to_string());
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn position(&self, basename: &str) -> Option<usize> {
        self.positions.get(basename).copied()
    }

    pub fn prev(&self, basename: &str) -> Option<&str> {
        let position = self.position(basename)?;
        let prev = position.checked_sub(1)?;
        self.pages.get(prev).map(String::as_str)
    }

    pub fn next(&self, basename: &str) -> Option<&str> {
        let position = self.position(basename)?;
        self.pages.get(position + 1).map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for NavigationTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = Self::default();
        for basename in iter {
            table.push(basename.as_ref());
        }
        table
    }
}

/// Everything the page assembler needs to know about the whole book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkIndex {
    pub ids: IdIndex,
    pub navigation: NavigationTable,
}

impl ChunkIndex {
    /// Walk the source once and record every page and id.
    pub fn build<M: Markup>(doc: &M, markers: &Markers, policy: &DepthPolicy) -> Result<Self> {
        let mut index = Self::default();
        walk_pages(doc, markers, policy, |doc, slice| {
            index.record(doc, markers, &slice)
        })?;
        log::debug!(
            "indexed {} ids across {} pages",
            index.ids.len(),
            index.navigation.len()
        );
        Ok(index)
    }

    fn record<M: Markup>(&mut self, doc: &M, markers: &Markers, slice: &PageSlice) {
        self.navigation.push(&slice.basename);
        let file = page_file(&slice.basename);

        let excluded: HashSet<_> = slice.excluded_sections(doc, markers).into_iter().collect();
        let is_excluded = |node: NodeId| {
            let mut cursor = Some(node);
            while let Some(current) = cursor {
                if excluded.contains(&current) {
                    return true;
                }
                if slice.nodes.contains(&current) {
                    return false;
                }
                cursor = doc.parent(current);
            }
            false
        };

        for &node in &slice.nodes {
            for target in doc.select(node, &markers.ids) {
                if is_excluded(target) {
                    continue;
                }
                let Some(id) = doc.id(target) else {
                    continue;
                };
                if id.starts_with(FOOTNOTE_DEF_PREFIX) {
                    continue;
                }
                self.ids.insert(id, format!("{file}#{id}"));
            }
        }

        // The page top drops the fragment so the browser shows the page head
        let Some(&first) = slice.nodes.first() else {
            return;
        };
        let top_id = doc
            .id(first)
            .or_else(|| doc.children(first).first().and_then(|&child| doc.id(child)));
        if let Some(id) = top_id {
            self.ids.insert(id, file);
        }
    }
}
