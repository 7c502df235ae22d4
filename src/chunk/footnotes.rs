//! Per-page footnote scoping.
//!
//! Asciidoctor collects every footnote of the book into one `#footnotes`
//! block. Each page keeps only the definitions its own referers point at,
//! and the first referer of each footnote on the page carries the id the
//! definition's back-link targets.

use std::collections::{BTreeSet, HashSet};

use super::markers::{FOOTNOTE_REF_PREFIX, Markers};
use crate::dom::{Markup, NodeId};

/// Ids of every footnote definition in the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FootnoteDefs {
    ids: BTreeSet<String>,
}

impl FootnoteDefs {
    /// Scan the document's `#footnotes` block once.
    pub fn collect<M: Markup>(doc: &M, markers: &Markers) -> Self {
        let Some(container) = doc.select_first(doc.root(), &markers.footnotes) else {
            return Self::default();
        };
        let ids = doc
            .select(container, &markers.footnote_defs)
            .into_iter()
            .filter_map(|def| doc.id(def).map(str::to_string))
            .collect();
        Self { ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FootnoteDefs {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Back-link id for a referer pointing at `href`: `#_footnotedef_4`
/// becomes `_footnoteref_4`.
pub fn footnote_ref_id(href: &str) -> String {
    let suffix = href.rfind('_').map_or("", |i| &href[i + 1..]);
    format!("{FOOTNOTE_REF_PREFIX}{suffix}")
}

/// Drop the definitions no referer on this page points at.
///
/// With no referers at all the container is emptied.
pub fn keep_referred_footnotes<M: Markup>(
    doc: &mut M,
    container: NodeId,
    markers: &Markers,
    defs: &FootnoteDefs,
    referers: &[NodeId],
) {
    if referers.is_empty() {
        doc.empty(container);
        return;
    }

    let referred: HashSet<String> = referers
        .iter()
        .filter_map(|&a| doc.attr(a, "href"))
        .filter_map(|href| href.strip_prefix('#'))
        .map(str::to_string)
        .collect();

    for def in doc.select(container, &markers.footnote_defs) {
        let remove = doc
            .id(def)
            .is_some_and(|id| defs.contains(id) && !referred.contains(id));
        if remove {
            doc.detach(def);
        }
    }
}

/// Give the first referer of each footnote the back-link id.
///
/// A referer that already has an id claims its footnote, so later referers
/// to the same definition stay plain.
pub fn update_referer_ids<M: Markup>(doc: &mut M, referers: &[NodeId]) {
    let mut claimed = HashSet::new();

    for &referer in referers {
        let Some(href) = doc.attr(referer, "href").map(str::to_string) else {
            continue;
        };
        if doc.id(referer).is_some() {
            claimed.insert(href);
            continue;
        }
        if claimed.contains(&href) {
            continue;
        }
        doc.set_attr(referer, "id", &footnote_ref_id(&href));
        claimed.insert(href);
    }
}

/// Scope the footnotes of an assembled page to what its content refers to.
///
/// Returns the number of definitions left on the page.
pub fn scope_footnotes<M: Markup>(doc: &mut M, markers: &Markers, defs: &FootnoteDefs) -> usize {
    let root = doc.root();
    let Some(container) = doc.select_first(root, &markers.footnotes) else {
        return 0;
    };
    let referers = doc
        .select_first(root, &markers.content)
        .map(|content| doc.select(content, &markers.footnote_referers))
        .unwrap_or_default();

    keep_referred_footnotes(doc, container, markers, defs, &referers);
    update_referer_ids(doc, &referers);

    doc.select(container, &markers.footnote_defs).len()
}
