//! Cross-reference rewriting.

use super::index::IdIndex;
use super::markers::{FOOTNOTE_DEF_PREFIX, FOOTNOTE_REF_PREFIX, Markers, TARGET_MISSING_CLASS};
use crate::dom::{Markup, NodeId};

/// Outcome of one rewrite pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub resolved: usize,
    pub missing: usize,
}

/// Point every in-document `#id` anchor under `scope` at the page holding
/// the id.
///
/// Footnote anchors stay page-local. Anchors whose target is unknown keep
/// their `#id` and get the `target-missing` class.
pub fn rewrite_links<M: Markup>(
    doc: &mut M,
    scope: NodeId,
    markers: &Markers,
    index: &IdIndex,
) -> RewriteStats {
    let mut stats = RewriteStats::default();

    for anchor in doc.select(scope, &markers.local_links) {
        let Some(href) = doc.attr(anchor, "href") else {
            continue;
        };
        let Some(id) = href.strip_prefix('#') else {
            continue;
        };
        if id.starts_with(FOOTNOTE_DEF_PREFIX) || id.starts_with(FOOTNOTE_REF_PREFIX) {
            continue;
        }

        match index.get(id) {
            Some(url) => {
                doc.set_attr(anchor, "href", url);
                stats.resolved += 1;
            }
            None => {
                log::debug!("cross reference target missing: #{id}");
                doc.add_class(anchor, TARGET_MISSING_CLASS);
                stats.missing += 1;
            }
        }
    }

    stats
}
