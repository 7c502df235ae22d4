//! Compiled CSS selector lists.

use std::fmt;

use selectors::context::{MatchingContext, SelectorCaches};
use selectors::matching::{MatchingForInvalidation, MatchingMode, NeedsSelectorFlags};
use selectors::parser::{ParseRelative, Selector as RawSelector, SelectorList};

use super::arena::{ArenaDom, ArenaNodeId};
use super::element_ref::{ChunkSelectors, ElementRef};
use crate::error::{Error, Result};

/// A parsed selector list such as `#content > .sect1, #content > .sect0`.
#[derive(Clone)]
pub struct Selector {
    source: String,
    selectors: Vec<RawSelector<ChunkSelectors>>,
}

impl Selector {
    /// Parse a comma separated selector list.
    pub fn parse(source: &str) -> Result<Self> {
        let mut input = cssparser::ParserInput::new(source);
        let mut parser = cssparser::Parser::new(&mut input);
        let list = SelectorList::parse(&ChunkSelectors, &mut parser, ParseRelative::No)
            .map_err(|e| Error::Selector(format!("{source:?}: {:?}", e.kind)))?;

        Ok(Self {
            source: source.to_string(),
            selectors: list.slice().to_vec(),
        })
    }

    /// The text this selector was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check whether an element matches any selector in the list.
    #[cfg(test)]
    pub fn matches(&self, dom: &ArenaDom, id: ArenaNodeId) -> bool {
        let mut caches = SelectorCaches::default();
        self.matches_with_caches(dom, id, &mut caches)
    }

    fn matches_with_caches(
        &self,
        dom: &ArenaDom,
        id: ArenaNodeId,
        caches: &mut SelectorCaches,
    ) -> bool {
        if !dom.is_element(id) {
            return false;
        }
        let elem = ElementRef::new(dom, id);
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            caches,
            selectors::context::QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );

        self.selectors.iter().any(|selector| {
            selectors::matching::matches_selector(selector, 0, None, &elem, &mut context)
        })
    }

    /// All descendants of `scope` matching the list, in document order.
    pub fn select(&self, dom: &ArenaDom, scope: ArenaNodeId) -> Vec<ArenaNodeId> {
        let mut caches = SelectorCaches::default();
        dom.descendants(scope)
            .filter(|&id| self.matches_with_caches(dom, id, &mut caches))
            .collect()
    }

    /// First descendant of `scope` matching the list.
    pub fn select_first(&self, dom: &ArenaDom, scope: ArenaNodeId) -> Option<ArenaNodeId> {
        let mut caches = SelectorCaches::default();
        dom.descendants(scope)
            .find(|&id| self.matches_with_caches(dom, id, &mut caches))
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Selector").field(&self.source).finish()
    }
}
