//! Structural conventions of Asciidoctor's single-page HTML output.

use crate::dom::Selector;
use crate::error::Result;

pub const CONTENT_ID: &str = "content";
pub const PREAMBLE_ID: &str = "preamble";
pub const FOOTER_ID: &str = "footer";

/// Class of a part heading (`h1.sect0`).
pub const PART_CLASS: &str = "sect0";
pub const PART_INTRO_CLASS: &str = "partintro";
/// Class of a chapter container (`div.sect1`).
pub const CHAPTER_CLASS: &str = "sect1";

pub const FOOTNOTE_DEF_PREFIX: &str = "_footnotedef_";
pub const FOOTNOTE_REF_PREFIX: &str = "_footnoteref_";

pub const TARGET_MISSING_CLASS: &str = "target-missing";
pub const CURRENT_CLASS: &str = "current";

/// Asciidoctor emits `sect1` through `sect6`.
pub const MAX_SECTION_LEVEL: u32 = 6;

/// Basename of the first page.
pub const INDEX_BASENAME: &str = "index";

/// Every selector the pipeline runs, compiled once per run.
#[derive(Debug, Clone)]
pub struct Markers {
    pub content: Selector,
    pub footnotes: Selector,
    pub footnote_defs: Selector,
    pub footnote_referers: Selector,
    pub local_links: Selector,
    pub ids: Selector,
    pub skeleton_blocks: Selector,
    pub toc_internal_links: Selector,
    pub toc_first_item: Selector,
    pub toc_links: Selector,
    pub body: Selector,
    pub body_divs: Selector,
    pub html: Selector,
    pub head: Selector,
    pub styles: Selector,
    pub local_assets: Selector,
    /// `div.sect1` .. `div.sect6`, indexed by level - 1.
    sections: Vec<Selector>,
}

impl Markers {
    pub fn new() -> Result<Self> {
        let sections = (1..=MAX_SECTION_LEVEL)
            .map(|level| Selector::parse(&format!("div.sect{level}")))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            content: Selector::parse("#content")?,
            footnotes: Selector::parse("#footnotes")?,
            footnote_defs: Selector::parse("div.footnote")?,
            footnote_referers: Selector::parse("a.footnote")?,
            local_links: Selector::parse(r##"a[href^="#"]"##)?,
            ids: Selector::parse("[id]")?,
            skeleton_blocks: Selector::parse(
                "#content > #preamble, #content > .partintro, \
                 #content > .sect1, #content > .sect0",
            )?,
            toc_internal_links: Selector::parse(r##"#toc a[href^="#"]"##)?,
            toc_first_item: Selector::parse("div#toc > ul > li:first-child")?,
            toc_links: Selector::parse("#toc a[href]")?,
            body: Selector::parse("body")?,
            body_divs: Selector::parse("body > div")?,
            html: Selector::parse("html")?,
            head: Selector::parse("head")?,
            styles: Selector::parse("style")?,
            local_assets: Selector::parse("link[href], script[src], img[src]")?,
            sections,
        })
    }

    /// Selector for section containers at `level`, if Asciidoctor has one.
    pub fn section(&self, level: u32) -> Option<&Selector> {
        let index = usize::try_from(level.checked_sub(1)?).ok()?;
        self.sections.get(index)
    }
}
