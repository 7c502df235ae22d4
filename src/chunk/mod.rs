//! The chunking pipeline.
//!
//! Chunking runs in two passes over the source document:
//!
//! 1. **Index**: walk every page the depth policy produces and record which
//!    page each id lands on, plus the page order ([`ChunkIndex`]).
//! 2. **Assemble**: walk the same pages again, copy each slice into a clone
//!    of the page skeleton, rewrite its cross references, scope its
//!    footnotes, add navigation and hand the serialized page to a
//!    [`PageSink`].
//!
//! The second pass only reads the index, so a page that fails to assemble
//! or write is logged and skipped without affecting the others.

mod depth;
mod footnotes;
mod index;
mod links;
mod markers;
mod naming;
mod nav;
mod page;
mod partition;
mod toc;
mod walker;

pub use depth::DepthPolicy;
pub use footnotes::{
    FootnoteDefs, footnote_ref_id, keep_referred_footnotes, scope_footnotes, update_referer_ids,
};
pub use index::{ChunkIndex, IdIndex, NavigationTable};
pub use links::{RewriteStats, rewrite_links};
pub use markers::{
    CHAPTER_CLASS, CONTENT_ID, CURRENT_CLASS, FOOTER_ID, FOOTNOTE_DEF_PREFIX, FOOTNOTE_REF_PREFIX,
    INDEX_BASENAME, MAX_SECTION_LEVEL, Markers, PART_CLASS, PART_INTRO_CLASS, PREAMBLE_ID,
    TARGET_MISSING_CLASS,
};
pub use naming::{PREAMBLE_BASENAME, SectionPath, page_basename, page_file, part_basename};
pub use nav::{add_page_navigation, create_nav, set_current_toc};
pub use page::{AssembledPage, PAGE_SCRIPT, PageAssembler, Skeleton, insert_script};
pub use partition::{Extent, PageKind, PageSlice, partition};
pub use toc::{add_title_page_entry, check_toc_links};
pub use walker::{ContentProcessor, WalkState, walk, walk_pages};

use crate::config::Config;
use crate::dom::Markup;
use crate::error::Result;
use crate::output::{extract_styles, insert_css_links};

/// Receives the finished pages of a run.
pub trait PageSink {
    /// Store one page. `basename` has no extension.
    fn page(&mut self, basename: &str, html: &str) -> Result<()>;

    /// Store a stylesheet extracted from the source.
    fn stylesheet(&mut self, name: &str, css: &str) -> Result<()> {
        let _ = (name, css);
        Ok(())
    }
}

/// Keeps pages in memory, in emission order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub pages: Vec<(String, String)>,
    pub stylesheets: Vec<(String, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The markup of the page named `basename`.
    pub fn page_html(&self, basename: &str) -> Option<&str> {
        self.pages
            .iter()
            .find(|(name, _)| name == basename)
            .map(|(_, html)| html.as_str())
    }

    pub fn basenames(&self) -> Vec<&str> {
        self.pages.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl PageSink for MemorySink {
    fn page(&mut self, basename: &str, html: &str) -> Result<()> {
        self.pages.push((basename.to_string(), html.to_string()));
        Ok(())
    }

    fn stylesheet(&mut self, name: &str, css: &str) -> Result<()> {
        self.stylesheets.push((name.to_string(), css.to_string()));
        Ok(())
    }
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkReport {
    /// Basenames of the pages handed to the sink, in order.
    pub pages: Vec<String>,
    /// Basenames of pages that failed to assemble or write.
    pub failed_pages: Vec<String>,
    /// Cross references left pointing at a missing id.
    pub unresolved_links: usize,
    /// Names of the stylesheets extracted from inline `<style>` blocks.
    pub stylesheets: Vec<String>,
}

impl ChunkReport {
    /// Whether every page made it to the sink.
    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty()
    }
}

/// Split `source` into pages and hand them to `sink`.
///
/// Fails with [`Error::MalformedInput`](crate::Error::MalformedInput) before
/// any page is emitted when the source has no `#content` container.
pub fn make_chunks<M, S>(source: &M, config: &Config, sink: &mut S) -> Result<ChunkReport>
where
    M: Markup,
    S: PageSink,
{
    let markers = Markers::new()?;
    let index = ChunkIndex::build(source, &markers, &config.depth)?;
    let mut report = ChunkReport::default();

    let mut skeleton = Skeleton::new(source, &markers, config.strict_mode)?;
    let doc = skeleton.doc_mut();
    check_toc_links(doc, &markers);
    let root = doc.root();
    report.unresolved_links += rewrite_links(doc, root, &markers, &index.ids).missing;
    for style in extract_styles(doc, &markers) {
        if let Err(e) = sink.stylesheet(&style.name, &style.css) {
            log::error!("failed to write {}: {e}", style.name);
        }
        report.stylesheets.push(style.name);
    }
    insert_css_links(doc, &markers, &config.css);
    add_title_page_entry(doc, &markers, &config.title_page);
    skeleton.compact();

    let footnotes = FootnoteDefs::collect(source, &markers);
    let assembler = PageAssembler {
        skeleton: &skeleton,
        markers: &markers,
        index: &index,
        footnotes: &footnotes,
    };

    walk_pages(source, &markers, &config.depth, |doc, slice| {
        let page = match assembler.assemble(doc, &slice) {
            Ok(page) => page,
            Err(e) => {
                log::error!("failed to assemble {}: {e}", slice.basename);
                report.failed_pages.push(slice.basename);
                return;
            }
        };
        report.unresolved_links += page.links.missing;

        match sink.page(&slice.basename, &page.doc.serialize()) {
            Ok(()) => {
                log::debug!(
                    "wrote {} ({} footnotes)",
                    page_file(&slice.basename),
                    page.footnotes
                );
                report.pages.push(slice.basename);
            }
            Err(e) => {
                log::error!("failed to write {}: {e}", page_file(&slice.basename));
                report.failed_pages.push(slice.basename);
            }
        }
    })?;

    log::info!(
        "chunked into {} pages ({} failed, {} unresolved cross references)",
        report.pages.len(),
        report.failed_pages.len(),
        report.unresolved_links
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::dom::Document;

    const BOOK: &str = r##"<!DOCTYPE html><html><head><style>nav { color: red }</style></head><body>
        <div id="header"><div id="toc"><ul>
          <li><a href="#_c1">C1</a></li><li><a href="#_c2">C2</a></li>
        </ul></div></div>
        <div id="content">
        <div class="sect1"><h2 id="_c1">C1</h2><p>one</p></div>
        <div class="sect1"><h2 id="_c2">C2</h2><p>two</p></div>
        </div>
        <div id="footer"></div>
        </body></html>"##;

    struct FailingSink {
        fail_on: &'static str,
        written: Vec<String>,
    }

    impl PageSink for FailingSink {
        fn page(&mut self, basename: &str, _html: &str) -> Result<()> {
            if basename == self.fail_on {
                return Err(Error::Io(std::io::Error::other("disk full")));
            }
            self.written.push(basename.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_make_chunks_in_memory() {
        let source = Document::parse(BOOK);
        let mut sink = MemorySink::new();
        let report = make_chunks(&source, &Config::default(), &mut sink).unwrap();

        // the first chapter is the first page
        assert_eq!(report.pages, ["index", "chap2"]);
        assert!(report.is_complete());
        assert_eq!(report.stylesheets, ["style0.css"]);
        assert_eq!(sink.basenames(), ["index", "chap2"]);
        assert_eq!(sink.stylesheets, [("style0.css".to_string(), "nav { color: red }".to_string())]);

        let index = sink.page_html("index").unwrap();
        assert!(index.contains(r#"<li class="current"><a href="index.html">Titlepage</a></li>"#));
        assert!(index.contains(r#"href="asciidoctor-chunker.css""#));
        assert!(index.contains(r#"<a rel="next" href="chap2.html""#));
        assert!(!index.contains("<p>two</p>"));

        let chap2 = sink.page_html("chap2").unwrap();
        assert!(chap2.contains(r#"<li><a href="index.html">Titlepage</a></li>"#));
        assert!(chap2.contains(r#"<li class="current"><a href="chap2.html">C2</a></li>"#));
        assert!(!chap2.contains("<style>"));
    }

    #[test]
    fn test_failed_write_does_not_stop_run() {
        let source = Document::parse(BOOK);
        let mut sink = FailingSink {
            fail_on: "index",
            written: Vec::new(),
        };
        let report = make_chunks(&source, &Config::default(), &mut sink).unwrap();

        assert_eq!(report.failed_pages, ["index"]);
        assert_eq!(report.pages, ["chap2"]);
        assert_eq!(sink.written, ["chap2"]);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_malformed_input_emits_nothing() {
        let source = Document::parse("<html><body><p>not a book</p></body></html>");
        let mut sink = MemorySink::new();
        let err = make_chunks(&source, &Config::default(), &mut sink).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert!(sink.pages.is_empty());
    }
}
