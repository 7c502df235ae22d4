//! # adoc-chunker
//!
//! Splits the single-page HTML book Asciidoctor produces into a linked set
//! of smaller pages, one per part and chapter, or deeper where configured.
//!
//! ## Features
//!
//! - Per-chapter split depth (`1`, `1,3:2`, `1,4-6:3`, ...)
//! - Cross references rewritten to point at the page holding their target;
//!   broken ones are kept and marked with a `target-missing` class
//! - Footnotes scoped to the page that references them
//! - Previous/next navigation, arrow key bindings and a TOC that highlights
//!   the current page
//! - Inline stylesheets extracted, configured stylesheets and local images,
//!   scripts and styles copied next to the pages
//!
//! ## Quick Start
//!
//! ```no_run
//! use adoc_chunker::{Config, chunk_file};
//!
//! let config = Config {
//!     depth: "1,2:3".parse()?,
//!     ..Config::default()
//! };
//! let report = chunk_file("book.html", &config)?;
//! println!("wrote {} pages", report.pages.len());
//! # Ok::<(), adoc_chunker::Error>(())
//! ```
//!
//! ## In Memory
//!
//! [`make_chunks`] works on any parsed [`Document`] and hands pages to a
//! [`PageSink`]:
//!
//! ```
//! use adoc_chunker::{Config, Document, MemorySink, make_chunks};
//!
//! let doc = Document::parse(r#"<html><body><div id="content">
//!   <div class="sect1"><h2 id="_one">One</h2></div>
//!   <div class="sect1"><h2 id="_two">Two</h2></div>
//! </div></body></html>"#);
//!
//! let mut sink = MemorySink::new();
//! let report = make_chunks(&doc, &Config::default(), &mut sink)?;
//! assert_eq!(report.pages, ["index", "chap2"]);
//! # Ok::<(), adoc_chunker::Error>(())
//! ```

pub mod chunk;
pub mod config;
pub mod dom;
pub mod error;
pub mod output;
pub(crate) mod util;

use std::fs;
use std::path::Path;

pub use chunk::{ChunkReport, DepthPolicy, MemorySink, PageSink, make_chunks};
pub use config::Config;
pub use dom::{Document, Markup, Selector};
pub use error::{Error, Result};
pub use output::DirectoryWriter;

/// Chunk an Asciidoctor HTML file into `config.outdir`.
///
/// After the pages are written, the configured stylesheets are installed
/// and the local files the document links to are copied from the input's
/// directory.
pub fn chunk_file(input: impl AsRef<Path>, config: &Config) -> Result<ChunkReport> {
    let input = input.as_ref();
    let doc = Document::from_bytes(&fs::read(input)?);

    let mut writer = DirectoryWriter::create(&config.outdir)?;
    let report = make_chunks(&doc, config, &mut writer)?;

    writer.install_stylesheets(&config.css);
    let source_dir = input.parent().unwrap_or(Path::new("."));
    let copied = writer.copy_assets(&doc, &chunk::Markers::new()?, source_dir);
    if copied > 0 {
        log::info!("copied {copied} local files to {}", writer.dir().display());
    }

    Ok(report)
}
