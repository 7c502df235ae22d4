//! End-to-end chunking tests.
//!
//! Runs the whole pipeline on `tests/fixtures/sample.html`, an Asciidoctor
//! book with a preamble, two parts, nested sections, footnotes and a TOC.

use std::fs;
use std::path::{Path, PathBuf};

use adoc_chunker::{Config, Document, Error, Markup, MemorySink, Selector, chunk_file, make_chunks};
use tempfile::TempDir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample.html")
}

fn sample() -> Document {
    Document::from_bytes(&fs::read(fixture()).unwrap())
}

fn chunk_in_memory(depth: &str) -> MemorySink {
    let config = Config {
        depth: depth.parse().unwrap(),
        ..Config::default()
    };
    let mut sink = MemorySink::new();
    make_chunks(&sample(), &config, &mut sink).unwrap();
    sink
}

fn page(sink: &MemorySink, basename: &str) -> Document {
    Document::parse(sink.page_html(basename).unwrap())
}

fn sel(s: &str) -> Selector {
    Selector::parse(s).unwrap()
}

fn attrs(doc: &Document, selector: &str, name: &str) -> Vec<String> {
    doc.select(doc.root(), &sel(selector))
        .into_iter()
        .filter_map(|node| doc.attr(node, name).map(str::to_string))
        .collect()
}

// ============================================================================
// Page layout
// ============================================================================

#[test]
fn test_default_depth_one_page_per_chapter() {
    let sink = chunk_in_memory("1");
    assert_eq!(
        sink.basenames(),
        ["index", "part1", "chap1", "chap2", "part2", "chap3", "chap4"]
    );
}

#[test]
fn test_chapter_override_splits_subsections() {
    let sink = chunk_in_memory("1,2:3");
    assert_eq!(
        sink.basenames(),
        [
            "index",
            "part1",
            "chap1",
            "chap2",
            "chap2_sec1",
            "chap2_sec1-1",
            "chap2_sec1-2",
            "chap2_sec2",
            "part2",
            "chap3",
            "chap4",
        ]
    );

    let chap2 = page(&sink, "chap2");
    assert!(chap2.select(chap2.root(), &sel("#content .sect2")).is_empty());

    let options = page(&sink, "chap2_sec1-2");
    assert_eq!(
        attrs(&options, "#content a[href]:not(.footnote)", "href"),
        ["chap2_sec1-1.html"]
    );
}

#[test]
fn test_part_page_includes_intro() {
    let sink = chunk_in_memory("1");
    let part1 = page(&sink, "part1");
    let content = part1.select_first(part1.root(), &sel("#content")).unwrap();
    let blocks: Vec<_> = part1
        .children(content)
        .into_iter()
        .map(|node| part1.attr(node, "class").unwrap_or("").to_string())
        .collect();
    assert_eq!(blocks, ["sect0", "openblock partintro"]);
}

// ============================================================================
// Cross references
// ============================================================================

#[test]
fn test_cross_references_follow_their_targets() {
    let sink = chunk_in_memory("1");

    let index = page(&sink, "index");
    assert_eq!(
        attrs(&index, "#content a[href]", "href"),
        ["chap1.html#_installing"]
    );

    let chap1 = page(&sink, "chap1");
    assert_eq!(
        attrs(&chap1, "#content a[href]:not(.footnote)", "href"),
        ["chap3.html"]
    );

    let chap4 = page(&sink, "chap4");
    assert_eq!(attrs(&chap4, "#content a[href]", "href"), ["chap1.html"]);
}

#[test]
fn test_missing_target_is_flagged() {
    let sink = chunk_in_memory("1");
    let chap3 = page(&sink, "chap3");
    let missing = chap3
        .select_first(chap3.root(), &sel("a.target-missing"))
        .unwrap();
    assert_eq!(chap3.attr(missing, "href"), Some("#_missing_anchor"));
}

#[test]
fn test_toc_points_at_pages() {
    let sink = chunk_in_memory("1");
    let chap2 = page(&sink, "chap2");
    assert_eq!(
        attrs(&chap2, "#toc a", "href"),
        [
            "index.html",
            "part1.html",
            "chap1.html",
            "chap1.html#_installing",
            "chap1.html#_configuring",
            "chap2.html",
            "chap2.html#_basic_usage",
            "chap2.html#_commands",
            "chap2.html#_options",
            "chap2.html#_troubleshooting",
            "part2.html",
            "chap3.html",
            "chap4.html",
        ]
    );

    // the chapter entry and its nested entries all point into this page
    let current = attrs(&chap2, "#toc li.current > a", "href");
    assert_eq!(current.len(), 5);
    assert!(current.iter().all(|href| href.starts_with("chap2.html")));
}

// ============================================================================
// Footnotes
// ============================================================================

fn footnote_ids(doc: &Document) -> Vec<String> {
    attrs(doc, "#footnotes div.footnote", "id")
}

#[test]
fn test_footnotes_scoped_to_page() {
    let sink = chunk_in_memory("1");

    assert_eq!(
        footnote_ids(&page(&sink, "chap1")),
        ["_footnotedef_1", "_footnotedef_2"]
    );
    assert_eq!(
        footnote_ids(&page(&sink, "chap2")),
        ["_footnotedef_1", "_footnotedef_3"]
    );
    assert!(footnote_ids(&page(&sink, "chap3")).is_empty());
}

#[test]
fn test_reused_footnote_gets_back_link_on_later_page() {
    let sink = chunk_in_memory("1");
    let chap2 = page(&sink, "chap2");
    assert_eq!(
        attrs(&chap2, "a.footnote", "id"),
        ["_footnoteref_1", "_footnoteref_3"]
    );
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn test_navigation_links() {
    let sink = chunk_in_memory("1");

    let index = page(&sink, "index");
    assert_eq!(attrs(&index, "nav a", "href"), ["part1.html"]);

    let chap1 = page(&sink, "chap1");
    assert_eq!(attrs(&chap1, "nav a", "rel"), ["prev", "next"]);
    assert_eq!(attrs(&chap1, "nav a", "href"), ["part1.html", "chap2.html"]);

    let chap4 = page(&sink, "chap4");
    assert_eq!(attrs(&chap4, "nav a", "href"), ["chap3.html"]);

    let nav = chap4.select_first(chap4.root(), &sel("nav")).unwrap();
    assert_eq!(
        chap4.next_element_sibling(nav).and_then(|n| chap4.id(n)),
        Some("footer")
    );
}

#[test]
fn test_every_page_gets_script_and_title_entry() {
    let sink = chunk_in_memory("1");
    for (basename, html) in &sink.pages {
        let doc = Document::parse(html);
        assert!(
            doc.select_first(doc.root(), &sel("script")).is_some(),
            "{basename} has no script"
        );
        let first_toc = doc
            .select_first(doc.root(), &sel("#toc > ul > li:first-child > a"))
            .unwrap();
        assert_eq!(doc.text(first_toc), "Titlepage");
    }
}

// ============================================================================
// Files on disk
// ============================================================================

#[test]
fn test_chunk_file_writes_directory() {
    let tmp = TempDir::new().unwrap();
    let outdir = tmp.path().join("html_chunks");
    let config = Config {
        outdir: outdir.clone(),
        ..Config::default()
    };

    let report = chunk_file(fixture(), &config).unwrap();
    assert!(report.is_complete());
    assert_eq!(report.pages.len(), 7);
    assert_eq!(report.unresolved_links, 1);
    assert_eq!(report.stylesheets, ["style0.css"]);

    for name in [
        "index.html",
        "part1.html",
        "chap1.html",
        "chap2.html",
        "part2.html",
        "chap3.html",
        "chap4.html",
        "style0.css",
        "asciidoctor-chunker.css",
        "images/diagram.png",
    ] {
        assert!(outdir.join(name).is_file(), "missing {name}");
    }

    let index = fs::read_to_string(outdir.join("index.html")).unwrap();
    assert!(index.starts_with("<!DOCTYPE html>"));
    assert!(index.contains(r#"<link rel="stylesheet" href="style0.css" type="text/css">"#));
    assert!(index.contains(r#"<link rel="stylesheet" href="asciidoctor-chunker.css" type="text/css">"#));
    assert!(!index.contains("<style>"));

    let css = fs::read_to_string(outdir.join("style0.css")).unwrap();
    assert!(css.contains("#toc li { list-style: none; }"));
}

#[test]
fn test_chunk_file_rejects_document_without_content() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("plain.html");
    fs::write(&input, "<html><body><p>Not a book</p></body></html>").unwrap();
    let config = Config {
        outdir: tmp.path().join("out"),
        ..Config::default()
    };

    let err = chunk_file(&input, &config).unwrap_err();
    assert!(matches!(err, Error::MalformedInput(_)));
    assert!(!tmp.path().join("out/index.html").exists());
}

#[test]
fn test_chunk_file_missing_input() {
    let tmp = TempDir::new().unwrap();
    let config = Config {
        outdir: tmp.path().join("out"),
        ..Config::default()
    };
    let err = chunk_file(tmp.path().join("nope.html"), &config).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
