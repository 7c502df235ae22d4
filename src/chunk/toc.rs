//! Table of contents preparation.

use super::markers::{INDEX_BASENAME, Markers};
use super::naming::page_file;
use crate::dom::Markup;

/// Whether the TOC links into the document at all.
///
/// Without in-document links there is nothing to point at the new pages,
/// which usually means the source was generated without a TOC.
pub fn check_toc_links<M: Markup>(doc: &M, markers: &Markers) -> bool {
    let found = doc
        .select_first(doc.root(), &markers.toc_internal_links)
        .is_some();
    if !found {
        log::info!("TOC has no in-document links; pages will not be reachable from it");
    }
    found
}

/// Prepend an entry for the first page to the top-level TOC list.
///
/// Returns false when the TOC has no list to extend.
pub fn add_title_page_entry<M: Markup>(doc: &mut M, markers: &Markers, title: &str) -> bool {
    let Some(first) = doc.select_first(doc.root(), &markers.toc_first_item) else {
        return false;
    };

    let href = page_file(INDEX_BASENAME);
    let item = doc.create_element("li", &[]);
    let anchor = doc.create_element("a", &[("href", &href)]);
    doc.append_text(anchor, title);
    doc.append_child(item, anchor);
    doc.insert_before(first, item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Selector};

    #[test]
    fn test_check_toc_links() {
        let markers = Markers::new().unwrap();
        let with = Document::parse(r##"<div id="toc"><ul><li><a href="#_a">A</a></li></ul></div>"##);
        let without = Document::parse(r#"<div id="toc"><ul><li><a href="a.html">A</a></li></ul></div>"#);
        assert!(check_toc_links(&with, &markers));
        assert!(!check_toc_links(&without, &markers));
    }

    #[test]
    fn test_title_page_entry_goes_first() {
        let mut doc = Document::parse(
            r#"<div id="toc"><ul class="sectlevel1"><li><a href="chap1.html">One</a></li></ul></div>"#,
        );
        let markers = Markers::new().unwrap();
        assert!(add_title_page_entry(&mut doc, &markers, "Cover & Title"));

        let list = doc
            .select_first(doc.root(), &Selector::parse("ul").unwrap())
            .unwrap();
        assert_eq!(
            doc.outer_html(list),
            concat!(
                r#"<ul class="sectlevel1"><li><a href="index.html">Cover &amp; Title</a></li>"#,
                r#"<li><a href="chap1.html">One</a></li></ul>"#,
            )
        );
    }

    #[test]
    fn test_no_toc_list() {
        let mut doc = Document::parse("<p>no toc</p>");
        assert!(!add_title_page_entry(&mut doc, &Markers::new().unwrap(), "Title"));
    }
}
