//! Previous/next page navigation.

use super::index::NavigationTable;
use super::markers::{CURRENT_CLASS, FOOTER_ID, Markers};
use super::naming::page_file;
use crate::dom::{Markup, NodeId};

struct NavLink {
    rel: &'static str,
    class: &'static str,
    label: &'static str,
    key: &'static str,
    icon: &'static str,
}

const PREV: NavLink = NavLink {
    rel: "prev",
    class: "nav nav-prev",
    label: "Previous page",
    key: "Left",
    icon: "fa fa-angle-left",
};

const NEXT: NavLink = NavLink {
    rel: "next",
    class: "nav nav-next",
    label: "Next page",
    key: "Right",
    icon: "fa fa-angle-right",
};

fn nav_anchor<M: Markup>(doc: &mut M, link: &NavLink, target: &str) -> NodeId {
    let href = page_file(target);
    let anchor = doc.create_element(
        "a",
        &[
            ("rel", link.rel),
            ("href", &href),
            ("class", link.class),
            ("title", link.label),
            ("aria-label", link.label),
            ("aria-keyshortcuts", link.key),
        ],
    );
    let icon = doc.create_element("i", &[("class", link.icon)]);
    doc.append_child(anchor, icon);
    anchor
}

/// Build a detached `<nav>` block with links to the neighbouring pages.
pub fn create_nav<M: Markup>(doc: &mut M, prev: Option<&str>, next: Option<&str>) -> NodeId {
    let nav = doc.create_element("nav", &[]);
    if let Some(prev) = prev {
        let anchor = nav_anchor(doc, &PREV, prev);
        doc.append_child(nav, anchor);
    }
    if let Some(next) = next {
        let anchor = nav_anchor(doc, &NEXT, next);
        doc.append_child(nav, anchor);
    }
    let clear = doc.create_element("div", &[("style", "clear: both")]);
    doc.append_child(nav, clear);
    nav
}

/// Insert page navigation before the footer, or after the last top-level
/// `div` of the body when there is no footer.
///
/// Returns false when the page is not in the navigation table.
pub fn add_page_navigation<M: Markup>(
    doc: &mut M,
    markers: &Markers,
    basename: &str,
    navigation: &NavigationTable,
) -> bool {
    if navigation.position(basename).is_none() {
        log::warn!("page {basename} is missing from the navigation table");
        return false;
    }
    let prev = navigation.prev(basename).map(str::to_string);
    let next = navigation.next(basename).map(str::to_string);

    let root = doc.root();
    let last_div = doc.select(root, &markers.body_divs).last().copied();
    let nav = create_nav(doc, prev.as_deref(), next.as_deref());

    match last_div {
        Some(div) if doc.id(div) == Some(FOOTER_ID) => doc.insert_before(div, nav),
        Some(div) => doc.insert_after(div, nav),
        None => match doc.select_first(root, &markers.body) {
            Some(body) => doc.append_child(body, nav),
            None => {
                log::warn!("page {basename} has no body to hold navigation");
                return false;
            }
        },
    }
    true
}

/// Mark the TOC entries that link to this page as current.
///
/// Returns the number of entries marked.
pub fn set_current_toc<M: Markup>(doc: &mut M, markers: &Markers, basename: &str) -> usize {
    let file = page_file(basename);
    let root = doc.root();
    let items: Vec<NodeId> = doc
        .select(root, &markers.toc_links)
        .into_iter()
        .filter(|&a| doc.attr(a, "href").is_some_and(|href| href.starts_with(&file)))
        .filter_map(|a| doc.parent(a))
        .collect();

    for &item in &items {
        doc.add_class(item, CURRENT_CLASS);
    }
    items.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Selector};

    fn nav_table() -> NavigationTable {
        ["index", "part1", "chap1", "chap2", "part2", "chap3"]
            .into_iter()
            .collect()
    }

    fn body_html(doc: &Document) -> String {
        let body = doc
            .select_first(doc.root(), &Selector::parse("body").unwrap())
            .unwrap();
        doc.outer_html(body)
    }

    #[test]
    fn test_nav_before_footer() {
        let mut doc = Document::parse(
            r#"<body><div id="header"></div><div id="content"></div><div id="footer"></div></body>"#,
        );
        let markers = Markers::new().unwrap();
        assert!(add_page_navigation(&mut doc, &markers, "chap1", &nav_table()));

        assert_eq!(
            body_html(&doc),
            concat!(
                r#"<body><div id="header"></div><div id="content"></div><nav>"#,
                r#"<a rel="prev" href="part1.html" class="nav nav-prev" title="Previous page" "#,
                r#"aria-label="Previous page" aria-keyshortcuts="Left"><i class="fa fa-angle-left"></i></a>"#,
                r#"<a rel="next" href="chap2.html" class="nav nav-next" title="Next page" "#,
                r#"aria-label="Next page" aria-keyshortcuts="Right"><i class="fa fa-angle-right"></i></a>"#,
                r#"<div style="clear: both"></div></nav><div id="footer"></div></body>"#,
            )
        );
    }

    #[test]
    fn test_nav_after_last_div_without_footer() {
        let mut doc = Document::parse(r#"<body><div id="content"></div><p>tail</p></body>"#);
        let markers = Markers::new().unwrap();
        assert!(add_page_navigation(&mut doc, &markers, "index", &nav_table()));

        let html = body_html(&doc);
        assert!(html.starts_with(r#"<body><div id="content"></div><nav><a rel="next" href="part1.html""#));
        assert!(!html.contains("nav-prev"));
        assert!(html.ends_with("</nav><p>tail</p></body>"));
    }

    #[test]
    fn test_last_page_has_only_prev() {
        let mut doc = Document::parse(r#"<body><div id="footer"></div></body>"#);
        let markers = Markers::new().unwrap();
        add_page_navigation(&mut doc, &markers, "chap3", &nav_table());
        let html = body_html(&doc);
        assert!(html.contains(r#"href="part2.html""#));
        assert!(!html.contains("nav-next"));
    }

    #[test]
    fn test_unknown_page_is_left_alone() {
        let mut doc = Document::parse(r#"<body><div id="footer"></div></body>"#);
        let markers = Markers::new().unwrap();
        assert!(!add_page_navigation(&mut doc, &markers, "chap9", &nav_table()));
        assert!(!body_html(&doc).contains("<nav>"));
    }

    #[test]
    fn test_set_current_toc() {
        let mut doc = Document::parse(
            r#"<div id="toc"><ul>
              <li><a href="chap1.html">One</a>
                <ul><li><a href="chap1.html#_detail">Detail</a></li></ul></li>
              <li><a href="chap10.html">Ten</a></li>
              <li class="x"><a href="chap2.html">Two</a></li>
            </ul></div>"#,
        );
        let markers = Markers::new().unwrap();

        assert_eq!(set_current_toc(&mut doc, &markers, "chap2"), 1);
        let current = doc.select(doc.root(), &Selector::parse("li.current").unwrap());
        assert_eq!(current.len(), 1);
        assert_eq!(doc.attr(current[0], "class"), Some("x current"));

        // a prefix match on the file name, so chap10 is not chap1
        assert_eq!(set_current_toc(&mut doc, &markers, "chap1"), 2);
    }
}
