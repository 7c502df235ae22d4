//! Stylesheet extraction and linking.

use std::path::Path;

use crate::chunk::Markers;
use crate::dom::Markup;

/// Navigation styling shipped with the binary.
pub const BUNDLED_STYLESHEET: &str = include_str!("asciidoctor-chunker.css");

/// A stylesheet pulled out of an inline `<style>` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedStyle {
    pub name: String,
    pub css: String,
}

fn stylesheet_link<M: Markup>(doc: &mut M, href: &str) -> crate::dom::NodeId {
    doc.create_element(
        "link",
        &[("rel", "stylesheet"), ("href", href), ("type", "text/css")],
    )
}

/// Replace every `<style>` block with a link to `style{i}.css`.
///
/// The stylesheets are returned in document order for the caller to write.
pub fn extract_styles<M: Markup>(doc: &mut M, markers: &Markers) -> Vec<ExtractedStyle> {
    let root = doc.root();
    let styles = doc.select(root, &markers.styles);

    let mut extracted = Vec::with_capacity(styles.len());
    for (i, style) in styles.into_iter().enumerate() {
        let name = format!("style{i}.css");
        let css = doc.text(style);
        let link = stylesheet_link(doc, &name);
        doc.insert_before(style, link);
        doc.detach(style);
        extracted.push(ExtractedStyle { name, css });
    }
    extracted
}

/// File name a configured stylesheet is linked and copied under.
pub fn stylesheet_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Append a `<link>` to `<head>` for each configured stylesheet.
///
/// Returns the number of links added.
pub fn insert_css_links<M, P>(doc: &mut M, markers: &Markers, css: &[P]) -> usize
where
    M: Markup,
    P: AsRef<Path>,
{
    let Some(head) = doc.select_first(doc.root(), &markers.head) else {
        return 0;
    };

    let mut added = 0;
    for path in css {
        let Some(name) = stylesheet_name(path.as_ref()) else {
            log::warn!("ignoring stylesheet without a file name: {}", path.as_ref().display());
            continue;
        };
        let link = stylesheet_link(doc, &name);
        doc.append_child(head, link);
        added += 1;
    }
    added
}
