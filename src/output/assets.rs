//! Local files referenced by the document.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::chunk::Markers;
use crate::dom::Markup;

const REMOTE_PREFIXES: [&str; 5] = ["#", "https:", "http:", "file:", "data:"];

/// Whether a `href`/`src` value names a file next to the document.
pub fn is_local_reference(url: &str) -> bool {
    !url.is_empty()
        && !REMOTE_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
        && !url.starts_with('/')
        && !Path::new(url).is_absolute()
}

/// The file path a local reference points at, without its query string.
pub fn reference_path(url: &str) -> PathBuf {
    let path = url.split_once('?').map_or(url, |(path, _)| path);
    PathBuf::from(percent_decode_str(path).decode_utf8_lossy().into_owned())
}

/// Relative paths of every local stylesheet, script and image, in document
/// order without duplicates.
pub fn local_asset_paths<M: Markup>(doc: &M, markers: &Markers) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    doc.select(doc.root(), &markers.local_assets)
        .into_iter()
        .filter_map(|node| doc.attr(node, "href").or_else(|| doc.attr(node, "src")))
        .filter(|url| is_local_reference(url))
        .map(reference_path)
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

/// Copy `src` over `dest` unless `dest` is at least as new.
///
/// Creates missing parent directories. Returns whether a copy happened.
pub fn copy_if_newer(src: &Path, dest: &Path) -> io::Result<bool> {
    let src_modified = fs::metadata(src)?.modified()?;
    let dest_modified = fs::metadata(dest).and_then(|meta| meta.modified());
    if let Ok(dest_modified) = dest_modified
        && dest_modified >= src_modified
    {
        return Ok(false);
    }

    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dest)?;
    Ok(true)
}

fn stays_inside(path: &Path) -> bool {
    path.components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

/// Copy the document's local assets from `source_dir` into `outdir`,
/// keeping their relative paths.
///
/// Missing files are logged and skipped. Returns the number of files copied.
pub fn copy_local_assets<M: Markup>(
    doc: &M,
    markers: &Markers,
    source_dir: &Path,
    outdir: &Path,
) -> usize {
    let mut copied = 0;
    for path in local_asset_paths(doc, markers) {
        if !stays_inside(&path) {
            log::warn!("not copying asset outside the document directory: {}", path.display());
            continue;
        }
        let src = source_dir.join(&path);
        match copy_if_newer(&src, &outdir.join(&path)) {
            Ok(true) => copied += 1,
            Ok(false) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("local file linked from the document is missing: {}", src.display());
            }
            Err(e) => log::warn!("failed to copy {}: {e}", src.display()),
        }
    }
    copied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_local_references() {
        assert!(is_local_reference("images/cover.png"));
        assert!(is_local_reference("./style.css"));
        assert!(!is_local_reference("#_section"));
        assert!(!is_local_reference("https://cdn.example.com/font.css"));
        assert!(!is_local_reference("http://example.com/a.js"));
        assert!(!is_local_reference("file:///tmp/a.png"));
        assert!(!is_local_reference("data:image/png;base64,AAAA"));
        assert!(!is_local_reference("/usr/share/a.png"));
        assert!(!is_local_reference(""));
    }

    #[test]
    fn test_reference_path_strips_query_and_decodes() {
        assert_eq!(reference_path("css/site.css?v=3"), PathBuf::from("css/site.css"));
        assert_eq!(reference_path("images/my%20cover.png"), PathBuf::from("images/my cover.png"));
    }

    #[test]
    fn test_local_asset_paths() {
        let doc = Document::parse(
            r#"<html><head>
              <link rel="stylesheet" href="https://fonts.example.com/css">
              <link rel="stylesheet" href="css/site.css?v=1">
              <script src="js/app.js"></script>
            </head><body>
              <img src="images/a.png"><img src="images/a.png">
              <img src="data:image/gif;base64,R0lGOD">
              <a href="images/b.png">not an asset</a>
            </body></html>"#,
        );
        let paths = local_asset_paths(&doc, &Markers::new().unwrap());
        assert_eq!(
            paths,
            [
                PathBuf::from("css/site.css"),
                PathBuf::from("js/app.js"),
                PathBuf::from("images/a.png"),
            ]
        );
    }

    #[test]
    fn test_copy_if_newer() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.css");
        let dest = dir.path().join("out/nested/a.css");
        fs::write(&src, "body {}").unwrap();

        assert!(copy_if_newer(&src, &dest).unwrap());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "body {}");
        // the copy is not older than its source
        assert!(!copy_if_newer(&src, &dest).unwrap());

        let missing = dir.path().join("missing.css");
        let err = copy_if_newer(&missing, &dest).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_copy_local_assets_skips_missing_and_escaping_paths() {
        let src_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(src_dir.path().join("images")).unwrap();
        fs::write(src_dir.path().join("images/a.png"), b"png").unwrap();

        let doc = Document::parse(
            r#"<img src="images/a.png"><img src="images/gone.png"><img src="../secret.png">"#,
        );
        let copied = copy_local_assets(&doc, &Markers::new().unwrap(), src_dir.path(), out_dir.path());

        assert_eq!(copied, 1);
        assert!(out_dir.path().join("images/a.png").exists());
        assert!(!out_dir.path().join("images/gone.png").exists());
    }
}
