//! Writing chunked pages and their files to disk.
//!
//! [`DirectoryWriter`] is the [`PageSink`] used by the command line tool.
//! It also installs the configured stylesheets and copies the local files
//! the document links to.

mod assets;
mod css;

use std::fs;
use std::path::{Path, PathBuf};

pub use assets::{
    copy_if_newer, copy_local_assets, is_local_reference, local_asset_paths, reference_path,
};
pub use css::{
    BUNDLED_STYLESHEET, ExtractedStyle, extract_styles, insert_css_links, stylesheet_name,
};

use crate::chunk::{Markers, PageSink};
use crate::config::BUNDLED_STYLESHEET_NAME;
use crate::dom::Markup;
use crate::error::Result;

/// Writes each page as `<basename>.html` into one directory.
#[derive(Debug, Clone)]
pub struct DirectoryWriter {
    dir: PathBuf,
}

impl DirectoryWriter {
    /// Use `dir` as the output directory, creating it if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Put the configured stylesheets next to the pages.
    ///
    /// The bundled stylesheet is written from memory; other files are copied
    /// when newer. Failures are logged. Returns the number of files written.
    pub fn install_stylesheets<P: AsRef<Path>>(&self, css: &[P]) -> usize {
        let mut written = 0;
        for path in css {
            let path = path.as_ref();
            let Some(name) = stylesheet_name(path) else {
                continue;
            };
            let dest = self.dir.join(&name);

            let result = if path == Path::new(BUNDLED_STYLESHEET_NAME) {
                fs::write(&dest, BUNDLED_STYLESHEET).map(|()| true)
            } else {
                copy_if_newer(path, &dest)
            };
            match result {
                Ok(true) => written += 1,
                Ok(false) => log::debug!("{} is up to date", dest.display()),
                Err(e) => log::error!("failed to install stylesheet {}: {e}", path.display()),
            }
        }
        written
    }

    /// Copy the local files `doc` links to from `source_dir`.
    pub fn copy_assets<M: Markup>(&self, doc: &M, markers: &Markers, source_dir: &Path) -> usize {
        copy_local_assets(doc, markers, source_dir, &self.dir)
    }
}

impl PageSink for DirectoryWriter {
    fn page(&mut self, basename: &str, html: &str) -> Result<()> {
        fs::write(self.dir.join(format!("{basename}.html")), html)?;
        Ok(())
    }

    fn stylesheet(&mut self, name: &str, css: &str) -> Result<()> {
        fs::write(self.dir.join(name), css)?;
        Ok(())
    }
}
