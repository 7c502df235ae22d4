//! Run configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::chunk::DepthPolicy;

/// Name of the stylesheet shipped inside the binary.
pub const BUNDLED_STYLESHEET_NAME: &str = "asciidoctor-chunker.css";

/// Options for one chunking run.
///
/// Deserializes from JSON with every field optional:
///
/// ```json
/// { "depth": { "default": 1, "2": 4 }, "outdir": "out", "strict-mode": false }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// How deep each chapter is split.
    pub depth: DepthPolicy,
    /// Directory the pages are written to.
    pub outdir: PathBuf,
    /// Stylesheets linked from every page and copied next to them.
    pub css: Vec<PathBuf>,
    /// Drop unconventional content found directly under `#content`.
    #[serde(alias = "strictMode")]
    pub strict_mode: bool,
    /// Text of the TOC entry pointing at the first page.
    #[serde(alias = "titlePage")]
    pub title_page: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            depth: DepthPolicy::default(),
            outdir: PathBuf::from("html_chunks"),
            css: vec![PathBuf::from(BUNDLED_STYLESHEET_NAME)],
            strict_mode: true,
            title_page: "Titlepage".to_string(),
        }
    }
}

#[cfg(feature = "cli")]
impl Config {
    /// Load a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| crate::Error::Config(format!("{}: {e}", path.display())))
    }
}
