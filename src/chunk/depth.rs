//! How deep each chapter is split.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Maximum section level to split at, with per-chapter overrides.
///
/// Level 1 splits at chapters, 2 at sections, and so on. Overrides are keyed
/// by a flat number: the chapter number for a chapter node, and the 1-based
/// sibling index for deeper nodes. A key therefore also applies to every
/// nested section whose local index equals it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "DepthRepr")]
pub struct DepthPolicy {
    default: u32,
    overrides: BTreeMap<u32, u32>,
}

impl DepthPolicy {
    pub const DEFAULT_LEVEL: u32 = 1;

    /// Widest chapter range a single `from-to:level` term may cover.
    pub const MAX_RANGE: u32 = 10_000;

    /// A policy that splits every chapter down to `default`.
    pub fn new(default: u32) -> Result<Self> {
        check_level(default)?;
        Ok(Self {
            default,
            overrides: BTreeMap::new(),
        })
    }

    /// Set the level for one position.
    pub fn with_override(mut self, position: u32, level: u32) -> Result<Self> {
        check_level(level)?;
        self.overrides.insert(position, level);
        Ok(self)
    }

    pub fn default_level(&self) -> u32 {
        self.default
    }

    pub fn overrides(&self) -> &BTreeMap<u32, u32> {
        &self.overrides
    }

    /// The maximum level to split at for a walk position.
    pub fn resolve(&self, position: u32) -> u32 {
        self.overrides
            .get(&position)
            .copied()
            .unwrap_or(self.default)
    }
}

impl Default for DepthPolicy {
    fn default() -> Self {
        Self {
            default: Self::DEFAULT_LEVEL,
            overrides: BTreeMap::new(),
        }
    }
}

fn check_level(level: u32) -> Result<()> {
    if level == 0 {
        return Err(Error::InvalidDepth("level must be at least 1".into()));
    }
    Ok(())
}

fn parse_number(text: &str, what: &str) -> Result<u32> {
    text.trim()
        .parse()
        .map_err(|_| Error::InvalidDepth(format!("{what} {text:?} is not a number")))
}

/// Parses specifiers such as `2`, `3,1:2,8:5` or `1,3-8:2`.
///
/// A bare number sets the default, `chap:level` sets one chapter and
/// `from-to:level` an inclusive range. Later terms win.
impl FromStr for DepthPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut policy = Self::default();

        for term in s.split(',') {
            let term = term.trim();
            if term.is_empty() {
                return Err(Error::InvalidDepth(format!("empty term in {s:?}")));
            }

            let Some((chapters, level)) = term.split_once(':') else {
                let level = parse_number(term, "level")?;
                check_level(level)?;
                policy.default = level;
                continue;
            };

            let level = parse_number(level, "level")?;
            check_level(level)?;

            let (from, to) = match chapters.split_once('-') {
                Some((from, to)) => (parse_number(from, "chapter")?, parse_number(to, "chapter")?),
                None => {
                    let chapter = parse_number(chapters, "chapter")?;
                    (chapter, chapter)
                }
            };
            if from > to {
                return Err(Error::InvalidDepth(format!("reversed range {chapters:?}")));
            }
            if to - from >= Self::MAX_RANGE {
                return Err(Error::InvalidDepth(format!(
                    "range {chapters:?} spans more than {} chapters",
                    Self::MAX_RANGE
                )));
            }
            for chapter in from..=to {
                policy.overrides.insert(chapter, level);
            }
        }

        Ok(policy)
    }
}

impl fmt::Display for DepthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.default)?;
        for (chapter, level) in &self.overrides {
            write!(f, ",{chapter}:{level}")?;
        }
        Ok(())
    }
}

/// Accepted configuration shapes: `2`, `"1,2:4"` or `{"default": 1, "2": 4}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum DepthRepr {
    Level(u32),
    Spec(String),
    Table(BTreeMap<String, u32>),
}

impl TryFrom<DepthRepr> for DepthPolicy {
    type Error = Error;

    fn try_from(repr: DepthRepr) -> Result<Self> {
        match repr {
            DepthRepr::Level(level) => Self::new(level),
            DepthRepr::Spec(spec) => spec.parse(),
            DepthRepr::Table(table) => {
                let mut policy = Self::default();
                for (key, level) in table {
                    if key == "default" {
                        check_level(level)?;
                        policy.default = level;
                    } else {
                        let chapter = parse_number(&key, "chapter")?;
                        policy = policy.with_override(chapter, level)?;
                    }
                }
                Ok(policy)
            }
        }
    }
}
