//! Page basenames.

use super::markers::INDEX_BASENAME;

pub const PREAMBLE_BASENAME: &str = "preamble";

/// Position of a chapter or section page: the chapter number plus the
/// 1-based sibling index at each level below the chapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionPath {
    pub chapter: u32,
    pub local: Vec<u32>,
}

impl SectionPath {
    pub fn chapter(chapter: u32) -> Self {
        Self {
            chapter,
            local: Vec::new(),
        }
    }

    /// Path of the `index`-th (1-based) child section.
    pub fn child(&self, index: u32) -> Self {
        let mut local = self.local.clone();
        local.push(index);
        Self {
            chapter: self.chapter,
            local,
        }
    }

    /// Section level of the node at this path; chapters are level 1.
    pub fn level(&self) -> u32 {
        self.local.len() as u32 + 1
    }

    /// Walk position used for depth lookups: the chapter number for a
    /// chapter, the local sibling index below it.
    pub fn position(&self) -> u32 {
        self.local.last().copied().unwrap_or(self.chapter)
    }

    /// `chap3`, `chap3_sec2`, `chap3_sec2-1-4`.
    pub fn basename(&self) -> String {
        let mut name = format!("chap{}", self.chapter);
        for (depth, index) in self.local.iter().enumerate() {
            let separator = if depth == 0 { "_sec" } else { "-" };
            name.push_str(separator);
            name.push_str(&index.to_string());
        }
        name
    }
}

pub fn part_basename(part: u32) -> String {
    format!("part{part}")
}

/// The basename a page actually gets once first-page status is known.
pub fn page_basename(natural: String, is_first_page: bool) -> String {
    if is_first_page {
        INDEX_BASENAME.to_string()
    } else {
        natural
    }
}

/// File name of a page.
pub fn page_file(basename: &str) -> String {
    format!("{basename}.html")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_chapter_and_section_names() {
        let chap = SectionPath::chapter(2);
        assert_eq!(chap.basename(), "chap2");
        assert_eq!(chap.level(), 1);
        assert_eq!(chap.position(), 2);

        let sec = chap.child(2);
        assert_eq!(sec.basename(), "chap2_sec2");
        assert_eq!(sec.level(), 2);

        let subsec = sec.child(3);
        assert_eq!(subsec.basename(), "chap2_sec2-3");
        assert_eq!(subsec.position(), 3);
        assert_eq!(subsec.child(1).basename(), "chap2_sec2-3-1");
    }

    #[test]
    fn test_first_page_is_index() {
        assert_eq!(page_basename(part_basename(1), true), "index");
        assert_eq!(page_basename(part_basename(1), false), "part1");
        assert_eq!(page_file("chap1_sec2"), "chap1_sec2.html");
    }

    fn section_path() -> impl Strategy<Value = SectionPath> {
        (1u32..20, proptest::collection::vec(1u32..20, 0..5))
            .prop_map(|(chapter, local)| SectionPath { chapter, local })
    }

    proptest! {
        #[test]
        fn prop_distinct_paths_have_distinct_names(a in section_path(), b in section_path()) {
            prop_assume!(a != b);
            prop_assert_ne!(a.basename(), b.basename());
        }
    }
}
