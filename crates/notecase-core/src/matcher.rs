//! Two-stage keyword matching for a single note.
//!
//! Every keyword must be found (AND). The filename stage only looks at the
//! relative path; the content stage looks at the path and the body joined
//! by a separator token, so one keyword may hit the path while another hits
//! the body. Comparison is case-insensitive substring search.

use crate::query::KeywordSet;

/// Default token placed between path and body in the content stage.
/// Chosen to be implausible in real note text.
pub const DEFAULT_CONTENT_SEPARATOR: &str = "#@#§§@";

/// Which stage accepted a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    Filename,
    Content,
}

pub struct Matcher<'a> {
    keywords: &'a KeywordSet,
    separator: &'a str,
}

impl<'a> Matcher<'a> {
    pub fn new(keywords: &'a KeywordSet, separator: &'a str) -> Self {
        Self {
            keywords,
            separator,
        }
    }

    /// Filename stage: every keyword occurs in the relative path.
    pub fn matches_path(&self, relative_path: &str) -> bool {
        all_present(self.keywords, &relative_path.to_lowercase())
    }

    /// Content stage: every keyword occurs in `path + separator + content`.
    ///
    /// A keyword that itself contains the separator token is looked up in
    /// the path and in the body separately, so it can never match across
    /// the join.
    pub fn matches_content(&self, relative_path: &str, content: &str) -> bool {
        let mut haystack =
            String::with_capacity(relative_path.len() + self.separator.len() + content.len());
        haystack.push_str(relative_path);
        haystack.push_str(self.separator);
        haystack.push_str(content);
        let haystack = haystack.to_lowercase();
        let separator = self.separator.to_lowercase();

        self.keywords.keywords().iter().all(|keyword| {
            if !separator.is_empty() && keyword.contains(separator.as_str()) {
                relative_path.to_lowercase().contains(keyword.as_str())
                    || content.to_lowercase().contains(keyword.as_str())
            } else {
                haystack.contains(keyword.as_str())
            }
        })
    }
}

// Keywords are already lower-cased by the normalizer.
fn all_present(keywords: &KeywordSet, haystack: &str) -> bool {
    keywords
        .keywords()
        .iter()
        .all(|keyword| haystack.contains(keyword.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::normalize;

    #[test]
    fn test_path_match_is_case_insensitive() {
        let keywords = normalize("INVOICES").unwrap();
        let matcher = Matcher::new(&keywords, DEFAULT_CONTENT_SEPARATOR);
        assert!(matcher.matches_path("Invoices/2020.md"));
    }

    #[test]
    fn test_path_match_requires_all_keywords() {
        let keywords = normalize("invoices,2021").unwrap();
        let matcher = Matcher::new(&keywords, DEFAULT_CONTENT_SEPARATOR);
        assert!(!matcher.matches_path("invoices/2020.md"));
        assert!(matcher.matches_path("invoices/2021.md"));
    }

    #[test]
    fn test_content_match_spans_path_and_body() {
        let keywords = normalize("x,y").unwrap();
        let matcher = Matcher::new(&keywords, DEFAULT_CONTENT_SEPARATOR);
        assert!(matcher.matches_content("notes/x.md", "contains Y here"));
        assert!(!matcher.matches_content("notes/x.md", "nothing relevant"));
        assert!(!matcher.matches_content("notes/a.md", "only y"));
    }

    #[test]
    fn test_keyword_cannot_straddle_the_separator() {
        let keywords = normalize("mdbody").unwrap();
        let matcher = Matcher::new(&keywords, DEFAULT_CONTENT_SEPARATOR);
        assert!(!matcher.matches_content("a.md", "body"));
    }

    #[test]
    fn test_custom_separator_is_used() {
        let keywords = normalize("md~").unwrap();
        assert!(Matcher::new(&keywords, "~~").matches_content("a.md", "b"));
        assert!(!Matcher::new(&keywords, DEFAULT_CONTENT_SEPARATOR).matches_content("a.md", "b"));
    }

    #[test]
    fn test_keyword_containing_separator_matches_one_side() {
        let keywords = normalize("a~~b").unwrap();
        let matcher = Matcher::new(&keywords, "~~");
        assert!(matcher.matches_content("x.md", "text a~~b text"));
        assert!(!matcher.matches_content("a.md", "b"));
    }
}
