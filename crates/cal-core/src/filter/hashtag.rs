//! Hashtag extraction and search-term parsing.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

/// A set of normalized hashtags that must all be present (AND).
pub type HashtagGroup = BTreeSet<String>;

fn hashtag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `\w` is Unicode-aware in the regex crate, matching letters, digits and `_`.
    RE.get_or_init(|| Regex::new(r"#\w+").expect("hashtag pattern is valid"))
}

/// Extracts hashtags from free text.
///
/// Returns every maximal `#` + word-character run in order of appearance.
/// Duplicates are kept and case is preserved. `None` and empty input yield
/// an empty list.
///
/// # Example
///
/// ```
/// use cal_core_rs::filter::extract_hashtags;
///
/// let tags = extract_hashtags(Some("Meeting about #project and #Client"));
/// assert_eq!(tags, vec!["#project", "#Client"]);
/// assert!(extract_hashtags(None).is_empty());
/// ```
pub fn extract_hashtags(text: Option<&str>) -> Vec<String> {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return Vec::new();
    };

    hashtag_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Normalizes a raw search tag: trims it, adds a leading `#` when missing and
/// lowercases the result.
///
/// An empty or whitespace-only tag normalizes to `#`.
pub fn normalize_hashtag(tag: &str) -> String {
    let trimmed = tag.trim();
    if trimmed.starts_with('#') {
        trimmed.to_lowercase()
    } else {
        format!("#{trimmed}").to_lowercase()
    }
}

/// Parses search terms into AND-groups.
///
/// Each term yields exactly one group, in input order. Commas inside a term
/// separate tags that must all match; separate terms are alternatives.
///
/// ```text
/// ["#zzp, #work", "#meeting"]  =>  (#zzp AND #work) OR #meeting
/// ```
pub fn parse_hashtag_groups<S: AsRef<str>>(terms: &[S]) -> Vec<HashtagGroup> {
    terms
        .iter()
        .map(|term| {
            let term = term.as_ref();
            if term.contains(',') {
                term.split(',').map(normalize_hashtag).collect()
            } else {
                BTreeSet::from([normalize_hashtag(term)])
            }
        })
        .collect()
}

/// A parsed OR-of-ANDs hashtag query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashtagQuery {
    groups: Vec<HashtagGroup>,
}

impl HashtagQuery {
    /// Parses raw search terms into a query.
    pub fn parse<S: AsRef<str>>(terms: &[S]) -> Self {
        Self {
            groups: parse_hashtag_groups(terms),
        }
    }

    /// Returns the AND-groups of this query.
    pub fn groups(&self) -> &[HashtagGroup] {
        &self.groups
    }

    /// Returns true if the query has no groups (matches everything).
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns true if at least one group is fully contained in `tags`.
    ///
    /// `tags` must already be lowercased.
    pub fn matches_tags(&self, tags: &BTreeSet<String>) -> bool {
        self.groups.iter().any(|group| group.is_subset(tags))
    }
}
