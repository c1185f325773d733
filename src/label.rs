//! Cross-reference label parsing
//!
//! Index pages carry textual cross-references like `12-34` or `07A-102`:
//! a two-digit section (with an optional uppercase letter) and a 1-based
//! page number within that section.

use regex::Regex;

/// Pattern for a cross-reference label: section prefix, hyphen, page number.
pub const LABEL_PATTERN: &str = r"(\d\d[A-Z]?)-(\d{1,3})";

/// Compile the label pattern.
///
/// The pattern is a fixed constant, so compilation cannot fail.
pub fn label_pattern() -> Regex {
    Regex::new(LABEL_PATTERN).unwrap()
}

/// A parsed cross-reference label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// The matched label text, e.g. `"12-34"`
    pub text: String,
    /// Section prefix before the hyphen, e.g. `"12"` or `"07A"`
    pub section: String,
    /// 1-based page number within the section
    pub page: usize,
}

impl Label {
    /// Find the first label inside a text run.
    ///
    /// Returns `None` when the run contains no label. Matching is stateless;
    /// repeated calls over the same text always see the same match.
    pub fn find_in(pattern: &Regex, text: &str) -> Option<Label> {
        let caps = pattern.captures(text)?;
        let page: usize = caps[2].parse().ok()?;
        Some(Label {
            text: caps[0].to_string(),
            section: caps[1].to_string(),
            page,
        })
    }
}
