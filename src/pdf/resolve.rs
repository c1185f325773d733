//! Cross-reference target resolution
//!
//! A label like `12-34` means "page 34 of section 12". A section may span
//! several sibling files; the label's page number is mapped onto one of them
//! by accumulating page counts over the section's files in listing order.

use crate::error::Result;
use crate::label::Label;
use crate::pdf::metadata::PageCountCache;

/// The sibling file and page a label points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    /// File name of the target document
    pub file_name: String,
    /// 1-based page number within that file
    pub page: usize,
}

/// Sibling files belonging to a label's section: names ending in
/// `"<section>.pdf"`, in the caller's order.
///
/// The suffix heuristic means files whose names merely end with the same
/// digits also match; the caller's sorted order decides ties.
pub fn candidate_files<'a>(files: &'a [String], section: &str) -> Vec<&'a String> {
    let suffix = format!("{}.pdf", section);
    files.iter().filter(|f| f.ends_with(&suffix)).collect()
}

/// Resolve a label to a (file, local page) target.
///
/// Page counts accumulate over the section's candidate files; the first file
/// whose cumulative count reaches the label's page number is the target, and
/// the local page is the label's page number minus the pages before that file.
///
/// Returns `Ok(None)` when the section has no candidate file or the label's
/// page number lies past the section's combined page count. A candidate that
/// cannot be loaded is an error.
pub fn resolve_target(
    label: &Label,
    files: &[String],
    cache: &mut PageCountCache,
) -> Result<Option<LinkTarget>> {
    let mut page_acc = 0;
    let mut page_offset = 0;

    for file in candidate_files(files, &label.section) {
        page_acc += cache.count(file)?;

        if label.page <= page_acc {
            return Ok(Some(LinkTarget {
                file_name: file.clone(),
                page: label.page - page_offset,
            }));
        }

        page_offset = page_acc;
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_candidate_files_suffix_match() {
        let files = files(&[
            "Manual Part 12.pdf",
            "Manual Part 13.pdf",
            "Appendix 12.pdf",
            "notes.txt",
        ]);
        let candidates = candidate_files(&files, "12");
        assert_eq!(candidates, ["Manual Part 12.pdf", "Appendix 12.pdf"]);
    }

    #[test]
    fn test_candidate_files_none_for_unknown_section() {
        let files = files(&["Manual Part 12.pdf"]);
        assert!(candidate_files(&files, "99").is_empty());
    }

    #[test]
    fn test_candidate_files_shared_suffix_ambiguity() {
        // "112.pdf" ends with "12.pdf"; the heuristic cannot tell them apart
        let files = files(&["Part 112.pdf", "Part 12.pdf"]);
        let candidates = candidate_files(&files, "12");
        assert_eq!(candidates.len(), 2);
    }

    // resolve_target needs real documents for the page-count cache; those
    // scenarios live in tests/integration.rs.
}
