//! PDF reading and mutation module

pub mod annotate;
pub mod extract;
pub mod metadata;
pub mod resolve;

// Re-export commonly used items
pub use annotate::{add_link_annotation, link_uri, LinkScheme};
pub use extract::{extract_labeled_runs, LabeledRun, TextRun};
pub use metadata::{count_pages, extract_metadata, PageCountCache, PdfMetadata};
pub use resolve::{candidate_files, resolve_target, LinkTarget};
