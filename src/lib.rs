//! PDF Index Links Library
//!
//! A library for turning textual cross-references in an index PDF into
//! clickable link annotations. It provides functionality to:
//! - Extract positioned text runs from index pages
//! - Parse cross-reference labels like `12-34` (section 12, page 34)
//! - Resolve labels to sibling files via cumulative page counts
//! - Write URI link annotations back into the index
//! - Assemble the linked document set in an output directory
//!
//! # Example
//!
//! ```no_run
//! use pdf_index_links::build::{build_index, BuildOptions};
//! use pdf_index_links::pdf::LinkScheme;
//! use std::path::PathBuf;
//!
//! let options = BuildOptions {
//!     input_dir: PathBuf::from("input"),
//!     output_dir: PathBuf::from("output"),
//!     index_name: "INDEX.pdf".to_string(),
//!     scheme: LinkScheme::Relative,
//! };
//!
//! let report = build_index(&options).expect("Failed to build index");
//! println!("{} links added", report.links_added);
//! ```

pub mod build;
pub mod error;
pub mod label;
pub mod pdf;

// Re-export commonly used items
pub use error::{Error, Result};
