//! PDF metadata and page counting

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lopdf::{Document, Object};

use crate::error::{Error, Result};

/// Count pages by reading the Count field from the Pages dictionary.
/// More reliable than walking get_pages() for documents with nested page trees.
fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .map_err(|_| Error::General("No Root in trailer".to_string()))?
        .as_reference()
        .map_err(|_| Error::General("Root is not a reference".to_string()))?;

    let pages_id = doc
        .get_dictionary(catalog_id)?
        .get(b"Pages")
        .map_err(|_| Error::General("No Pages in catalog".to_string()))?
        .as_reference()
        .map_err(|_| Error::General("Pages is not a reference".to_string()))?;

    let count = doc
        .get_dictionary(pages_id)?
        .get(b"Count")
        .map_err(|_| Error::General("No Count in Pages".to_string()))?;

    match count {
        Object::Integer(n) if *n >= 0 => Ok(*n as usize),
        _ => Err(Error::General(
            "Count is not a non-negative integer".to_string(),
        )),
    }
}

/// Basic document metadata
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Document title (if present)
    pub title: Option<String>,
}

/// Extract metadata from a PDF file
pub fn extract_metadata(path: &Path) -> Result<PdfMetadata> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let page_count = count_pages_from_catalog(&doc)?;
    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    let title = doc
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id))
        .and_then(|info| info.get(b"Title"))
        .and_then(Object::as_str)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes.to_vec()).ok());

    Ok(PdfMetadata { page_count, title })
}

/// Count the number of pages in a PDF file.
pub fn count_pages(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let page_count = count_pages_from_catalog(&doc)?;
    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(page_count)
}

/// Memoizing page-count lookup for the sibling files of one run.
///
/// Each file is opened at most once; a load failure propagates and
/// aborts the run.
#[derive(Debug)]
pub struct PageCountCache {
    dir: PathBuf,
    counts: HashMap<String, usize>,
}

impl PageCountCache {
    /// Create a cache for files under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counts: HashMap::new(),
        }
    }

    /// Page count of `file_name`, loading the document on first use.
    pub fn count(&mut self, file_name: &str) -> Result<usize> {
        if let Some(&count) = self.counts.get(file_name) {
            return Ok(count);
        }
        let count = count_pages(&self.dir.join(file_name))?;
        self.counts.insert(file_name.to_string(), count);
        Ok(count)
    }
}
