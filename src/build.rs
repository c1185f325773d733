//! One-shot index build pipeline
//!
//! Loads the index document, extracts labeled text runs, resolves each label
//! to a sibling file and page, writes link annotations into the index, copies
//! all input files to the output directory, and saves the mutated index there.

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::{Document, ObjectId};

use crate::error::{Error, Result};
use crate::pdf::annotate::{add_link_annotation, link_uri, LinkScheme};
use crate::pdf::extract::extract_labeled_runs;
use crate::pdf::metadata::PageCountCache;
use crate::pdf::resolve::resolve_target;

/// Options for one build run
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory holding the index and its sibling documents
    pub input_dir: PathBuf,
    /// Directory the finished set is written to
    pub output_dir: PathBuf,
    /// File name of the index document within the input directory
    pub index_name: String,
    /// Link addressing scheme
    pub scheme: LinkScheme,
}

/// A file that could not be copied to the output directory
#[derive(Debug, Clone)]
pub struct CopyWarning {
    /// Name of the file that failed to copy
    pub file_name: String,
    /// The underlying error, as text
    pub message: String,
}

/// Outcome of a build run
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Labeled text runs found in the index
    pub labels_found: usize,
    /// Link annotations written
    pub links_added: usize,
    /// Label texts that resolved to no file/page
    pub unresolved: Vec<String>,
    /// Files that failed to copy; never fatal
    pub copy_warnings: Vec<CopyWarning>,
}

/// Run the whole pipeline.
///
/// Fatal errors: a missing or unloadable index, an unloadable sibling
/// document, or a failure to write the mutated index. Copy failures are
/// collected into the report instead.
pub fn build_index(options: &BuildOptions) -> Result<BuildReport> {
    let index_path = options.input_dir.join(&options.index_name);
    if !index_path.exists() {
        return Err(Error::FileNotFound(index_path));
    }

    let input_files = list_input_files(&options.input_dir)?;
    // Only the PDF subset takes part in target resolution; the copy step
    // mirrors the whole listing
    let files: Vec<String> = input_files
        .iter()
        .filter(|name| has_pdf_extension(name.as_str()))
        .cloned()
        .collect();

    let mut index_doc = Document::load(&index_path)?;
    let labeled = extract_labeled_runs(&index_doc)?;

    // get_pages is keyed by 1-based page number, so the values come out
    // in page order
    let page_ids: Vec<ObjectId> = index_doc.get_pages().values().copied().collect();

    let mut cache = PageCountCache::new(&options.input_dir);
    let mut report = BuildReport {
        labels_found: labeled.len(),
        ..BuildReport::default()
    };

    for entry in &labeled {
        let Some(page_id) = page_ids.get(entry.run.page_index).copied() else {
            report.unresolved.push(entry.label.text.clone());
            continue;
        };

        match resolve_target(&entry.label, &files, &mut cache)? {
            Some(target) => {
                let uri = link_uri(&options.scheme, &target);
                let run = &entry.run;
                let rect = [run.x, run.y, run.x + run.width, run.y + run.height];
                add_link_annotation(&mut index_doc, page_id, rect, &uri)?;
                report.links_added += 1;
            }
            None => report.unresolved.push(entry.label.text.clone()),
        }
    }

    // Hosted builds nest one level deeper so relative and hosted output
    // can live side by side
    let dest_dir = if options.scheme.is_hosted() {
        options.output_dir.join("hosted")
    } else {
        options.output_dir.clone()
    };
    fs::create_dir_all(&dest_dir)?;

    for file in &input_files {
        if let Err(e) = fs::copy(options.input_dir.join(file), dest_dir.join(file)) {
            report.copy_warnings.push(CopyWarning {
                file_name: file.clone(),
                message: e.to_string(),
            });
        }
    }

    // The mutated index overwrites its plain copy
    index_doc.save(dest_dir.join(&options.index_name))?;

    Ok(report)
}

/// Sorted listing of the regular files in a directory.
///
/// Sorting makes candidate order during target resolution deterministic;
/// raw directory order is filesystem-dependent.
fn list_input_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        files.push(entry.file_name().to_string_lossy().to_string());
    }

    files.sort();
    Ok(files)
}

fn has_pdf_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("pdf"))
}
