//! PDF Index Links CLI tool
//!
//! A command-line tool that rewrites an index PDF's textual cross-references
//! into clickable links and assembles the linked document set.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use pdf_index_links::build::{build_index, BuildOptions, BuildReport};
use pdf_index_links::pdf::{extract_metadata, LinkScheme};

/// PDF Index Links - Link an index PDF to its sibling documents
#[derive(Parser)]
#[command(name = "pdf-index-links")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Link the index in ./input and write the set to ./output
    pdf-index-links build

    # Explicit directories and index file name
    pdf-index-links build --input manuals --output site --index TOC.pdf

    # Hosted build: absolute viewer links, output nested under hosted/
    pdf-index-links build --viewer-base \"https://drive.google.com/viewerng/viewer?url=https://example.org/docs/\"

    # Show the page count of a document
    pdf-index-links info input/INDEX.pdf")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Link the index and copy the document set to the output directory
    Build {
        /// Input directory containing the index and its sibling PDFs
        #[arg(short, long, default_value = "input")]
        input: PathBuf,

        /// Output directory for the linked set
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// File name of the index document inside the input directory
        #[arg(long, default_value = "INDEX.pdf")]
        index: String,

        /// Viewer URL prefix for hosted builds. When given, links become
        /// absolute viewer URLs and output is nested under hosted/
        #[arg(long)]
        viewer_base: Option<String>,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            input,
            output,
            index,
            viewer_base,
        } => cmd_build(input, output, index, viewer_base),
        Commands::Info { input } => cmd_info(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Run the index build and print its report
fn cmd_build(
    input: PathBuf,
    output: PathBuf,
    index: String,
    viewer_base: Option<String>,
) -> anyhow::Result<()> {
    let scheme = match viewer_base {
        Some(viewer_base) => LinkScheme::Hosted { viewer_base },
        None => LinkScheme::Relative,
    };

    eprintln!("Linking {} in {}...", index, input.display());

    let options = BuildOptions {
        input_dir: input,
        output_dir: output.clone(),
        index_name: index,
        scheme,
    };

    let report = build_index(&options).context("index build failed")?;
    print_report(&report);

    eprintln!("Output: {}", output.display());
    Ok(())
}

fn print_report(report: &BuildReport) {
    eprintln!(
        "{} labels found, {} links added",
        report.labels_found, report.links_added
    );

    if !report.unresolved.is_empty() {
        eprintln!("Unresolved labels ({}):", report.unresolved.len());
        for label in &report.unresolved {
            eprintln!("  {}", label);
        }
    }

    if !report.copy_warnings.is_empty() {
        eprintln!("Copy warnings ({}):", report.copy_warnings.len());
        for warning in &report.copy_warnings {
            eprintln!("  {}: {}", warning.file_name, warning.message);
        }
    }
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> anyhow::Result<()> {
    let metadata =
        extract_metadata(&input).with_context(|| format!("cannot inspect {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }

    Ok(())
}
