//! Link annotation writing
//!
//! Builds `/Subtype /Link` annotation dictionaries with URI actions and
//! attaches them to a page's `/Annots` array, creating the array when the
//! page has none.

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::Result;
use crate::pdf::resolve::LinkTarget;

/// How link targets are addressed in the written annotations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkScheme {
    /// Relative links into the output directory: `./file.pdf#page=N`
    Relative,
    /// Absolute links through an external viewer, for hosted builds
    Hosted {
        /// URL prefix the file name is appended to
        viewer_base: String,
    },
}

impl LinkScheme {
    /// Whether this scheme produces the nested hosted output layout.
    pub fn is_hosted(&self) -> bool {
        matches!(self, LinkScheme::Hosted { .. })
    }
}

/// Format the URI a resolved target is reached under.
///
/// The `#page=` fragment is 1-based, as PDF viewers expect.
pub fn link_uri(scheme: &LinkScheme, target: &LinkTarget) -> String {
    match scheme {
        LinkScheme::Relative => format!("./{}#page={}", target.file_name, target.page),
        LinkScheme::Hosted { viewer_base } => {
            format!("{}{}#page={}", viewer_base, target.file_name, target.page)
        }
    }
}

/// Add a clickable link annotation covering `rect` to a page.
///
/// `rect` is `[x0, y0, x1, y1]` in PDF user space. The annotation gets a
/// thin border and blue color, matching how the index marks its references.
pub fn add_link_annotation(
    doc: &mut Document,
    page_id: ObjectId,
    rect: [f32; 4],
    uri: &str,
) -> Result<()> {
    let annot_id = doc.add_object(link_annotation(rect, uri));
    push_page_annotation(doc, page_id, annot_id)
}

/// Build the annotation dictionary for a URI link.
fn link_annotation(rect: [f32; 4], uri: &str) -> Dictionary {
    let action = Dictionary::from_iter([
        ("Type", Object::Name(b"Action".to_vec())),
        ("S", Object::Name(b"URI".to_vec())),
        ("URI", Object::string_literal(uri)),
    ]);

    Dictionary::from_iter([
        ("Type", Object::Name(b"Annot".to_vec())),
        ("Subtype", Object::Name(b"Link".to_vec())),
        (
            "Rect",
            Object::Array(rect.iter().map(|&v| Object::Real(v)).collect()),
        ),
        (
            "Border",
            Object::Array(vec![0.into(), 0.into(), 2.into()]),
        ),
        ("C", Object::Array(vec![0.into(), 0.into(), 1.into()])),
        ("A", Object::Dictionary(action)),
    ])
}

/// Append an annotation reference to the page's `/Annots` array.
///
/// Handles all three shapes a page can present: no array yet, a direct
/// array in the page dictionary, or an indirect reference to the array.
fn push_page_annotation(doc: &mut Document, page_id: ObjectId, annot_id: ObjectId) -> Result<()> {
    // An indirect Annots array must be mutated where it lives, not on the page
    let annots_ref = match doc.get_dictionary(page_id)?.get(b"Annots") {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    };

    if let Some(array_id) = annots_ref {
        if let Object::Array(annots) = doc.get_object_mut(array_id)? {
            annots.push(Object::Reference(annot_id));
            return Ok(());
        }
        // Reference points at something other than an array; fall through
        // and rebuild a direct array on the page
    }

    let page = doc.get_dictionary_mut(page_id)?;
    let mut annots = match page.get(b"Annots") {
        Ok(Object::Array(existing)) => existing.clone(),
        _ => Vec::new(),
    };
    annots.push(Object::Reference(annot_id));
    page.set("Annots", Object::Array(annots));

    Ok(())
}
