//! Positioned text extraction from index pages
//!
//! Walks each page's content stream and records where text is shown, so that
//! cross-reference labels can later be covered by link annotation rectangles.
//! Only the text-positioning subset of the operator set is interpreted.

use std::collections::BTreeMap;

use lopdf::{content::Content, Dictionary, Document, Object, ObjectId};

use crate::error::Result;
use crate::label::{label_pattern, Label};

/// A run of text with its position on the page
#[derive(Debug, Clone)]
pub struct TextRun {
    /// Decoded text content
    pub text: String,
    /// X position of the text origin (left edge)
    pub x: f32,
    /// Y position of the text origin (baseline)
    pub y: f32,
    /// Estimated width of the run
    pub width: f32,
    /// Effective font size, used as the run height
    pub height: f32,
    /// Zero-based page index within the document
    pub page_index: usize,
}

/// A text run that contains a cross-reference label
#[derive(Debug, Clone)]
pub struct LabeledRun {
    /// The run as it appears on the page
    pub run: TextRun,
    /// The label parsed out of the run's text
    pub label: Label,
}

/// Extract every text run containing a cross-reference label.
///
/// Runs appear in page order; within a page, in content-stream order.
pub fn extract_labeled_runs(doc: &Document) -> Result<Vec<LabeledRun>> {
    let pattern = label_pattern();
    let mut labeled = Vec::new();

    for (page_num, page_id) in doc.get_pages() {
        // get_pages keys are 1-based
        let page_index = (page_num - 1) as usize;
        for run in extract_page_runs(doc, page_id, page_index)? {
            if let Some(label) = Label::find_in(&pattern, &run.text) {
                labeled.push(LabeledRun { run, label });
            }
        }
    }

    Ok(labeled)
}

/// Extract all text runs from a single page.
pub fn extract_page_runs(
    doc: &Document,
    page_id: ObjectId,
    page_index: usize,
) -> Result<Vec<TextRun>> {
    // A page with no font resources can still carry text operators;
    // decoding then falls back to the byte-level path
    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
    let content = page_content_bytes(doc, page_id)?;
    if content.is_empty() {
        return Ok(Vec::new());
    }
    interpret_text_operations(doc, &content, &fonts, page_index)
}

/// Collect a page's content stream bytes, decompressing and concatenating
/// as needed. A page without a Contents entry yields no bytes.
fn page_content_bytes(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc.get_dictionary(page_id)?;

    let contents = match page_dict.get(b"Contents") {
        Ok(obj) => obj,
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Reference(r) => {
            if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                Ok(stream_bytes(s))
            } else {
                Ok(Vec::new())
            }
        }
        Object::Array(arr) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Object::Reference(r) = obj {
                    if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                        content.extend_from_slice(&stream_bytes(s));
                        content.push(b' ');
                    }
                }
            }
            Ok(content)
        }
        Object::Stream(s) => Ok(stream_bytes(s)),
        _ => Ok(Vec::new()),
    }
}

/// Stream bytes, decompressed when a filter is present.
///
/// decompressed_content errors on streams without a /Filter entry, which
/// is the normal shape for uncompressed content; those pass through as-is.
fn stream_bytes(s: &lopdf::Stream) -> Vec<u8> {
    s.decompressed_content()
        .unwrap_or_else(|_| s.content.clone())
}

/// Interpret the text operators of a content stream, producing positioned runs.
fn interpret_text_operations(
    doc: &Document,
    content: &[u8],
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    page_index: usize,
) -> Result<Vec<TextRun>> {
    let content = Content::decode(content)?;

    let mut runs = Vec::new();
    let mut current_font: Vec<u8> = Vec::new();
    let mut font_size: f32 = 12.0;
    let mut matrix = TextMatrix::default();
    let mut in_text_block = false;

    for op in content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text_block = true;
                matrix = TextMatrix::default();
            }
            "ET" => {
                in_text_block = false;
            }
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Object::Name(name) = &op.operands[0] {
                        current_font = name.clone();
                    }
                    font_size = as_number(&op.operands[1]).unwrap_or(12.0);
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = as_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = as_number(&op.operands[1]).unwrap_or(0.0);
                    matrix.translate(tx, ty);
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    matrix.set(
                        as_number(&op.operands[0]).unwrap_or(1.0),
                        as_number(&op.operands[1]).unwrap_or(0.0),
                        as_number(&op.operands[2]).unwrap_or(0.0),
                        as_number(&op.operands[3]).unwrap_or(1.0),
                        as_number(&op.operands[4]).unwrap_or(0.0),
                        as_number(&op.operands[5]).unwrap_or(0.0),
                    );
                }
            }
            "T*" => {
                matrix.next_line();
            }
            "Tj" | "TJ" => {
                if in_text_block {
                    let text = if op.operator == "TJ" {
                        // Array of strings interleaved with kerning adjustments;
                        // the adjustments do not matter for label matching
                        if let Some(Object::Array(arr)) = op.operands.first() {
                            let mut combined = String::new();
                            for item in arr {
                                if let Object::String(bytes, _) = item {
                                    combined.push_str(&decode_with_font(
                                        doc,
                                        fonts,
                                        &current_font,
                                        bytes,
                                    ));
                                }
                            }
                            combined
                        } else {
                            String::new()
                        }
                    } else if let Some(Object::String(bytes, _)) = op.operands.first() {
                        decode_with_font(doc, fonts, &current_font, bytes)
                    } else {
                        String::new()
                    };

                    push_run(&mut runs, text, &matrix, font_size, page_index);
                }
            }
            "'" | "\"" => {
                matrix.next_line();
                if in_text_block {
                    // The " operator carries word/char spacing before the string
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let text = decode_with_font(doc, fonts, &current_font, bytes);
                        push_run(&mut runs, text, &matrix, font_size, page_index);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(runs)
}

fn push_run(
    runs: &mut Vec<TextRun>,
    text: String,
    matrix: &TextMatrix,
    font_size: f32,
    page_index: usize,
) {
    if text.trim().is_empty() {
        return;
    }
    let (x, y) = matrix.position();
    let height = font_size * matrix.scale();
    // No font metrics are loaded; approximate each glyph at half an em.
    // The rect only needs to cover the printed label.
    let width = text.chars().count() as f32 * height * 0.5;
    runs.push(TextRun {
        text,
        x,
        y,
        width,
        height,
        page_index,
    });
}

/// Decode string bytes through the current font's encoding, falling back to
/// a simple byte-level decode when the font carries no usable encoding.
fn decode_with_font(
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    font_name: &[u8],
    bytes: &[u8],
) -> String {
    if let Some(font) = fonts.get(font_name) {
        if let Ok(encoding) = font.get_font_encoding(doc) {
            if let Ok(decoded) = Document::decode_text(&encoding, bytes) {
                return decoded;
            }
        }
    }
    decode_text_simple(bytes)
}

/// Fallback decoding: UTF-16BE with BOM, then UTF-8, then Latin-1.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Text matrix state tracked across positioning operators.
///
/// Only the translation and vertical scale components feed into run
/// positions; rotation is not handled (index pages are upright text).
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        *self = Self { a, b, c, d, e, f };
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default leading; a TL-driven leading is not tracked
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        self.d.abs().max(f32::EPSILON)
    }
}

fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(n) => Some(*n as f32),
        Object::Real(n) => Some(*n),
        _ => None,
    }
}
