//! The structured-document collaborator contract (§4.9). The core never
//! parses a structured document itself; a caller owning one walks its
//! text-bearing nodes through this trait.

use crate::token::Token;

/// Opaque reference to one text-bearing node in a caller's document model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextNodeRef(pub usize);

/// How much of the tokenized text a structured-output writer should
/// duplicate back into the document (CLI surface `--textredundancy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRedundancy {
    Full,
    Minimal,
    None,
}

impl TextRedundancy {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "full" => Some(TextRedundancy::Full),
            "minimal" => Some(TextRedundancy::Minimal),
            "none" => Some(TextRedundancy::None),
            _ => None,
        }
    }
}

/// A document format (e.g. an XML-based structured format) that can hand
/// the tokenizer its text-bearing nodes and accept sentences back.
///
/// No implementation ships with this crate; it exists so a caller wiring in
/// their own document format has a stable seam to implement against.
pub trait TextBearingDocument {
    fn text_nodes(&self) -> Vec<TextNodeRef>;
    fn node_text(&self, node: TextNodeRef) -> &str;
    fn replace_text(&mut self, node: TextNodeRef, sentences: &[Vec<Token>]);
}
