// src/lib.rs
//! Parser for European Parliament committee amendment documents (`.docx`).
//!
//! [`AmendmentExtractor`] walks a document's paragraphs and comparison
//! tables and returns a [`ParsedDocument`]: the header tags plus one
//! [`Amendment`] per `<NumAm>` region, with authors, diff-tagged
//! original/amended text and justification.

pub mod document;
pub mod extractors;
pub mod storage;
pub mod utils;

pub use document::{Block, BlockKind, Document};
pub use extractors::{
    Amendment, AmendmentExtractor, ChangeSummary, ParseMode, ParsedDocument, TagMap, TagValue,
};
pub use utils::error::{DocumentError, ParseError};
