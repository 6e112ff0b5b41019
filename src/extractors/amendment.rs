// src/extractors/amendment.rs

// --- Imports ---
use std::io::{Read, Seek};
use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::{Block, Document};
use crate::extractors::table_diff::{self, ChangeSummary, TableFields};
use crate::extractors::tags::{parse_tags, TagMap, TagValue};
use crate::utils::error::ParseError;

// --- Field names ---
pub const FIELD_BY: &str = "By";
pub const FIELD_RAW_CONTENT: &str = "raw_content";
pub const FIELD_ORIGINAL_TYPE: &str = "OriginalType";
pub const FIELD_ORIGINAL: &str = "Original";
pub const FIELD_AMENDED_TYPE: &str = "AmendedType";
pub const FIELD_AMENDED: &str = "Amended";
pub const FIELD_ARTICLE: &str = "Article";
pub const FIELD_JUSTIFICATION: &str = "Justification";

const AUTHOR_BLOCK_TAG: &str = "RepeatBlock-By";
// `<Propuesta de rechazo>...</Propuesta de rechazo>` keys to its first word.
const REJECTION_TAG: &str = "Propuesta";

// --- Regex Patterns (Lazy Static) ---
static NUM_AM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<NumAm>([0-9]{1,4})</NumAm>").expect("Failed to compile NUM_AM_RE")
});

static JUSTIFICATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<TitreJust>Justification</TitreJust>(.*?)(?:<|$)")
        .expect("Failed to compile JUSTIFICATION_RE")
});

/// Amendment number announced by a paragraph, if any.
pub fn amendment_number(text: &str) -> Option<u32> {
    NUM_AM_RE
        .captures(text)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

// --- Data Structures ---

/// Which kind of committee document is being read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseMode {
    /// Tabled amendments; every amendment must name its authors.
    #[default]
    Amendments,
    /// Rapporteur's draft report; amendments carry no author block.
    DraftReport,
}

/// One amendment: every tag found in its region plus the derived fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amendment {
    #[serde(skip)]
    pub number: u32,
    #[serde(flatten)]
    pub fields: TagMap,
}

impl Amendment {
    pub fn get(&self, field: &str) -> Option<&TagValue> {
        self.fields.get(field)
    }

    /// First value of a field as text.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(TagValue::first)
    }

    pub fn authors(&self) -> Vec<&str> {
        self.get(FIELD_BY).map(TagValue::values).unwrap_or_default()
    }

    pub fn raw_content(&self) -> &str {
        self.text(FIELD_RAW_CONTENT).unwrap_or_default()
    }

    pub fn justification(&self) -> Option<&str> {
        self.text(FIELD_JUSTIFICATION)
    }

    pub fn is_rejection(&self) -> bool {
        self.fields.contains_key(REJECTION_TAG)
    }

    pub fn change_summary(&self) -> ChangeSummary {
        ChangeSummary::from_fields(
            self.text(FIELD_ORIGINAL_TYPE),
            self.text(FIELD_ORIGINAL),
            self.text(FIELD_AMENDED),
            self.is_rejection(),
        )
    }
}

/// Parse result: header tags plus amendments in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredDocument")]
pub struct ParsedDocument {
    pub header: TagMap,
    pub amendments: IndexMap<u32, Amendment>,
}

/// Serialized form; amendment numbers only survive as map keys.
#[derive(Deserialize)]
struct StoredDocument {
    header: TagMap,
    amendments: IndexMap<u32, Amendment>,
}

impl From<StoredDocument> for ParsedDocument {
    fn from(stored: StoredDocument) -> Self {
        let mut amendments = stored.amendments;
        for (number, amendment) in amendments.iter_mut() {
            amendment.number = *number;
        }
        ParsedDocument { header: stored.header, amendments }
    }
}

impl ParsedDocument {
    pub fn amendment(&self, number: u32) -> Option<&Amendment> {
        self.amendments.get(&number)
    }

    pub fn summaries(&self) -> Vec<(u32, ChangeSummary)> {
        self.amendments
            .iter()
            .map(|(number, am)| (*number, am.change_summary()))
            .collect()
    }
}

/// Per-amendment accumulator filled while walking the blocks.
#[derive(Debug, Default)]
struct PendingAmendment {
    lines: Vec<String>,
    table: Option<TableFields>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    CollectingHeader,
    CollectingAmendment(u32),
}

// --- Main Extractor Structure ---
#[derive(Debug, Clone, Copy, Default)]
pub struct AmendmentExtractor {
    mode: ParseMode,
}

impl AmendmentExtractor {
    pub fn new(mode: ParseMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Opens and parses a `.docx` file.
    pub fn parse_path<P: AsRef<Path>>(&self, path: P) -> Result<ParsedDocument, ParseError> {
        let path = path.as_ref();
        let document = Document::open(path).map_err(|source| ParseError::DocumentOpen {
            document: path.display().to_string(),
            source,
        })?;
        tracing::info!("Parsing {} ({} blocks, {:?})", path.display(), document.len(), self.mode);
        self.extract(&document)
    }

    /// Parses a `.docx` container from bytes; `name` identifies it in errors.
    pub fn parse_reader<R: Read + Seek>(&self, reader: R, name: &str) -> Result<ParsedDocument, ParseError> {
        let document = Document::from_reader(reader).map_err(|source| ParseError::DocumentOpen {
            document: name.to_string(),
            source,
        })?;
        tracing::info!("Parsing {} ({} blocks, {:?})", name, document.len(), self.mode);
        self.extract(&document)
    }

    /// Splits the block stream into header and amendment regions, then
    /// finalizes every amendment.
    pub fn extract(&self, document: &Document) -> Result<ParsedDocument, ParseError> {
        let mut state = State::CollectingHeader;
        let mut header_lines: Vec<String> = Vec::new();
        let mut pending: IndexMap<u32, PendingAmendment> = IndexMap::new();

        for (block, _) in document.blocks() {
            match block {
                Block::Paragraph(para) => {
                    let text = para.text();
                    let text = text.trim();

                    if let Some(number) = amendment_number(text) {
                        tracing::debug!("Amendment boundary: {}", number);
                        if pending.insert(number, PendingAmendment::default()).is_some() {
                            tracing::warn!("Amendment {} appears again; earlier content discarded", number);
                        }
                        state = State::CollectingAmendment(number);
                        continue;
                    }

                    match state {
                        State::CollectingHeader => header_lines.push(text.to_string()),
                        State::CollectingAmendment(number) => {
                            if let Some(acc) = pending.get_mut(&number) {
                                acc.lines.push(text.to_string());
                            }
                        }
                    }
                }
                Block::Table(table) => {
                    let State::CollectingAmendment(number) = state else {
                        tracing::trace!("Ignoring table in header region");
                        continue;
                    };
                    if let Some(fields) = table_diff::extract_table_fields(table) {
                        if let Some(acc) = pending.get_mut(&number) {
                            if acc.table.is_some() {
                                tracing::debug!("Amendment {} has another comparison table; keeping the last", number);
                            }
                            acc.table = Some(fields);
                        }
                    }
                }
            }
        }

        let header = parse_tags(&header_lines.join("\n"));

        let mut amendments = IndexMap::with_capacity(pending.len());
        for (number, acc) in pending {
            let amendment = self.finalize(number, acc)?;
            amendments.insert(number, amendment);
        }

        tracing::info!(
            "Extracted {} header tags and {} amendments",
            header.len(),
            amendments.len()
        );
        Ok(ParsedDocument { header, amendments })
    }

    fn finalize(&self, number: u32, acc: PendingAmendment) -> Result<Amendment, ParseError> {
        let raw_content = acc.lines.join("\n");
        let mut fields = parse_tags(&raw_content);

        fields.insert(FIELD_RAW_CONTENT.to_string(), TagValue::from(raw_content.as_str()));
        if let Some(table) = acc.table {
            fields.insert(FIELD_ORIGINAL_TYPE.to_string(), TagValue::from(table.original_type));
            fields.insert(FIELD_ORIGINAL.to_string(), TagValue::from(table.original));
            fields.insert(FIELD_AMENDED_TYPE.to_string(), TagValue::from(table.amended_type));
            fields.insert(FIELD_AMENDED.to_string(), TagValue::from(table.amended));
        }

        if self.mode == ParseMode::Amendments {
            let block = fields
                .shift_remove(AUTHOR_BLOCK_TAG)
                .ok_or_else(|| ParseError::MalformedAmendment {
                    number,
                    reason: format!("missing {} author block", AUTHOR_BLOCK_TAG),
                })?;
            fields.insert(FIELD_BY.to_string(), TagValue::Multiple(split_authors(&block)));
        }

        if let Some(justification) = extract_justification(&raw_content) {
            fields.insert(FIELD_JUSTIFICATION.to_string(), TagValue::from(justification));
        }

        Ok(Amendment { number, fields })
    }
}

/// Author names from a `RepeatBlock-By` value such as
/// `<Members>Jane Doe, John Smith</Members>`.
pub fn split_authors(block: &TagValue) -> Vec<String> {
    block
        .values()
        .into_iter()
        .flat_map(|value| {
            value
                .replace("<Members>", "")
                .replace("</Members>", "")
                .split(',')
                .map(|name| name.trim().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Text after the justification heading up to the next tag or the end.
pub fn extract_justification(raw_content: &str) -> Option<String> {
    JUSTIFICATION_RE
        .captures(raw_content)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
}
