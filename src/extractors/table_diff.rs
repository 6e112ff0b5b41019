// src/extractors/table_diff.rs
//! Reads the two-column "original / amended" comparison table of an amendment.
//!
//! The legislative template marks changed words by making the run both bold
//! and italic. Those runs are wrapped in `[DEL]..[/DEL]` in the original
//! column and `[ADD]..[/ADD]` in the amended column.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::{Table, TableCell};

// --- Regex Patterns (Lazy Static) ---
static DEL_JOIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[/DEL\]\s*\[DEL\]").expect("Failed to compile DEL_JOIN_RE"));
static ADD_JOIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[/ADD\]\s*\[ADD\]").expect("Failed to compile ADD_JOIN_RE"));
static DEL_SPAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[DEL\](.*?)\[/DEL\]").expect("Failed to compile DEL_SPAN_RE"));
static ADD_SPAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[ADD\](.*?)\[/ADD\]").expect("Failed to compile ADD_SPAN_RE"));

/// Row holding the type label ("Text proposed by the Commission", ...).
const TYPE_ROW: usize = 1;
/// First row of comparison content.
const CONTENT_ROW: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    /// Inserted text, found in the amended column.
    Add,
    /// Deleted text, found in the original column.
    Del,
}

impl DiffKind {
    pub fn tag(self) -> &'static str {
        match self {
            DiffKind::Add => "ADD",
            DiffKind::Del => "DEL",
        }
    }

    fn join_re(self) -> &'static Regex {
        match self {
            DiffKind::Add => &*ADD_JOIN_RE,
            DiffKind::Del => &*DEL_JOIN_RE,
        }
    }

    fn span_re(self) -> &'static Regex {
        match self {
            DiffKind::Add => &*ADD_SPAN_RE,
            DiffKind::Del => &*DEL_SPAN_RE,
        }
    }
}

/// Fields recovered from one comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFields {
    pub original_type: String,
    pub original: String,
    pub amended_type: String,
    pub amended: String,
}

/// Reads a comparison table, or `None` when its shape does not fit
/// (fewer than two columns, or no content rows in column 0).
pub fn extract_table_fields(table: &Table) -> Option<TableFields> {
    if table.column_count() < 2 {
        tracing::debug!("Skipping table with {} column(s)", table.column_count());
        return None;
    }

    let original_col = table.column(0);
    if original_col.len() <= CONTENT_ROW {
        tracing::debug!("Skipping table with only {} row(s) in column 0", original_col.len());
        return None;
    }
    let amended_col = table.column(1);

    Some(TableFields {
        original_type: render_cell(original_col[TYPE_ROW], None),
        original: render_rows(&original_col[CONTENT_ROW..], DiffKind::Del),
        amended_type: amended_col
            .get(TYPE_ROW)
            .map(|cell| render_cell(cell, None))
            .unwrap_or_default(),
        amended: amended_col
            .get(CONTENT_ROW..)
            .map(|cells| render_rows(cells, DiffKind::Add))
            .unwrap_or_default(),
    })
}

fn render_rows(cells: &[&TableCell], kind: DiffKind) -> String {
    cells
        .iter()
        .map(|cell| render_cell(cell, Some(kind)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text of a cell, runs trimmed and joined by single spaces. With a `kind`,
/// bold+italic runs are wrapped in that kind's markers and adjacent markers
/// are collapsed.
pub fn render_cell(cell: &TableCell, kind: Option<DiffKind>) -> String {
    let mut parts = Vec::new();
    for run in cell.paragraphs.iter().flat_map(|p| p.runs.iter()) {
        let text = run.text.trim();
        if text.is_empty() {
            continue;
        }
        match kind {
            Some(kind) if run.is_bold_italic() => {
                parts.push(format!("[{tag}]{text}[/{tag}]", tag = kind.tag()))
            }
            _ => parts.push(text.to_string()),
        }
    }

    let joined = parts.join(" ");
    match kind {
        Some(_) => collapse_adjacent(&joined),
        None => joined,
    }
}

/// Removes a closing marker followed (after optional whitespace) by the
/// same opening marker, for both kinds, until none remain.
pub fn collapse_adjacent(text: &str) -> String {
    let mut current = text.to_string();
    for kind in [DiffKind::Del, DiffKind::Add] {
        let re = kind.join_re();
        while re.is_match(&current) {
            current = re.replace_all(&current, "").into_owned();
        }
    }
    current
}

/// Contents of every `[KIND]..[/KIND]` span in order, joined by " | ".
pub fn extract_spans(text: &str, kind: DiffKind) -> String {
    kind.span_re()
        .captures_iter(text)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn extract_deletions(text: &str) -> String {
    extract_spans(text, DiffKind::Del)
}

pub fn extract_additions(text: &str) -> String {
    extract_spans(text, DiffKind::Add)
}

/// Report-facing digest of one amendment's comparison table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub original_type: String,
    pub deleted: String,
    pub added: String,
    pub rejection: bool,
}

impl ChangeSummary {
    pub fn from_fields(
        original_type: Option<&str>,
        original: Option<&str>,
        amended: Option<&str>,
        rejection: bool,
    ) -> Self {
        if rejection {
            return Self {
                original_type: original_type.unwrap_or_default().to_string(),
                rejection,
                ..Self::default()
            };
        }
        Self {
            original_type: original_type.unwrap_or_default().to_string(),
            deleted: original
                .map(|t| extract_deletions(&collapse_adjacent(t)))
                .unwrap_or_default(),
            added: amended
                .map(|t| extract_additions(&collapse_adjacent(t)))
                .unwrap_or_default(),
            rejection,
        }
    }
}
