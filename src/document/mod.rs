// src/document/mod.rs
//! Owned block model of a word-processing document.
//!
//! A [`Document`] is the ordered list of top-level body blocks. Tables are
//! opaque units here: their cell paragraphs are only reached by drilling
//! into [`Table::column`], never flattened into the block sequence.

pub mod walker;

#[cfg(test)]
pub(crate) mod fixture;

use std::io::{Read, Seek};
use std::path::Path;

use crate::utils::error::DocumentError;

/// A span of text sharing one formatting state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    /// Direct bold toggle; `None` when the run does not set it.
    pub bold: Option<bool>,
    /// Direct italic toggle; `None` when the run does not set it.
    pub italic: Option<bool>,
}

impl Run {
    /// Bold and italic together mark a changed span in amendment tables.
    pub fn is_bold_italic(&self) -> bool {
        self.bold == Some(true) && self.italic == Some(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Vertical merge state of a table cell (`w:vMerge`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VMerge {
    #[default]
    None,
    Restart,
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
    /// Number of grid columns this cell covers (`w:gridSpan`, at least 1).
    pub grid_span: usize,
    pub v_merge: VMerge,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            paragraphs: Vec::new(),
            grid_span: 1,
            v_merge: VMerge::None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// The cell covering grid column `grid_idx`, if the row reaches that far.
    pub fn cell_at(&self, grid_idx: usize) -> Option<&TableCell> {
        let mut pos = 0;
        for cell in &self.cells {
            let span = cell.grid_span.max(1);
            if grid_idx < pos + span {
                return Some(cell);
            }
            pos += span;
        }
        None
    }

    fn grid_width(&self) -> usize {
        self.cells.iter().map(|c| c.grid_span.max(1)).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<TableRow>,
    /// Number of `w:gridCol` entries declared by the table, 0 if absent.
    pub grid_columns: usize,
}

impl Table {
    /// Column count per the table grid, falling back to the widest row.
    pub fn column_count(&self) -> usize {
        if self.grid_columns > 0 {
            return self.grid_columns;
        }
        self.rows.iter().map(TableRow::grid_width).max().unwrap_or(0)
    }

    /// One cell per row for grid column `idx`, top to bottom.
    ///
    /// Spanned cells are repeated in every column they cover and vertical
    /// merge continuations resolve to the cell that started the merge.
    /// Rows that do not reach column `idx` are skipped.
    pub fn column(&self, idx: usize) -> Vec<&TableCell> {
        let mut cells = Vec::with_capacity(self.rows.len());
        let mut above: Option<&TableCell> = None;

        for row in &self.rows {
            let Some(cell) = row.cell_at(idx) else {
                continue;
            };
            let resolved = match (cell.v_merge, above) {
                (VMerge::Continue, Some(prev)) => prev,
                _ => cell,
            };
            above = Some(resolved);
            cells.push(resolved);
        }

        cells
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Table,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Paragraph(_) => BlockKind::Paragraph,
            Block::Table(_) => BlockKind::Table,
        }
    }
}

/// Top-level body blocks in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Opens a `.docx` file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        walker::open_path(path.as_ref())
    }

    /// Reads a `.docx` container from any seekable byte source.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self, DocumentError> {
        walker::read_container(reader)
    }

    /// Parses the contents of a `word/document.xml` part directly.
    pub fn from_document_xml(xml: &str) -> Result<Self, DocumentError> {
        walker::parse_document_xml(xml)
    }

    /// Replayable walk over `(block, kind)` pairs in document order.
    pub fn blocks(&self) -> impl Iterator<Item = (&Block, BlockKind)> + '_ {
        self.blocks.iter().map(|b| (b, b.kind()))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(text: &str, grid_span: usize, v_merge: VMerge) -> TableCell {
        TableCell {
            paragraphs: vec![Paragraph {
                runs: vec![Run {
                    text: text.to_string(),
                    ..Run::default()
                }],
            }],
            grid_span,
            v_merge,
        }
    }

    fn texts(cells: Vec<&TableCell>) -> Vec<String> {
        cells.iter().map(|c| c.paragraphs[0].text()).collect()
    }

    #[test]
    fn test_bold_italic_requires_both_flags() {
        let run = |bold, italic| Run { text: "x".into(), bold, italic };
        assert!(run(Some(true), Some(true)).is_bold_italic());
        assert!(!run(Some(true), None).is_bold_italic());
        assert!(!run(None, Some(true)).is_bold_italic());
        assert!(!run(Some(true), Some(false)).is_bold_italic());
    }

    #[test]
    fn test_column_repeats_spanned_cells() {
        let table = Table {
            rows: vec![
                TableRow { cells: vec![cell("Amendment 3", 2, VMerge::None)] },
                TableRow {
                    cells: vec![
                        cell("Text proposed by the Commission", 1, VMerge::None),
                        cell("Amendment", 1, VMerge::None),
                    ],
                },
            ],
            grid_columns: 2,
        };

        assert_eq!(table.column_count(), 2);
        assert_eq!(texts(table.column(0)), vec!["Amendment 3", "Text proposed by the Commission"]);
        assert_eq!(texts(table.column(1)), vec!["Amendment 3", "Amendment"]);
    }

    #[test]
    fn test_column_resolves_vertical_merge() {
        let table = Table {
            rows: vec![
                TableRow {
                    cells: vec![cell("top", 1, VMerge::Restart), cell("a", 1, VMerge::None)],
                },
                TableRow {
                    cells: vec![cell("", 1, VMerge::Continue), cell("b", 1, VMerge::None)],
                },
            ],
            grid_columns: 0,
        };

        assert_eq!(table.column_count(), 2);
        assert_eq!(texts(table.column(0)), vec!["top", "top"]);
        assert_eq!(texts(table.column(1)), vec!["a", "b"]);
    }

    #[test]
    fn test_short_rows_are_skipped_in_column() {
        let table = Table {
            rows: vec![
                TableRow { cells: vec![cell("only", 1, VMerge::None)] },
                TableRow {
                    cells: vec![cell("l", 1, VMerge::None), cell("r", 1, VMerge::None)],
                },
            ],
            grid_columns: 2,
        };
        assert_eq!(texts(table.column(1)), vec!["r"]);
    }
}
