// src/utils/block_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::document::{Block, Document};
use crate::extractors::amendment::amendment_number;
use crate::utils::error::AppError;

/// Plain-text listing of every top-level block, in order, with amendment
/// boundaries marked. Useful when a template variant parses unexpectedly.
pub fn render_block_dump(document: &Document) -> String {
    let mut dump = String::new();

    for (index, (block, _)) in document.blocks().enumerate() {
        match block {
            Block::Paragraph(para) => {
                let text = para.text();
                if let Some(number) = amendment_number(text.trim()) {
                    dump.push_str(&format!(">>> amendment {}\n", number));
                }
                dump.push_str(&format!("[P {}] {}\n", index, text.replace('\n', "\\n")));
            }
            Block::Table(table) => {
                dump.push_str(&format!(
                    "[T {}] {} rows x {} cols\n",
                    index,
                    table.rows.len(),
                    table.column_count()
                ));
            }
        }
    }

    dump
}

/// Writes [`render_block_dump`] to `filename`.
pub fn write_block_dump(document: &Document, filename: &Path) -> Result<(), AppError> {
    let mut file = File::create(filename)?;
    file.write_all(render_block_dump(document).as_bytes())?;

    tracing::info!("Saved block dump to {}", filename.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fixture;

    #[test]
    fn test_dump_marks_boundaries() {
        let xml = fixture::document_xml(&[
            fixture::plain("Committee: AGRI"),
            fixture::plain("<NumAm>12</NumAm>"),
            fixture::table(&[
                vec![fixture::plain("a"), fixture::plain("b")],
                vec![fixture::plain("c"), fixture::plain("d")],
            ]),
        ]);
        let doc = Document::from_document_xml(&xml).unwrap();

        let dump = render_block_dump(&doc);
        assert_eq!(
            dump,
            "[P 0] Committee: AGRI\n>>> amendment 12\n[P 1] <NumAm>12</NumAm>\n[T 2] 2 rows x 2 cols\n"
        );
    }

    #[test]
    fn test_dump_is_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocks.txt");
        let doc = Document::from_document_xml(&fixture::document_xml(&[fixture::plain("x")])).unwrap();

        write_block_dump(&doc, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[P 0] x\n");
    }
}
