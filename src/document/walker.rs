// src/document/walker.rs
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::document::{Block, Document, Paragraph, Run, Table, TableCell, TableRow, VMerge};
use crate::utils::error::DocumentError;

const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCUMENT_PART: &str = "word/document.xml";

// Inline wrappers whose runs still belong to the paragraph text.
const INLINE_CONTAINERS: &[&str] = &["hyperlink", "ins", "smartTag", "fldSimple", "customXml"];

fn is_wml(node: roxmltree::Node, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(WML_NS)
}

fn wml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children().find(|n| is_wml(*n, name))
}

fn wml_attr<'a>(node: roxmltree::Node<'a, 'a>, child: &str) -> Option<&'a str> {
    wml(node, child).and_then(|n| n.attribute((WML_NS, "val")))
}

/// WML toggle property (`w:b`, `w:i`). Present with no val, or any val other
/// than "0"/"false"/"off", means on.
fn wml_bool(parent: roxmltree::Node, name: &str) -> Option<bool> {
    wml(parent, name).map(|n| {
        n.attribute((WML_NS, "val"))
            .map_or(true, |v| !matches!(v, "0" | "false" | "off"))
    })
}

pub(crate) fn open_path(path: &Path) -> Result<Document, DocumentError> {
    tracing::debug!("Opening document {}", path.display());
    let file = File::open(path)?;
    // The file handle is dropped on every return path out of read_container.
    read_container(BufReader::new(file))
}

pub(crate) fn read_container<R: Read + Seek>(reader: R) -> Result<Document, DocumentError> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let mut xml_content = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|_| DocumentError::MissingPart(DOCUMENT_PART.to_string()))?
        .read_to_string(&mut xml_content)?;

    tracing::debug!("Read {} ({} bytes)", DOCUMENT_PART, xml_content.len());
    parse_document_xml(&xml_content)
}

pub(crate) fn parse_document_xml(xml_content: &str) -> Result<Document, DocumentError> {
    let xml = roxmltree::Document::parse(xml_content)?;
    let body = wml(xml.root_element(), "body").ok_or(DocumentError::MissingBody)?;

    let mut blocks = Vec::new();
    collect_blocks(body, &mut blocks);

    tracing::debug!("Walked {} top-level blocks", blocks.len());
    Ok(Document::new(blocks))
}

/// Pushes paragraphs and tables in document order. Block-level content
/// controls are transparent: their content takes the control's place.
fn collect_blocks(parent: roxmltree::Node, blocks: &mut Vec<Block>) {
    for child in parent.children().filter(|n| n.is_element()) {
        if is_wml(child, "p") {
            blocks.push(Block::Paragraph(parse_paragraph(child)));
        } else if is_wml(child, "tbl") {
            blocks.push(Block::Table(parse_table(child)));
        } else if is_wml(child, "sdt") {
            if let Some(content) = wml(child, "sdtContent") {
                collect_blocks(content, blocks);
            }
        }
    }
}

fn parse_paragraph(para_node: roxmltree::Node) -> Paragraph {
    let mut runs = Vec::new();
    collect_runs(para_node, &mut runs);
    Paragraph { runs }
}

fn collect_runs(parent: roxmltree::Node, runs: &mut Vec<Run>) {
    for child in parent.children().filter(|n| n.is_element()) {
        if is_wml(child, "r") {
            runs.push(parse_run(child));
        } else if child.tag_name().namespace() == Some(WML_NS)
            && INLINE_CONTAINERS.contains(&child.tag_name().name())
        {
            collect_runs(child, runs);
        }
    }
}

fn parse_run(run_node: roxmltree::Node) -> Run {
    let rpr = wml(run_node, "rPr");
    let bold = rpr.and_then(|n| wml_bool(n, "b"));
    let italic = rpr.and_then(|n| wml_bool(n, "i"));

    let mut text = String::new();
    for child in run_node.children().filter(|n| n.is_element()) {
        if child.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        match child.tag_name().name() {
            "t" => text.push_str(child.text().unwrap_or("")),
            "tab" | "ptab" => text.push('\t'),
            "cr" => text.push('\n'),
            "br" => {
                // Page and column breaks carry no text.
                let kind = child.attribute((WML_NS, "type")).unwrap_or("textWrapping");
                if kind == "textWrapping" {
                    text.push('\n');
                }
            }
            "noBreakHyphen" => text.push('-'),
            _ => {}
        }
    }

    Run { text, bold, italic }
}

fn parse_table(tbl_node: roxmltree::Node) -> Table {
    let grid_columns = wml(tbl_node, "tblGrid")
        .map(|grid| grid.children().filter(|n| is_wml(*n, "gridCol")).count())
        .unwrap_or(0);

    let rows = tbl_node
        .children()
        .filter(|n| is_wml(*n, "tr"))
        .map(|tr| TableRow {
            cells: tr
                .children()
                .filter(|n| is_wml(*n, "tc"))
                .map(parse_cell)
                .collect(),
        })
        .collect();

    Table { rows, grid_columns }
}

fn parse_cell(tc_node: roxmltree::Node) -> TableCell {
    let tcpr = wml(tc_node, "tcPr");

    let grid_span = tcpr
        .and_then(|n| wml_attr(n, "gridSpan"))
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|span| *span > 0)
        .unwrap_or(1);

    let v_merge = match tcpr.and_then(|n| wml(n, "vMerge")) {
        None => VMerge::None,
        Some(node) => match node.attribute((WML_NS, "val")) {
            Some("restart") => VMerge::Restart,
            _ => VMerge::Continue,
        },
    };

    let paragraphs = tc_node
        .children()
        .filter(|n| is_wml(*n, "p"))
        .map(parse_paragraph)
        .collect();

    TableCell { paragraphs, grid_span, v_merge }
}
