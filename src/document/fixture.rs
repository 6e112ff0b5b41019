// src/document/fixture.rs
// In-memory DOCX builders for tests.
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

/// One run of a styled paragraph; `changed` marks it bold+italic.
#[derive(Debug, Clone, Copy)]
pub struct RunSpec<'a> {
    pub text: &'a str,
    pub changed: bool,
}

impl<'a> RunSpec<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self { text, changed: false }
    }

    pub fn changed(text: &'a str) -> Self {
        Self { text, changed: true }
    }
}

pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn run_xml(spec: &RunSpec) -> String {
    let props = if spec.changed { "<w:rPr><w:b/><w:i/></w:rPr>" } else { "" };
    format!(
        r#"<w:r>{}<w:t xml:space="preserve">{}</w:t></w:r>"#,
        props,
        escape(spec.text)
    )
}

/// Paragraph with a single unformatted run. Empty text gives an empty paragraph.
pub fn plain(text: &str) -> String {
    if text.is_empty() {
        return "<w:p/>".to_string();
    }
    styled(&[RunSpec::plain(text)])
}

pub fn styled(runs: &[RunSpec]) -> String {
    let body: String = runs.iter().map(run_xml).collect();
    format!("<w:p>{}</w:p>", body)
}

/// Table from rows of cell contents; each cell holds pre-built paragraph XML.
pub fn table(rows: &[Vec<String>]) -> String {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let grid: String = (0..width).map(|_| "<w:gridCol/>").collect();

    let mut xml = format!("<w:tbl><w:tblGrid>{}</w:tblGrid>", grid);
    for row in rows {
        xml.push_str("<w:tr>");
        for cell in row {
            xml.push_str("<w:tc>");
            xml.push_str(if cell.is_empty() { "<w:p/>" } else { cell });
            xml.push_str("</w:tc>");
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    xml
}

/// Two-column comparison table, column by column.
pub fn comparison_table(original: &[String], amended: &[String]) -> String {
    let rows: Vec<Vec<String>> = original
        .iter()
        .zip(amended)
        .map(|(left, right)| vec![left.clone(), right.clone()])
        .collect();
    table(&rows)
}

pub fn document_xml(body: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{}"><w:body>{}<w:sectPr/></w:body></w:document>"#,
        WML_NS,
        body.concat()
    )
}

pub fn zip_with(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        zip.start_file(*name, SimpleFileOptions::default())
            .expect("start zip entry");
        zip.write_all(content.as_bytes()).expect("write zip entry");
    }
    zip.finish().expect("finish zip").into_inner()
}

pub fn docx_bytes(body: &[String]) -> Vec<u8> {
    let document = document_xml(body);
    zip_with(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("word/document.xml", &document),
    ])
}
