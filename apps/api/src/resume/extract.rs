//! Plain-text extraction from stored resume files.
//!
//! Dispatches on the file extension: TXT is decoded as UTF-8 (lossy), PDF
//! goes through `pdf-extract`, DOCX is unzipped and its WordprocessingML
//! text runs are scanned directly — the full OOXML schema is overkill for
//! pulling visible text out of `word/document.xml`.

use std::io::{Cursor, Read};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("file {0} has no extension")]
    MissingExtension(String),

    #[error("unsupported file format: .{0}")]
    UnsupportedFormat(String),

    #[error("failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("failed to extract text from DOCX: {0}")]
    Docx(String),
}

pub fn extract_text(file_name: &str, content: &[u8]) -> Result<String, ExtractError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .ok_or_else(|| ExtractError::MissingExtension(file_name.to_string()))?;

    match extension.as_str() {
        "txt" => Ok(String::from_utf8_lossy(content).into_owned()),
        "pdf" => extract_pdf_text(content),
        "docx" => extract_docx_text(content),
        other => Err(ExtractError::UnsupportedFormat(other.to_string())),
    }
}

fn extract_pdf_text(content: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(content).map_err(|e| ExtractError::Pdf(e.to_string()))
}

fn extract_docx_text(content: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(content))
        .map_err(|e| ExtractError::Docx(e.to_string()))?;
    let mut document = archive
        .by_name("word/document.xml")
        .map_err(|_| ExtractError::Docx("missing word/document.xml".to_string()))?;

    let mut xml = String::new();
    document
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    Ok(document_xml_to_text(&xml))
}

/// Collects the text of every `<w:t>` run, one output line per `<w:p>`
/// paragraph.
fn document_xml_to_text(xml: &str) -> String {
    let mut out = String::new();
    for paragraph in xml.split("</w:p>") {
        let line = text_runs(paragraph);
        if !line.is_empty() {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out.trim_end().to_string()
}

fn text_runs(fragment: &str) -> String {
    let mut line = String::new();
    let mut rest = fragment;
    while let Some(start) = rest.find("<w:t") {
        let after = &rest[start + 4..];
        // Must be `<w:t>` or `<w:t attr...>` — not `<w:tab/>` or `<w:tbl>`.
        if !after.starts_with('>') && !after.starts_with(' ') && !after.starts_with('/') {
            rest = after;
            continue;
        }
        let Some(gt) = after.find('>') else { break };
        if after[..gt].ends_with('/') {
            // Self-closing, no text.
            rest = &after[gt + 1..];
            continue;
        }
        let body = &after[gt + 1..];
        let Some(end) = body.find("</w:t>") else { break };
        decode_entities(&body[..end], &mut line);
        rest = &body[end + 6..];
    }
    line
}

fn decode_entities(text: &str, out: &mut String) {
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let (replacement, len) = if tail.starts_with("&amp;") {
            ("&", 5)
        } else if tail.starts_with("&lt;") {
            ("<", 4)
        } else if tail.starts_with("&gt;") {
            (">", 4)
        } else if tail.starts_with("&quot;") {
            ("\"", 6)
        } else if tail.starts_with("&apos;") {
            ("'", 6)
        } else {
            ("&", 1)
        };
        out.push_str(replacement);
        rest = &tail[len..];
    }
    out.push_str(rest);
}
