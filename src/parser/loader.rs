use crate::error::{LogsiftError, Result};
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::read::ZipArchive;
use zip::result::ZipError;

/// Prefix of the placeholder line returned when a log file cannot be read
pub const LOAD_ERROR_PREFIX: &str = "Error loading file: ";

/// Prefix of the placeholder line returned when a Word document cannot be read
pub const WORD_ERROR_PREFIX: &str = "Error loading Word file: ";

/// Prefix of the placeholder line returned when a PDF cannot be read
pub const PDF_ERROR_PREFIX: &str = "Error loading PDF file: ";

const WORD_BODY_ENTRY: &str = "word/document.xml";

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

fn is_docx(path: &Path) -> bool {
    has_extension(path, "docx")
}

fn is_pdf(path: &Path) -> bool {
    has_extension(path, "pdf")
}

/// Read a UTF-8 text file into lines, without line terminators.
pub fn read_log_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content.lines().map(str::to_string).collect())
}

/// Read the paragraphs of a `.docx` document, skipping blank ones.
pub fn read_word_file(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut xml = String::new();
    {
        let mut body = archive.by_name(WORD_BODY_ENTRY).map_err(|e| match e {
            ZipError::FileNotFound => {
                LogsiftError::DocumentFormat(format!("missing {}", WORD_BODY_ENTRY))
            }
            other => LogsiftError::Zip(other),
        })?;
        body.read_to_string(&mut xml)?;
    }

    paragraphs_from_document_xml(&xml)
}

/// Collect the text of every `w:p` element in document order.
///
/// A paragraph nested in another one (text boxes) gets its own entry,
/// placed where it opens. Tab stops declared in `w:pPr` are not text.
fn paragraphs_from_document_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut paragraphs: Vec<String> = Vec::new();
    // indexes into `paragraphs` of the currently open w:p elements
    let mut open: Vec<usize> = Vec::new();
    let mut in_text = false;
    let mut props_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            XmlEvent::Start(e) => match e.name().as_ref() {
                b"w:p" => {
                    paragraphs.push(String::new());
                    open.push(paragraphs.len() - 1);
                }
                b"w:pPr" => props_depth += 1,
                b"w:t" => in_text = true,
                name => push_run_break(name, props_depth, &open, &mut paragraphs),
            },
            XmlEvent::Empty(e) => {
                push_run_break(e.name().as_ref(), props_depth, &open, &mut paragraphs)
            }
            XmlEvent::End(e) => match e.name().as_ref() {
                b"w:p" => {
                    open.pop();
                }
                b"w:pPr" => props_depth = props_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                _ => {}
            },
            XmlEvent::Text(t) if in_text => {
                if let Some(&idx) = open.last() {
                    paragraphs[idx].push_str(&t.unescape()?);
                }
            }
            XmlEvent::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs
        .into_iter()
        .filter(|text| !text.trim().is_empty())
        .collect())
}

fn push_run_break(name: &[u8], props_depth: usize, open: &[usize], paragraphs: &mut [String]) {
    if props_depth > 0 {
        return;
    }
    let ch = match name {
        b"w:tab" => '\t',
        b"w:br" | b"w:cr" => '\n',
        _ => return,
    };
    if let Some(&idx) = open.last() {
        paragraphs[idx].push(ch);
    }
}

/// Extract the text of a PDF document as lines.
pub fn read_pdf_file(path: &Path) -> Result<Vec<String>> {
    let text = pdf_extract::extract_text(path).map_err(|e| LogsiftError::Pdf(e.to_string()))?;
    Ok(text.lines().map(str::to_string).collect())
}

/// Load a log file. Failures become a single placeholder line so the
/// caller can group and display them like any other content.
pub fn load_log_file(path: &Path) -> Vec<String> {
    match read_log_file(path) {
        Ok(lines) => {
            log::info!("loaded {} lines from {}", lines.len(), path.display());
            lines
        }
        Err(e) => {
            log::warn!("failed to load {}: {}", path.display(), e);
            vec![format!("{}{}", LOAD_ERROR_PREFIX, e)]
        }
    }
}

/// Load the paragraphs of a Word document, with the same placeholder
/// behavior as [`load_log_file`].
pub fn load_word_file(path: &Path) -> Vec<String> {
    match read_word_file(path) {
        Ok(lines) => {
            log::info!("loaded {} paragraphs from {}", lines.len(), path.display());
            lines
        }
        Err(e) => {
            log::warn!("failed to load word document {}: {}", path.display(), e);
            vec![format!("{}{}", WORD_ERROR_PREFIX, e)]
        }
    }
}

pub fn load_pdf_file(path: &Path) -> Vec<String> {
    match read_pdf_file(path) {
        Ok(lines) => {
            log::info!("extracted {} lines from {}", lines.len(), path.display());
            lines
        }
        Err(e) => {
            log::warn!("failed to load pdf {}: {}", path.display(), e);
            vec![format!("{}{}", PDF_ERROR_PREFIX, e)]
        }
    }
}

/// Load any supported source, picking the loader from the file extension.
pub fn load_source(path: &Path) -> Vec<String> {
    if is_docx(path) {
        load_word_file(path)
    } else if is_pdf(path) {
        load_pdf_file(path)
    } else {
        load_log_file(path)
    }
}
