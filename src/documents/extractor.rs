//! Text extraction from downloaded documents (PDF and plain text).

use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file format ({media_type}); send a PDF or TXT file")]
    UnsupportedFormat { media_type: String },

    #[error("failed to read file")]
    Io(#[from] std::io::Error),

    #[error("failed to parse PDF")]
    Pdf(#[from] lopdf::Error),

    #[error("text file is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    /// The declared media type wins; the file suffix is the fallback.
    pub fn detect(path: &Path, media_type: Option<&str>) -> Option<Self> {
        let suffix = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match (media_type, suffix.as_deref()) {
            (Some("application/pdf"), _) | (_, Some("pdf")) => Some(DocumentKind::Pdf),
            (Some("text/plain"), _) | (_, Some("txt")) => Some(DocumentKind::PlainText),
            _ => None,
        }
    }
}

/// Extract the text of `path`. Pages without text contribute nothing.
pub fn extract_text(path: &Path, media_type: Option<&str>) -> Result<String, ExtractError> {
    let kind = DocumentKind::detect(path, media_type).ok_or_else(|| ExtractError::UnsupportedFormat {
        media_type: media_type.unwrap_or("unknown").to_string(),
    })?;

    match kind {
        DocumentKind::Pdf => extract_pdf(path),
        DocumentKind::PlainText => Ok(String::from_utf8(std::fs::read(path)?)?),
    }
}

fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    let document = lopdf::Document::load(path)?;
    let mut text = String::new();

    for page_number in document.get_pages().keys() {
        let page_text = document.extract_text(&[*page_number])?;
        if page_text.is_empty() {
            debug!(page = page_number, "Page has no extractable text");
            continue;
        }
        text.push_str(&page_text);
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use std::io::Write;

    /// One page per entry; `None` pages carry no text at all.
    fn write_pdf(pages: &[Option<&str>]) -> tempfile::NamedTempFile {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for page in pages {
            let operations = match page {
                Some(text) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
                None => vec![],
            };
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        doc.save(file.path()).unwrap();
        file
    }

    #[test]
    fn test_detect_kind() {
        assert_eq!(DocumentKind::detect(Path::new("/tmp/x"), Some("application/pdf")), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::detect(Path::new("/tmp/x.PDF"), None), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::detect(Path::new("/tmp/x"), Some("text/plain")), Some(DocumentKind::PlainText));
        assert_eq!(DocumentKind::detect(Path::new("/tmp/notes.txt"), Some("application/octet-stream")), Some(DocumentKind::PlainText));
        assert_eq!(DocumentKind::detect(Path::new("/tmp/x.docx"), None), None);
    }

    #[test]
    fn test_plain_text() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "Техническое задание\nРаздел 1").unwrap();

        let text = extract_text(file.path(), None).unwrap();
        assert_eq!(text, "Техническое задание\nРаздел 1");
    }

    #[test]
    fn test_unsupported_format_ignores_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "perfectly readable text").unwrap();

        let err = extract_text(file.path(), Some("application/msword")).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat { ref media_type } if media_type == "application/msword"));
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00]).unwrap();

        assert!(matches!(extract_text(file.path(), Some("text/plain")), Err(ExtractError::Utf8(_))));
    }

    #[test]
    fn test_pdf_pages_concatenated() {
        let file = write_pdf(&[Some("Hello World!"), None, Some("Second page")]);
        let text = extract_text(file.path(), Some("application/pdf")).unwrap();

        let hello = text.find("Hello World!").unwrap();
        let second = text.find("Second page").unwrap();
        assert!(hello < second);
    }

    #[test]
    fn test_pdf_without_text_is_empty() {
        let file = write_pdf(&[None, None]);
        let text = extract_text(file.path(), None).unwrap();
        assert!(text.trim().is_empty());
    }

    #[test]
    fn test_corrupt_pdf_fails() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        write!(file, "not a pdf").unwrap();

        assert!(matches!(extract_text(file.path(), None), Err(ExtractError::Pdf(_))));
    }
}
