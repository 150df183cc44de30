//! Upload text extraction.

use crate::error::{ContentError, Result};

/// Media classes recognized by the upload endpoint.
///
/// Classification is by substring over the declared content type, checked in
/// this order: pdf, word/officedocument, image, text, excel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Pdf,
    Word,
    Image,
    Text,
    Excel,
}

impl MediaKind {
    /// Classify a declared content type. Returns None for types outside the
    /// recognized classes.
    pub fn classify(content_type: &str) -> Option<Self> {
        if content_type.contains("pdf") {
            Some(Self::Pdf)
        } else if content_type.contains("word") || content_type.contains("officedocument") {
            Some(Self::Word)
        } else if content_type.contains("image") {
            Some(Self::Image)
        } else if content_type.contains("text") {
            Some(Self::Text)
        } else if content_type.contains("excel") {
            Some(Self::Excel)
        } else {
            None
        }
    }
}

/// Extract plain text from an upload.
///
/// Text uploads are decoded as strict UTF-8. The binary document classes
/// carry no extractor in this build and are rejected with the same
/// unsupported-type error an unrecognized content type gets.
pub fn extract_text(kind: MediaKind, bytes: &[u8]) -> Result<String> {
    match kind {
        MediaKind::Text => String::from_utf8(bytes.to_vec())
            .map_err(|e| ContentError::InvalidEncoding(e.to_string())),
        MediaKind::Pdf | MediaKind::Word | MediaKind::Image | MediaKind::Excel => {
            Err(ContentError::UnsupportedMediaType)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_types() {
        assert_eq!(MediaKind::classify("application/pdf"), Some(MediaKind::Pdf));
        assert_eq!(
            MediaKind::classify(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            Some(MediaKind::Word)
        );
        assert_eq!(MediaKind::classify("image/png"), Some(MediaKind::Image));
        assert_eq!(MediaKind::classify("text/plain"), Some(MediaKind::Text));
        assert_eq!(
            MediaKind::classify("application/vnd.ms-excel"),
            Some(MediaKind::Excel)
        );
    }

    #[test]
    fn test_classify_unknown_type() {
        assert_eq!(MediaKind::classify("application/zip"), None);
        assert_eq!(MediaKind::classify("audio/mpeg"), None);
    }

    #[test]
    fn test_classify_precedence() {
        // "word" wins over "text" because it is checked first.
        assert_eq!(
            MediaKind::classify("application/msword-text"),
            Some(MediaKind::Word)
        );
        // "text" wins over "excel".
        assert_eq!(
            MediaKind::classify("text/vnd.excel-like"),
            Some(MediaKind::Text)
        );
    }

    #[test]
    fn test_extract_text_utf8() {
        let text = extract_text(MediaKind::Text, "hello world".as_bytes()).unwrap();
        assert_eq!(text, "hello world");
    }

    #[test]
    fn test_extract_text_rejects_invalid_utf8() {
        let err = extract_text(MediaKind::Text, &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, ContentError::InvalidEncoding(_)));
    }

    #[test]
    fn test_binary_classes_are_unsupported() {
        for kind in [
            MediaKind::Pdf,
            MediaKind::Word,
            MediaKind::Image,
            MediaKind::Excel,
        ] {
            let err = extract_text(kind, b"%PDF-1.7").unwrap_err();
            assert!(matches!(err, ContentError::UnsupportedMediaType));
        }
    }
}
