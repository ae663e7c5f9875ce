use serde::{Deserialize, Serialize};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DOC_MIME: &str = "application/msword";
pub const TEXT_MIME: &str = "text/plain";

/// The document formats accepted for upload.
///
/// Dispatch is always by the declared media type; file contents are never
/// sniffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Pdf,
    Docx,
    Doc,
    PlainText,
}

impl MediaType {
    pub const ALL: [Self; 4] = [Self::Pdf, Self::Docx, Self::Doc, Self::PlainText];

    pub fn from_mime(mime: &str) -> Option<Self> {
        // Browsers append parameters such as `; charset=utf-8`
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            PDF_MIME => Some(Self::Pdf),
            DOCX_MIME => Some(Self::Docx),
            DOC_MIME => Some(Self::Doc),
            TEXT_MIME => Some(Self::PlainText),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::Doc),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }

    pub const fn mime(self) -> &'static str {
        match self {
            Self::Pdf => PDF_MIME,
            Self::Docx => DOCX_MIME,
            Self::Doc => DOC_MIME,
            Self::PlainText => TEXT_MIME,
        }
    }

    /// Human-readable label shown alongside document metadata.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word Document (DOCX)",
            Self::Doc => "Word Document (DOC)",
            Self::PlainText => "Text Document",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime() {
        assert_eq!(MediaType::from_mime("application/pdf"), Some(MediaType::Pdf));
        assert_eq!(MediaType::from_mime(DOCX_MIME), Some(MediaType::Docx));
        assert_eq!(MediaType::from_mime("application/msword"), Some(MediaType::Doc));
        assert_eq!(
            MediaType::from_mime("text/plain; charset=utf-8"),
            Some(MediaType::PlainText)
        );
        assert_eq!(MediaType::from_mime("image/png"), None);
        assert_eq!(MediaType::from_mime("text/markdown"), None);
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(MediaType::from_extension("PDF"), Some(MediaType::Pdf));
        assert_eq!(MediaType::from_extension("txt"), Some(MediaType::PlainText));
        assert_eq!(MediaType::from_extension("md"), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(MediaType::Docx.label(), "Word Document (DOCX)");
        assert_eq!(MediaType::PlainText.label(), "Text Document");
    }
}
