use thiserror::Error;

use super::media::MediaType;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("Failed to extract text from document: {0}")]
    ExtractionFailed(String),
}

pub type ExtractResult<T> = Result<T, ExtractError>;

/// Converts a raw file buffer of a known media type into plain text.
#[async_trait::async_trait]
pub trait Extractor: Send + Sync {
    fn supported_types(&self) -> &[MediaType];

    fn can_extract(&self, media: MediaType) -> bool {
        self.supported_types().contains(&media)
    }

    async fn extract_text(&self, data: &[u8], media: MediaType) -> ExtractResult<String>;
}

pub struct PlainTextExtractor;

impl PlainTextExtractor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Extractor for PlainTextExtractor {
    fn supported_types(&self) -> &[MediaType] {
        &[MediaType::PlainText]
    }

    async fn extract_text(&self, data: &[u8], _media: MediaType) -> ExtractResult<String> {
        let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
        Ok(String::from_utf8_lossy(data).into_owned())
    }
}

/// PDF text extraction via `pdf-extract`.
///
/// Runs on the blocking pool; a panic inside the parser (malformed fonts are
/// the usual culprit) surfaces as `ExtractionFailed` instead of unwinding
/// into the request handler.
pub struct PdfExtractor;

impl PdfExtractor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Extractor for PdfExtractor {
    fn supported_types(&self) -> &[MediaType] {
        &[MediaType::Pdf]
    }

    async fn extract_text(&self, data: &[u8], _media: MediaType) -> ExtractResult<String> {
        let bytes = data.to_vec();
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    ExtractError::ExtractionFailed("PDF parser panicked on malformed input".into())
                } else {
                    ExtractError::ExtractionFailed(e.to_string())
                }
            })?
            .map_err(|e| ExtractError::ExtractionFailed(format!("Failed to parse PDF document: {e}")))
    }
}

/// Word extraction via `docx-rs`.
///
/// Legacy `.doc` uploads are routed here as well; binary OLE documents are
/// rejected by the parser and reported as `ExtractionFailed`.
pub struct WordExtractor;

impl WordExtractor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for WordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Extractor for WordExtractor {
    fn supported_types(&self) -> &[MediaType] {
        &[MediaType::Docx, MediaType::Doc]
    }

    async fn extract_text(&self, data: &[u8], media: MediaType) -> ExtractResult<String> {
        let bytes = data.to_vec();
        tokio::task::spawn_blocking(move || read_word_text(&bytes))
            .await
            .map_err(|e| ExtractError::ExtractionFailed(e.to_string()))?
            .map_err(|e| {
                let kind = if media == MediaType::Doc { "DOC" } else { "DOCX" };
                ExtractError::ExtractionFailed(format!("Failed to parse {kind} document: {e}"))
            })
    }
}

fn read_word_text(bytes: &[u8]) -> Result<String, docx_rs::ReaderError> {
    let docx = docx_rs::read_docx(bytes)?;
    let mut text = String::new();

    for child in &docx.document.children {
        match child {
            docx_rs::DocumentChild::Paragraph(para) => {
                collect_runs(&para.children, &mut text);
                text.push('\n');
            }
            docx_rs::DocumentChild::Table(table) => collect_table(table, &mut text),
            _ => {}
        }
    }

    Ok(text)
}

fn collect_runs(children: &[docx_rs::ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            docx_rs::ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        docx_rs::RunChild::Text(text) => out.push_str(&text.text),
                        docx_rs::RunChild::Tab(_) => out.push('\t'),
                        docx_rs::RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            docx_rs::ParagraphChild::Hyperlink(link) => collect_runs(&link.children, out),
            _ => {}
        }
    }
}

#[allow(irrefutable_let_patterns)]
fn collect_table(table: &docx_rs::Table, out: &mut String) {
    for row in &table.rows {
        let docx_rs::TableChild::TableRow(tr) = row else {
            continue;
        };
        for cell in &tr.cells {
            let docx_rs::TableRowChild::TableCell(tc) = cell else {
                continue;
            };
            for content in &tc.children {
                if let docx_rs::TableCellContent::Paragraph(para) = content {
                    collect_runs(&para.children, out);
                    out.push(' ');
                }
            }
        }
        out.push('\n');
    }
}

/// Dispatches on the declared media type to the first extractor that
/// accepts it.
pub struct CompositeExtractor {
    extractors: Vec<Box<dyn Extractor>>,
}

impl CompositeExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    fn find_extractor(&self, media: MediaType) -> Option<&dyn Extractor> {
        self.extractors
            .iter()
            .find(|e| e.can_extract(media))
            .map(AsRef::as_ref)
    }

    /// Extracts text given the media type string declared by the uploader.
    pub async fn extract(&self, data: &[u8], declared_mime: &str) -> ExtractResult<String> {
        let media = MediaType::from_mime(declared_mime)
            .ok_or_else(|| ExtractError::UnsupportedFormat(declared_mime.to_string()))?;
        self.extract_text(data, media).await
    }
}

impl Default for CompositeExtractor {
    fn default() -> Self {
        Self::new()
            .with_extractor(Box::new(PlainTextExtractor::new()))
            .with_extractor(Box::new(PdfExtractor::new()))
            .with_extractor(Box::new(WordExtractor::new()))
    }
}

#[async_trait::async_trait]
impl Extractor for CompositeExtractor {
    fn supported_types(&self) -> &[MediaType] {
        &MediaType::ALL
    }

    fn can_extract(&self, media: MediaType) -> bool {
        self.find_extractor(media).is_some()
    }

    async fn extract_text(&self, data: &[u8], media: MediaType) -> ExtractResult<String> {
        let extractor = self
            .find_extractor(media)
            .ok_or_else(|| ExtractError::UnsupportedFormat(media.mime().to_string()))?;

        extractor.extract_text(data, media).await
    }
}
