mod extractor;
mod media;
mod normalizer;
mod pipeline;

pub use extractor::{
    CompositeExtractor, ExtractError, ExtractResult, Extractor, PdfExtractor, PlainTextExtractor,
    WordExtractor,
};
pub use media::{MediaType, DOCX_MIME, DOC_MIME, PDF_MIME, TEXT_MIME};
pub use normalizer::{
    preprocess, ContentLimits, ContentStats, ValidationError, ValidationResult,
    DEFAULT_MAX_CHARS, DEFAULT_MIN_CHARS,
};
pub use pipeline::{IngestError, IngestPipeline, IngestResult, Upload, DEFAULT_MAX_UPLOAD_BYTES};
