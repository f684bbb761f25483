//! DOCX parsing module.

mod body;
mod docx_parser;
mod media;
mod options;

pub use body::BlockStream;
pub use docx_parser::DocxParser;
pub use media::{extract_media, persist_assets, validate, MediaExtraction, RejectedMedia};
pub use options::{ErrorMode, MediaValidation, ParseOptions, DEFAULT_MEDIA_PREFIX};
