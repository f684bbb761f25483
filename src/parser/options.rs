//! Parsing options and configuration.

/// Options for reading DOCX packages.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// How media entries are validated
    pub media_validation: MediaValidation,

    /// Package directory holding embedded media
    pub media_prefix: String,

    /// Whether to extract embedded media at all
    pub extract_media: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (keep what was read before malformed XML).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set media validation mode.
    pub fn with_media_validation(mut self, validation: MediaValidation) -> Self {
        self.media_validation = validation;
        self
    }

    /// Set the package directory searched for media.
    pub fn with_media_prefix(mut self, prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        self.media_prefix = prefix;
        self
    }

    /// Enable or disable media extraction.
    pub fn with_media(mut self, extract: bool) -> Self {
        self.extract_media = extract;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            media_validation: MediaValidation::Decode,
            media_prefix: DEFAULT_MEDIA_PREFIX.to_string(),
            extract_media: true,
        }
    }
}

/// Conventional media directory of a DOCX package.
pub const DEFAULT_MEDIA_PREFIX: &str = "word/media/";

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Keep the blocks read before malformed XML and continue
    Lenient,
}

/// How media entries are checked before they become assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaValidation {
    /// Fully decode the image
    #[default]
    Decode,
    /// Guess the format and read header dimensions only
    Sniff,
}
