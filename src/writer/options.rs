//! Output options and configuration.

use crate::region::MISSING_IMAGE_PLACEHOLDER;

/// Display width of images when none is configured.
pub const DEFAULT_IMAGE_WIDTH_INCHES: f64 = 2.0;

/// Options for writing region artifacts.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Display width of images in inches; height follows the aspect ratio
    pub image_width_inches: f64,

    /// Add an `Image: {name}` paragraph before each image
    pub image_captions: bool,

    /// Dump all valid media into an `images/` directory next to the artifacts
    pub save_images: bool,

    /// Paragraph text written for anchors with no image
    pub placeholder: String,

    /// Put each document's artifacts in a directory named after it
    pub per_document_dir: bool,
}

impl WriteOptions {
    /// Create new write options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the image display width. Non-positive or non-finite widths are ignored.
    pub fn with_image_width(mut self, inches: f64) -> Self {
        if inches.is_finite() && inches > 0.0 {
            self.image_width_inches = inches;
        }
        self
    }

    /// Enable or disable image captions.
    pub fn with_captions(mut self, captions: bool) -> Self {
        self.image_captions = captions;
        self
    }

    /// Enable or disable the `images/` dump.
    pub fn with_saved_images(mut self, save: bool) -> Self {
        self.save_images = save;
        self
    }

    /// Set the placeholder text for missing images.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Write artifacts straight into the output root.
    pub fn flat(mut self) -> Self {
        self.per_document_dir = false;
        self
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            image_width_inches: DEFAULT_IMAGE_WIDTH_INCHES,
            image_captions: true,
            save_images: true,
            placeholder: MISSING_IMAGE_PLACEHOLDER.to_string(),
            per_document_dir: true,
        }
    }
}
