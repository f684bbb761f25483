//! Region artifact output.

mod docx;
mod naming;
mod options;

pub use docx::{DocxWriter, EMU_PER_INCH};
pub use naming::{ArtifactName, ArtifactNamer};
pub use options::{WriteOptions, DEFAULT_IMAGE_WIDTH_INCHES};
