//! Document model types for DOCX content representation.
//!
//! This module defines the intermediate representation that sits between
//! package parsing and region extraction. Order is the only relationship
//! between blocks; blocks carry no ids.

mod block;
mod document;
mod media;
mod table;

pub use block::{Block, Run, TextBlock};
pub use document::{Document, SourceId};
pub use media::{MediaAsset, MediaStore};
pub use table::Table;
