//! Artifact file naming.

use std::collections::HashMap;

/// Assigns `section_{id}.docx` names, suffixing repeated ids.
///
/// The first region with an id gets `section_{id}.docx`; later ones get
/// `section_{id}_2.docx`, `section_{id}_3.docx` and so on.
#[derive(Debug, Default)]
pub struct ArtifactNamer {
    seen: HashMap<String, usize>,
}

/// A file name chosen for a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    /// File name, without directory
    pub file_name: String,
    /// Whether the id had been used before in this document
    pub duplicate: bool,
}

impl ArtifactNamer {
    /// Create a namer with no ids seen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose the file name for the next region with this id.
    pub fn name(&mut self, id: &str) -> ArtifactName {
        let count = self.seen.entry(id.to_string()).or_insert(0);
        *count += 1;

        if *count == 1 {
            ArtifactName {
                file_name: format!("section_{}.docx", id),
                duplicate: false,
            }
        } else {
            ArtifactName {
                file_name: format!("section_{}_{}.docx", id, count),
                duplicate: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_ids() {
        let mut namer = ArtifactNamer::new();
        assert_eq!(namer.name("1").file_name, "section_1.docx");
        assert_eq!(namer.name("2").file_name, "section_2.docx");
    }

    #[test]
    fn test_repeated_ids() {
        let mut namer = ArtifactNamer::new();
        let first = namer.name("4");
        let second = namer.name("4");
        let third = namer.name("4");

        assert!(!first.duplicate);
        assert_eq!(second.file_name, "section_4_2.docx");
        assert!(second.duplicate);
        assert_eq!(third.file_name, "section_4_3.docx");
    }
}
