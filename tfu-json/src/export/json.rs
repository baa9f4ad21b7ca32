//! Lecture / écriture JSON (indentation 2 espaces, Unicode non échappé)

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Écrit une valeur en JSON indenté
pub fn write_json<T: Serialize>(value: &T, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, value)
        .context(format!("Failed to serialize {}", output_path.display()))?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

/// Lit une valeur depuis un fichier JSON
pub fn read_json<T: DeserializeOwned>(input_path: &Path) -> Result<T> {
    let file = File::open(input_path)
        .context(format!("Failed to open file: {}", input_path.display()))?;

    serde_json::from_reader(BufReader::new(file))
        .context(format!("Failed to parse JSON: {}", input_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use grille_tfu::{Document, Metadata};

    #[test]
    fn test_write_read_document() {
        let document = Document {
            metadata: Metadata {
                source_path: "grille.xlsx".to_string(),
                description: "Grille tarifaire révisée 2025".to_string(),
                categories: Vec::new(),
            },
            departments: Vec::new(),
        };

        let output_path = std::env::temp_dir().join("tfu_json_test_document.json");
        write_json(&document, &output_path).unwrap();

        let content = std::fs::read_to_string(&output_path).unwrap();
        assert!(content.contains("révisée"));
        assert!(content.contains("\n  \"metadata\""));

        let reparsed: Document = read_json(&output_path).unwrap();
        assert_eq!(reparsed, document);

        std::fs::remove_file(output_path).ok();
    }

    #[test]
    fn test_read_missing_file() {
        let result: Result<Document> = read_json(Path::new("nonexistent.json"));
        assert!(result.is_err());
    }
}
