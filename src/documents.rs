//! Source document loading: plain text, JSON and PDF.

use anyhow::{Context, Result};
use std::path::Path;

use crate::models::Document;

pub const PLACEHOLDER_TEXT: &str =
    "This is a placeholder document because no source files were found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Text,
    Json,
    Pdf,
}

/// The fixed set of files read from the documents directory, in load order.
pub const SOURCE_FILES: [(&str, SourceKind); 3] = [
    ("arunabha.txt", SourceKind::Text),
    ("arunabha.json", SourceKind::Json),
    ("portfolio-chatbot.pdf", SourceKind::Pdf),
];

/// Load every known source file under `dir`. Missing or unreadable files are
/// logged and skipped; if nothing loads, a single placeholder is returned.
pub fn load_documents(dir: &Path) -> Vec<Document> {
    let mut docs = Vec::new();

    for (name, kind) in SOURCE_FILES {
        let path = dir.join(name);
        if !path.exists() {
            tracing::warn!("File {name} not found in {}.", dir.display());
            continue;
        }

        tracing::info!("Loading {name}...");
        match load_file(&path, kind) {
            Ok(loaded) => docs.extend(loaded),
            Err(e) => tracing::error!("Error loading {name}: {e:#}"),
        }
    }

    if docs.is_empty() {
        tracing::warn!("No documents found. Initializing with a placeholder document.");
        docs.push(placeholder());
    }

    docs
}

pub fn placeholder() -> Document {
    Document::new(PLACEHOLDER_TEXT, "")
}

pub fn load_file(path: &Path, kind: SourceKind) -> Result<Vec<Document>> {
    match kind {
        SourceKind::Text => load_text(path),
        SourceKind::Json => load_json(path),
        SourceKind::Pdf => load_pdf(path),
    }
}

fn load_text(path: &Path) -> Result<Vec<Document>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(vec![Document::new(text, path.display().to_string())])
}

/// Every string value in the JSON tree becomes its own document.
fn load_json(path: &Path) -> Result<Vec<Document>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))?;

    let mut strings = Vec::new();
    collect_strings(&value, &mut strings);

    let source = path.display().to_string();
    Ok(strings
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let mut doc = Document::new(text, source.clone());
            doc.metadata.entry = Some(i + 1);
            doc
        })
        .collect())
}

fn collect_strings(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::String(s) => out.push(s.clone()),
        serde_json::Value::Array(items) => {
            for item in items {
                collect_strings(item, out);
            }
        }
        serde_json::Value::Object(map) => {
            for item in map.values() {
                collect_strings(item, out);
            }
        }
        _ => {}
    }
}

fn load_pdf(path: &Path) -> Result<Vec<Document>> {
    // pdf-extract panics on some malformed files
    let text = std::panic::catch_unwind(|| pdf_extract::extract_text(path))
        .map_err(|_| anyhow::anyhow!("PDF parser panicked on {}", path.display()))?
        .map_err(|e| anyhow::anyhow!("Failed to extract text from {}: {e}", path.display()))?;
    Ok(vec![Document::new(text, path.display().to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dir_yields_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let docs = load_documents(dir.path());
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].page_content, PLACEHOLDER_TEXT);
    }

    #[test]
    fn test_missing_dir_yields_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let docs = load_documents(&dir.path().join("nope"));
        assert_eq!(docs, vec![placeholder()]);
    }

    #[test]
    fn test_text_file_is_one_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("arunabha.txt"), "Builds Rust services.").unwrap();
        let docs = load_documents(dir.path());
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].page_content, "Builds Rust services.");
        assert!(docs[0].metadata.source.ends_with("arunabha.txt"));
    }

    #[test]
    fn test_json_strings_become_documents_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("arunabha.json"),
            r#"{"name": "Arunabha", "skills": ["Rust", "React"], "years": 4, "remote": true}"#,
        )
        .unwrap();
        let docs = load_documents(dir.path());
        let texts: Vec<&str> = docs.iter().map(|d| d.page_content.as_str()).collect();
        assert_eq!(texts, vec!["Arunabha", "Rust", "React"]);
        assert_eq!(docs[2].metadata.entry, Some(3));
    }

    #[test]
    fn test_pdf_file_is_one_document() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/portfolio-chatbot.pdf");
        std::fs::copy(&fixture, dir.path().join("portfolio-chatbot.pdf")).unwrap();

        let docs = load_documents(dir.path());
        assert_eq!(docs.len(), 1);
        assert!(docs[0].page_content.contains("Portfolio chatbot built with Rust"));
        assert!(docs[0].metadata.source.ends_with("portfolio-chatbot.pdf"));
        assert_eq!(docs[0].metadata.entry, None);
    }

    #[test]
    fn test_broken_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("arunabha.json"), "{not json").unwrap();
        std::fs::write(dir.path().join("portfolio-chatbot.pdf"), "not a pdf").unwrap();
        std::fs::write(dir.path().join("arunabha.txt"), "still here").unwrap();
        let docs = load_documents(dir.path());
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].page_content, "still here");
    }

    #[test]
    fn test_only_broken_files_fall_back_to_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("arunabha.json"), "[").unwrap();
        let docs = load_documents(dir.path());
        assert_eq!(docs, vec![placeholder()]);
    }
}
