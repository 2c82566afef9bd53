//! Serializer module: trait-based output format dispatch.
//!
//! A [`Serializer`] is a visitor fed by [`DocTreeNode::serialize_with`]. It
//! holds per-document encoding state, so an [`OutputFormat`] hands out a fresh
//! one for every document being saved.

pub mod html;
pub mod json;
pub mod xml;

use crate::error::{DocGenError, Result};
use crate::tree::{DocTreeNode, DocValue};
use std::fs;
use std::path::{Path, PathBuf};

/// Visitor that encodes one document tree into a target syntax.
pub trait Serializer {
    /// Enter a branch node.
    fn open(&mut self, name: &str);
    /// Visit a leaf node.
    fn leaf(&mut self, name: &str, value: &DocValue);
    /// Leave the branch opened by the matching [`Serializer::open`].
    fn close(&mut self, name: &str);
    /// Encoded document built from the visited tree.
    fn encode(&self) -> Result<String>;
    fn extension(&self) -> &str;

    /// Write the encoded document to `<dir>/<stem>.<ext>`, creating `dir`.
    fn save(&self, dir: &Path, stem: &str) -> Result<PathBuf> {
        let content = self.encode()?;
        fs::create_dir_all(dir).map_err(|e| DocGenError::io(dir, e))?;
        let path = dir.join(format!("{}.{}", stem, self.extension()));
        fs::write(&path, content).map_err(|e| DocGenError::io(&path, e))?;
        Ok(path)
    }
}

/// Factory for serializers of one output format.
pub trait OutputFormat {
    fn name(&self) -> &str;
    fn create_serializer(&self) -> Box<dyn Serializer>;
}

/// Built-in output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Xml,
    Json,
    Html,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Xml, Format::Json, Format::Html];

    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "xml" => Ok(Format::Xml),
            "json" => Ok(Format::Json),
            "html" | "htm" => Ok(Format::Html),
            other => Err(DocGenError::UnknownFormat(other.to_string())),
        }
    }
}

impl OutputFormat for Format {
    fn name(&self) -> &str {
        match self {
            Format::Xml => "xml",
            Format::Json => "json",
            Format::Html => "html",
        }
    }

    fn create_serializer(&self) -> Box<dyn Serializer> {
        match self {
            Format::Xml => Box::new(xml::XmlSerializer::new()),
            Format::Json => Box::new(json::JsonSerializer::new()),
            Format::Html => Box::new(html::HtmlSerializer::new()),
        }
    }
}

/// Create the format list for the given names, in order.
pub fn create_formats<S: AsRef<str>>(names: &[S]) -> Result<Vec<Box<dyn OutputFormat>>> {
    names
        .iter()
        .map(|n| Format::parse(n.as_ref()).map(|f| Box::new(f) as Box<dyn OutputFormat>))
        .collect()
}

/// Write `doc` once per format into `dir/<stem>.<ext>`.
///
/// Stops at the first failing format; artifacts already written stay on disk.
pub fn serialize_doc_to_file(
    doc: &DocTreeNode,
    dir: &Path,
    stem: &str,
    formats: &[Box<dyn OutputFormat>],
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let mut serializer = format.create_serializer();
        doc.serialize_with(serializer.as_mut());
        written.push(serializer.save(dir, stem)?);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_formats() {
        assert_eq!(Format::parse("xml").unwrap(), Format::Xml);
        assert_eq!(Format::parse(" JSON ").unwrap(), Format::Json);
        assert_eq!(Format::parse("htm").unwrap(), Format::Html);
    }

    #[test]
    fn parse_unknown_format_fails() {
        let err = Format::parse("yaml").unwrap_err();
        assert!(err.to_string().contains("unknown format: yaml"));
    }

    #[test]
    fn fan_out_writes_one_file_per_format() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut doc = DocTreeNode::root();
        doc.append_child_with_value_escaped("display_name", "Foo");

        let formats = create_formats(&["xml", "json", "html"]).unwrap();
        let written = serialize_doc_to_file(&doc, dir.path(), "Foo", &formats).unwrap();

        assert_eq!(written.len(), 3);
        for ext in ["xml", "json", "html"] {
            let path = dir.path().join(format!("Foo.{}", ext));
            let content = std::fs::read_to_string(&path).unwrap();
            assert!(content.contains("Foo"), "{} missing value", path.display());
        }
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("Classes").join("Foo");
        let doc = DocTreeNode::root();
        let formats = create_formats(&["json"]).unwrap();
        serialize_doc_to_file(&doc, &nested, "Foo", &formats).unwrap();
        assert!(nested.join("Foo.json").is_file());
    }
}
