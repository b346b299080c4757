//! In-memory document model.
//!
//! A [`Doc`] carries either textual content (JSON, XML, plain text) or raw
//! binary content, together with optional metadata properties and an
//! existence flag. Content kind is inferred from file extensions when a
//! document is loaded from disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};

/// The kind of content a [`Doc`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentKind {
    /// JSON text
    #[default]
    Json,
    /// XML text
    Xml,
    /// Plain text
    Text,
    /// Raw bytes
    Binary,
}

impl ContentKind {
    /// Whether this kind stores its content as text.
    pub fn is_textual(self) -> bool {
        !matches!(self, ContentKind::Binary)
    }

    /// The content type sent on the wire for this kind.
    pub fn mime_type(self) -> &'static str {
        match self {
            ContentKind::Json => "application/json",
            ContentKind::Xml => "application/xml",
            ContentKind::Text => "text/plain",
            ContentKind::Binary => "application/octet-stream",
        }
    }

    /// Infer a content kind from a file extension, case-insensitively.
    ///
    /// The table follows the server's default mime/extension mappings.
    /// Accepts the extension with or without the leading dot; anything
    /// unrecognized maps to [`ContentKind::Binary`].
    pub fn from_extension(extension: &str) -> Self {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "xml" | "xsd" | "sgml" | "sgm" | "svg" | "xhtml" | "xslt" | "xsl" => ContentKind::Xml,
            "txt" | "csv" | "asc" | "css" | "etx" | "htc" | "html" | "htm" | "js" | "m3u8"
            | "manifest" | "rtf" | "rtx" | "si" | "sl" | "tsv" | "wml" | "wmls" | "xqy" | "xqe"
            | "xq" | "xquery" => ContentKind::Text,
            "json" => ContentKind::Json,
            _ => ContentKind::Binary,
        }
    }
}

/// Metadata properties attached to a document.
pub type Properties = BTreeMap<String, Value>;

/// An in-memory document.
///
/// Exactly one of the text and binary slots is populated at a time: the
/// text slot for [`ContentKind::Json`], [`ContentKind::Xml`], and
/// [`ContentKind::Text`], the binary slot for [`ContentKind::Binary`].
/// The setters maintain that invariant.
#[derive(Debug, Clone, Default)]
pub struct Doc {
    kind: ContentKind,
    text: Option<String>,
    binary: Option<Vec<u8>>,
    /// Metadata properties, populated by [`Connection::metadata`]
    ///
    /// [`Connection::metadata`]: crate::Connection::metadata
    pub properties: Option<Properties>,
    /// Whether the document exists on the server
    pub exists: bool,
}

impl Doc {
    /// Create an empty JSON document that does not exist on the server.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document of the given kind.
    pub fn with_kind(kind: ContentKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Create a JSON document from its text form.
    pub fn json(content: impl Into<String>) -> Self {
        let mut doc = Self::new();
        doc.set_json_content(content);
        doc
    }

    /// Create an XML document.
    pub fn xml(content: impl Into<String>) -> Self {
        let mut doc = Self::new();
        doc.set_xml_content(content);
        doc
    }

    /// Create a plain-text document.
    pub fn text(content: impl Into<String>) -> Self {
        let mut doc = Self::new();
        doc.set_text_content(content);
        doc
    }

    /// Create a binary document from raw bytes.
    pub fn binary(content: impl Into<Vec<u8>>) -> Self {
        let mut doc = Self::new();
        doc.set_binary_content(content);
        doc
    }

    /// Serialize a JSON value into a new JSON document.
    pub fn from_json_value(value: &Value) -> Self {
        Self::json(value.to_string())
    }

    /// The content kind of this document.
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Textual content, if this document holds any.
    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Binary content, if this document holds any.
    pub fn binary_content(&self) -> Option<&[u8]> {
        self.binary.as_deref()
    }

    /// The content as bytes, whichever slot is populated.
    pub fn content_bytes(&self) -> Option<&[u8]> {
        match self.kind {
            ContentKind::Binary => self.binary_content(),
            _ => self.text.as_deref().map(str::as_bytes),
        }
    }

    /// Replace the content with JSON text.
    pub fn set_json_content(&mut self, content: impl Into<String>) {
        self.kind = ContentKind::Json;
        self.text = Some(content.into());
        self.binary = None;
    }

    /// Replace the content with XML text.
    pub fn set_xml_content(&mut self, content: impl Into<String>) {
        self.kind = ContentKind::Xml;
        self.text = Some(content.into());
        self.binary = None;
    }

    /// Replace the content with plain text.
    pub fn set_text_content(&mut self, content: impl Into<String>) {
        self.kind = ContentKind::Text;
        self.text = Some(content.into());
        self.binary = None;
    }

    /// Replace the content with raw bytes.
    pub fn set_binary_content(&mut self, content: impl Into<Vec<u8>>) {
        self.kind = ContentKind::Binary;
        self.binary = Some(content.into());
        self.text = None;
    }

    /// Parse the textual content as JSON.
    ///
    /// # Errors
    /// [`Error::Format`] when the document has no textual content or the
    /// content is not valid JSON.
    pub fn json_value(&self) -> Result<Value> {
        let text = self
            .text
            .as_deref()
            .ok_or_else(|| Error::Format("document has no textual content".to_string()))?;
        serde_json::from_str(text)
            .map_err(|e| Error::Format(format!("document content is not valid JSON: {e}")))
    }

    /// Load a document from a local file, inferring the content kind from
    /// the extension after the last `.` in `path`.
    ///
    /// Textual kinds are decoded as UTF-8; unrecognized extensions keep the
    /// raw bytes as [`ContentKind::Binary`].
    ///
    /// # Errors
    /// [`Error::InvalidPath`] when `path` contains no `.`, [`Error::Io`] on
    /// read failure, [`Error::Format`] when a textual file is not UTF-8.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path.to_string_lossy();
        let extension = match name.rfind('.') {
            Some(dot) => &name[dot..],
            None => {
                return Err(Error::InvalidPath(format!(
                    "no file extension in: {name}"
                )))
            }
        };
        let kind = ContentKind::from_extension(extension);
        let bytes = fs::read(path)?;

        let mut doc = Self::new();
        if kind.is_textual() {
            let text = String::from_utf8(bytes)
                .map_err(|e| Error::Format(format!("{name} is not valid UTF-8: {e}")))?;
            doc.kind = kind;
            doc.text = Some(text);
        } else {
            doc.set_binary_content(bytes);
        }
        Ok(doc)
    }

    /// Write the document's content bytes to a local file.
    ///
    /// # Errors
    /// [`Error::Format`] when the document has no content, [`Error::Io`] on
    /// write failure.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self
            .content_bytes()
            .ok_or_else(|| Error::Format("document has no content to write".to_string()))?;
        fs::write(path, bytes)?;
        Ok(())
    }
}

/// An ordered, restartable collection of document URIs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocRefs {
    uris: Vec<String>,
}

impl DocRefs {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document URI.
    pub fn add(&mut self, uri: impl Into<String>) {
        self.uris.push(uri.into());
    }

    /// Number of URIs held.
    pub fn len(&self) -> usize {
        self.uris.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    /// Iterate over the URIs in insertion order. Iteration can be restarted
    /// by calling this again.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.uris.iter()
    }
}

impl IntoIterator for DocRefs {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.uris.into_iter()
    }
}

impl<'a> IntoIterator for &'a DocRefs {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.uris.iter()
    }
}
