//! Documents and their lifecycle.

mod content;
mod tags;

use bytes::Bytes;
use derive_builder::Builder;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

pub use self::content::DocumentContent;
pub use self::tags::{Tags, UPLOAD_TAG};
use crate::{DocumentId, Error, Result};

/// Bytes in one mebibyte, the unit of the size filter.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Processing status of a document.
///
/// Uploads start as [`DocumentStatus::Ready`]; external processors may move a
/// document to `Processing` or `Error`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DocumentStatus {
    /// Being processed by an external collaborator.
    Processing,
    /// Available for viewing and analysis.
    #[default]
    Ready,
    /// Processing failed.
    Error,
}

impl DocumentStatus {
    /// Returns whether the document can be opened.
    #[inline]
    pub fn is_ready(self) -> bool {
        matches!(self, DocumentStatus::Ready)
    }
}

/// A document in the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(
    name = "DocumentBuilder",
    pattern = "owned",
    setter(into, prefix = "with"),
    build_fn(validate = "Self::validate", error = "Error")
)]
pub struct Document {
    /// Stable unique identifier.
    #[builder(default)]
    pub id: DocumentId,
    /// Display name, usually the original file name.
    pub name: String,
    /// Size in bytes.
    #[builder(default)]
    pub size: u64,
    /// MIME type of the content.
    #[builder(default = "String::from(\"application/pdf\")")]
    pub mime_type: String,
    /// When the document was uploaded.
    #[builder(default = "Timestamp::now()")]
    pub uploaded_at: Timestamp,
    /// Current processing status.
    #[builder(default)]
    pub status: DocumentStatus,
    /// AI generated summary, once available.
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Uploaded bytes; absent for documents listed without a payload.
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<DocumentContent>,
    /// Tags used for filtering.
    #[builder(default)]
    #[serde(default)]
    pub tags: Tags,
}

impl Document {
    /// Returns a new document builder.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    /// Returns the size in mebibytes.
    pub fn size_mb(&self) -> f64 {
        self.size as f64 / BYTES_PER_MB
    }

    /// Returns whether the document carries a payload the assistant can read.
    pub fn has_content(&self) -> bool {
        self.content.as_ref().is_some_and(|c| !c.is_empty())
    }
}

impl DocumentBuilder {
    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(Error::invalid_input().with_message("document name must not be empty"));
        }
        Ok(())
    }
}

/// A file handed over by the upload collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Original file name.
    pub name: String,
    /// MIME type reported by the source.
    pub mime_type: String,
    /// Raw file bytes.
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Creates a new uploaded file.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Turns the upload into a ready document tagged [`UPLOAD_TAG`].
    pub fn into_document(self, id: DocumentId, uploaded_at: Timestamp) -> Result<Document> {
        Document::builder()
            .with_id(id)
            .with_name(self.name)
            .with_size(self.bytes.len() as u64)
            .with_mime_type(self.mime_type)
            .with_uploaded_at(uploaded_at)
            .with_status(DocumentStatus::Ready)
            .with_content(DocumentContent::from(self.bytes))
            .with_tags(Tags::from_strings([UPLOAD_TAG]))
            .build()
    }
}
