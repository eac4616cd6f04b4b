//! Raw document payload.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, ErrorKind, Result};

/// The uploaded bytes of a document.
///
/// Content crosses every boundary as a standard base64 string; in memory it
/// stays as cheaply clonable [`Bytes`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DocumentContent(Bytes);

impl DocumentContent {
    /// Wraps raw bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Decodes a standard base64 string.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let decoded = STANDARD.decode(encoded.trim()).map_err(|e| {
            Error::from_source(ErrorKind::InvalidInput, e)
                .with_message("Document content is not valid base64")
        })?;
        Ok(Self(Bytes::from(decoded)))
    }

    /// Encodes the content as a standard base64 string.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    /// Returns the raw bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.0
    }

    /// Returns the content length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for DocumentContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DocumentContent")
            .field(&format_args!("{} bytes", self.0.len()))
            .finish()
    }
}

impl From<Bytes> for DocumentContent {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl From<Vec<u8>> for DocumentContent {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl Serialize for DocumentContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for DocumentContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_base64(&encoded).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_boundary() {
        let content = DocumentContent::new(&b"%PDF-1.7"[..]);
        assert_eq!(content.to_base64(), "JVBERi0xLjc=");

        let json = serde_json::to_string(&content).unwrap();
        assert_eq!(json, "\"JVBERi0xLjc=\"");
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        let err = DocumentContent::from_base64("not base64!").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(serde_json::from_str::<DocumentContent>("\"***\"").is_err());
    }

    #[test]
    fn test_debug_hides_bytes() {
        let content = DocumentContent::new(vec![0u8; 16]);
        assert_eq!(format!("{content:?}"), "DocumentContent(16 bytes)");
    }
}
