//! Resource payload normalization.
//!
//! The pipeline accepts either a plaintext note or a named file. Before
//! encryption both are flattened to raw bytes plus the display metadata the
//! record will carry.

use crate::types::ResourceKind;

/// Default content type when a file upload does not declare one.
const OCTET_STREAM: &str = "application/octet-stream";

/// Input to the write path: a note or a file attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourcePayload {
    /// A plaintext note.
    Note(String),
    /// A file with its original name and (optional) declared content type.
    File {
        name: String,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
}

impl ResourcePayload {
    /// The resource kind this payload produces.
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourcePayload::Note(_) => ResourceKind::Note,
            ResourcePayload::File { .. } => ResourceKind::File,
        }
    }

    /// Flatten to bytes, capturing filename/content-type/size metadata.
    pub fn normalize(self) -> NormalizedPayload {
        match self {
            ResourcePayload::Note(text) => {
                let bytes = text.into_bytes();
                let size = bytes.len() as u64;
                NormalizedPayload {
                    bytes,
                    file_name: "note.txt".to_string(),
                    content_type: "text/plain".to_string(),
                    size,
                }
            }
            ResourcePayload::File {
                name,
                content_type,
                bytes,
            } => {
                let size = bytes.len() as u64;
                NormalizedPayload {
                    bytes,
                    file_name: name,
                    content_type: content_type.unwrap_or_else(|| OCTET_STREAM.to_string()),
                    size,
                }
            }
        }
    }
}

/// A payload flattened to bytes, ready for encryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPayload {
    /// The raw plaintext bytes.
    pub bytes: Vec<u8>,
    /// Display filename recorded in metadata.
    pub file_name: String,
    /// Content type recorded in metadata.
    pub content_type: String,
    /// Plaintext size in bytes.
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_normalization() {
        let payload = ResourcePayload::Note("meeting recap".to_string());
        assert_eq!(payload.kind(), ResourceKind::Note);

        let normalized = payload.normalize();
        assert_eq!(normalized.bytes, b"meeting recap");
        assert_eq!(normalized.file_name, "note.txt");
        assert_eq!(normalized.content_type, "text/plain");
        assert_eq!(normalized.size, 13);
    }

    #[test]
    fn test_file_normalization_keeps_declared_type() {
        let payload = ResourcePayload::File {
            name: "contract.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: vec![1, 2, 3],
        };
        assert_eq!(payload.kind(), ResourceKind::File);

        let normalized = payload.normalize();
        assert_eq!(normalized.file_name, "contract.pdf");
        assert_eq!(normalized.content_type, "application/pdf");
        assert_eq!(normalized.size, 3);
    }

    #[test]
    fn test_file_without_type_defaults_to_octet_stream() {
        let payload = ResourcePayload::File {
            name: "dump.bin".to_string(),
            content_type: None,
            bytes: vec![],
        };
        let normalized = payload.normalize();
        assert_eq!(normalized.content_type, OCTET_STREAM);
        assert_eq!(normalized.size, 0);
    }
}
