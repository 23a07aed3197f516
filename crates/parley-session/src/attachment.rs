//! File attachments carried as inline data on the next user turn.

use std::path::Path;

use base64::Engine as _;
use parley_gemini::Part;

use crate::error::{Error, Result};

/// A file staged for the next user turn
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub mime_type: String,
    /// Base64-encoded file bytes
    pub data: String,
}

impl Attachment {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Read a local file, sniffing the mime type from its extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| Error::Attachment {
            path: path.display().to_string(),
            source,
        })?;
        let mime_type =
            mime_for_extension(path.extension().and_then(|e| e.to_str()).unwrap_or(""));
        Ok(Self {
            mime_type: mime_type.to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        })
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Convert into a wire part for the outgoing user turn
    pub fn into_part(self) -> Part {
        Part::inline_data(self.mime_type, self.data)
    }
}

fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" | "md" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_from_path_encodes_and_sniffs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"hi").unwrap();

        let attachment = Attachment::from_path(&path).unwrap();
        assert_eq!(attachment.mime_type, "text/plain");
        assert_eq!(attachment.data, "aGk=");
        assert!(!attachment.is_image());
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Attachment::from_path("/no/such/file.png").unwrap_err();
        assert!(matches!(err, Error::Attachment { .. }));
        assert!(err.to_string().contains("/no/such/file.png"));
    }

    #[test]
    fn test_mime_sniffing() {
        assert_eq!(mime_for_extension("PNG"), "image/png");
        assert_eq!(mime_for_extension("jpeg"), "image/jpeg");
        assert_eq!(mime_for_extension("pdf"), "application/pdf");
        assert_eq!(mime_for_extension("bin"), "application/octet-stream");
        assert_eq!(mime_for_extension(""), "application/octet-stream");
    }

    #[test]
    fn test_into_part_wire_shape() {
        let part = Attachment::new("image/png", "aGk=").into_part();
        let value = serde_json::to_value(&part).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"inlineData": {"mimeType": "image/png", "data": "aGk="}})
        );
    }
}
