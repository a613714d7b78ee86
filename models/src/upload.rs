//! Multipart payload for `POST /api/ads/upload`.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use std::path::Path;

use crate::ad::MediaType;

/// Duration preselected in the upload form.
pub const DEFAULT_DURATION_SECS: u32 = 30;

/// Durations the upload form offers.
pub const DURATION_CHOICES: [u32; 4] = [15, 30, 45, 60];

/// MIME type used when a file extension is not recognised.
pub const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("no file selected")]
    NoFile,
}

/// A file picked for upload, with the MIME type it declares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    #[must_use]
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Free-form fields of the upload form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFields {
    pub name: String,
    pub client_name: String,
    pub duration: u32,
}

impl Default for UploadFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            client_name: String::new(),
            duration: DEFAULT_DURATION_SECS,
        }
    }
}

/// A validated upload, ready to be turned into a multipart form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadPayload {
    pub file: UploadFile,
    pub name: String,
    pub client_name: String,
    pub duration: u32,
    pub media_type: MediaType,
}

impl UploadPayload {
    /// Combine the selected file with the form fields.
    ///
    /// A blank name falls back to the file's own name; the media type is
    /// inferred from the file's declared MIME type.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::NoFile`] when no file is selected.
    pub fn build(file: Option<UploadFile>, fields: &UploadFields) -> Result<Self, UploadError> {
        let file = file.ok_or(UploadError::NoFile)?;
        let name = if fields.name.trim().is_empty() {
            file.file_name.clone()
        } else {
            fields.name.clone()
        };
        let media_type = MediaType::from_mime(&file.mime_type);
        Ok(Self {
            name,
            client_name: fields.client_name.clone(),
            duration: fields.duration,
            media_type,
            file,
        })
    }

    /// Text parts of the multipart form, in submission order. The file itself
    /// goes in a part named `file`.
    #[must_use]
    pub fn form_fields(&self) -> [(&'static str, String); 4] {
        [
            ("name", self.name.clone()),
            ("clientName", self.client_name.clone()),
            ("duration", self.duration.to_string()),
            ("type", self.media_type.as_str().to_owned()),
        ]
    }
}

/// Guess the declared MIME type of a creative from its file extension.
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("mp4" | "m4v") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("avi") => "video/x-msvideo",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => FALLBACK_MIME,
    }
}
