use std::path::Path;

use serde::Deserialize;

use crate::error::BackendError;
use crate::http::ApiClient;

/// A file sent as one part of a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Form part name, usually the attribute the file replaces (`banner`).
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk; the content type is guessed from the extension.
    pub fn from_path(field: impl Into<String>, path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(field, file_name, content_type_for(path), bytes))
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    image_url: String,
}

/// Uploads images for one collection via `POST <endpoint>/upload-image`.
#[derive(Debug, Clone)]
pub struct ImageUploader {
    client: ApiClient,
    endpoint: String,
}

impl ImageUploader {
    pub fn new(client: ApiClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Sends `image` as the `image` part and returns the stored URL.
    pub async fn upload(&self, image: Attachment) -> Result<String, BackendError> {
        let path = format!("{}/upload-image", self.endpoint.trim_end_matches('/'));
        let part = image_part(image)?;
        let form = reqwest::multipart::Form::new().part("image", part);

        tracing::debug!(path = %path, "uploading image");
        let request = self.client.request(reqwest::Method::POST, &path).multipart(form);
        let response = self.client.send(request, &path, None).await?;
        let body: UploadResponse = self.client.decode_json(response).await?;
        tracing::info!(url = %body.image_url, "image uploaded");
        Ok(body.image_url)
    }
}

/// Builds a file part from an attachment.
pub(crate) fn image_part(file: Attachment) -> Result<reqwest::multipart::Part, BackendError> {
    reqwest::multipart::Part::bytes(file.bytes)
        .file_name(file.file_name)
        .mime_str(&file.content_type)
        .map_err(|e| BackendError::Decode {
            message: format!("invalid content type '{}': {e}", file.content_type),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type_for(Path::new("a.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a")), "application/octet-stream");
    }

    #[test]
    fn from_path_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("banner.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let file = Attachment::from_path("banner", &path).unwrap();
        assert_eq!(file.field, "banner");
        assert_eq!(file.file_name, "banner.png");
        assert_eq!(file.content_type, "image/png");
        assert_eq!(file.bytes, b"\x89PNG");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = Attachment::from_path("banner", &dir.path().join("nope.png")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn bad_content_type_is_rejected() {
        let file = Attachment::new("banner", "x.bin", "not a mime", vec![1]);
        assert!(image_part(file).is_err());
    }
}
