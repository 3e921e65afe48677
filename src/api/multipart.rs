/// Minimal `multipart/form-data` encoder for single-file uploads

use chrono::Utc;
use image::ImageFormat;
use std::path::Path;

/// An encoded form with one file field
#[derive(Debug, Clone)]
pub struct FilePart {
    pub boundary: String,
    pub body: Vec<u8>,
}

impl FilePart {
    /// Encode `data` as the only part of a form, under `field`
    pub fn new(field: &str, path: &Path, data: &[u8]) -> Self {
        let boundary = format!(
            "----photo-report-{:x}-{:x}",
            Utc::now().timestamp_nanos_opt().unwrap_or_default(),
            std::process::id()
        );
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().replace(['"', '\r', '\n'], "_"))
            .unwrap_or_else(|| "upload".to_string());

        let mut body = Vec::with_capacity(data.len() + 256);
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type(path)).as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Self { boundary, body }
    }

    /// Value for the request's `Content-Type` header
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }
}

fn content_type(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}
