/// Report server access
///
/// This module handles:
/// - The `ReportApi` seam every server call goes through (http.rs implements it)
/// - Wire types for requests and replies (wire.rs)
/// - Multipart encoding for photo uploads (multipart.rs)
/// - Running blocking calls off the UI thread

pub mod error;
pub mod http;
pub mod multipart;
pub mod wire;

use std::path::Path;
use std::sync::Arc;

use crate::state::data::{PathKind, ProcessedPhoto, SettingsForm};

pub use error::ApiError;
pub use http::HttpClient;
pub use wire::{LogsQuery, RephraseRequest, ReportRequest, RotateRequest};

/// Everything the client asks of the report server
///
/// Calls block; use [`run`] to execute them from async UI tasks.
pub trait ReportApi: Send + Sync {
    /// Ask the server's native picker for a path; `None` when cancelled
    fn pick_path(&self, kind: PathKind) -> Result<Option<String>, ApiError>;
    fn save_settings(&self, settings: &SettingsForm) -> Result<(), ApiError>;
    fn upload_image(&self, path: &Path) -> Result<ProcessedPhoto, ApiError>;
    /// Returns the location of the generated document
    fn generate_report(&self, request: &ReportRequest) -> Result<String, ApiError>;
    fn fetch_work_logs(&self, query: &LogsQuery) -> Result<String, ApiError>;
    fn rephrase_logs(&self, request: &RephraseRequest) -> Result<String, ApiError>;
    /// Returns the new display URL of the rotated photo
    fn rotate_image(&self, request: &RotateRequest) -> Result<String, ApiError>;
    fn fetch_preview(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

/// Shared handle to the server client
pub type SharedApi = Arc<dyn ReportApi>;

/// Run a blocking server call on tokio's blocking pool
pub async fn run<T, F>(api: SharedApi, call: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn ReportApi) -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || call(api.as_ref()))
        .await
        .map_err(|e| ApiError::Transport(format!("Task join error: {}", e)))?
}

/// A freshly uploaded photo with its preview bytes, if they could be fetched
#[derive(Debug, Clone)]
pub struct UploadedPhoto {
    pub photo: ProcessedPhoto,
    pub preview: Option<Vec<u8>>,
}

/// Upload a photo, then download its processed preview
///
/// A preview failure does not fail the upload; the slot just renders
/// without an image.
pub fn upload_with_preview(api: &dyn ReportApi, path: &Path) -> Result<UploadedPhoto, ApiError> {
    let photo = api.upload_image(path)?;
    let preview = fetch_preview_lossy(api, &photo.url);
    Ok(UploadedPhoto { photo, preview })
}

/// Download a preview, logging instead of failing
pub fn fetch_preview_lossy(api: &dyn ReportApi, url: &str) -> Option<Vec<u8>> {
    match api.fetch_preview(url) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            tracing::warn!(%url, "preview download failed: {err}");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory server used by tests

    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct FakeApi {
        pub calls: Mutex<Vec<String>>,
        pub upload_error: Option<String>,
        pub preview_error: Option<String>,
    }

    impl FakeApi {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ReportApi for FakeApi {
        fn pick_path(&self, kind: PathKind) -> Result<Option<String>, ApiError> {
            self.record(format!("pick {}", kind.label()));
            Ok(Some(format!("/picked/{}", kind.label())))
        }

        fn save_settings(&self, _settings: &SettingsForm) -> Result<(), ApiError> {
            self.record("save_settings");
            Ok(())
        }

        fn upload_image(&self, path: &Path) -> Result<ProcessedPhoto, ApiError> {
            self.record(format!("upload {}", path.display()));
            if let Some(err) = &self.upload_error {
                return Err(ApiError::Service(err.clone()));
            }
            let name = path.file_name().unwrap().to_string_lossy();
            Ok(ProcessedPhoto::new(
                format!("/static/uploads/proc_{name}"),
                format!("proc_{name}"),
            ))
        }

        fn generate_report(&self, request: &ReportRequest) -> Result<String, ApiError> {
            self.record("generate_report");
            Ok(format!("/reports/{} {}.docx", request.month, request.year))
        }

        fn fetch_work_logs(&self, _query: &LogsQuery) -> Result<String, ApiError> {
            self.record("fetch_logs");
            Ok("Checked sensors".into())
        }

        fn rephrase_logs(&self, request: &RephraseRequest) -> Result<String, ApiError> {
            self.record("rephrase_logs");
            Ok(request.logs.to_uppercase())
        }

        fn rotate_image(&self, request: &RotateRequest) -> Result<String, ApiError> {
            self.record("rotate_image");
            Ok(format!("/static/uploads/{}?t=1", request.processed))
        }

        fn fetch_preview(&self, url: &str) -> Result<Vec<u8>, ApiError> {
            self.record(format!("preview {url}"));
            match &self.preview_error {
                Some(err) => Err(ApiError::Transport(err.clone())),
                None => Ok(vec![0xFF, 0xD8]),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeApi;
    use super::*;

    #[tokio::test]
    async fn test_run_executes_off_thread() {
        let api: SharedApi = Arc::new(FakeApi::default());
        let path = run(api, |api| api.pick_path(PathKind::Folder)).await;
        assert_eq!(path, Ok(Some("/picked/folder".to_string())));
    }

    #[test]
    fn test_upload_fetches_preview() {
        let api = FakeApi::default();
        let uploaded = upload_with_preview(&api, Path::new("/photos/a.jpg")).unwrap();

        assert_eq!(uploaded.photo.processed, "proc_a.jpg");
        assert_eq!(uploaded.preview, Some(vec![0xFF, 0xD8]));
        assert_eq!(
            api.calls(),
            ["upload /photos/a.jpg", "preview /static/uploads/proc_a.jpg"]
        );
    }

    #[test]
    fn test_preview_failure_keeps_upload() {
        let api = FakeApi {
            preview_error: Some("404".into()),
            ..FakeApi::default()
        };
        let uploaded = upload_with_preview(&api, Path::new("b.png")).unwrap();
        assert_eq!(uploaded.photo.url, "/static/uploads/proc_b.png");
        assert!(uploaded.preview.is_none());
    }

    #[test]
    fn test_upload_failure_skips_preview() {
        let api = FakeApi {
            upload_error: Some("No selected file".into()),
            ..FakeApi::default()
        };
        let result = upload_with_preview(&api, Path::new("c.jpg"));
        assert_eq!(
            result.map(|u| u.photo),
            Err(ApiError::Service("No selected file".into()))
        );
        assert_eq!(api.calls().len(), 1);
    }
}
