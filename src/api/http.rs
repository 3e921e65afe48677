use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use super::multipart::FilePart;
use super::wire::{
    LogsQuery, LogsReply, PathReply, RephraseRequest, ReportReply, ReportRequest, RotateReply,
    RotateRequest,
};
use super::{ApiError, ReportApi};
use crate::config::ClientConfig;
use crate::state::data::{PathKind, ProcessedPhoto, SettingsForm};

/// Largest preview image we are willing to download
const MAX_PREVIEW_BYTES: u64 = 32 * 1024 * 1024;

/// Blocking HTTP client for the report server
#[derive(Debug, Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Self {
            agent: builder.build(),
            base_url: config.server_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a server path or an already absolute URL
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }

    fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.resolve(path);
        tracing::debug!(%url, "POST json");
        read_reply(self.agent.post(&url).send_json(body))
    }

    fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let url = self.resolve(path);
        tracing::debug!(%url, "POST");
        read_reply(self.agent.post(&url).call())
    }
}

/// Turn a ureq outcome into a typed reply
///
/// Error statuses still carry the server's JSON body, so both branches go
/// through the same `error` field check.
fn read_reply<R: DeserializeOwned>(
    response: Result<ureq::Response, ureq::Error>,
) -> Result<R, ApiError> {
    match response {
        Ok(resp) => {
            let body = resp
                .into_string()
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            parse_reply(&body)
        }
        Err(ureq::Error::Status(code, resp)) => {
            let body = resp.into_string().unwrap_or_default();
            match parse_reply::<Value>(&body) {
                Err(err @ ApiError::Service(_)) => Err(err),
                _ => Err(ApiError::Transport(format!("HTTP {code}"))),
            }
        }
        Err(err) => Err(ApiError::Transport(err.to_string())),
    }
}

/// Parse a JSON reply, treating an `error` string as a service failure
pub fn parse_reply<R: DeserializeOwned>(body: &str) -> Result<R, ApiError> {
    let value: Value = serde_json::from_str(body)?;
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(ApiError::Service(message.to_string()));
    }
    Ok(serde_json::from_value(value)?)
}

impl ReportApi for HttpClient {
    fn pick_path(&self, kind: PathKind) -> Result<Option<String>, ApiError> {
        let endpoint = match kind {
            PathKind::File => "/api/pick_file",
            PathKind::Folder => "/api/pick_folder",
        };
        let reply: PathReply = self.post_empty(endpoint)?;
        Ok(reply.path.filter(|path| !path.is_empty()))
    }

    fn save_settings(&self, settings: &SettingsForm) -> Result<(), ApiError> {
        let _: Value = self.post_json("/api/save_settings", settings)?;
        Ok(())
    }

    fn upload_image(&self, path: &Path) -> Result<ProcessedPhoto, ApiError> {
        let data = std::fs::read(path).map_err(|e| ApiError::File {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let form = FilePart::new("file", path, &data);
        let url = self.resolve("/api/upload_image");
        tracing::debug!(%url, bytes = form.body.len(), "POST multipart");

        read_reply(
            self.agent
                .post(&url)
                .set("Content-Type", &form.content_type())
                .send_bytes(&form.body),
        )
    }

    fn generate_report(&self, request: &ReportRequest) -> Result<String, ApiError> {
        let reply: ReportReply = self.post_json("/api/generate_report", request)?;
        Ok(reply.file_path)
    }

    fn fetch_work_logs(&self, query: &LogsQuery) -> Result<String, ApiError> {
        let reply: LogsReply = self.post_json("/api/fetch_logs", query)?;
        Ok(reply.logs)
    }

    fn rephrase_logs(&self, request: &RephraseRequest) -> Result<String, ApiError> {
        let reply: LogsReply = self.post_json("/api/rephrase_logs", request)?;
        Ok(reply.logs)
    }

    fn rotate_image(&self, request: &RotateRequest) -> Result<String, ApiError> {
        let reply: RotateReply = self.post_json("/api/rotate_image", request)?;
        Ok(reply.url)
    }

    fn fetch_preview(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.resolve(url);
        let resp = match self.agent.get(&url).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, _)) => {
                return Err(ApiError::Transport(format!("HTTP {code}")))
            }
            Err(err) => return Err(ApiError::Transport(err.to_string())),
        };

        let mut bytes = Vec::new();
        resp.into_reader()
            .take(MAX_PREVIEW_BYTES)
            .read_to_end(&mut bytes)
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(bytes)
    }
}
