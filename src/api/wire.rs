/// Request and response bodies exchanged with the report server

use serde::{Deserialize, Serialize};

use crate::state::data::{Month, ReportType};

/// Body of `POST /api/generate_report`
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub report_type: ReportType,
    pub month: Month,
    pub year: String,
    pub work_log: String,
    /// Processed payloads in slot order
    pub images: Vec<String>,
}

/// Body of `POST /api/fetch_logs`
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LogsQuery {
    pub month: Month,
    pub year: String,
    pub report_type: ReportType,
}

/// Body of `POST /api/rephrase_logs`
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RephraseRequest {
    pub logs: String,
    pub report_type: ReportType,
}

/// Body of `POST /api/rotate_image`
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RotateRequest {
    pub original: String,
    pub processed: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct PathReply {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ReportReply {
    pub file_path: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct LogsReply {
    #[serde(default)]
    pub logs: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RotateReply {
    pub url: String,
}
