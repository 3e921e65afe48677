/// Session state for one run of the report builder
///
/// `Session` owns everything the window shows and is the only place that
/// mutates it. Each user flow is split in two: a `begin_*`/`request_*` method
/// that validates and returns the request to send (or `None` when nothing
/// should be sent), and a `*_finished` method that folds the server's answer
/// back into the state. The application shell runs the request in between.

use super::data::{ProcessedPhoto, ReportForm, SettingsField, SettingsForm};
use super::slots::{SlotManager, SLOT_COUNT};
use super::status::{Progress, StatusLog};
use super::upload::{UploadJob, UploadQueue};
use crate::api::{ApiError, LogsQuery, RephraseRequest, ReportRequest, RotateRequest};
use std::path::PathBuf;

/// A drag that started on a slot, waiting for its drop target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub origin: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogLevel {
    Info,
    Warning,
    Error,
}

/// A blocking confirmation the user has to dismiss
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub level: DialogLevel,
    pub title: String,
    pub message: String,
}

/// Long-running server calls the UI greys out buttons for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pending {
    pub report: bool,
    pub work_log: bool,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub slots: SlotManager,
    pub uploads: UploadQueue,
    pub log: StatusLog,
    pub progress: Progress,
    pub form: ReportForm,
    pub settings: SettingsForm,
    pub pending: Pending,
    drag: Option<DragSession>,
    dialog: Option<Dialog>,
}

impl Session {
    pub fn new(form: ReportForm, settings: SettingsForm) -> Self {
        Self {
            slots: SlotManager::new(),
            uploads: UploadQueue::new(),
            log: StatusLog::new(),
            progress: Progress::default(),
            form,
            settings,
            pending: Pending::default(),
            drag: None,
            dialog: None,
        }
    }

    /// Dialog waiting to be shown, if any
    pub fn take_dialog(&mut self) -> Option<Dialog> {
        self.dialog.take()
    }

    fn show_dialog(&mut self, level: DialogLevel, title: &str, message: impl Into<String>) {
        self.dialog = Some(Dialog {
            level,
            title: title.to_string(),
            message: message.into(),
        });
    }

    // ========== Uploads ==========

    /// Files picked by clicking a slot
    pub fn queue_for_slot(&mut self, slot: usize, files: Vec<PathBuf>) {
        self.uploads.enqueue_for_slot(slot, files);
    }

    /// Files picked for the grid as a whole
    pub fn queue_bulk(&mut self, files: Vec<PathBuf>) {
        if files.is_empty() {
            self.log.neutral("No photos found to upload");
            return;
        }
        self.uploads.enqueue_bulk(files);
    }

    /// Start the next queued upload unless one is already running
    pub fn next_upload(&mut self) -> Option<UploadJob> {
        let dispatch = self.uploads.dispatch(&self.slots);
        if !dispatch.dropped.is_empty() {
            self.log.neutral(format!(
                "Skipped {} photo(s): all {} slots are taken",
                dispatch.dropped.len(),
                SLOT_COUNT
            ));
        }
        let job = dispatch.job?;
        self.log
            .neutral(format!("Uploading and processing photo {}...", job.slot + 1));
        Some(job)
    }

    /// Fold an upload result into the slots
    pub fn upload_finished(&mut self, job: &UploadJob, result: Result<ProcessedPhoto, ApiError>) {
        self.uploads.finish();
        let number = job.slot + 1;
        match result {
            Ok(photo) => match self.slots.assign(job.slot, photo) {
                Ok(()) => self.log.success(format!("Photo {number} processed!")),
                Err(err) => self.log.error(format!("Error uploading photo {number}: {err}")),
            },
            Err(err) => self
                .log
                .error(format!("Error uploading photo {number}: {err}")),
        }
    }

    /// Empty a slot from its remove button
    pub fn remove_photo(&mut self, index: usize) -> Option<ProcessedPhoto> {
        match self.slots.clear(index) {
            Ok(removed) => {
                self.log.neutral(format!("Removed photo {}", index + 1));
                removed
            }
            Err(err) => {
                tracing::warn!("remove ignored: {err}");
                None
            }
        }
    }

    // ========== Drag and drop ==========

    pub fn start_drag(&mut self, index: usize) {
        if index < SLOT_COUNT {
            self.drag = Some(DragSession { origin: index });
        }
    }

    /// End the current drag, if one is running
    pub fn take_drag(&mut self) -> Option<DragSession> {
        self.drag.take()
    }

    pub fn drag(&self) -> Option<DragSession> {
        self.drag
    }

    /// Drop a dragged slot onto `target`, swapping the two photos
    ///
    /// Returns whether anything moved.
    pub fn drop_on(&mut self, drag: DragSession, target: usize) -> bool {
        if drag.origin == target {
            return false;
        }
        match self.slots.swap(drag.origin, target) {
            Ok(()) => {
                self.log.neutral(format!(
                    "Swapped photo {} with {}",
                    drag.origin + 1,
                    target + 1
                ));
                true
            }
            Err(err) => {
                tracing::warn!("drop ignored: {err}");
                false
            }
        }
    }

    // ========== Report ==========

    /// Validate and build the report request
    ///
    /// With fewer than eight photos nothing is sent: the user gets an error
    /// entry and a blocking dialog instead.
    pub fn begin_report(&mut self) -> Option<ReportRequest> {
        if self.pending.report {
            return None;
        }
        let filled = self.slots.count_filled();
        if filled < SLOT_COUNT {
            self.log.error(format!(
                "Please upload all {SLOT_COUNT} photos before generating the report. ({filled}/{SLOT_COUNT})"
            ));
            self.show_dialog(
                DialogLevel::Warning,
                "Photos missing",
                format!("{SLOT_COUNT} photos are required!"),
            );
            return None;
        }
        let images = match self.slots.to_ordered_payload() {
            Ok(images) => images,
            Err(err) => {
                self.log.error(format!("Cannot generate report: {err}"));
                return None;
            }
        };

        let request = ReportRequest {
            report_type: self.form.report_type,
            month: self.form.month,
            year: self.form.year.trim().to_string(),
            work_log: self.form.work_log.clone(),
            images,
        };

        self.pending.report = true;
        self.progress.set(10);
        self.log.neutral(format!(
            "Starting report generation for {} {} {}...",
            request.report_type, request.month, request.year
        ));
        self.progress.set(30);
        self.log.neutral("Preparing document and folders...");
        Some(request)
    }

    pub fn report_finished(&mut self, result: Result<String, ApiError>) {
        self.pending.report = false;
        match result {
            Ok(file_path) => {
                self.progress.set(100);
                self.log.success("SUCCESS! Report generated at:");
                self.log.success(file_path.clone());
                self.show_dialog(
                    DialogLevel::Info,
                    "Report generated",
                    format!("Report generated successfully!\n\nLocation: {file_path}"),
                );
            }
            Err(err) => {
                self.progress.reset();
                self.log.error(format!("Failed to generate report: {err}"));
                self.show_dialog(DialogLevel::Error, "Report failed", format!("Error: {err}"));
            }
        }
    }

    // ========== Settings ==========

    /// Hand edit of a settings field; saved when the user confirms
    pub fn edit_setting(&mut self, field: SettingsField, value: String) {
        self.settings.set_field(field, value);
    }

    /// Result of the server-side path picker
    ///
    /// Returns the full settings form to persist when a path was chosen.
    pub fn path_picked(
        &mut self,
        field: SettingsField,
        result: Result<Option<String>, ApiError>,
    ) -> Option<SettingsForm> {
        match result {
            Ok(Some(path)) => {
                self.settings.set_field(field, path);
                Some(self.settings.clone())
            }
            Ok(None) => None,
            Err(err) => {
                self.log
                    .error(format!("Error picking {}: {err}", field.kind().label()));
                None
            }
        }
    }

    // ========== Work log ==========

    pub fn begin_fetch_logs(&mut self) -> Option<LogsQuery> {
        if self.pending.work_log {
            return None;
        }
        self.pending.work_log = true;
        self.log.neutral(format!(
            "Fetching work logs for {} {} {}...",
            self.form.report_type, self.form.month, self.form.year
        ));
        Some(LogsQuery {
            month: self.form.month,
            year: self.form.year.trim().to_string(),
            report_type: self.form.report_type,
        })
    }

    /// Returns the new work log text on success
    pub fn logs_fetched(&mut self, result: Result<String, ApiError>) -> Option<String> {
        self.pending.work_log = false;
        match result {
            Ok(logs) => {
                self.log.success("Work logs fetched");
                self.form.work_log = logs.clone();
                Some(logs)
            }
            Err(err) => {
                self.log.error(format!("Failed to fetch work logs: {err}"));
                None
            }
        }
    }

    pub fn begin_rephrase(&mut self) -> Option<RephraseRequest> {
        if self.pending.work_log {
            return None;
        }
        if self.form.work_log.trim().is_empty() {
            self.log.error("No logs to rephrase");
            return None;
        }
        self.pending.work_log = true;
        self.log.neutral("Rephrasing work logs...");
        Some(RephraseRequest {
            logs: self.form.work_log.clone(),
            report_type: self.form.report_type,
        })
    }

    /// Returns the new work log text on success
    pub fn rephrased(&mut self, result: Result<String, ApiError>) -> Option<String> {
        self.pending.work_log = false;
        match result {
            Ok(logs) => {
                self.log.success("Work logs rephrased");
                self.form.work_log = logs.clone();
                Some(logs)
            }
            Err(err) => {
                self.log.error(format!("Failed to rephrase work logs: {err}"));
                None
            }
        }
    }

    // ========== Rotation ==========

    pub fn begin_rotate(&mut self, index: usize) -> Option<RotateRequest> {
        let photo = self.slots.get(index)?;
        let Some(original) = photo.original.clone() else {
            self.log
                .error(format!("Photo {} cannot be rotated", index + 1));
            return None;
        };
        let request = RotateRequest {
            original,
            processed: photo.processed.clone(),
        };
        self.log.neutral(format!("Rotating photo {}...", index + 1));
        Some(request)
    }

    /// Point the rotated photo at its new URL, wherever it sits now
    ///
    /// Returns the slot and URL to refresh the preview from.
    pub fn rotated(
        &mut self,
        processed: &str,
        result: Result<String, ApiError>,
    ) -> Option<(usize, String)> {
        let url = match result {
            Ok(url) => url,
            Err(err) => {
                self.log.error(format!("Failed to rotate photo: {err}"));
                return None;
            }
        };
        let Some(index) = self.slots.position_of(processed) else {
            tracing::info!(processed, "rotated photo was removed meanwhile");
            return None;
        };
        let photo = self.slots.get_mut(index)?;
        photo.url = url.clone();
        self.log.success(format!("Photo {} rotated", index + 1));
        Some((index, url))
    }
}
