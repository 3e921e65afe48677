use chrono::Local;
use iced::widget::{button, column, container, row, scrollable, text, text_editor};
use iced::{Element, Length, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod photos;
mod state;
mod ui;

use api::{ApiError, HttpClient, SharedApi, UploadedPhoto};
use config::ClientConfig;
use state::data::{Month, ReportForm, ReportType, SettingsField, SettingsForm};
use state::session::{Dialog, DialogLevel, Session};
use state::upload::UploadJob;
use ui::preview::PreviewCache;

/// Main application state
struct ReportBuilder {
    /// Everything the user sees and edits
    session: Session,
    /// Report server client, shared with background tasks
    api: SharedApi,
    /// Client configuration (server URL, cached settings)
    config: ClientConfig,
    /// Preview images of the photos in the slots
    previews: PreviewCache,
    /// Editor buffer for the work log
    work_log: text_editor::Content,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Mouse pressed on a slot (possible drag start)
    SlotPressed(usize),
    /// Mouse released on a slot (click or drop)
    SlotReleased(usize),
    RemovePhoto(usize),
    RotatePhoto(usize),
    RotateFinished(String, Result<(String, Option<Vec<u8>>), ApiError>),
    /// Pick several photos for the empty slots
    AddPhotos,
    /// Pick a folder and upload the photos inside it
    AddFolder,
    FolderScanned(Vec<PathBuf>),
    UploadFinished(UploadJob, Result<UploadedPhoto, ApiError>),

    ReportTypeSelected(ReportType),
    MonthSelected(Month),
    YearChanged(String),
    WorkLogEdited(text_editor::Action),
    FetchLogs,
    LogsFetched(Result<String, ApiError>),
    Rephrase,
    Rephrased(Result<String, ApiError>),
    GenerateReport,
    ReportFinished(Result<String, ApiError>),

    PickPath(SettingsField),
    PathPicked(SettingsField, Result<Option<String>, ApiError>),
    SettingEdited(SettingsField, String),
    SaveSettings,
    SettingsSaved(Result<(), ApiError>),
}

impl ReportBuilder {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = ClientConfig::load();
        let client = HttpClient::new(&config);
        tracing::info!(server = client.base_url(), "report builder started");
        let api: SharedApi = Arc::new(client);

        let form = ReportForm::for_date(Local::now().date_naive());
        let mut session = Session::new(form, config.settings.clone());
        session
            .log
            .neutral(format!("Ready. Report server: {}", config.server_url));

        (
            ReportBuilder {
                session,
                api,
                config,
                previews: PreviewCache::default(),
                work_log: text_editor::Content::new(),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = self.handle(message);
        if let Some(dialog) = self.session.take_dialog() {
            show_dialog(&dialog);
        }
        task
    }

    fn handle(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SlotPressed(index) => {
                self.session.start_drag(index);
                Task::none()
            }
            Message::SlotReleased(index) => {
                let Some(drag) = self.session.take_drag() else {
                    return Task::none();
                };
                if drag.origin != index {
                    self.session.drop_on(drag, index);
                    return Task::none();
                }
                // Press and release on the same slot is a click: upload into it
                match pick_photo_files() {
                    Some(files) => {
                        self.session.queue_for_slot(index, files);
                        self.pump_uploads()
                    }
                    None => Task::none(),
                }
            }
            Message::RemovePhoto(index) => {
                self.session.remove_photo(index);
                self.prune_previews();
                Task::none()
            }
            Message::RotatePhoto(index) => {
                let Some(request) = self.session.begin_rotate(index) else {
                    return Task::none();
                };
                let processed = request.processed.clone();
                Task::perform(
                    api::run(self.api.clone(), move |api| {
                        let url = api.rotate_image(&request)?;
                        let preview = api::fetch_preview_lossy(api, &url);
                        Ok((url, preview))
                    }),
                    move |result| Message::RotateFinished(processed.clone(), result),
                )
            }
            Message::RotateFinished(processed, result) => {
                match result {
                    Ok((url, preview)) => {
                        let moved = self.session.rotated(&processed, Ok(url));
                        if let (Some(_), Some(bytes)) = (moved, preview) {
                            self.previews.insert(processed, bytes);
                        }
                    }
                    Err(err) => {
                        self.session.rotated(&processed, Err(err));
                    }
                }
                Task::none()
            }
            Message::AddPhotos => match pick_photo_files() {
                Some(files) => {
                    self.session.queue_bulk(files);
                    self.pump_uploads()
                }
                None => Task::none(),
            },
            Message::AddFolder => {
                let folder = FileDialog::new()
                    .set_title("Select Folder with Photos")
                    .pick_folder();

                match folder {
                    Some(folder) => {
                        self.session
                            .log
                            .neutral(format!("Scanning {}...", folder.display()));
                        Task::perform(photos::collect_photos_async(folder), Message::FolderScanned)
                    }
                    None => Task::none(),
                }
            }
            Message::FolderScanned(files) => {
                self.session.queue_bulk(files);
                self.pump_uploads()
            }
            Message::UploadFinished(job, result) => {
                let result = result.map(|uploaded| {
                    if let Some(bytes) = uploaded.preview {
                        self.previews.insert(uploaded.photo.processed.clone(), bytes);
                    }
                    uploaded.photo
                });
                self.session.upload_finished(&job, result);
                self.prune_previews();
                self.pump_uploads()
            }

            Message::ReportTypeSelected(report_type) => {
                self.session.form.report_type = report_type;
                Task::none()
            }
            Message::MonthSelected(month) => {
                self.session.form.month = month;
                Task::none()
            }
            Message::YearChanged(year) => {
                if year.chars().all(|c| c.is_ascii_digit()) && year.len() <= 4 {
                    self.session.form.year = year;
                }
                Task::none()
            }
            Message::WorkLogEdited(action) => {
                let is_edit = action.is_edit();
                self.work_log.perform(action);
                if is_edit {
                    self.session.form.work_log = self.work_log.text();
                }
                Task::none()
            }
            Message::FetchLogs => match self.session.begin_fetch_logs() {
                Some(query) => Task::perform(
                    api::run(self.api.clone(), move |api| api.fetch_work_logs(&query)),
                    Message::LogsFetched,
                ),
                None => Task::none(),
            },
            Message::LogsFetched(result) => {
                if let Some(text) = self.session.logs_fetched(result) {
                    self.work_log = text_editor::Content::with_text(&text);
                }
                Task::none()
            }
            Message::Rephrase => match self.session.begin_rephrase() {
                Some(request) => Task::perform(
                    api::run(self.api.clone(), move |api| api.rephrase_logs(&request)),
                    Message::Rephrased,
                ),
                None => Task::none(),
            },
            Message::Rephrased(result) => {
                if let Some(text) = self.session.rephrased(result) {
                    self.work_log = text_editor::Content::with_text(&text);
                }
                Task::none()
            }
            Message::GenerateReport => match self.session.begin_report() {
                Some(request) => Task::perform(
                    api::run(self.api.clone(), move |api| api.generate_report(&request)),
                    Message::ReportFinished,
                ),
                None => Task::none(),
            },
            Message::ReportFinished(result) => {
                self.session.report_finished(result);
                Task::none()
            }

            Message::PickPath(field) => Task::perform(
                api::run(self.api.clone(), move |api| api.pick_path(field.kind())),
                move |result| Message::PathPicked(field, result),
            ),
            Message::PathPicked(field, result) => match self.session.path_picked(field, result) {
                Some(settings) => self.save_settings(settings),
                None => Task::none(),
            },
            Message::SettingEdited(field, value) => {
                self.session.edit_setting(field, value);
                Task::none()
            }
            Message::SaveSettings => self.save_settings(self.session.settings.clone()),
            Message::SettingsSaved(result) => {
                if let Err(err) = result {
                    tracing::warn!("saving settings on the server failed: {err}");
                }
                Task::none()
            }
        }
    }

    /// Start the next queued upload, if the queue is idle
    fn pump_uploads(&mut self) -> Task<Message> {
        let Some(job) = self.session.next_upload() else {
            return Task::none();
        };
        let path = job.path.clone();
        Task::perform(
            api::run(self.api.clone(), move |api| {
                api::upload_with_preview(api, &path)
            }),
            move |result| Message::UploadFinished(job.clone(), result),
        )
    }

    /// Send settings to the server (fire-and-forget) and cache them locally
    fn save_settings(&mut self, settings: SettingsForm) -> Task<Message> {
        if self.config.settings != settings {
            self.config.settings = settings.clone();
            if let Err(err) = self.config.save() {
                tracing::warn!("could not cache settings: {err}");
            }
        }
        Task::perform(
            api::run(self.api.clone(), move |api| api.save_settings(&settings)),
            Message::SettingsSaved,
        )
    }

    fn prune_previews(&mut self) {
        let live: Vec<&str> = self
            .session
            .slots
            .iter()
            .flatten()
            .map(|photo| photo.processed.as_str())
            .collect();
        self.previews.retain_live(live);
        tracing::debug!(cached = self.previews.len(), "pruned previews");
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let toolbar = row![
            button("Add photos").on_press(Message::AddPhotos).padding(8),
            button("Add folder").on_press(Message::AddFolder).padding(8),
            text(match self.session.uploads.pending() {
                0 => "Click a slot to upload into it, drag a slot onto another to swap".to_string(),
                queued => format!("{queued} photo(s) waiting to upload"),
            })
            .size(13),
        ]
        .spacing(10)
        .align_y(iced::Alignment::Center);

        let grid = ui::grid::photo_grid(ui::grid::slot_views(&self.session), &self.previews);

        let left = column![
            text("Photos").size(22),
            toolbar,
            grid,
            text("Status").size(22),
            ui::status::status_panel(&self.session.log, self.session.progress),
        ]
        .spacing(14)
        .width(Length::FillPortion(3));

        let right = column![
            text("Report").size(22),
            ui::form::report_panel(&self.session, &self.work_log),
            text("Settings").size(22),
            ui::form::settings_panel(&self.session.settings),
        ]
        .spacing(14)
        .width(Length::FillPortion(2));

        container(scrollable(row![left, right].spacing(30).padding(24)))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Window title, with the latest status line
    fn title(&self) -> String {
        match self.session.log.latest() {
            Some(entry) => format!("Photo Report Builder - {}", entry.message),
            None => "Photo Report Builder".to_string(),
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Native multi-file picker for photos
fn pick_photo_files() -> Option<Vec<PathBuf>> {
    FileDialog::new()
        .set_title("Select Photos")
        .add_filter("Images", &photos::PICKER_EXTENSIONS)
        .pick_files()
        .filter(|files| !files.is_empty())
}

/// Show a blocking confirmation; returns when the user dismisses it
fn show_dialog(dialog: &Dialog) {
    let level = match dialog.level {
        DialogLevel::Info => MessageLevel::Info,
        DialogLevel::Warning => MessageLevel::Warning,
        DialogLevel::Error => MessageLevel::Error,
    };
    let _ = MessageDialog::new()
        .set_level(level)
        .set_title(dialog.title.as_str())
        .set_description(dialog.message.as_str())
        .set_buttons(MessageButtons::Ok)
        .show();
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    iced::application(
        ReportBuilder::title,
        ReportBuilder::update,
        ReportBuilder::view,
    )
    .theme(ReportBuilder::theme)
    .window_size((1280.0, 860.0))
    .centered()
    .run_with(ReportBuilder::new)
}
