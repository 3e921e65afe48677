/// Shared data structures for the application state
///
/// These structs represent the data that flows between the report server
/// and the session: the processed photo record returned by the upload
/// service, and the report metadata the user fills in.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A photo after the server has uploaded and processed it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProcessedPhoto {
    /// URL of the processed image, usually relative to the server
    pub url: String,
    /// Server-side name of the processed image, forwarded to report generation
    pub processed: String,
    /// Server-side name of the unprocessed upload (needed for rotation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    /// Anything else the server returned, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProcessedPhoto {
    pub fn new(url: impl Into<String>, processed: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            processed: processed.into(),
            original: None,
            extra: Map::new(),
        }
    }
}

/// Which report template the server renders
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReportType {
    #[default]
    #[serde(rename = "FM01")]
    Fm01,
    #[serde(rename = "FM02")]
    Fm02,
}

impl ReportType {
    pub const ALL: [ReportType; 2] = [ReportType::Fm01, ReportType::Fm02];

    /// Wire code ("FM01" / "FM02")
    pub fn code(self) -> &'static str {
        match self {
            ReportType::Fm01 => "FM01",
            ReportType::Fm02 => "FM02",
        }
    }

    /// Label shown next to the radio button
    pub fn display_name(self) -> &'static str {
        match self {
            ReportType::Fm01 => "FM01 MET",
            ReportType::Fm02 => "FM02 IT",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Calendar month, serialized by its English name
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Month from its 1-based number
    pub fn from_number(number: u32) -> Option<Month> {
        number
            .checked_sub(1)
            .and_then(|i| Month::ALL.get(i as usize))
            .copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Report metadata the user edits next to the photo grid
#[derive(Debug, Clone, PartialEq)]
pub struct ReportForm {
    pub report_type: ReportType,
    pub month: Month,
    pub year: String,
    pub work_log: String,
}

impl ReportForm {
    /// Form defaulting to the month before `today`
    ///
    /// Reports are written after the month closes, so January produces
    /// December of the previous year.
    pub fn for_date(today: NaiveDate) -> Self {
        let (month, year) = match today.month() {
            1 => (12, today.year() - 1),
            m => (m - 1, today.year()),
        };
        Self {
            report_type: ReportType::default(),
            month: Month::from_number(month).unwrap_or(Month::January),
            year: year.to_string(),
            work_log: String::new(),
        }
    }
}

/// Template and output locations stored by the server
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsForm {
    #[serde(default)]
    pub fm01_template: String,
    #[serde(default)]
    pub fm02_template: String,
    #[serde(default)]
    pub fm01_base_directory: String,
    #[serde(default)]
    pub fm02_base_directory: String,
}

/// One of the four settings fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Fm01Template,
    Fm02Template,
    Fm01BaseDirectory,
    Fm02BaseDirectory,
}

/// What the server picker should ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Folder,
}

impl PathKind {
    pub fn label(self) -> &'static str {
        match self {
            PathKind::File => "file",
            PathKind::Folder => "folder",
        }
    }
}

impl SettingsField {
    pub const ALL: [SettingsField; 4] = [
        SettingsField::Fm01Template,
        SettingsField::Fm02Template,
        SettingsField::Fm01BaseDirectory,
        SettingsField::Fm02BaseDirectory,
    ];

    /// Templates are files, base directories are folders
    pub fn kind(self) -> PathKind {
        match self {
            SettingsField::Fm01Template | SettingsField::Fm02Template => PathKind::File,
            SettingsField::Fm01BaseDirectory | SettingsField::Fm02BaseDirectory => {
                PathKind::Folder
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::Fm01Template => "FM01 template",
            SettingsField::Fm02Template => "FM02 template",
            SettingsField::Fm01BaseDirectory => "FM01 base directory",
            SettingsField::Fm02BaseDirectory => "FM02 base directory",
        }
    }
}

impl SettingsForm {
    pub fn field(&self, field: SettingsField) -> &str {
        match field {
            SettingsField::Fm01Template => &self.fm01_template,
            SettingsField::Fm02Template => &self.fm02_template,
            SettingsField::Fm01BaseDirectory => &self.fm01_base_directory,
            SettingsField::Fm02BaseDirectory => &self.fm02_base_directory,
        }
    }

    pub fn set_field(&mut self, field: SettingsField, value: String) {
        let slot = match field {
            SettingsField::Fm01Template => &mut self.fm01_template,
            SettingsField::Fm02Template => &mut self.fm02_template,
            SettingsField::Fm01BaseDirectory => &mut self.fm01_base_directory,
            SettingsField::Fm02BaseDirectory => &mut self.fm02_base_directory,
        };
        *slot = value;
    }
}
