/// Status panel: progress bar above the activity log
use iced::widget::{column, progress_bar, scrollable, text, Column};
use iced::{Color, Element, Length};

use crate::state::status::{LogKind, Progress, StatusLog};
use crate::Message;

const SUCCESS: Color = Color::from_rgb(0.30, 0.75, 0.45);
const ERROR: Color = Color::from_rgb(0.90, 0.35, 0.35);

pub fn status_panel<'a>(log: &'a StatusLog, progress: Progress) -> Element<'a, Message> {
    let entries = Column::with_children(log.entries().map(|entry| {
        let line = text(format!("{}  {}", entry.at.format("%H:%M:%S"), entry.message)).size(13);
        let line = match entry.kind {
            LogKind::Success => line.color(SUCCESS),
            LogKind::Error => line.color(ERROR),
            LogKind::Neutral => line,
        };
        Element::from(line)
    }))
    .spacing(2);

    let summary = if log.is_empty() {
        text("No activity yet").size(13)
    } else {
        text(format!("{} entries", log.len())).size(12)
    };

    column![
        summary,
        progress_bar(0.0..=100.0, f32::from(progress.percent())).height(10.0),
        scrollable(entries).height(Length::Fixed(180.0)).width(Length::Fill),
    ]
    .spacing(8)
    .into()
}
