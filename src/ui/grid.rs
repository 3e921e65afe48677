/// Photo grid
///
/// Rendering happens in two steps: `slot_views` turns the session into a
/// plain description of the eight cells, and `photo_grid` turns that
/// description into widgets.

use iced::widget::{button, column, container, image, mouse_area, row, text, Space};
use iced::{Alignment, Border, Color, Element, Length, Theme};
use iced_aw::Wrap;

use super::preview::PreviewCache;
use crate::state::session::Session;
use crate::state::slots::SLOT_COUNT;
use crate::Message;

/// Displayed size of a processed photo (half the server's 328x278)
const PHOTO_WIDTH: f32 = 164.0;
const PHOTO_HEIGHT: f32 = 139.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotContent {
    Empty,
    Photo {
        url: String,
        processed: String,
        rotatable: bool,
    },
}

/// What one grid cell shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotView {
    pub index: usize,
    pub content: SlotContent,
    /// The cell a drag started from
    pub dragging: bool,
    /// An upload for this cell is running
    pub uploading: bool,
}

impl SlotView {
    /// 1-based position shown on the cell
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn is_filled(&self) -> bool {
        matches!(self.content, SlotContent::Photo { .. })
    }
}

pub fn slot_views(session: &Session) -> Vec<SlotView> {
    let drag_origin = session.drag().map(|d| d.origin);
    let uploading = session.uploads.in_flight().map(|job| job.slot);

    (0..SLOT_COUNT)
        .map(|index| SlotView {
            index,
            content: match session.slots.get(index) {
                Some(photo) => SlotContent::Photo {
                    url: photo.url.clone(),
                    processed: photo.processed.clone(),
                    rotatable: photo.original.is_some(),
                },
                None => SlotContent::Empty,
            },
            dragging: drag_origin == Some(index),
            uploading: uploading == Some(index),
        })
        .collect()
}

pub fn photo_grid<'a>(views: Vec<SlotView>, previews: &'a PreviewCache) -> Element<'a, Message> {
    let cells: Vec<Element<'a, Message>> = views
        .into_iter()
        .map(|view| slot_cell(view, previews))
        .collect();

    Wrap::with_elements(cells)
        .spacing(12.0)
        .line_spacing(12.0)
        .into()
}

fn slot_cell<'a>(view: SlotView, previews: &'a PreviewCache) -> Element<'a, Message> {
    let index = view.index;
    let header = text(view.number().to_string()).size(14);

    let body: Element<'a, Message> = match &view.content {
        SlotContent::Photo {
            url,
            processed,
            rotatable,
        } => {
            let picture: Element<'a, Message> = match previews.get(processed) {
                Some(handle) => image(handle.clone())
                    .width(Length::Fixed(PHOTO_WIDTH))
                    .height(Length::Fixed(PHOTO_HEIGHT))
                    .into(),
                None => container(text(url.clone()).size(11))
                    .width(Length::Fixed(PHOTO_WIDTH))
                    .height(Length::Fixed(PHOTO_HEIGHT))
                    .center_x(Length::Fixed(PHOTO_WIDTH))
                    .center_y(Length::Fixed(PHOTO_HEIGHT))
                    .into(),
            };
            let controls = row![
                button(text("Rotate").size(12))
                    .on_press_maybe(rotatable.then_some(Message::RotatePhoto(index)))
                    .padding(4),
                Space::with_width(Length::Fill),
                button(text("Remove").size(12))
                    .on_press(Message::RemovePhoto(index))
                    .padding(4),
            ];
            column![picture, controls].spacing(4).into()
        }
        SlotContent::Empty => {
            let label = if view.uploading { "Uploading..." } else { "➕ Upload" };
            container(text(label).size(16))
                .width(Length::Fixed(PHOTO_WIDTH))
                .height(Length::Fixed(PHOTO_HEIGHT))
                .center_x(Length::Fixed(PHOTO_WIDTH))
                .center_y(Length::Fixed(PHOTO_HEIGHT))
                .into()
        }
    };

    let filled = view.is_filled();
    let dragging = view.dragging;
    let cell = container(column![header, body].spacing(4).align_x(Alignment::Start))
        .padding(8)
        .style(move |theme: &Theme| cell_style(theme, filled, dragging));

    mouse_area(cell)
        .on_press(Message::SlotPressed(index))
        .on_release(Message::SlotReleased(index))
        .into()
}

fn cell_style(theme: &Theme, filled: bool, dragging: bool) -> container::Style {
    let palette = theme.extended_palette();
    let border_color = if dragging {
        palette.primary.strong.color
    } else if filled {
        palette.success.base.color
    } else {
        palette.background.strong.color
    };

    container::Style {
        background: Some(palette.background.weak.color.into()),
        border: Border {
            color: border_color,
            width: if dragging { 3.0 } else { 1.5 },
            radius: 6.0.into(),
        },
        text_color: Some(if filled {
            palette.background.base.text
        } else {
            Color { a: 0.7, ..palette.background.base.text }
        }),
        ..container::Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{ProcessedPhoto, ReportForm, SettingsForm};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn session() -> Session {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        Session::new(ReportForm::for_date(today), SettingsForm::default())
    }

    #[test]
    fn test_empty_session_has_eight_empty_cells() {
        let views = slot_views(&session());
        assert_eq!(views.len(), SLOT_COUNT);
        assert!(views.iter().all(|v| v.content == SlotContent::Empty));
        assert_eq!(views[7].number(), 8);
    }

    #[test]
    fn test_only_assigned_cell_is_filled() {
        let mut session = session();
        session
            .slots
            .assign(3, ProcessedPhoto::new("/static/uploads/proc_a.jpg", "proc_a.jpg"))
            .unwrap();

        let views = slot_views(&session);
        let filled: Vec<usize> = views.iter().filter(|v| v.is_filled()).map(|v| v.index).collect();
        assert_eq!(filled, [3]);
        assert_eq!(
            views[3].content,
            SlotContent::Photo {
                url: "/static/uploads/proc_a.jpg".into(),
                processed: "proc_a.jpg".into(),
                rotatable: false,
            }
        );
        assert_eq!(session.slots.count_filled(), 1);
    }

    #[test]
    fn test_drag_and_upload_markers() {
        let mut session = session();
        session.start_drag(2);
        session.queue_bulk(vec![PathBuf::from("a.jpg")]);
        let job = session.next_upload().unwrap();

        let views = slot_views(&session);
        assert!(views[2].dragging);
        assert!(views[job.slot].uploading);
        assert_eq!(views.iter().filter(|v| v.dragging || v.uploading).count(), 2);
    }

    #[test]
    fn test_rendering_does_not_touch_state() {
        let mut session = session();
        session
            .slots
            .assign(0, ProcessedPhoto::new("/u/a.jpg", "a.jpg"))
            .unwrap();
        let before = session.slots.clone();

        let previews = PreviewCache::default();
        let _ = photo_grid(slot_views(&session), &previews);
        assert_eq!(session.slots, before);
    }
}
