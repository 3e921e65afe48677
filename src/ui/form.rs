/// Settings and report metadata panels
use iced::widget::{
    button, column, pick_list, radio, row, text, text_editor, text_input, Column,
};
use iced::{Alignment, Element, Length};

use crate::state::data::{Month, ReportType, SettingsField, SettingsForm};
use crate::state::session::Session;
use crate::state::slots::SLOT_COUNT;
use crate::Message;

/// Template and output locations, each with a server-side browse button
pub fn settings_panel<'a>(settings: &'a SettingsForm) -> Element<'a, Message> {
    let rows = SettingsField::ALL.into_iter().map(move |field| -> Element<'a, Message> {
        row![
            text(field.label()).width(Length::Fixed(150.0)),
            text_input("not set", settings.field(field))
                .on_input(move |value| Message::SettingEdited(field, value))
                .on_submit(Message::SaveSettings)
                .width(Length::Fill),
            button("Browse").on_press(Message::PickPath(field)),
        ]
        .spacing(8)
        .align_y(Alignment::Center)
        .into()
    });

    Column::with_children(rows)
        .spacing(6)
        .push(text("Settings are saved on the report server").size(12))
        .into()
}

/// Report type, period, work log and the generate button
pub fn report_panel<'a>(
    session: &'a Session,
    work_log: &'a text_editor::Content,
) -> Element<'a, Message> {
    let form = &session.form;
    let busy = session.pending.work_log;

    let types = ReportType::ALL.into_iter().fold(row![].spacing(16), |types, kind| {
        types.push(radio(
            kind.display_name(),
            kind,
            Some(form.report_type),
            Message::ReportTypeSelected,
        ))
    });

    let period = row![
        pick_list(Month::ALL, Some(form.month), Message::MonthSelected).width(Length::Fixed(150.0)),
        text_input("Year", &form.year)
            .on_input(Message::YearChanged)
            .width(Length::Fixed(90.0)),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let log_actions = row![
        button("Fetch work logs").on_press_maybe((!busy).then_some(Message::FetchLogs)),
        button("Rephrase").on_press_maybe((!busy).then_some(Message::Rephrase)),
    ]
    .spacing(8);

    let label = if session.slots.is_full() {
        "Generate report".to_string()
    } else {
        format!("Generate report ({}/{SLOT_COUNT} photos)", session.slots.count_filled())
    };
    let generate = button(text(label))
        .on_press_maybe((!session.pending.report).then_some(Message::GenerateReport))
        .padding(10);

    column![
        types,
        period,
        text("Work log").size(14),
        text_editor(work_log)
            .on_action(Message::WorkLogEdited)
            .height(Length::Fixed(160.0)),
        log_actions,
        generate,
    ]
    .spacing(10)
    .into()
}
