//! Form field helpers. Each one renders a label cell, an input cell, and the
//! field's validation messages inside a two-column `egui::Grid`.

use client_core::ValidationErrors;
use egui::{Color32, DragValue, RichText};

pub const ERROR_RED: Color32 = Color32::from_rgb(220, 90, 90);

fn field_errors(ui: &mut egui::Ui, errors: &ValidationErrors, field: &str) {
    for err in errors.errors().iter().filter(|err| err.field == field) {
        ui.label("");
        ui.label(RichText::new(&err.message).small().color(ERROR_RED));
        ui.end_row();
    }
}

pub fn text_field(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut String,
    errors: &ValidationErrors,
    field: &str,
) {
    ui.label(label);
    ui.add(egui::TextEdit::singleline(value).desired_width(260.0));
    ui.end_row();
    field_errors(ui, errors, field);
}

/// Blank input clears the value.
pub fn optional_text(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut Option<String>,
    errors: &ValidationErrors,
    field: &str,
) {
    let mut text = value.clone().unwrap_or_default();
    ui.label(label);
    if ui
        .add(egui::TextEdit::multiline(&mut text).desired_rows(2).desired_width(260.0))
        .changed()
    {
        *value = (!text.trim().is_empty()).then_some(text);
    }
    ui.end_row();
    field_errors(ui, errors, field);
}

pub fn number_field<N: egui::emath::Numeric>(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut N,
    errors: &ValidationErrors,
    field: &str,
) {
    ui.label(label);
    ui.add(DragValue::new(value));
    ui.end_row();
    field_errors(ui, errors, field);
}

pub fn optional_number(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut Option<f32>,
    errors: &ValidationErrors,
    field: &str,
) {
    let mut number = value.unwrap_or(0.0);
    ui.label(label);
    ui.horizontal(|ui| {
        if ui.add(DragValue::new(&mut number).speed(0.5)).changed() {
            *value = Some(number);
        }
        if value.is_some() {
            if ui.small_button("Clear").clicked() {
                *value = None;
            }
        } else {
            ui.weak("not set");
        }
    });
    ui.end_row();
    field_errors(ui, errors, field);
}

/// Reference to another record by id; zero means unset.
pub fn id_field<T>(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut Option<T>,
    wrap: fn(i64) -> T,
    raw: fn(&T) -> i64,
    errors: &ValidationErrors,
    field: &str,
) {
    let mut raw_value = value.as_ref().map(raw).unwrap_or(0);
    ui.label(label);
    ui.horizontal(|ui| {
        if ui
            .add(DragValue::new(&mut raw_value).range(0..=i64::MAX).prefix("#"))
            .changed()
        {
            *value = (raw_value > 0).then(|| wrap(raw_value));
        }
        if value.is_none() {
            ui.weak("not set");
        }
    });
    ui.end_row();
    field_errors(ui, errors, field);
}

pub fn id_list<T>(
    ui: &mut egui::Ui,
    label: &str,
    values: &mut Vec<T>,
    wrap: fn(i64) -> T,
    raw: fn(&T) -> i64,
    errors: &ValidationErrors,
    field: &str,
) {
    let pending_id = ui.make_persistent_id(("id_list", label));
    let mut pending: i64 = ui.data(|data| data.get_temp(pending_id)).unwrap_or(0);

    ui.label(label);
    ui.horizontal_wrapped(|ui| {
        let mut remove = None;
        for (index, item) in values.iter().enumerate() {
            if ui
                .small_button(format!("#{} x", raw(item)))
                .on_hover_text("Remove")
                .clicked()
            {
                remove = Some(index);
            }
        }
        if let Some(index) = remove {
            values.remove(index);
        }
        ui.add(DragValue::new(&mut pending).range(0..=i64::MAX).prefix("#"));
        if ui.button("Add").clicked() && pending > 0 {
            if !values.iter().any(|item| raw(item) == pending) {
                values.push(wrap(pending));
            }
            pending = 0;
        }
    });
    ui.data_mut(|data| data.insert_temp(pending_id, pending));
    ui.end_row();
    field_errors(ui, errors, field);
}

/// Row menu that asks for one more id before following a link. Returns the
/// id once the user confirms a positive value.
pub fn id_prompt(
    ui: &mut egui::Ui,
    label: &str,
    prompt: &str,
    salt: impl std::hash::Hash,
) -> Option<i64> {
    let pending_id = ui.make_persistent_id(("id_prompt", label, salt));
    ui.menu_button(label, |ui| {
        let mut pending: i64 = ui.data(|data| data.get_temp(pending_id)).unwrap_or(0);
        ui.horizontal(|ui| {
            ui.label(prompt);
            ui.add(DragValue::new(&mut pending).range(0..=i64::MAX).prefix("#"));
        });
        let chosen = ui
            .add_enabled(pending > 0, egui::Button::new("Open"))
            .clicked()
            .then_some(pending);
        ui.data_mut(|data| data.insert_temp(pending_id, pending));
        if chosen.is_some() {
            ui.close();
        }
        chosen
    })
    .inner
    .flatten()
}

pub fn choice<T: Copy + PartialEq>(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut T,
    options: &[T],
    label_of: fn(T) -> &'static str,
) {
    ui.label(label);
    egui::ComboBox::from_id_salt(label)
        .selected_text(label_of(*value))
        .show_ui(ui, |ui| {
            for option in options {
                ui.selectable_value(value, *option, label_of(*option));
            }
        });
    ui.end_row();
}
