//! Filter form widgets, one per field descriptor.

use client_core::FilterForm;
use eframe::egui;
use shared::domain::{FieldDescriptor, FieldType, FilterCriteria};

/// Draws the form. Returns the collected criteria when the user applies it, either
/// with the Apply button or Enter in a text field.
pub fn show(ui: &mut egui::Ui, form: &mut FilterForm) -> Option<FilterCriteria> {
    let mut submitted = false;
    let fields = form.fields().to_vec();

    ui.horizontal_wrapped(|ui| {
        for field in &fields {
            ui.vertical(|ui| {
                ui.label(egui::RichText::new(field.label.as_str()).strong());
                match field.field_type {
                    FieldType::Input => {
                        let response = ui.add(
                            egui::TextEdit::singleline(form.text_mut(field.name))
                                .desired_width(180.0),
                        );
                        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
                        {
                            submitted = true;
                        }
                    }
                    FieldType::Dropdown => show_dropdown(ui, form, field),
                }
            });
        }

        ui.vertical(|ui| {
            ui.label("");
            if ui.button("Apply").clicked() {
                submitted = true;
            }
        });
    });

    submitted.then(|| form.submit())
}

/// Searchable multi-select dropdown.
fn show_dropdown(ui: &mut egui::Ui, form: &mut FilterForm, field: &FieldDescriptor) {
    let chosen: Vec<&str> = field
        .options()
        .iter()
        .filter(|option| form.is_selected(field.name, &option.value))
        .map(|option| option.text.as_str())
        .collect();
    let summary = if chosen.is_empty() {
        "Any".to_string()
    } else {
        chosen.join(", ")
    };

    egui::ComboBox::from_id_salt(("filter_dropdown", field.name.key()))
        .selected_text(summary)
        .width(220.0)
        .show_ui(ui, |ui| {
            ui.add(egui::TextEdit::singleline(form.search_mut(field.name)).hint_text("Search"));
            ui.separator();
            for option in form.visible_options(field) {
                let mut checked = form.is_selected(field.name, &option.value);
                if ui.checkbox(&mut checked, option.text.as_str()).changed() {
                    form.set_selected(field.name, &option.value, checked);
                }
            }
        });
}
