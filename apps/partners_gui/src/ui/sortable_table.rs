//! Partners table with clickable, sortable headers.

use client_core::{
    table::{CellContent, TableColumn},
    SortState,
};
use eframe::egui;
use shared::domain::{PartnerColumn, PartnerRecord};

/// Draws headers and rows. Returns the column whose header was clicked this frame.
pub fn show(
    ui: &mut egui::Ui,
    columns: &[TableColumn],
    rows: &[PartnerRecord],
    sort: &SortState,
) -> Option<PartnerColumn> {
    let mut activated = None;

    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            egui::Grid::new("partners_table")
                .num_columns(columns.len())
                .striped(true)
                .min_col_width(140.0)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    for column in columns {
                        let header = egui::RichText::new(column.header_text(sort)).strong();
                        if ui
                            .add(egui::Button::new(header).frame(false))
                            .on_hover_text("Sort by this column")
                            .clicked()
                        {
                            activated = Some(column.column);
                        }
                    }
                    ui.end_row();

                    for record in rows {
                        for column in columns {
                            show_cell(ui, column.render(record));
                        }
                        ui.end_row();
                    }
                });

            if rows.is_empty() {
                ui.add_space(8.0);
                ui.weak("No partners to show.");
            }
        });

    activated
}

fn show_cell(ui: &mut egui::Ui, cell: CellContent) {
    match cell {
        CellContent::Text(text) => {
            ui.label(text);
        }
        CellContent::Image { src, href } => match logo_state(ui.ctx(), &src) {
            LogoState::Ready => {
                let response = ui
                    .add(
                        egui::Image::from_uri(src)
                            .max_height(LOGO_MAX_HEIGHT)
                            .sense(egui::Sense::click()),
                    )
                    .on_hover_cursor(egui::CursorIcon::PointingHand)
                    .on_hover_text("Open preroll");
                if response.clicked() {
                    ui.ctx().open_url(egui::OpenUrl::new_tab(href));
                }
            }
            LogoState::Pending => {
                ui.spinner();
            }
            LogoState::Unavailable => {
                ui.hyperlink_to("Preroll", href)
                    .on_hover_text(format!("Logo unavailable: {src}"));
            }
        },
    }
}

const LOGO_MAX_HEIGHT: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogoState {
    Ready,
    Pending,
    Unavailable,
}

fn logo_state(ctx: &egui::Context, src: &str) -> LogoState {
    if src.trim().is_empty() {
        return LogoState::Unavailable;
    }
    match ctx.try_load_image(src, egui::load::SizeHint::default()) {
        Ok(egui::load::ImagePoll::Ready { .. }) => LogoState::Ready,
        Ok(egui::load::ImagePoll::Pending { .. }) => LogoState::Pending,
        Err(err) => {
            tracing::debug!(src, "partner logo unavailable: {err}");
            LogoState::Unavailable
        }
    }
}
