use chrono::Local;
use client_core::{
    table::{partner_columns, TableColumn},
    FetchOutcome, FilterForm, LoadState, PageController, RequestToken,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{domain::FilterCriteria, error::FetchError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
};
use crate::ui::{filter_form, sortable_table};

pub struct PartnersApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    data_url: String,
    page: PageController,
    form: FilterForm,
    columns: Vec<TableColumn>,
    status: String,
    startup_error: Option<UiError>,
}

impl PartnersApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        data_url: impl Into<String>,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            data_url: data_url.into(),
            page: PageController::new(),
            form: FilterForm::default(),
            columns: partner_columns(),
            status: "Starting".to_string(),
            startup_error: None,
        };
        app.request_initial_load();
        app
    }

    fn request_initial_load(&mut self) {
        let token = self.page.begin_initial_load();
        self.request_fetch(token);
    }

    fn submit_filter(&mut self, criteria: FilterCriteria) {
        tracing::info!(active = criteria.active().count(), "applying partner filters");
        let token = self.page.begin_filter(criteria);
        self.request_fetch(token);
    }

    fn retry_fetch(&mut self) {
        match self.page.retry() {
            Some(token) => self.request_fetch(token),
            None => self.request_initial_load(),
        }
    }

    fn request_fetch(&mut self, token: RequestToken) {
        self.status = "Loading partners".to_string();
        if let Err(reason) =
            dispatch_backend_command(&self.cmd_tx, BackendCommand::FetchPartners { token })
        {
            self.page
                .complete_fetch(token, Err(FetchError::Transport(reason.clone())));
            self.status = reason;
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    tracing::info!("{message}");
                    // The loading indicator stays until the pending fetch resolves.
                    if !self.page.is_loading() {
                        self.status = message;
                    }
                }
                UiEvent::PartnersFetched { token, result } => {
                    if self.page.complete_fetch(token, result) == FetchOutcome::Applied {
                        self.status = self.ready_status();
                    }
                }
                UiEvent::Error(err) => {
                    // No fetch can complete once the worker failed to start.
                    if let Some(token) = self.page.pending_token() {
                        self.page.complete_fetch(
                            token,
                            Err(FetchError::Transport(err.message().to_string())),
                        );
                    }
                    self.status = err.banner_text();
                    self.startup_error = Some(err);
                }
            }
        }
    }

    fn ready_status(&self) -> String {
        match self.page.load_state() {
            LoadState::Ready => {
                let loaded = self
                    .page
                    .last_loaded_at()
                    .map(|at| at.with_timezone(&Local).format("%H:%M:%S").to_string())
                    .unwrap_or_default();
                format!(
                    "Showing {} of {} partners (loaded {loaded})",
                    self.page.rows().len(),
                    self.page.full_dataset().len()
                )
            }
            LoadState::Failed(err) => UiError::from_fetch_error(err).banner_text(),
            LoadState::Idle | LoadState::Loading => "Loading partners".to_string(),
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let error = self
            .startup_error
            .clone()
            .or_else(|| match self.page.load_state() {
                LoadState::Failed(err) => Some(UiError::from_fetch_error(err)),
                _ => None,
            });

        ui.horizontal(|ui| {
            if self.page.is_loading() {
                ui.spinner();
            }
            match &error {
                Some(err) => {
                    let color = ui.visuals().error_fg_color;
                    ui.colored_label(color, err.banner_text());
                    if err.context() == UiErrorContext::FetchPartners && ui.button("Retry").clicked()
                    {
                        self.retry_fetch();
                    }
                }
                None => {
                    ui.label(self.status.as_str());
                }
            }
        });
        ui.weak(format!("Source: {}", self.data_url));
    }
}

impl eframe::App for PartnersApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("partners_filters").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.heading("Partners");
            ui.add_space(4.0);
            if let Some(criteria) = filter_form::show(ui, &mut self.form) {
                self.submit_filter(criteria);
            }
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            ui.separator();
            let clicked = sortable_table::show(
                ui,
                &self.columns,
                self.page.rows(),
                self.page.sort_state(),
            );
            if let Some(column) = clicked {
                self.page.activate_header(column);
            }
        });

        if self.page.is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use shared::domain::{PartnerColumn, PartnerRecord};

    fn partner(name: &str, rating: &str) -> PartnerRecord {
        PartnerRecord {
            name: name.to_string(),
            group_prefix: name[..2].to_uppercase(),
            logo: String::new(),
            preroll: String::new(),
            ofsted_rating: rating.to_string(),
        }
    }

    fn fixture() -> (PartnersApp, Receiver<BackendCommand>, Sender<UiEvent>) {
        let (cmd_tx, cmd_rx) = bounded(16);
        let (ui_tx, ui_rx) = bounded(16);
        let app = PartnersApp::new(cmd_tx, ui_rx, "http://127.0.0.1:1/data.json");
        (app, cmd_rx, ui_tx)
    }

    fn next_token(cmd_rx: &Receiver<BackendCommand>) -> RequestToken {
        match cmd_rx.try_recv().expect("queued command") {
            BackendCommand::FetchPartners { token } => token,
        }
    }

    #[test]
    fn startup_requests_initial_load_and_shows_results() {
        let (mut app, cmd_rx, ui_tx) = fixture();
        let token = next_token(&cmd_rx);
        assert!(app.page.is_loading());

        ui_tx
            .send(UiEvent::PartnersFetched {
                token,
                result: Ok(vec![partner("Beta", "Outstanding"), partner("Acme", "Good")]),
            })
            .expect("send");
        app.process_ui_events();

        assert_eq!(app.page.rows().len(), 2);
        assert!(app.status.starts_with("Showing 2 of 2 partners"));
    }

    #[test]
    fn filter_submission_refetches_and_ignores_stale_reply() {
        let (mut app, cmd_rx, ui_tx) = fixture();
        let initial = next_token(&cmd_rx);

        app.submit_filter(
            FilterCriteria::new().with_selection(PartnerColumn::OfstedRating, ["good"]),
        );
        let filtered = next_token(&cmd_rx);

        let data = vec![partner("Beta", "Outstanding"), partner("Acme", "Good")];
        ui_tx
            .send(UiEvent::PartnersFetched {
                token: filtered,
                result: Ok(data.clone()),
            })
            .expect("send");
        ui_tx
            .send(UiEvent::PartnersFetched {
                token: initial,
                result: Ok(data),
            })
            .expect("send");
        app.process_ui_events();

        let names: Vec<&str> = app.page.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Acme"]);
    }

    #[test]
    fn disconnected_backend_fails_fetch_instead_of_hanging() {
        let (cmd_tx, cmd_rx) = bounded(1);
        let (_ui_tx, ui_rx) = bounded::<UiEvent>(1);
        drop(cmd_rx);

        let app = PartnersApp::new(cmd_tx, ui_rx, "http://127.0.0.1:1/data.json");
        assert!(matches!(
            app.page.load_state(),
            LoadState::Failed(FetchError::Transport(_))
        ));
        assert!(app.status.contains("disconnected"));
    }

    #[test]
    fn startup_error_fails_pending_fetch() {
        let (mut app, _cmd_rx, ui_tx) = fixture();
        ui_tx
            .send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                "invalid data url",
            )))
            .expect("send");
        app.process_ui_events();

        assert!(!app.page.is_loading());
        assert!(app.status.starts_with("Backend worker startup failure"));
    }

    #[test]
    fn retry_after_failed_filter_keeps_criteria() {
        let (mut app, cmd_rx, ui_tx) = fixture();
        let data = vec![partner("Beta", "Outstanding"), partner("Acme", "Good")];
        let initial = next_token(&cmd_rx);
        ui_tx
            .send(UiEvent::PartnersFetched {
                token: initial,
                result: Ok(data.clone()),
            })
            .expect("send");
        app.process_ui_events();

        app.submit_filter(
            FilterCriteria::new().with_selection(PartnerColumn::OfstedRating, ["good"]),
        );
        let filtered = next_token(&cmd_rx);
        ui_tx
            .send(UiEvent::PartnersFetched {
                token: filtered,
                result: Err(FetchError::Status { status: 503 }),
            })
            .expect("send");
        app.process_ui_events();
        assert!(matches!(app.page.load_state(), LoadState::Failed(_)));

        app.retry_fetch();
        let retried = next_token(&cmd_rx);
        ui_tx
            .send(UiEvent::PartnersFetched {
                token: retried,
                result: Ok(data),
            })
            .expect("send");
        app.process_ui_events();

        let names: Vec<&str> = app.page.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Acme"]);
    }

    #[test]
    fn worker_info_does_not_hide_loading_status() {
        let (mut app, cmd_rx, ui_tx) = fixture();
        let token = next_token(&cmd_rx);
        ui_tx
            .send(UiEvent::Info("Backend worker ready".to_string()))
            .expect("send");
        app.process_ui_events();
        assert_eq!(app.status, "Loading partners");

        ui_tx
            .send(UiEvent::PartnersFetched {
                token,
                result: Ok(vec![partner("Acme", "Good")]),
            })
            .expect("send");
        ui_tx
            .send(UiEvent::Info("Backend worker ready".to_string()))
            .expect("send");
        app.process_ui_events();
        assert_eq!(app.status, "Backend worker ready");
    }

    #[test]
    fn fetch_failure_reports_network_error() {
        let (mut app, cmd_rx, ui_tx) = fixture();
        let token = next_token(&cmd_rx);
        ui_tx
            .send(UiEvent::PartnersFetched {
                token,
                result: Err(FetchError::Status { status: 404 }),
            })
            .expect("send");
        app.process_ui_events();

        assert_eq!(
            app.status,
            "Network error: partner data source answered with HTTP status 404"
        );
    }
}
