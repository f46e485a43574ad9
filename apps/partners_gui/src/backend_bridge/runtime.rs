//! Runtime bridge between UI command queue and backend event intake.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use client_core::{HttpPartnerSource, PartnerSource, Settings};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Starts the backend worker against the configured HTTP data source.
pub fn launch(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    match HttpPartnerSource::from_settings(&settings) {
        Ok(source) => {
            tracing::info!(url = %source.url(), "partner data source configured");
            spawn_worker(Arc::new(source), cmd_rx, ui_tx);
        }
        Err(err) => {
            tracing::error!("failed to configure partner data source: {err:#}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("{err:#}"),
            )));
        }
    }
}

/// Runs fetch commands on a dedicated tokio runtime until the command queue closes.
///
/// Every fetch runs as its own task, so overlapping requests may complete in any
/// order; the reply token lets the page controller drop stale ones.
pub fn spawn_worker(
    source: Arc<dyn PartnerSource>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            let mut tasks = Vec::new();
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::FetchPartners { token } => {
                        let source = Arc::clone(&source);
                        let ui_tx = ui_tx.clone();
                        tasks.push(tokio::spawn(async move {
                            tracing::debug!(token = token.0, "starting partner fetch");
                            let result = source.fetch_partners().await;
                            if ui_tx
                                .send(UiEvent::PartnersFetched { token, result })
                                .is_err()
                            {
                                tracing::warn!(
                                    token = token.0,
                                    "ui event queue closed before fetch completed"
                                );
                            }
                        }));
                    }
                }
                tasks.retain(|task| !task.is_finished());
            }

            for task in tasks {
                let _ = task.await;
            }
            tracing::info!("backend worker stopped");
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::{RequestToken, StaticPartnerSource};
    use crossbeam_channel::bounded;
    use shared::domain::PartnerRecord;

    #[test]
    fn worker_answers_each_fetch_with_its_token() {
        let partners = vec![PartnerRecord {
            name: "Acme".to_string(),
            group_prefix: "AC".to_string(),
            logo: String::new(),
            preroll: String::new(),
            ofsted_rating: "Good".to_string(),
        }];
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);

        let handle = spawn_worker(
            Arc::new(StaticPartnerSource::new(partners.clone())),
            cmd_rx,
            ui_tx,
        );
        cmd_tx
            .send(BackendCommand::FetchPartners {
                token: RequestToken(1),
            })
            .expect("queue fetch");
        cmd_tx
            .send(BackendCommand::FetchPartners {
                token: RequestToken(2),
            })
            .expect("queue fetch");
        drop(cmd_tx);
        handle.join().expect("worker thread");

        let mut tokens = Vec::new();
        for event in ui_rx.try_iter() {
            if let UiEvent::PartnersFetched { token, result } = event {
                assert_eq!(result.expect("fetch"), partners);
                tokens.push(token.0);
            }
        }
        tokens.sort_unstable();
        assert_eq!(tokens, vec![1, 2]);
    }

    #[test]
    fn invalid_settings_report_startup_error() {
        let (_cmd_tx, cmd_rx) = bounded(1);
        let (ui_tx, ui_rx) = bounded(1);
        launch(
            Settings {
                data_url: "file:///tmp/data.json".to_string(),
                ..Settings::default()
            },
            cmd_rx,
            ui_tx,
        );

        match ui_rx.try_recv().expect("startup error event") {
            UiEvent::Error(err) => {
                assert_eq!(err.context(), UiErrorContext::BackendStartup);
                assert!(err.message().contains("unsupported scheme"));
            }
            _ => panic!("expected startup error"),
        }
    }
}
