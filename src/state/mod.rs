/// Configured players and name matching.
pub mod roster;
/// Score entries, parsing and the zero-sum rule.
pub mod score;
/// Local timestamp rendering.
pub mod timestamp;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    dao::chat_webhook::ChatWebhookClient,
    services::{
        chat_notifier::ChatNotifier,
        sheet_recorder::{SheetConnector, SheetRecorder},
    },
};

/// Shared handle passed to handlers and background tasks.
pub type SharedState = Arc<AppState>;

/// Central application state: immutable configuration plus the two sinks.
pub struct AppState {
    config: AppConfig,
    recorder: SheetRecorder,
    notifier: ChatNotifier,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The spreadsheet is not contacted until the first write or an explicit initialization.
    pub fn new(
        config: AppConfig,
        sheet_connector: Option<SheetConnector>,
        webhook: ChatWebhookClient,
    ) -> SharedState {
        let recorder = SheetRecorder::new(config.roster.clone(), config.timezone, sheet_connector);
        let notifier = ChatNotifier::new(webhook, config.timezone);
        Arc::new(Self {
            config,
            recorder,
            notifier,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Spreadsheet sink.
    pub fn recorder(&self) -> &SheetRecorder {
        &self.recorder
    }

    /// Chat webhook sink.
    pub fn notifier(&self) -> &ChatNotifier {
        &self.notifier
    }
}
