//! Chat sink: formats game results and operational alerts for the group-chat webhook.

use chrono::Utc;
use chrono_tz::Tz;
use tracing::{error, info, warn};

use crate::{
    dao::chat_webhook::{ChatWebhookClient, WebhookError},
    state::{
        score::{ScoreEntry, signed},
        timestamp::chat_timestamp,
    },
};

/// Sends notifications to the chat webhook, reporting delivery as a `bool`.
pub struct ChatNotifier {
    client: ChatWebhookClient,
    timezone: Tz,
}

impl ChatNotifier {
    /// Wrap a webhook client; timestamps are rendered in `timezone`.
    pub fn new(client: ChatWebhookClient, timezone: Tz) -> Self {
        Self { client, timezone }
    }

    /// Whether a webhook URL is set.
    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    /// Announce a recorded game.
    pub async fn send_game_notification(&self, entry: &ScoreEntry) -> bool {
        let text = game_message(entry, &chat_timestamp(Utc::now(), self.timezone));
        match self.client.post_text(&text).await {
            Ok(()) => {
                info!("notification sent to Google Chat");
                true
            }
            Err(WebhookError::NotConfigured) => {
                warn!("Google Chat webhook URL not configured");
                false
            }
            Err(err) => {
                error!(error = %err, "failed to send Google Chat notification");
                false
            }
        }
    }

    /// Forward an operational alert.
    pub async fn send_error_notification(&self, message: &str) -> bool {
        if !self.client.is_configured() {
            return false;
        }

        match self.client.post_text(&error_message(message)).await {
            Ok(()) => true,
            Err(err) => {
                error!(error = %err, "failed to send error notification");
                false
            }
        }
    }
}

/// Human-readable summary of a game for the group chat.
pub fn game_message(entry: &ScoreEntry, timestamp: &str) -> String {
    let scores = entry
        .iter()
        .map(|(name, score)| format!("  • {name}: {}", signed(score)))
        .collect::<Vec<_>>()
        .join("\n");

    format!("🎮 *New Wild Card Game Result*\n\n📅 Time: {timestamp}\n\n*Scores:*\n{scores}\n\n")
}

fn error_message(message: &str) -> String {
    format!("⚠️ *Wild Card Bot Error*\n\n{message}")
}
