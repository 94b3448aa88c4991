//! Telegram front-end: long-polls for messages and answers commands and score submissions.

pub mod client;
pub mod commands;

use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    bot::{
        client::{Message, TelegramClient, TelegramError, User},
        commands::{Incoming, SAVE_ERROR_MESSAGE, SAVING_MESSAGE, check_scores, classify},
    },
    services::submission_service,
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
enum HandlerError {
    #[error(transparent)]
    Telegram(#[from] TelegramError),
}

/// Poll for updates forever, handling each message on its own task.
///
/// Polling errors are logged and retried with a growing pause; they never stop the loop.
pub async fn run(state: SharedState, client: TelegramClient) {
    let mut offset = 0;
    let mut delay = INITIAL_DELAY;
    info!("telegram bot polling started");

    loop {
        match client.get_updates(offset).await {
            Ok(updates) => {
                delay = INITIAL_DELAY;
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    let Some(message) = update.message else {
                        continue;
                    };
                    let state = state.clone();
                    let client = client.clone();
                    tokio::spawn(async move {
                        let chat_id = message.chat.id;
                        if let Err(err) = handle_message(&state, &client, message).await {
                            warn!(chat_id, error = %err, "failed to answer telegram message");
                        }
                    });
                }
            }
            Err(err) => {
                warn!(error = %err, retry_in = ?delay, "telegram polling failed");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
        }
    }
}

async fn handle_message(
    state: &SharedState,
    client: &TelegramClient,
    message: Message,
) -> Result<(), HandlerError> {
    let Some(text) = message.text.as_deref() else {
        return Ok(());
    };
    let chat_id = message.chat.id;

    match classify(text) {
        Incoming::Command(command) => {
            debug!(chat_id, ?command, "answering command");
            client.send_markdown(chat_id, command.reply()).await?;
        }
        Incoming::Scores(text) => {
            let submitted_by = message
                .from
                .as_ref()
                .and_then(User::display_name)
                .unwrap_or("Unknown")
                .to_string();
            handle_scores(state, client, chat_id, text, submitted_by).await?;
        }
        Incoming::Ignored => {}
    }

    Ok(())
}

async fn handle_scores(
    state: &SharedState,
    client: &TelegramClient,
    chat_id: i64,
    text: &str,
    submitted_by: String,
) -> Result<(), HandlerError> {
    let entry = match check_scores(text) {
        Ok(entry) => entry,
        Err(reply) => {
            debug!(chat_id, "rejected score message");
            send_formatted(client, chat_id, &reply).await?;
            return Ok(());
        }
    };

    let loading = client.send_text(chat_id, SAVING_MESSAGE).await?;
    let result = submission_service::submit(state, entry.clone(), Some(submitted_by)).await;

    if let Err(err) = client.delete_message(chat_id, loading.message_id).await {
        warn!(chat_id, error = %err, "failed to delete loading message");
    }

    match result {
        Ok(outcome) => {
            send_formatted(client, chat_id, &commands::status_message(&entry, outcome)).await?;
        }
        Err(err) => {
            warn!(chat_id, error = %err, "bot submission failed");
            client.send_text(chat_id, SAVE_ERROR_MESSAGE).await?;
        }
    }

    Ok(())
}

/// Send Markdown, resending as plain text when Telegram cannot parse it.
///
/// Replies echo player names, and a name such as `a_b` is not valid Markdown.
async fn send_formatted(
    client: &TelegramClient,
    chat_id: i64,
    text: &str,
) -> Result<(), HandlerError> {
    match client.send_markdown(chat_id, text).await {
        Ok(_) => Ok(()),
        Err(TelegramError::Api { description, .. }) => {
            warn!(chat_id, %description, "markdown reply rejected; resending as plain text");
            client.send_text(chat_id, text).await?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
