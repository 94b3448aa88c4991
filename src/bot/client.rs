//! Minimal Telegram Bot API client: long polling, sending and deleting messages.

use std::{sync::Arc, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Public Bot API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";
/// How long Telegram may hold a `getUpdates` call open.
pub const LONG_POLL_SECS: u64 = 30;
/// HTTP timeout; must outlive the long poll.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(LONG_POLL_SECS + 10);

/// Convenient result alias returning [`TelegramError`] failures.
pub type TelegramResult<T> = Result<T, TelegramError>;

/// Failures that can occur while talking to the Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build Telegram client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent or its response could not be read.
    #[error("Telegram `{method}` request failed")]
    Request {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },
    /// The Bot API answered `ok: false`.
    #[error("Telegram `{method}` rejected: {description}")]
    Api {
        method: &'static str,
        description: String,
    },
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

/// Incoming update; only message updates are requested.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

/// Text message received or sent by the bot.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Conversation a message belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Sender of a message.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

impl User {
    /// Username, else first name.
    pub fn display_name(&self) -> Option<&str> {
        self.username.as_deref().or(self.first_name.as_deref())
    }
}

#[derive(Debug, Serialize)]
struct GetUpdates {
    offset: i64,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct DeleteMessage {
    chat_id: i64,
    message_id: i64,
}

/// Authenticated handle on the Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: Arc<str>,
}

impl TelegramClient {
    /// Create a client for the public API.
    pub fn new(token: &str) -> TelegramResult<Self> {
        Self::with_base_url(token, DEFAULT_API_BASE_URL)
    }

    /// Create a client targeting another API root.
    pub fn with_base_url(token: &str, api_base_url: &str) -> TelegramResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| TelegramError::ClientBuilder { source })?;
        let base_url = format!("{}/bot{token}", api_base_url.trim_end_matches('/'));
        Ok(Self {
            client,
            base_url: Arc::from(base_url),
        })
    }

    async fn call<B, T>(&self, method: &'static str, body: &B) -> TelegramResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|source| TelegramError::Request { method, source })?;

        let payload = response
            .json::<ApiResponse<T>>()
            .await
            .map_err(|source| TelegramError::Request { method, source })?;

        match payload {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(TelegramError::Api {
                method,
                description: description.unwrap_or_else(|| "no description".into()),
            }),
        }
    }

    /// Long-poll for message updates newer than `offset`.
    pub async fn get_updates(&self, offset: i64) -> TelegramResult<Vec<Update>> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: LONG_POLL_SECS,
                allowed_updates: ["message"],
            },
        )
        .await
    }

    /// Send a Markdown-formatted message and return it.
    pub async fn send_markdown(&self, chat_id: i64, text: &str) -> TelegramResult<Message> {
        self.call(
            "sendMessage",
            &SendMessage {
                chat_id,
                text,
                parse_mode: Some("Markdown"),
            },
        )
        .await
    }

    /// Send a plain-text message and return it.
    pub async fn send_text(&self, chat_id: i64, text: &str) -> TelegramResult<Message> {
        self.call(
            "sendMessage",
            &SendMessage {
                chat_id,
                text,
                parse_mode: None,
            },
        )
        .await
    }

    /// Delete a message previously sent by the bot.
    pub async fn delete_message(&self, chat_id: i64, message_id: i64) -> TelegramResult<()> {
        let _: bool = self
            .call(
                "deleteMessage",
                &DeleteMessage {
                    chat_id,
                    message_id,
                },
            )
            .await?;
        Ok(())
    }
}
