use std::{sync::Arc, time::Duration};

use reqwest::{Client, StatusCode};
use serde::Serialize;

use super::error::{WebhookError, WebhookResult};

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    text: &'a str,
}

/// Posts plain-text messages to a Google Chat incoming webhook.
#[derive(Clone)]
pub struct ChatWebhookClient {
    client: Client,
    webhook_url: Option<Arc<str>>,
}

impl ChatWebhookClient {
    /// Build a client; a missing URL makes every post fail with [`WebhookError::NotConfigured`].
    pub fn new(webhook_url: Option<String>, timeout: Duration) -> WebhookResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| WebhookError::ClientBuilder { source })?;

        Ok(Self {
            client,
            webhook_url: webhook_url.map(Arc::from),
        })
    }

    /// Whether a webhook URL has been configured.
    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Send `text` as a `{ "text": ... }` message; only 200 OK counts as delivered.
    pub async fn post_text(&self, text: &str) -> WebhookResult<()> {
        let url = self
            .webhook_url
            .as_deref()
            .ok_or(WebhookError::NotConfigured)?;

        let response = self
            .client
            .post(url)
            .json(&TextMessage { text })
            .send()
            .await
            .map_err(|source| WebhookError::RequestSend { source })?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(WebhookError::RequestStatus { status }),
        }
    }
}
