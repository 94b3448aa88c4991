mod client;
mod error;

pub use client::ChatWebhookClient;
pub use error::{WebhookError, WebhookResult};
