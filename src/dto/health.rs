use serde::Serialize;
use utoipa::ToSchema;

/// Sink readiness reported by `/healthcheck`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` when games can be saved to the spreadsheet, `degraded` otherwise.
    pub status: String,
    /// A spreadsheet handle is open.
    pub sheet_ready: bool,
    /// A chat webhook URL is configured.
    pub chat_configured: bool,
}

impl HealthResponse {
    /// Summarize both sinks; only the spreadsheet decides the overall status.
    pub fn from_sinks(sheet_ready: bool, chat_configured: bool) -> Self {
        let status = if sheet_ready { "ok" } else { "degraded" };
        Self {
            status: status.to_string(),
            sheet_ready,
            chat_configured,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_chat_does_not_degrade() {
        assert_eq!(
            serde_json::to_value(HealthResponse::from_sinks(true, false)).unwrap(),
            json!({ "status": "ok", "sheetReady": true, "chatConfigured": false })
        );
        assert_eq!(HealthResponse::from_sinks(false, true).status, "degraded");
    }
}
