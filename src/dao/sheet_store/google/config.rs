use std::path::PathBuf;

use super::error::{SheetsError, SheetsResult};

/// Public Sheets API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://sheets.googleapis.com/v4";
const DEFAULT_CREDENTIALS_PATH: &str = "config/google-credentials.json";

/// Runtime configuration describing which spreadsheet to write to and how to authenticate.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub credentials_path: PathBuf,
    pub api_base_url: String,
}

impl SheetsConfig {
    /// Construct a configuration for the public API.
    pub fn new(spreadsheet_id: impl Into<String>, credentials_path: impl Into<PathBuf>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            credentials_path: credentials_path.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Point the client at another API root.
    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into();
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> SheetsResult<Self> {
        let spreadsheet_id = std::env::var("GOOGLE_SHEETS_ID")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or(SheetsError::MissingEnvVar {
                var: "GOOGLE_SHEETS_ID",
            })?;
        let credentials_path = std::env::var("GOOGLE_CREDENTIALS_PATH")
            .unwrap_or_else(|_| DEFAULT_CREDENTIALS_PATH.to_string());

        let mut config = Self::new(spreadsheet_id, credentials_path);
        if let Ok(base_url) = std::env::var("GOOGLE_SHEETS_API_URL") {
            config = config.with_api_base_url(base_url);
        }

        Ok(config)
    }
}
