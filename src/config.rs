//! Application-level configuration loading: roster, time zone and sink settings.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{dao::sheet_store::google::SheetsConfig, state::roster::Roster};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "WILD_CARD_CONFIG_PATH";
/// Time zone used for timestamps when neither `TZ` nor the config file set one.
const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Bangkok;
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SINK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Players accepted by the spreadsheet, in column order.
    pub roster: Roster,
    /// Zone used to render submission timestamps.
    pub timezone: Tz,
    /// HTTP listen port.
    pub port: u16,
    /// Upper bound for every outbound sink request.
    pub sink_timeout: Duration,
    /// Google Sheets settings; `None` leaves the spreadsheet sink permanently failing.
    pub sheets: Option<SheetsConfig>,
    /// Google Chat incoming webhook.
    pub chat_webhook_url: Option<String>,
    /// Telegram bot token; the bot is not started without it.
    pub telegram_bot_token: Option<String>,
}

impl AppConfig {
    /// Load configuration from `.env`, the JSON config file and the environment.
    pub fn load() -> Self {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                warn!(error = %err, "failed to load .env file");
            }
        }

        let file = load_file();

        let timezone = env::var("TZ")
            .ok()
            .or(file.timezone)
            .map(|value| parse_timezone(&value))
            .unwrap_or(DEFAULT_TIMEZONE);

        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let sink_timeout = env::var("SINK_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SINK_TIMEOUT);

        let sheets = match SheetsConfig::from_env() {
            Ok(config) => Some(config),
            Err(err) => {
                warn!(error = %err, "Google Sheets not configured; records will not be saved");
                None
            }
        };

        Self {
            roster: Roster::new(file.users.unwrap_or_else(default_users)),
            timezone,
            port,
            sink_timeout,
            sheets,
            chat_webhook_url: non_empty_env("GOOGLE_CHAT_WEBHOOK_URL"),
            telegram_bot_token: non_empty_env("TELEGRAM_BOT_TOKEN"),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            roster: Roster::new(default_users()),
            timezone: DEFAULT_TIMEZONE,
            port: DEFAULT_PORT,
            sink_timeout: DEFAULT_SINK_TIMEOUT,
            sheets: None,
            chat_webhook_url: None,
            telegram_bot_token: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    users: Option<Vec<String>>,
    timezone: Option<String>,
}

fn load_file() -> RawConfig {
    let path = resolve_config_path();
    match fs::read_to_string(&path) {
        Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
            Ok(raw) => {
                info!(
                    path = %path.display(),
                    users = raw.users.as_ref().map(Vec::len),
                    "loaded config file"
                );
                raw
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to parse config; falling back to defaults"
                );
                RawConfig::default()
            }
        },
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(
                path = %path.display(),
                "config file not found; using built-in defaults"
            );
            RawConfig::default()
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "failed to read config; falling back to defaults"
            );
            RawConfig::default()
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn parse_timezone(value: &str) -> Tz {
    match value.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            warn!(value, fallback = %DEFAULT_TIMEZONE, "unknown time zone; using fallback");
            DEFAULT_TIMEZONE
        }
    }
}

fn non_empty_env(var: &str) -> Option<String> {
    env::var(var).ok().filter(|value| !value.trim().is_empty())
}

/// Built-in roster shipped with the binary.
fn default_users() -> Vec<String> {
    ["Winz", "Luffy", "Lucas", "Finn"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_timezone() {
        assert_eq!(parse_timezone("Europe/Paris"), chrono_tz::Europe::Paris);
    }

    #[test]
    fn unknown_timezone_falls_back() {
        assert_eq!(parse_timezone("Mars/Olympus"), DEFAULT_TIMEZONE);
    }

    #[test]
    fn raw_config_accepts_partial_files() {
        let raw: RawConfig = serde_json::from_str(r#"{ "users": ["A", "B"] }"#).unwrap();
        assert_eq!(raw.users, Some(vec!["A".to_string(), "B".to_string()]));
        assert!(raw.timezone.is_none());
    }
}
