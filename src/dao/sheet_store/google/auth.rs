//! OAuth2 service-account flow: sign a JWT assertion and trade it for an access token.

use std::{
    path::Path,
    time::{Duration, Instant},
};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use super::error::{SheetsError, SheetsResult};

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens are refreshed this long before Google considers them expired.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Subset of the service-account key file issued by Google Cloud.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Read and parse a key file from disk.
    pub async fn from_file(path: &Path) -> SheetsResult<Self> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| SheetsError::CredentialsRead {
                    path: path.to_path_buf(),
                    source,
                })?;
        serde_json::from_str(&contents).map_err(|source| SheetsError::CredentialsParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Hands out bearer tokens for the Sheets API, refreshing them when they get stale.
pub struct TokenProvider {
    client: Client,
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    /// Prepare a provider; fails when the private key is not a valid RSA PEM.
    pub fn new(client: Client, key: ServiceAccountKey) -> SheetsResult<Self> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|source| SheetsError::SignAssertion { source })?;
        Ok(Self {
            client,
            key,
            signing_key,
            cached: Mutex::new(None),
        })
    }

    /// Return a valid access token, fetching a new one when needed.
    pub async fn access_token(&self) -> SheetsResult<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        let response = self.fetch_token().await?;
        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(EXPIRY_MARGIN);
        debug!(expires_in = response.expires_in, "obtained Google access token");

        let value = response.access_token;
        *cached = Some(CachedToken {
            value: value.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(value)
    }

    fn assertion(&self) -> SheetsResult<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|source| SheetsError::SignAssertion { source })
    }

    async fn fetch_token(&self) -> SheetsResult<TokenResponse> {
        let assertion = self.assertion()?;
        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|source| SheetsError::TokenRequest { source })?;

        if !response.status().is_success() {
            return Err(SheetsError::TokenStatus {
                status: response.status(),
            });
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|source| SheetsError::TokenRequest { source })
    }
}
