use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::dao::{
    sheet_store::{Cell, SheetStore},
    storage::StorageResult,
};

use super::{
    auth::{ServiceAccountKey, TokenProvider},
    config::SheetsConfig,
    error::{SheetsError, SheetsResult},
    models::{SpreadsheetMetadata, ValueRange, ValuesBody, header_range, sheet_range},
};

/// [`SheetStore`] backed by the Google Sheets REST API.
#[derive(Clone)]
pub struct GoogleSheetStore {
    client: Client,
    base_url: Arc<Url>,
    spreadsheet_id: Arc<str>,
    tokens: Arc<TokenProvider>,
}

impl GoogleSheetStore {
    /// Load the service-account key and prepare an authenticated client.
    ///
    /// No request is sent yet; the first call exchanges the key for an access token.
    pub async fn connect(config: SheetsConfig, timeout: Duration) -> SheetsResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| SheetsError::ClientBuilder { source })?;

        let base_url = Url::parse(config.api_base_url.trim_end_matches('/')).map_err(|_| {
            SheetsError::InvalidUrl {
                url: config.api_base_url.clone(),
            }
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SheetsError::InvalidUrl {
                url: config.api_base_url,
            });
        }

        let key = ServiceAccountKey::from_file(&config.credentials_path).await?;
        let tokens = TokenProvider::new(client.clone(), key)?;

        Ok(Self {
            client,
            base_url: Arc::new(base_url),
            spreadsheet_id: Arc::from(config.spreadsheet_id),
            tokens: Arc::new(tokens),
        })
    }

    /// `{base}/spreadsheets/{id}` followed by `segments`, each percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = (*self.base_url).clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .push("spreadsheets")
                .push(&self.spreadsheet_id)
                .extend(segments);
        }
        url
    }

    async fn request(&self, method: Method, segments: &[&str]) -> SheetsResult<RequestBuilder> {
        let token = self.tokens.access_token().await?;
        Ok(self
            .client
            .request(method, self.url(segments))
            .bearer_auth(token))
    }

    async fn send_json<T>(&self, builder: RequestBuilder, range: &str) -> SheetsResult<T>
    where
        T: DeserializeOwned,
    {
        let response = builder
            .send()
            .await
            .map_err(|source| SheetsError::RequestSend {
                range: range.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::OK => response
                .json::<T>()
                .await
                .map_err(|source| SheetsError::DecodeResponse {
                    range: range.to_string(),
                    source,
                }),
            other => Err(SheetsError::RequestStatus {
                range: range.to_string(),
                status: other,
            }),
        }
    }

    async fn send_empty(&self, builder: RequestBuilder, range: &str) -> SheetsResult<()> {
        let response = builder
            .send()
            .await
            .map_err(|source| SheetsError::RequestSend {
                range: range.to_string(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(SheetsError::RequestStatus {
                range: range.to_string(),
                status: response.status(),
            })
        }
    }

    async fn fetch_first_title(&self) -> SheetsResult<Option<String>> {
        let builder = self
            .request(Method::GET, &[])
            .await?
            .query(&[("fields", "sheets.properties.title")]);
        let metadata: SpreadsheetMetadata = self.send_json(builder, "metadata").await?;
        Ok(metadata
            .sheets
            .into_iter()
            .next()
            .map(|entry| entry.properties.title))
    }

    async fn fetch_header(&self, sheet: &str) -> SheetsResult<Vec<String>> {
        let range = header_range(sheet);
        let builder = self.request(Method::GET, &["values", &range]).await?;
        let values: ValueRange = self.send_json(builder, &range).await?;
        Ok(values.first_row_text())
    }

    async fn update_header(&self, sheet: &str, headers: Vec<String>) -> SheetsResult<()> {
        let range = header_range(sheet);
        let builder = self
            .request(Method::PUT, &["values", &range])
            .await?
            .query(&[("valueInputOption", "RAW")])
            .json(&ValuesBody {
                values: vec![headers],
            });
        self.send_empty(builder, &range).await
    }

    async fn append(&self, sheet: &str, row: Vec<Cell>) -> SheetsResult<()> {
        let range = sheet_range(sheet);
        let action = format!("{range}:append");
        let builder = self
            .request(Method::POST, &["values", &action])
            .await?
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&ValuesBody::single_row(row));
        self.send_empty(builder, &range).await
    }
}

impl SheetStore for GoogleSheetStore {
    fn first_sheet_title(&self) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let store = self.clone();
        Box::pin(async move { store.fetch_first_title().await.map_err(Into::into) })
    }

    fn read_header(&self, sheet: String) -> BoxFuture<'static, StorageResult<Vec<String>>> {
        let store = self.clone();
        Box::pin(async move { store.fetch_header(&sheet).await.map_err(Into::into) })
    }

    fn write_header(
        &self,
        sheet: String,
        headers: Vec<String>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.update_header(&sheet, headers).await.map_err(Into::into) })
    }

    fn append_row(&self, sheet: String, row: Vec<Cell>) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.append(&sheet, row).await.map_err(Into::into) })
    }
}
