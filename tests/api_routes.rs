use std::{
    io,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use futures::future::BoxFuture;
use httpmock::prelude::*;
use serde_json::{Value, json};
use tower::ServiceExt;

use wild_card_score::{
    config::AppConfig,
    dao::{
        chat_webhook::ChatWebhookClient,
        sheet_store::{Cell, SheetStore},
        storage::{StorageError, StorageResult},
    },
    routes,
    services::sheet_recorder::{ConnectFuture, SheetConnector},
    state::AppState,
};

#[derive(Default)]
struct MemorySheet {
    header: Mutex<Vec<String>>,
    rows: Mutex<Vec<Vec<Cell>>>,
    reject_appends: bool,
}

impl SheetStore for MemorySheet {
    fn first_sheet_title(&self) -> BoxFuture<'static, StorageResult<Option<String>>> {
        Box::pin(async { Ok(Some("Games".to_string())) })
    }

    fn read_header(&self, _sheet: String) -> BoxFuture<'static, StorageResult<Vec<String>>> {
        let header = self.header.lock().unwrap().clone();
        Box::pin(async move { Ok(header) })
    }

    fn write_header(
        &self,
        _sheet: String,
        headers: Vec<String>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        *self.header.lock().unwrap() = headers;
        Box::pin(async { Ok(()) })
    }

    fn append_row(&self, _sheet: String, row: Vec<Cell>) -> BoxFuture<'static, StorageResult<()>> {
        if self.reject_appends {
            return Box::pin(async {
                Err(StorageError::unavailable(
                    "quota exceeded".into(),
                    io::Error::other("quota exceeded"),
                ))
            });
        }
        self.rows.lock().unwrap().push(row);
        Box::pin(async { Ok(()) })
    }
}

fn connector(sheet: Arc<MemorySheet>) -> SheetConnector {
    Arc::new(move || -> ConnectFuture {
        let store: Arc<dyn SheetStore> = sheet.clone();
        Box::pin(async move { Ok(store) })
    })
}

fn app(sheet: Option<Arc<MemorySheet>>, webhook_url: Option<String>) -> Router {
    let config = AppConfig {
        chat_webhook_url: webhook_url.clone(),
        ..AppConfig::default()
    };
    let webhook = ChatWebhookClient::new(webhook_url, Duration::from_secs(2)).unwrap();
    routes::router(AppState::new(config, sheet.map(connector), webhook))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn submit(body: Value) -> Request<Body> {
    Request::post("/api/submit-score")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn users_lists_roster_in_order() {
    let (status, body) = send(app(None, None), get("/api/users")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "users": ["Winz", "Luffy", "Lucas", "Finn"] }));
}

#[tokio::test]
async fn missing_scores_is_bad_request() {
    let (status, body) = send(app(None, None), submit(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Missing required field: scores" })
    );
}

#[tokio::test]
async fn non_integer_scores_are_rejected() {
    let (status, body) = send(
        app(None, None),
        submit(json!({ "scores": { "Winz": "five", "Finn": -5 } })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid scores format");
}

#[tokio::test]
async fn unbalanced_scores_report_sum() {
    let sheet = Arc::new(MemorySheet::default());
    let (status, body) = send(
        app(Some(sheet.clone()), None),
        submit(json!({ "scores": { "Winz": 5, "Luffy": 10 } })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid scores! Sum must equal 0. Current sum: 15"
    );
    assert!(sheet.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn chat_succeeds_when_sheet_is_missing() {
    let server = MockServer::start_async().await;
    let hook = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/hook")
                .body_contains("New Wild Card Game Result")
                .body_contains("Winz: +5");
            then.status(200);
        })
        .await;

    let (status, body) = send(
        app(None, Some(server.url("/hook"))),
        submit(json!({ "scores": { "Winz": 5, "Luffy": 10, "Lucas": -10, "Finn": -5 } })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Game recorded successfully!");
    assert_eq!(body["data"]["sheetSuccess"], false);
    assert_eq!(body["data"]["chatSuccess"], true);
    assert_eq!(
        body["data"]["scores"],
        json!({ "Winz": 5, "Luffy": 10, "Lucas": -10, "Finn": -5 })
    );
    hook.assert_async().await;
}

#[tokio::test]
async fn sheet_succeeds_when_chat_fails() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(503);
        })
        .await;
    let sheet = Arc::new(MemorySheet::default());

    let (status, body) = send(
        app(Some(sheet.clone()), Some(server.url("/hook"))),
        submit(json!({ "scores": { "finn": -3, "winz": 3 } })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["sheetSuccess"], true);
    assert_eq!(body["data"]["chatSuccess"], false);

    assert_eq!(
        *sheet.header.lock().unwrap(),
        vec!["Timestamp", "Winz", "Luffy", "Lucas", "Finn"]
    );
    let rows = sheet.rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0][1..],
        [
            Cell::Integer(3),
            Cell::empty(),
            Cell::empty(),
            Cell::Integer(-3)
        ]
    );
}

#[tokio::test]
async fn both_sinks_failing_is_still_a_recorded_game() {
    let sheet = Arc::new(MemorySheet {
        reject_appends: true,
        ..MemorySheet::default()
    });

    let (status, body) = send(
        app(Some(sheet), None),
        submit(json!({ "scores": { "Winz": 0 } })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["sheetSuccess"], false);
    assert_eq!(body["data"]["chatSuccess"], false);
}

#[tokio::test]
async fn init_without_spreadsheet_fails_softly() {
    let (status, body) = send(app(None, None), get("/api/init")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Failed to initialize Google Sheets" })
    );
}

#[tokio::test]
async fn init_writes_headers() {
    let sheet = Arc::new(MemorySheet::default());
    let (status, body) = send(app(Some(sheet.clone()), None), get("/api/init")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(sheet.header.lock().unwrap().len(), 5);
}

#[tokio::test]
async fn healthcheck_reports_degraded_until_sheet_is_ready() {
    let sheet = Arc::new(MemorySheet::default());
    let app = app(Some(sheet), None);

    let (status, body) = send(app.clone(), get("/healthcheck")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "degraded", "sheetReady": false, "chatConfigured": false })
    );

    send(app.clone(), get("/api/init")).await;
    let (_, body) = send(app, get("/healthcheck")).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sheetReady"], true);
}
