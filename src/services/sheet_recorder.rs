//! Spreadsheet sink: lazily connects to the sheet, keeps its header row aligned with the
//! roster and appends one row per recorded game.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use chrono::Utc;
use chrono_tz::Tz;
use futures::future::BoxFuture;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    dao::{
        sheet_store::{
            Cell, SheetStore,
            google::{GoogleSheetStore, SheetsConfig},
        },
        storage::StorageResult,
    },
    state::{
        roster::{Roster, TIMESTAMP_HEADER},
        score::ScoreEntry,
        timestamp::sheet_timestamp,
    },
};

/// Tab used when the spreadsheet's tabs cannot be listed.
pub const FALLBACK_SHEET_NAME: &str = "Sheet1";

/// Pending connection to the spreadsheet.
pub type ConnectFuture = BoxFuture<'static, StorageResult<Arc<dyn SheetStore>>>;

/// Opens a fresh handle on the spreadsheet.
pub type SheetConnector = Arc<dyn Fn() -> ConnectFuture + Send + Sync>;

/// Connector for the Google Sheets backend.
pub fn google_connector(config: SheetsConfig, timeout: Duration) -> SheetConnector {
    Arc::new(move || -> ConnectFuture {
        let config = config.clone();
        Box::pin(async move {
            let store = GoogleSheetStore::connect(config, timeout).await?;
            Ok(Arc::new(store) as Arc<dyn SheetStore>)
        })
    })
}

#[derive(Clone)]
struct ReadySheet {
    store: Arc<dyn SheetStore>,
    sheet_name: String,
}

/// Writes game records to the spreadsheet.
///
/// Every public operation reports success as a `bool`; failures are logged here and never
/// propagate to the caller.
pub struct SheetRecorder {
    roster: Roster,
    timezone: Tz,
    connector: Option<SheetConnector>,
    ready: Mutex<Option<ReadySheet>>,
    connected: AtomicBool,
}

impl SheetRecorder {
    /// Create an uninitialized recorder. Without a connector every write fails.
    pub fn new(roster: Roster, timezone: Tz, connector: Option<SheetConnector>) -> Self {
        Self {
            roster,
            timezone,
            connector,
            ready: Mutex::new(None),
            connected: AtomicBool::new(false),
        }
    }

    /// Whether a spreadsheet handle is currently open. Never waits on a pending connection.
    pub async fn is_ready(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Connect again, replacing the open handle only when the new connection succeeds.
    pub async fn initialize(&self) -> bool {
        let mut guard = self.ready.lock().await;
        match self.connect().await {
            Some(sheet) => {
                *guard = Some(sheet);
                self.connected.store(true, Ordering::Release);
                true
            }
            None => false,
        }
    }

    /// Re-initialize the spreadsheet and repair its header row.
    pub async fn initialize_sheet(&self) -> bool {
        if !self.initialize().await {
            return false;
        }
        self.ensure_headers().await
    }

    /// Make sure row 1 matches `Timestamp` followed by the roster, overwriting it if not.
    pub async fn ensure_headers(&self) -> bool {
        let Some(sheet) = self.ready_sheet().await else {
            return false;
        };

        match self.sync_headers(&sheet).await {
            Ok(_) => true,
            Err(err) => {
                error!(error = %err, sheet = %sheet.sheet_name, "failed to ensure sheet headers");
                false
            }
        }
    }

    /// Append one row for `entry`, after matching its names onto the roster.
    pub async fn append_record(&self, entry: &ScoreEntry, submitted_by: Option<&str>) -> bool {
        let Some(sheet) = self.ready_sheet().await else {
            return false;
        };

        let matched = self.roster.match_entry(entry);
        let headers = match self.sync_headers(&sheet).await {
            Ok(headers) => headers,
            Err(err) => {
                error!(error = %err, sheet = %sheet.sheet_name, "failed to ensure sheet headers");
                return false;
            }
        };

        let row = build_row(&headers, &matched, sheet_timestamp(Utc::now(), self.timezone));
        match sheet.store.append_row(sheet.sheet_name.clone(), row).await {
            Ok(()) => {
                info!(
                    sheet = %sheet.sheet_name,
                    submitted_by = submitted_by.unwrap_or("web"),
                    scores = %matched.formatted(),
                    "game record added to spreadsheet"
                );
                true
            }
            Err(err) => {
                error!(error = %err, sheet = %sheet.sheet_name, "failed to append game record");
                false
            }
        }
    }

    /// Current handle, connecting first when there is none.
    async fn ready_sheet(&self) -> Option<ReadySheet> {
        let mut guard = self.ready.lock().await;
        if guard.is_none() {
            *guard = self.connect().await;
            self.connected.store(guard.is_some(), Ordering::Release);
        }
        guard.clone()
    }

    async fn connect(&self) -> Option<ReadySheet> {
        let Some(connector) = self.connector.as_ref() else {
            warn!("Google Sheets not configured; skipping initialization");
            return None;
        };

        let store = match connector().await {
            Ok(store) => store,
            Err(err) if err.is_credentials() => {
                error!(
                    error = %err,
                    "Google Sheets credentials rejected; check the service account key"
                );
                return None;
            }
            Err(err) => {
                error!(error = %err, "failed to initialize Google Sheets");
                return None;
            }
        };

        let sheet_name = match store.first_sheet_title().await {
            Ok(Some(title)) => title,
            Ok(None) => FALLBACK_SHEET_NAME.to_string(),
            Err(err) => {
                warn!(error = %err, fallback = FALLBACK_SHEET_NAME, "failed to get sheet name");
                FALLBACK_SHEET_NAME.to_string()
            }
        };

        info!(sheet = %sheet_name, "Google Sheets initialized");
        Some(ReadySheet { store, sheet_name })
    }

    async fn sync_headers(&self, sheet: &ReadySheet) -> StorageResult<Vec<String>> {
        let expected = self.roster.headers();
        let current = sheet.store.read_header(sheet.sheet_name.clone()).await?;
        if current == expected {
            debug!(sheet = %sheet.sheet_name, "sheet headers up to date");
            return Ok(current);
        }

        sheet
            .store
            .write_header(sheet.sheet_name.clone(), expected.clone())
            .await?;
        info!(
            sheet = %sheet.sheet_name,
            previous = ?current,
            headers = ?expected,
            "sheet headers updated to match roster"
        );
        Ok(expected)
    }
}

/// Lay out a row under `headers`: timestamp, then each player's score or a blank cell.
pub fn build_row(headers: &[String], matched: &ScoreEntry, timestamp: String) -> Vec<Cell> {
    headers
        .iter()
        .map(|header| {
            if header == TIMESTAMP_HEADER {
                Cell::Text(timestamp.clone())
            } else {
                matched
                    .get(header)
                    .map(Cell::Integer)
                    .unwrap_or_else(Cell::empty)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{
            Mutex as StdMutex,
            atomic::{AtomicBool, AtomicUsize, Ordering},
        },
    };

    use super::*;
    use crate::{dao::storage::StorageError, state::score::parse_scores};

    #[derive(Default)]
    struct FakeSheet {
        title: Option<String>,
        header: StdMutex<Vec<String>>,
        rows: StdMutex<Vec<Vec<Cell>>>,
        header_writes: AtomicUsize,
        fail_append: AtomicBool,
        fail_title: bool,
    }

    fn boom() -> StorageError {
        StorageError::unavailable("boom".into(), io::Error::other("boom"))
    }

    impl SheetStore for FakeSheet {
        fn first_sheet_title(&self) -> BoxFuture<'static, StorageResult<Option<String>>> {
            let result = if self.fail_title {
                Err(boom())
            } else {
                Ok(self.title.clone())
            };
            Box::pin(async move { result })
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
            self.header_writes.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(()) })
        }

        fn append_row(
            &self,
            _sheet: String,
            row: Vec<Cell>,
        ) -> BoxFuture<'static, StorageResult<()>> {
            if self.fail_append.load(Ordering::SeqCst) {
                return Box::pin(async { Err(boom()) });
            }
            self.rows.lock().unwrap().push(row);
            Box::pin(async { Ok(()) })
        }
    }

    fn connector_for(sheet: Arc<FakeSheet>, connects: Arc<AtomicUsize>) -> SheetConnector {
        Arc::new(move || -> ConnectFuture {
            connects.fetch_add(1, Ordering::SeqCst);
            let store: Arc<dyn SheetStore> = sheet.clone();
            Box::pin(async move { Ok(store) })
        })
    }

    fn recorder(roster: Roster, sheet: Arc<FakeSheet>) -> (SheetRecorder, Arc<AtomicUsize>) {
        let connects = Arc::new(AtomicUsize::new(0));
        let recorder = SheetRecorder::new(
            roster,
            chrono_tz::Asia::Bangkok,
            Some(connector_for(sheet, connects.clone())),
        );
        (recorder, connects)
    }

    fn roster() -> Roster {
        Roster::new(["Winz", "Luffy", "Lucas", "Finn"])
    }

    #[tokio::test]
    async fn ensure_headers_is_idempotent() {
        let sheet = Arc::new(FakeSheet::default());
        let (recorder, _) = recorder(roster(), sheet.clone());

        assert!(recorder.ensure_headers().await);
        assert!(recorder.ensure_headers().await);

        assert_eq!(sheet.header_writes.load(Ordering::SeqCst), 1);
        assert_eq!(
            *sheet.header.lock().unwrap(),
            vec!["Timestamp", "Winz", "Luffy", "Lucas", "Finn"]
        );
    }

    #[tokio::test]
    async fn manual_header_edits_are_overwritten() {
        let sheet = Arc::new(FakeSheet {
            header: StdMutex::new(vec!["Timestamp".into(), "Winz".into(), "Notes".into()]),
            ..FakeSheet::default()
        });
        let (recorder, _) = recorder(roster(), sheet.clone());

        assert!(recorder.ensure_headers().await);
        assert_eq!(sheet.header_writes.load(Ordering::SeqCst), 1);
        assert_eq!(sheet.header.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn append_aligns_row_with_roster_and_drops_unknown_names() {
        let sheet = Arc::new(FakeSheet::default());
        let (recorder, _) = recorder(roster(), sheet.clone());
        let entry = parse_scores("lucas: -10, Zoro: 5, winz: 5").unwrap();

        assert!(recorder.append_record(&entry, Some("tester")).await);

        let rows = sheet.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.len(), 5);
        assert!(matches!(&row[0], Cell::Text(ts) if !ts.is_empty()));
        assert_eq!(
            row[1..],
            [
                Cell::Integer(5),
                Cell::empty(),
                Cell::Integer(-10),
                Cell::empty()
            ]
        );
    }

    #[tokio::test]
    async fn connects_once_across_operations() {
        let sheet = Arc::new(FakeSheet::default());
        let (recorder, connects) = recorder(roster(), sheet);
        let entry = parse_scores("Winz: 1, Finn: -1").unwrap();

        assert!(!recorder.is_ready().await);
        assert!(recorder.append_record(&entry, None).await);
        assert!(recorder.append_record(&entry, None).await);
        assert!(recorder.is_ready().await);
        assert_eq!(connects.load(Ordering::SeqCst), 1);

        assert!(recorder.initialize_sheet().await);
        assert_eq!(connects.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn title_discovery_failure_uses_fallback() {
        let sheet = Arc::new(FakeSheet {
            fail_title: true,
            ..FakeSheet::default()
        });
        let (recorder, _) = recorder(roster(), sheet);

        assert!(recorder.initialize().await);
        let ready = recorder.ready_sheet().await.unwrap();
        assert_eq!(ready.sheet_name, FALLBACK_SHEET_NAME);
    }

    #[tokio::test]
    async fn failures_are_reported_as_false() {
        let sheet = Arc::new(FakeSheet::default());
        sheet.fail_append.store(true, Ordering::SeqCst);
        let (recorder, _) = recorder(roster(), sheet);
        let entry = parse_scores("Winz: 1, Finn: -1").unwrap();

        assert!(!recorder.append_record(&entry, None).await);
    }

    #[tokio::test]
    async fn unconfigured_recorder_fails_closed() {
        let recorder = SheetRecorder::new(roster(), chrono_tz::Asia::Bangkok, None);
        let entry = parse_scores("Winz: 1, Finn: -1").unwrap();

        assert!(!recorder.initialize_sheet().await);
        assert!(!recorder.append_record(&entry, None).await);
        assert!(!recorder.is_ready().await);
    }

    #[tokio::test]
    async fn failed_connection_is_not_cached() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let connector: SheetConnector = Arc::new(move || -> ConnectFuture {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Err(boom()) })
        });
        let recorder = SheetRecorder::new(roster(), chrono_tz::Asia::Bangkok, Some(connector));

        assert!(!recorder.ensure_headers().await);
        assert!(!recorder.ensure_headers().await);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_first_writes_connect_once() {
        let sheet = Arc::new(FakeSheet::default());
        let connects = Arc::new(AtomicUsize::new(0));
        let counter = connects.clone();
        let connector: SheetConnector = Arc::new(move || -> ConnectFuture {
            counter.fetch_add(1, Ordering::SeqCst);
            let store: Arc<dyn SheetStore> = sheet.clone();
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(store)
            })
        });
        let recorder = SheetRecorder::new(roster(), chrono_tz::Asia::Bangkok, Some(connector));
        let first = parse_scores("Winz: 1, Finn: -1").unwrap();
        let second = parse_scores("Luffy: 2, Lucas: -2").unwrap();

        let (a, b) = tokio::join!(
            recorder.append_record(&first, None),
            recorder.append_record(&second, None)
        );

        assert!(a && b);
        assert_eq!(connects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_reinitialize_keeps_open_handle() {
        let sheet = Arc::new(FakeSheet::default());
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let connector: SheetConnector = Arc::new(move || -> ConnectFuture {
            let store: Arc<dyn SheetStore> = sheet.clone();
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Box::pin(async move { Ok(store) })
            } else {
                Box::pin(async { Err(boom()) })
            }
        });
        let recorder = SheetRecorder::new(roster(), chrono_tz::Asia::Bangkok, Some(connector));
        let entry = parse_scores("Winz: 1, Finn: -1").unwrap();

        assert!(recorder.initialize().await);
        assert!(!recorder.initialize_sheet().await);

        assert!(recorder.is_ready().await);
        assert!(recorder.append_record(&entry, None).await);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn readiness_does_not_wait_for_pending_connection() {
        let sheet = Arc::new(FakeSheet::default());
        let release = Arc::new(tokio::sync::Notify::new());
        let gate = release.clone();
        let connector: SheetConnector = Arc::new(move || -> ConnectFuture {
            let store: Arc<dyn SheetStore> = sheet.clone();
            let gate = gate.clone();
            Box::pin(async move {
                gate.notified().await;
                Ok(store)
            })
        });
        let recorder = Arc::new(SheetRecorder::new(
            roster(),
            chrono_tz::Asia::Bangkok,
            Some(connector),
        ));

        let pending = tokio::spawn({
            let recorder = recorder.clone();
            async move { recorder.initialize().await }
        });
        tokio::task::yield_now().await;

        let ready = tokio::time::timeout(Duration::from_millis(100), recorder.is_ready())
            .await
            .expect("readiness check must not block");
        assert!(!ready);

        release.notify_one();
        assert!(pending.await.unwrap());
        assert!(recorder.is_ready().await);
    }

    #[test]
    fn build_row_follows_header_order() {
        let headers = vec!["Timestamp".to_string(), "B".to_string(), "A".to_string()];
        let matched = parse_scores("A: 3, B: -3").unwrap();

        let row = build_row(&headers, &matched, "now".into());
        assert_eq!(
            row,
            vec![
                Cell::Text("now".into()),
                Cell::Integer(-3),
                Cell::Integer(3)
            ]
        );
    }
}
