pub mod google;

use futures::future::BoxFuture;
use serde::Serialize;

use crate::dao::storage::StorageResult;

/// Value written to a single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Text cell; an empty string leaves the cell blank.
    Text(String),
    /// Numeric cell.
    Integer(i64),
}

impl Cell {
    /// Blank cell.
    pub fn empty() -> Self {
        Cell::Text(String::new())
    }
}

/// Abstraction over the spreadsheet holding one row per recorded game.
///
/// Every operation targets a single tab identified by its title.
pub trait SheetStore: Send + Sync {
    /// Title of the first tab of the spreadsheet, if it has any.
    fn first_sheet_title(&self) -> BoxFuture<'static, StorageResult<Option<String>>>;
    /// Current content of row 1; empty when the row is blank.
    fn read_header(&self, sheet: String) -> BoxFuture<'static, StorageResult<Vec<String>>>;
    /// Overwrite row 1 with `headers`.
    fn write_header(
        &self,
        sheet: String,
        headers: Vec<String>,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Append `row` after the last non-empty row.
    fn append_row(&self, sheet: String, row: Vec<Cell>) -> BoxFuture<'static, StorageResult<()>>;
}
