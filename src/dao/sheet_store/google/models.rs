use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dao::sheet_store::Cell;

/// `spreadsheets.get` projected on `sheets.properties.title`.
#[derive(Debug, Default, Deserialize)]
pub struct SpreadsheetMetadata {
    #[serde(default)]
    pub sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SheetEntry {
    pub properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
pub struct SheetProperties {
    pub title: String,
}

/// `spreadsheets.values.get` response; `values` is omitted for blank ranges.
#[derive(Debug, Default, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    /// First row rendered as text, empty when the range is blank.
    pub fn first_row_text(self) -> Vec<String> {
        self.values
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|value| match value {
                Value::String(text) => text,
                other => other.to_string(),
            })
            .collect()
    }
}

/// Body of `values.update` / `values.append`.
#[derive(Debug, Serialize)]
pub struct ValuesBody<T: Serialize> {
    pub values: Vec<Vec<T>>,
}

impl ValuesBody<Cell> {
    pub fn single_row(row: Vec<Cell>) -> Self {
        Self { values: vec![row] }
    }
}

/// A1 notation for a whole tab, quoting the title.
pub fn sheet_range(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}

/// A1 notation for the first row of a tab.
pub fn header_range(sheet: &str) -> String {
    format!("{}!1:1", sheet_range(sheet))
}
