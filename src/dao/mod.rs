/// Google Chat incoming webhook client.
pub mod chat_webhook;
/// Spreadsheet abstraction and its Google Sheets implementation.
pub mod sheet_store;
/// Storage error shared by sheet backends.
pub mod storage;
