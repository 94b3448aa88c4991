mod auth;
mod config;
mod error;
mod models;
mod store;

pub use config::SheetsConfig;
pub use error::SheetsError;
pub use store::GoogleSheetStore;
