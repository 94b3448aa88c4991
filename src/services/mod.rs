/// Chat webhook sink.
pub mod chat_notifier;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Roster listing and manual spreadsheet initialization.
pub mod public_service;
/// Spreadsheet sink with lazy initialization and header repair.
pub mod sheet_recorder;
/// Validation and dual-sink submission of game results.
pub mod submission_service;
