/// Health check payloads.
pub mod health;
/// Request and response bodies of the score API.
pub mod scores;
/// Validation helpers shared by DTOs.
pub mod validation;
