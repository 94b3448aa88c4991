//! DTO definitions used by the score submission API and documentation layer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dto::validation::validate_score_map, services::submission_service::SubmissionOutcome,
    state::score::ScoreEntry,
};

/// Roster exposed to the web form.
#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<String>,
}

/// Payload posted by the web form.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitScoreRequest {
    /// Player name → score. Must sum to zero.
    #[serde(default)]
    #[schema(value_type = Object, example = json!({"Winz": 5, "Luffy": 10, "Lucas": -10, "Finn": -5}))]
    pub scores: Option<IndexMap<String, i64>>,
}

impl Validate for SubmitScoreRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match self.scores {
            None => {
                let mut err = ValidationError::new("required");
                err.message = Some("Missing required field: scores".into());
                errors.add("scores", err);
            }
            Some(ref scores) => {
                if let Err(err) = validate_score_map(scores) {
                    errors.add("scores", err);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl SubmitScoreRequest {
    /// Consume the request into a domain entry; call after [`Validate::validate`].
    pub fn into_entry(self) -> ScoreEntry {
        self.scores.map(ScoreEntry::from).unwrap_or_default()
    }
}

/// Per-sink outcome of a recorded game.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionData {
    #[schema(value_type = Object)]
    pub scores: ScoreEntry,
    pub sheet_success: bool,
    pub chat_success: bool,
}

/// Response returned once a game passed validation, whatever the sinks reported.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitScoreResponse {
    pub success: bool,
    pub message: String,
    pub data: SubmissionData,
}

impl SubmitScoreResponse {
    /// Build the response for a validated entry.
    pub fn recorded(scores: ScoreEntry, outcome: SubmissionOutcome) -> Self {
        Self {
            success: true,
            message: "Game recorded successfully!".to_string(),
            data: SubmissionData {
                scores,
                sheet_success: outcome.sheet_success,
                chat_success: outcome.chat_success,
            },
        }
    }
}

/// Result of a manual spreadsheet initialization.
#[derive(Debug, Serialize, ToSchema)]
pub struct InitResponse {
    pub success: bool,
    pub message: String,
}

impl InitResponse {
    /// Response for the given initialization result.
    pub fn from_result(success: bool) -> Self {
        let message = if success {
            "Google Sheets initialized"
        } else {
            "Failed to initialize Google Sheets"
        };
        Self {
            success,
            message: message.to_string(),
        }
    }
}

/// Error payload shared by every failing API call.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}
