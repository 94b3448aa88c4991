//! Records validated games in both sinks and reports how each one fared.

use tracing::{error, info};

use crate::{error::ServiceError, state::SharedState, state::score::ScoreEntry};

/// Per-sink result of one submission. Either sink may fail without affecting the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionOutcome {
    /// The row reached the spreadsheet.
    pub sheet_success: bool,
    /// The group chat was notified.
    pub chat_success: bool,
}

/// Reject entries that are empty, have blank names or do not sum to zero.
pub fn prepare_entry(entry: ScoreEntry) -> Result<ScoreEntry, ServiceError> {
    if let Some(problem) = entry.structural_error() {
        return Err(ServiceError::InvalidInput(problem.message().to_string()));
    }
    if !entry.is_zero_sum() {
        return Err(ServiceError::UnbalancedScores { sum: entry.sum() });
    }
    Ok(entry)
}

/// Validate `entry`, then write it to the spreadsheet and announce it in the chat.
///
/// The sinks run one after the other on a detached task, so a caller going away cannot
/// stop the second write. Sink failures only show up in the returned outcome.
pub async fn submit(
    state: &SharedState,
    entry: ScoreEntry,
    submitted_by: Option<String>,
) -> Result<SubmissionOutcome, ServiceError> {
    let entry = prepare_entry(entry)?;

    let task_state = state.clone();
    let task = tokio::spawn(async move {
        let sheet_success = task_state
            .recorder()
            .append_record(&entry, submitted_by.as_deref())
            .await;
        let chat_success = task_state.notifier().send_game_notification(&entry).await;
        SubmissionOutcome {
            sheet_success,
            chat_success,
        }
    });

    match task.await {
        Ok(outcome) => {
            info!(
                sheet_success = outcome.sheet_success,
                chat_success = outcome.chat_success,
                "game submission processed"
            );
            Ok(outcome)
        }
        Err(err) => {
            error!(error = %err, "game submission task failed");
            state
                .notifier()
                .send_error_notification(&format!("Failed to record a game: {err}"))
                .await;
            Err(ServiceError::Internal(err.to_string()))
        }
    }
}
