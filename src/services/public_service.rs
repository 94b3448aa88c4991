//! Service helpers backing the web form: roster listing and sheet initialization.

use crate::{
    dto::scores::{InitResponse, UsersResponse},
    state::SharedState,
};

/// Return the configured roster in column order.
pub fn list_users(state: &SharedState) -> UsersResponse {
    UsersResponse {
        users: state.config().roster.names().to_vec(),
    }
}

/// Re-open the spreadsheet and repair its header row.
pub async fn initialize_sheet(state: &SharedState) -> InitResponse {
    InitResponse::from_result(state.recorder().initialize_sheet().await)
}
