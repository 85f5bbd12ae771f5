use axum::{
    Router,
    routing::{delete, get, patch},
};

use crate::state::AppState;

use super::controller::{delete_user, list_pending_professors, list_users, update_status};

pub fn init_root_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/pending", get(list_pending_professors))
        .route("/{id}/status", patch(update_status))
        .route("/{id}", delete(delete_user))
}
