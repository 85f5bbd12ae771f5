use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::fetch_file;

pub fn init_files_router() -> Router<AppState> {
    Router::new().route("/{*key}", get(fetch_file))
}
