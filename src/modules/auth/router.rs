use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::gate::require_identified;
use crate::state::AppState;

use super::controller::{login, me, register};

pub fn init_auth_router(state: AppState) -> Router<AppState> {
    let identified = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(state, require_identified));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(identified)
}
