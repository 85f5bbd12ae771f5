use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{enroll, my_enrollments};

pub fn init_student_enrollments_router() -> Router<AppState> {
    Router::new()
        .route("/courses/{id}/enroll", post(enroll))
        .route("/enrollments", get(my_enrollments))
}
