use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    course_assignments, create_assignment, delete_assignment, update_assignment,
};

pub fn init_professor_assignments_router() -> Router<AppState> {
    Router::new()
        .route("/courses/{id}/assignments", post(create_assignment))
        .route(
            "/assignments/{id}",
            put(update_assignment).delete(delete_assignment),
        )
}

pub fn init_student_assignments_router() -> Router<AppState> {
    Router::new().route("/courses/{id}/assignments", get(course_assignments))
}
