use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller::{course_announcements, create_announcement, delete_announcement};

pub fn init_professor_announcements_router() -> Router<AppState> {
    Router::new()
        .route("/courses/{id}/announcements", post(create_announcement))
        .route("/announcements/{id}", delete(delete_announcement))
}

pub fn init_student_announcements_router() -> Router<AppState> {
    Router::new().route("/courses/{id}/announcements", get(course_announcements))
}
