use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    assign_professor, browse_catalog, create_course, delete_course, list_courses, my_courses,
};

pub fn init_root_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_course).get(list_courses))
        .route("/{id}/professor", put(assign_professor))
        .route("/{id}", axum::routing::delete(delete_course))
}

pub fn init_professor_courses_router() -> Router<AppState> {
    Router::new().route("/courses", get(my_courses))
}

pub fn init_student_courses_router() -> Router<AppState> {
    Router::new().route("/courses", get(browse_catalog))
}
