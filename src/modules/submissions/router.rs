use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    assignment_submissions, download_url, grade_submission, my_submissions, submit,
};

pub fn init_student_submissions_router() -> Router<AppState> {
    Router::new()
        .route("/assignments/{id}/submissions", post(submit))
        .route("/submissions", get(my_submissions))
        .route("/submissions/{id}/download", get(download_url))
}

pub fn init_professor_submissions_router() -> Router<AppState> {
    Router::new()
        .route("/assignments/{id}/submissions", get(assignment_submissions))
        .route("/submissions/{id}/grade", patch(grade_submission))
}
