use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::gate::{require_professor, require_root, require_student};
use crate::modules::announcements::router::{
    init_professor_announcements_router, init_student_announcements_router,
};
use crate::modules::assignments::router::{
    init_professor_assignments_router, init_student_assignments_router,
};
use crate::modules::auth::router::init_auth_router;
use crate::modules::courses::router::{
    init_professor_courses_router, init_root_courses_router, init_student_courses_router,
};
use crate::modules::enrollments::router::init_student_enrollments_router;
use crate::modules::files::router::init_files_router;
use crate::modules::submissions::router::{
    init_professor_submissions_router, init_student_submissions_router,
};
use crate::modules::users::router::init_root_users_router;
use crate::state::AppState;

/// Route groups are prefixed by role and each group carries exactly one
/// capability layer; inside a group, handlers only add per-resource
/// ownership checks.
pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/files", init_files_router())
        .nest(
            "/api",
            Router::new()
                .nest(
                    "/auth",
                    init_auth_router(state.clone()).layer(GovernorLayer::new(Arc::new(
                        state.rate_limit.auth_governor_config(),
                    ))),
                )
                .nest(
                    "/root",
                    Router::new()
                        .nest("/users", init_root_users_router())
                        .nest("/courses", init_root_courses_router())
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_root)),
                )
                .nest(
                    "/professor",
                    Router::new()
                        .merge(init_professor_courses_router())
                        .merge(init_professor_assignments_router())
                        .merge(init_professor_submissions_router())
                        .merge(init_professor_announcements_router())
                        .route_layer(middleware::from_fn_with_state(
                            state.clone(),
                            require_professor,
                        )),
                )
                .nest(
                    "/student",
                    Router::new()
                        .merge(init_student_courses_router())
                        .merge(init_student_enrollments_router())
                        .merge(init_student_assignments_router())
                        .merge(init_student_submissions_router())
                        .merge(init_student_announcements_router())
                        .layer(DefaultBodyLimit::max(state.storage.max_bytes() + 1024 * 1024))
                        .route_layer(middleware::from_fn_with_state(
                            state.clone(),
                            require_student,
                        )),
                ),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
