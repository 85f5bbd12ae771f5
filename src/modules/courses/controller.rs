use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::middleware::gate::CurrentUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    AssignProfessorDto, AssignQuery, Course, CourseFilterParams, CreateCourseDto,
    PaginatedCourseCatalogResponse, PaginatedCoursesResponse,
};
use super::service::CourseService;

/// Create a course
#[utoipa::path(
    post,
    path = "/api/root/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 401, description = "Missing or invalid credential"),
        (status = 403, description = "Caller is not root")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = CourseService::create_course(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// List all courses
#[utoipa::path(
    get,
    path = "/api/root/courses",
    responses(
        (status = 200, description = "Paginated course list", body = PaginatedCoursesResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(filter): Query<CourseFilterParams>,
) -> Result<Json<PaginatedCoursesResponse>, AppError> {
    let courses = CourseService::list_courses(&state.db, filter.pagination).await?;
    Ok(Json(courses))
}

/// Assign a professor to a course
#[utoipa::path(
    put,
    path = "/api/root/courses/{id}/professor",
    params(("id" = i64, Path, description = "Course id"), AssignQuery),
    request_body = AssignProfessorDto,
    responses(
        (status = 200, description = "Course with instructor set", body = Course),
        (status = 400, description = "Target is not an approved professor"),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Course already has a different instructor")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, dto))]
pub async fn assign_professor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<AssignQuery>,
    ValidatedJson(dto): ValidatedJson<AssignProfessorDto>,
) -> Result<Json<Course>, AppError> {
    let course =
        CourseService::assign_professor(&state.db, id, dto.professor_id, query.replace).await?;
    Ok(Json(course))
}

/// Delete a course and its dependents
#[utoipa::path(
    delete,
    path = "/api/root/courses/{id}",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 204, description = "Course and dependents deleted"),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    CourseService::delete_course(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Courses assigned to the calling professor
#[utoipa::path(
    get,
    path = "/api/professor/courses",
    responses(
        (status = 200, description = "Courses the caller teaches", body = [Course]),
        (status = 403, description = "Caller is not an approved professor")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, user))]
pub async fn my_courses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = CourseService::list_for_professor(&state.db, user.id).await?;
    Ok(Json(courses))
}

/// The course catalog, flagged with the caller's enrollments
#[utoipa::path(
    get,
    path = "/api/student/courses",
    responses(
        (status = 200, description = "Paginated catalog", body = PaginatedCourseCatalogResponse),
        (status = 403, description = "Caller is not an active student")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, user))]
pub async fn browse_catalog(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<CourseFilterParams>,
) -> Result<Json<PaginatedCourseCatalogResponse>, AppError> {
    let catalog =
        CourseService::catalog_for_student(&state.db, user.id, filter.pagination).await?;
    Ok(Json(catalog))
}
