//! End-to-end scenarios against a live database.
//!
//! These need PostgreSQL reachable via DATABASE_URL and are ignored by
//! default; run them with `cargo test -- --ignored`.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;
use tower::ServiceExt;

use common::{body_json, db_state, unique_email, with_conn_info};
use lectern::modules::courses::model::CreateCourseDto;
use lectern::modules::courses::service::CourseService;
use lectern::modules::users::model::AccountStatus;
use lectern::modules::users::service::UserService;
use lectern::router::init_router;
use lectern::state::AppState;

async fn register(
    app: &axum::Router,
    full_name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(with_conn_info(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "full_name": full_name,
                        "email": email,
                        "password": password,
                        "role": role
                    })
                    .to_string(),
                ))
                .unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn get_with_token(app: &axum::Router, uri: &str, token: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn professor_signup_approval_end_to_end() {
    let state = db_state().await;
    let app = init_router(state.clone());

    let email = unique_email("prof");
    let signup = register(&app, "Grace Hopper", &email, "longenough", "professor").await;
    assert_eq!(signup["user"]["status"], "pending");
    let token = signup["token"].as_str().unwrap().to_string();
    let user_id = signup["user"]["id"].as_i64().unwrap();

    // Pending professor is held at the approval gate, with the reason.
    let response = get_with_token(&app, "/api/professor/courses", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert!(
        body["message"].as_str().unwrap().contains("pending approval"),
        "{}",
        body["message"]
    );

    // Root approves; the status is read live, so the very same token
    // works on the next request.
    UserService::update_status(&state.db, user_id, AccountStatus::Approved)
        .await
        .unwrap();

    let response = get_with_token(&app, "/api/professor/courses", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn wrong_password_is_generic_and_leak_free() {
    let state = db_state().await;
    let app = init_router(state);

    let email = unique_email("student");
    register(&app, "Ada Lovelace", &email, "correcthorse", "student").await;

    let response = app
        .clone()
        .oneshot(with_conn_info(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"email": email, "password": "wronghorse"}).to_string(),
                ))
                .unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "invalid email or password");
    let raw = body.to_string();
    assert!(!raw.contains("hash"));
    assert!(!raw.contains("bcrypt"));
    assert!(!raw.contains("sqlx"));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn deleted_principal_loses_access_before_token_expiry() {
    let state = db_state().await;
    let app = init_router(state.clone());

    let email = unique_email("student");
    let signup = register(&app, "Short Lived", &email, "longenough", "student").await;
    let token = signup["token"].as_str().unwrap().to_string();
    let user_id = signup["user"]["id"].as_i64().unwrap();

    let response = get_with_token(&app, "/api/student/courses", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    UserService::delete_user(&state.db, user_id).await.unwrap();

    let response = get_with_token(&app, "/api/student/courses", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("no longer exists"));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn rejected_student_is_denied_student_capabilities() {
    let state = db_state().await;
    let app = init_router(state.clone());

    let email = unique_email("student");
    let signup = register(&app, "Rejected Student", &email, "longenough", "student").await;
    let token = signup["token"].as_str().unwrap().to_string();
    let user_id = signup["user"]["id"].as_i64().unwrap();

    UserService::update_status(&state.db, user_id, AccountStatus::Rejected)
        .await
        .unwrap();

    let response = get_with_token(&app, "/api/student/courses", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("rejected"));
}

async fn approved_professor(state: &AppState, app: &axum::Router) -> i64 {
    let email = unique_email("prof");
    let signup = register(app, "Prof", &email, "longenough", "professor").await;
    let id = signup["user"]["id"].as_i64().unwrap();
    UserService::update_status(&state.db, id, AccountStatus::Approved)
        .await
        .unwrap();
    id
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn professor_assignment_is_idempotent() {
    let state = db_state().await;
    let app = init_router(state.clone());

    let prof_id = approved_professor(&state, &app).await;
    let course = CourseService::create_course(
        &state.db,
        CreateCourseDto {
            title: "Databases".to_string(),
            description: String::new(),
        },
    )
    .await
    .unwrap();

    let first = CourseService::assign_professor(&state.db, course.id, prof_id, false)
        .await
        .unwrap();
    assert_eq!(first.professor_id, Some(prof_id));

    // Same professor again: success, nothing changes.
    let second = CourseService::assign_professor(&state.db, course.id, prof_id, false)
        .await
        .unwrap();
    assert_eq!(second.updated_at, first.updated_at);

    // A different professor is a conflict without the replace flag.
    let other_id = approved_professor(&state, &app).await;
    let err = CourseService::assign_professor(&state.db, course.id, other_id, false)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        lectern::utils::errors::AppError::Conflict(_)
    ));

    // And succeeds with it.
    let replaced = CourseService::assign_professor(&state.db, course.id, other_id, true)
        .await
        .unwrap();
    assert_eq!(replaced.professor_id, Some(other_id));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn course_deletion_is_all_or_nothing() {
    let state = db_state().await;
    let app = init_router(state.clone());

    let prof_id = approved_professor(&state, &app).await;
    let student = register(
        &app,
        "Student",
        &unique_email("student"),
        "longenough",
        "student",
    )
    .await;
    let student_id = student["user"]["id"].as_i64().unwrap();

    let course = CourseService::create_course(
        &state.db,
        CreateCourseDto {
            title: "Operating Systems".to_string(),
            description: String::new(),
        },
    )
    .await
    .unwrap();
    CourseService::assign_professor(&state.db, course.id, prof_id, false)
        .await
        .unwrap();

    sqlx::query("INSERT INTO enrollments (course_id, student_id) VALUES ($1, $2)")
        .bind(course.id)
        .bind(student_id)
        .execute(&state.db)
        .await
        .unwrap();
    let assignment_id: i64 = sqlx::query_scalar(
        "INSERT INTO assignments (course_id, title) VALUES ($1, 'hw1') RETURNING id",
    )
    .bind(course.id)
    .fetch_one(&state.db)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO submissions (assignment_id, student_id, file_key, file_name, checksum)
         VALUES ($1, $2, 'k', 'f', 'c')",
    )
    .bind(assignment_id)
    .bind(student_id)
    .execute(&state.db)
    .await
    .unwrap();
    sqlx::query("INSERT INTO announcements (course_id, title, body) VALUES ($1, 't', 'b')")
        .bind(course.id)
        .execute(&state.db)
        .await
        .unwrap();

    let counts = |db: sqlx::PgPool, course_id: i64| async move {
        let announcements: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM announcements WHERE course_id = $1")
                .bind(course_id)
                .fetch_one(&db)
                .await
                .unwrap();
        let assignments: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM assignments WHERE course_id = $1")
                .bind(course_id)
                .fetch_one(&db)
                .await
                .unwrap();
        let enrollments: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE course_id = $1")
                .bind(course_id)
                .fetch_one(&db)
                .await
                .unwrap();
        let courses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE id = $1")
            .bind(course_id)
            .fetch_one(&db)
            .await
            .unwrap();
        (announcements, assignments, enrollments, courses)
    };

    // Run the deletion steps but abandon the transaction partway: the
    // rollback must leave every dependent row in place.
    {
        let mut tx = state.db.begin().await.unwrap();
        CourseService::delete_course_in_tx(&mut tx, course.id)
            .await
            .unwrap();
        drop(tx); // rollback
    }
    assert_eq!(counts(state.db.clone(), course.id).await, (1, 1, 1, 1));

    // The committed path removes everything.
    CourseService::delete_course(&state.db, course.id)
        .await
        .unwrap();
    assert_eq!(counts(state.db.clone(), course.id).await, (0, 0, 0, 0));
}
