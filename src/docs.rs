use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::announcements::model::{Announcement, CreateAnnouncementDto};
use crate::modules::assignments::model::{Assignment, CreateAssignmentDto, UpdateAssignmentDto};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    AuthResponse, LoginRequest, MessageResponse, RegisterRequestDto, RegisterRole,
};
use crate::modules::courses::model::{
    AssignProfessorDto, Course, CourseWithEnrollment, CreateCourseDto,
    PaginatedCourseCatalogResponse, PaginatedCoursesResponse,
};
use crate::modules::enrollments::model::{Enrollment, EnrollmentWithCourse};
use crate::modules::submissions::model::{
    DownloadUrlResponse, GradeDto, Submission, SubmissionWithStudent,
};
use crate::modules::users::model::{
    AccountStatus, PaginatedUsersResponse, Role, UpdateStatusDto, User,
};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::me,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::list_pending_professors,
        crate::modules::users::controller::update_status,
        crate::modules::users::controller::delete_user,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::list_courses,
        crate::modules::courses::controller::assign_professor,
        crate::modules::courses::controller::delete_course,
        crate::modules::courses::controller::my_courses,
        crate::modules::courses::controller::browse_catalog,
        crate::modules::enrollments::controller::enroll,
        crate::modules::enrollments::controller::my_enrollments,
        crate::modules::assignments::controller::create_assignment,
        crate::modules::assignments::controller::update_assignment,
        crate::modules::assignments::controller::delete_assignment,
        crate::modules::assignments::controller::course_assignments,
        crate::modules::submissions::controller::submit,
        crate::modules::submissions::controller::my_submissions,
        crate::modules::submissions::controller::download_url,
        crate::modules::submissions::controller::assignment_submissions,
        crate::modules::submissions::controller::grade_submission,
        crate::modules::announcements::controller::create_announcement,
        crate::modules::announcements::controller::delete_announcement,
        crate::modules::announcements::controller::course_announcements,
        crate::modules::files::controller::fetch_file,
    ),
    components(
        schemas(
            User,
            Role,
            AccountStatus,
            UpdateStatusDto,
            PaginatedUsersResponse,
            RegisterRequestDto,
            RegisterRole,
            LoginRequest,
            AuthResponse,
            MessageResponse,
            ErrorResponse,
            Course,
            CreateCourseDto,
            AssignProfessorDto,
            CourseWithEnrollment,
            PaginatedCoursesResponse,
            PaginatedCourseCatalogResponse,
            Enrollment,
            EnrollmentWithCourse,
            Assignment,
            CreateAssignmentDto,
            UpdateAssignmentDto,
            Submission,
            SubmissionWithStudent,
            GradeDto,
            DownloadUrlResponse,
            Announcement,
            CreateAnnouncementDto,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, and identity"),
        (name = "Users", description = "Root account administration"),
        (name = "Courses", description = "Course management and browsing"),
        (name = "Enrollments", description = "Student course enrollment"),
        (name = "Assignments", description = "Assignment management"),
        (name = "Submissions", description = "Assignment submissions and grading"),
        (name = "Announcements", description = "Course announcements"),
        (name = "Files", description = "Signed file retrieval")
    ),
    info(
        title = "Lectern API",
        version = "0.1.0",
        description = "A learning-management REST API with role-gated access control, built with Rust, Axum, and PostgreSQL.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
