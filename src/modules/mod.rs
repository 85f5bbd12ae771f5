pub mod announcements;
pub mod assignments;
pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod files;
pub mod submissions;
pub mod users;
