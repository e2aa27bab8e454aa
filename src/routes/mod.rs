pub mod attendance;

pub mod auth;

pub mod curriculum;

pub mod frontend;

pub mod grades;

pub mod registrations;

pub mod school;

pub mod staff;

pub mod students;

pub mod users;

pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use curriculum::configure_curriculum_routes;
pub use frontend::configure_frontend_routes;
pub use grades::configure_grade_routes;
pub use registrations::configure_registration_routes;
pub use school::configure_school_routes;
pub use staff::configure_staff_routes;
pub use students::configure_student_routes;
pub use users::configure_user_routes;
