//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod academic_years;
pub mod auth_accounts;
pub mod class_groups;
pub mod enrollments;
pub mod grade_levels;
pub mod letters;
pub mod pending_registrations;
pub mod positions;
pub mod report_cards;
pub mod schedules;
pub mod schools;
pub mod staff;
pub mod staff_attendance;
pub mod student_attendance;
pub mod student_grades;
pub mod students;
pub mod subjects;
pub mod teaching_assignments;
pub mod users;
