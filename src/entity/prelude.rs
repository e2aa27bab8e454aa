//! 预导入模块，方便使用

pub use super::academic_years::{Entity as AcademicYears, Model as AcademicYearModel};
pub use super::auth_accounts::{
    ActiveModel as AuthAccountActiveModel, Entity as AuthAccounts, Model as AuthAccountModel,
};
pub use super::class_groups::{
    ActiveModel as ClassGroupActiveModel, Entity as ClassGroups, Model as ClassGroupModel,
};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::grade_levels::{Entity as GradeLevels, Model as GradeLevelModel};
pub use super::letters::{ActiveModel as LetterActiveModel, Entity as Letters, Model as LetterModel};
pub use super::pending_registrations::{
    ActiveModel as RegistrationActiveModel, Entity as PendingRegistrations,
    Model as RegistrationModel,
};
pub use super::positions::{Entity as Positions, Model as PositionModel};
pub use super::report_cards::{
    ActiveModel as ReportCardActiveModel, Entity as ReportCards, Model as ReportCardModel,
};
pub use super::schedules::{
    ActiveModel as ScheduleActiveModel, Entity as Schedules, Model as ScheduleModel,
};
pub use super::schools::{ActiveModel as SchoolActiveModel, Entity as Schools, Model as SchoolModel};
pub use super::staff::{ActiveModel as StaffActiveModel, Entity as Staff, Model as StaffModel};
pub use super::staff_attendance::{
    ActiveModel as StaffAttendanceActiveModel, Entity as StaffAttendance,
    Model as StaffAttendanceModel,
};
pub use super::student_attendance::{
    ActiveModel as StudentAttendanceActiveModel, Entity as StudentAttendance,
    Model as StudentAttendanceModel,
};
pub use super::student_grades::{
    ActiveModel as StudentGradeActiveModel, Entity as StudentGrades, Model as StudentGradeModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::subjects::{Entity as Subjects, Model as SubjectModel};
pub use super::teaching_assignments::{
    ActiveModel as TeachingAssignmentActiveModel, Entity as TeachingAssignments,
    Model as TeachingAssignmentModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
