pub mod attendance;
pub mod auth;
pub mod common;
pub mod curriculum;
pub mod dashboard;
pub mod grades;
pub mod letters;
pub mod registrations;
pub mod schools;
pub mod staff;
pub mod students;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,
    IdentityProviderFailed = 1502,
    EmailDeliveryFailed = 1503,

    // 认证与用户
    AuthFailed = 2000,
    UserNotFound = 2001,
    UserAlreadyExists = 2002,
    UserEmailInvalid = 2003,
    UserPasswordInvalid = 2004,
    UserCreationFailed = 2005,
    UserUpdateFailed = 2006,
    UserDeleteFailed = 2007,
    CanNotDeleteCurrentUser = 2008,
    UserInactive = 2009,
    RecoveryTokenInvalid = 2010,

    // 注册审核
    RegistrationInvalid = 3000,
    RegistrationNotFound = 3001,
    RegistrationAlreadyProcessed = 3002,
    RegistrationDuplicate = 3003,
    ProvisioningFailed = 3004,
    SchoolNotFound = 3100,

    // 学籍与教职工
    StudentNotFound = 4000,
    StudentInvalid = 4001,
    StaffNotFound = 4100,
    StaffInvalid = 4101,
    LetterNotFound = 4200,
    LetterInvalid = 4201,

    // 课程编排
    ClassGroupNotFound = 5000,
    ClassGroupFull = 5001,
    EnrollmentExists = 5002,
    EnrollmentNotFound = 5003,
    TeachingAssignmentNotFound = 5004,
    ScheduleInvalid = 5005,
    ScheduleNotFound = 5006,
    CurriculumInvalid = 5007,

    // 考勤
    AttendanceInvalid = 6000,

    // 成绩与成绩单
    GradeInvalid = 7000,
    GradeNotFound = 7001,
    ReportCardNotFound = 7100,
    ReportCardFinalized = 7101,
}
