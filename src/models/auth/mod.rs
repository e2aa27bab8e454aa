pub mod requests;
pub mod responses;

pub use requests::{
    ChangeInitialPasswordRequest, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest,
};
pub use responses::{LoginResponse, RefreshTokenResponse, TokenVerificationResponse};
