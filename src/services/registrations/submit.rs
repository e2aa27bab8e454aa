use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RegistrationService;
use crate::models::ApiResponse;
use crate::models::registrations::{
    requests::SubmitRegistrationRequest, responses::RegistrationResponse,
};
use crate::services::error_response;

pub async fn submit_registration(
    service: &RegistrationService,
    submit_request: SubmitRegistrationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service.workflow(request).submit(submit_request).await {
        Ok(registration) => Ok(HttpResponse::Created().json(ApiResponse::success(
            RegistrationResponse { registration },
            "Pendaftaran berhasil dikirim. Silakan tunggu verifikasi melalui email.",
        ))),
        Err(e) => {
            tracing::info!("注册申请被拒绝: {}", e);
            Ok(error_response(&e))
        }
    }
}
