pub mod callback;
pub mod list;
pub mod review;
pub mod submit;
pub mod workflow;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::registrations::requests::{RegistrationListParams, SubmitRegistrationRequest};
use crate::storage::Storage;

pub use workflow::RegistrationWorkflow;

pub struct RegistrationService {
    storage: Option<Arc<dyn Storage>>,
}

impl RegistrationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn workflow(&self, request: &HttpRequest) -> RegistrationWorkflow {
        RegistrationWorkflow::new(
            self.get_storage(request),
            super::app_identity(request),
            super::app_mailer(request),
        )
    }

    // 公开提交注册申请
    pub async fn submit(
        &self,
        submit_request: SubmitRegistrationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_registration(self, submit_request, request).await
    }

    pub async fn list(
        &self,
        query: RegistrationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_registrations(self, query, request).await
    }

    // 平台管理员审批
    pub async fn approve(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        review::approve_registration(self, id, request).await
    }

    pub async fn reject(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        review::reject_registration(self, id, request).await
    }

    // 邮件链接回调
    pub async fn approve_by_token(
        &self,
        token: Option<String>,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        callback::approve_by_token(self, token, request).await
    }

    pub async fn reject_by_token(
        &self,
        token: Option<String>,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        callback::reject_by_token(self, token, request).await
    }
}
