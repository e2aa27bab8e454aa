pub mod form;
pub mod graduation;
pub mod list;
pub mod write;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::students::requests::{StudentListParams, StudentPayload};
use crate::storage::Storage;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
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

    pub async fn list_students(
        &self,
        query: StudentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, query, request).await
    }

    pub async fn get_student(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::get_student(self, id, request).await
    }

    pub async fn create_student(
        &self,
        payload: StudentPayload,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        write::create_student(self, payload, request).await
    }

    pub async fn update_student(
        &self,
        id: i64,
        payload: StudentPayload,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        write::update_student(self, id, payload, request).await
    }

    pub async fn delete_student(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        write::delete_student(self, id, request).await
    }

    // 应届毕业人数
    pub async fn graduation_candidates(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        graduation::count_candidates(self, request).await
    }

    // 批量转为校友
    pub async fn graduate_students(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        graduation::graduate(self, request).await
    }
}
