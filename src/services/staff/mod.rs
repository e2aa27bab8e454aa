pub mod list;
pub mod write;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::staff::StaffPayload;
use crate::storage::Storage;

pub struct StaffService {
    storage: Option<Arc<dyn Storage>>,
}

impl StaffService {
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

    pub async fn list_staff(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_staff(self, request).await
    }

    pub async fn get_staff(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::get_staff(self, id, request).await
    }

    pub async fn list_positions(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_positions(self, request).await
    }

    pub async fn create_staff(
        &self,
        payload: StaffPayload,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        write::create_staff(self, payload, request).await
    }

    pub async fn update_staff(
        &self,
        id: i64,
        payload: StaffPayload,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        write::update_staff(self, id, payload, request).await
    }

    pub async fn delete_staff(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        write::delete_staff(self, id, request).await
    }
}
