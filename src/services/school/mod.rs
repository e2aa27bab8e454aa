pub mod profile;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::schools::UpdateSchoolRequest;
use crate::storage::Storage;

pub struct SchoolService {
    storage: Option<Arc<dyn Storage>>,
}

impl SchoolService {
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

    // 当前学校资料
    pub async fn get_school(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::get_school(self, request).await
    }

    pub async fn update_school(
        &self,
        update: UpdateSchoolRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        profile::update_school(self, update, request).await
    }
}
