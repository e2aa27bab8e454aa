pub mod handlers;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::letters::CreateLetterRequest;
use crate::storage::Storage;

pub struct LetterService {
    storage: Option<Arc<dyn Storage>>,
}

impl LetterService {
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

    pub async fn list_letters(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        handlers::list_letters(self, request).await
    }

    pub async fn create_letter(
        &self,
        letter: CreateLetterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::create_letter(self, letter, request).await
    }

    pub async fn delete_letter(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        handlers::delete_letter(self, id, request).await
    }
}
