use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CurriculumService;
use crate::errors::Result;
use crate::models::{ApiResponse, curriculum::responses::MasterDataResponse};
use crate::services::{current_tenant, error_response};
use crate::storage::Storage;

pub(crate) async fn load(storage: &dyn Storage, school_id: i64) -> Result<MasterDataResponse> {
    Ok(MasterDataResponse {
        academic_years: storage.list_academic_years(school_id).await?,
        grade_levels: storage.list_grade_levels(school_id).await?,
        subjects: storage.list_subjects(school_id).await?,
    })
}

pub async fn get_master_data(
    service: &CurriculumService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match load(storage.as_ref(), school_id).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            data,
            "Data master berhasil dimuat",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
