pub mod entries;
pub mod report_cards;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grades::{
    BulkSaveGradesRequest, ClassGradesQuery, GenerateReportCardRequest, ReportCardListQuery,
    ReportCardLookupQuery, SaveGradeRequest, StudentGradesQuery,
};
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
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

    pub async fn student_grades(
        &self,
        student_id: i64,
        query: StudentGradesQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        entries::student_grades(self, student_id, query, request).await
    }

    pub async fn class_grades(
        &self,
        class_group_id: i64,
        query: ClassGradesQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        entries::class_grades(self, class_group_id, query, request).await
    }

    pub async fn save_grade(
        &self,
        grade: SaveGradeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        entries::save_grade(self, grade, request).await
    }

    pub async fn save_grades_bulk(
        &self,
        bulk: BulkSaveGradesRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        entries::save_grades_bulk(self, bulk, request).await
    }

    pub async fn list_report_cards(
        &self,
        query: ReportCardListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        report_cards::list_report_cards(self, query, request).await
    }

    pub async fn get_report_card(
        &self,
        query: ReportCardLookupQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        report_cards::get_report_card(self, query, request).await
    }

    pub async fn generate_report_card(
        &self,
        generate: GenerateReportCardRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        report_cards::generate_report_card(self, generate, request).await
    }

    pub async fn finalize_report_card(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        report_cards::finalize_report_card(self, id, request).await
    }
}
