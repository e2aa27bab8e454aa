//! 教学编排：教学班、分班、任课、课表与只读主数据

pub mod assignments;
pub mod class_groups;
pub mod enrollments;
pub mod master_data;
pub mod schedules;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::curriculum::requests::{
    AddEnrollmentRequest, ClassGroupListParams, CreateClassGroupRequest, CreateScheduleRequest,
    CreateTeachingAssignmentRequest, ScheduleListParams, TeachingAssignmentListParams,
};
use crate::storage::Storage;

pub struct CurriculumService {
    storage: Option<Arc<dyn Storage>>,
}

impl CurriculumService {
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

    pub async fn master_data(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        master_data::get_master_data(self, request).await
    }

    pub async fn list_class_groups(
        &self,
        query: ClassGroupListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        class_groups::list_class_groups(self, query, request).await
    }

    pub async fn get_class_group(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        class_groups::get_class_group(self, id, request).await
    }

    pub async fn create_class_group(
        &self,
        group: CreateClassGroupRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        class_groups::create_class_group(self, group, request).await
    }

    pub async fn delete_class_group(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        class_groups::delete_class_group(self, id, request).await
    }

    pub async fn add_enrollment(
        &self,
        class_group_id: i64,
        enrollment: AddEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::add_enrollment(self, class_group_id, enrollment, request).await
    }

    pub async fn remove_enrollment(
        &self,
        class_group_id: i64,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::remove_enrollment(self, class_group_id, enrollment_id, request).await
    }

    pub async fn list_teaching_assignments(
        &self,
        query: TeachingAssignmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::list_teaching_assignments(self, query, request).await
    }

    pub async fn create_teaching_assignment(
        &self,
        assignment: CreateTeachingAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::create_teaching_assignment(self, assignment, request).await
    }

    pub async fn delete_teaching_assignment(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::delete_teaching_assignment(self, id, request).await
    }

    pub async fn list_schedules(
        &self,
        query: ScheduleListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        schedules::list_schedules(self, query, request).await
    }

    pub async fn create_schedule(
        &self,
        schedule: CreateScheduleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        schedules::create_schedule(self, schedule, request).await
    }

    pub async fn delete_schedule(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        schedules::delete_schedule(self, id, request).await
    }
}
