//! 成绩录入

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;

use super::GradeService;
use crate::errors::{Result, SISystemError};
use crate::models::{
    ApiResponse, ErrorCode,
    grades::{
        BulkSaveGradesRequest, BulkSaveGradesResponse, ClassGradesQuery, ClassGradesResponse,
        GradeUpsert, Predicate, SaveGradeRequest, StudentGrade, StudentGradeListResponse,
        StudentGradesQuery, validate_score, validate_semester,
    },
};
use crate::services::{coded_error, current_tenant, error_response};
use crate::storage::Storage;
use crate::utils::text::non_empty;

fn grade_error(err: &SISystemError) -> HttpResponse {
    match err {
        SISystemError::Validation(_) => coded_error(err, ErrorCode::GradeInvalid),
        SISystemError::NotFound(_) => coded_error(err, ErrorCode::GradeNotFound),
        other => error_response(other),
    }
}

/// 校验并转为写入数据；有分数而未给等级时按分数计算
pub(crate) fn to_upsert(grade: &SaveGradeRequest, recorded_by: i64) -> Result<GradeUpsert> {
    validate_semester(grade.semester).map_err(SISystemError::validation)?;
    if let Some(score) = grade.score {
        validate_score(score).map_err(SISystemError::validation)?;
    }

    let predicate = grade
        .predicate
        .or_else(|| grade.score.map(Predicate::from_score));

    Ok(GradeUpsert {
        academic_year_id: grade.academic_year_id,
        semester: grade.semester,
        student_id: grade.student_id,
        subject_id: grade.subject_id,
        score: grade.score,
        predicate,
        description: non_empty(grade.description.clone()),
        recorded_by,
    })
}

/// 学生、科目、学年都必须属于本校
async fn ensure_references(
    storage: &dyn Storage,
    school_id: i64,
    grades: &[GradeUpsert],
) -> Result<()> {
    let students: HashSet<i64> = grades.iter().map(|g| g.student_id).collect();
    let subjects: HashSet<i64> = grades.iter().map(|g| g.subject_id).collect();
    let years: HashSet<i64> = grades.iter().map(|g| g.academic_year_id).collect();

    for id in students {
        if storage.get_student(school_id, id).await?.is_none() {
            return Err(SISystemError::validation(format!("Siswa {id} tidak ditemukan")));
        }
    }
    for id in subjects {
        if storage.get_subject(school_id, id).await?.is_none() {
            return Err(SISystemError::validation(format!(
                "Mata pelajaran {id} tidak ditemukan"
            )));
        }
    }
    for id in years {
        if storage.get_academic_year(school_id, id).await?.is_none() {
            return Err(SISystemError::validation(format!(
                "Tahun ajaran {id} tidak ditemukan"
            )));
        }
    }
    Ok(())
}

pub(crate) async fn save(
    storage: &dyn Storage,
    school_id: i64,
    recorded_by: i64,
    grade: SaveGradeRequest,
) -> Result<StudentGrade> {
    let upsert = to_upsert(&grade, recorded_by)?;

    if let Some(id) = grade.id {
        return storage
            .update_grade(school_id, id, upsert)
            .await?
            .ok_or_else(|| SISystemError::not_found("Nilai tidak ditemukan"));
    }

    ensure_references(storage, school_id, std::slice::from_ref(&upsert)).await?;
    storage.upsert_grade(school_id, upsert).await
}

pub(crate) async fn save_bulk(
    storage: &dyn Storage,
    school_id: i64,
    recorded_by: i64,
    bulk: BulkSaveGradesRequest,
) -> Result<u64> {
    if bulk.grades.is_empty() {
        return Err(SISystemError::validation("Data nilai tidak boleh kosong"));
    }
    let upserts = bulk
        .grades
        .iter()
        .map(|grade| to_upsert(grade, recorded_by))
        .collect::<Result<Vec<_>>>()?;

    ensure_references(storage, school_id, &upserts).await?;
    storage.upsert_grades(school_id, upserts).await
}

pub async fn student_grades(
    service: &GradeService,
    student_id: i64,
    query: StudentGradesQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    if let Err(msg) = validate_semester(query.semester) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::GradeInvalid, msg)));
    }
    let storage = service.get_storage(request);

    match storage
        .list_student_grades(school_id, student_id, query.academic_year_id, query.semester)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentGradeListResponse { items },
            "Nilai siswa berhasil dimuat",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn class_grades(
    service: &GradeService,
    class_group_id: i64,
    query: ClassGradesQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    if let Err(msg) = validate_semester(query.semester) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::GradeInvalid, msg)));
    }
    let storage = service.get_storage(request);

    match storage
        .list_class_grades(
            school_id,
            class_group_id,
            query.subject_id,
            query.academic_year_id,
            query.semester,
        )
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassGradesResponse { items },
            "Nilai rombel berhasil dimuat",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn save_grade(
    service: &GradeService,
    grade: SaveGradeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (current_user, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match save(storage.as_ref(), school_id, current_user.id, grade).await {
        Ok(grade) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            grade,
            "Nilai berhasil disimpan",
        ))),
        Err(e) => Ok(grade_error(&e)),
    }
}

pub async fn save_grades_bulk(
    service: &GradeService,
    bulk: BulkSaveGradesRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (current_user, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match save_bulk(storage.as_ref(), school_id, current_user.id, bulk).await {
        Ok(saved) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            BulkSaveGradesResponse { saved },
            format!("{saved} nilai berhasil disimpan"),
        ))),
        Err(e) => Ok(grade_error(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support};

    fn request(
        student_id: i64,
        subject_id: i64,
        year_id: i64,
        score: Option<f64>,
    ) -> SaveGradeRequest {
        SaveGradeRequest {
            id: None,
            academic_year_id: year_id,
            semester: 1,
            student_id,
            subject_id,
            score,
            predicate: None,
            description: None,
        }
    }

    #[test]
    fn test_predicate_derived_from_score() {
        let upsert = to_upsert(&request(1, 1, 1, Some(84.5)), 9).unwrap();
        assert_eq!(upsert.predicate, Some(Predicate::B));

        let mut explicit = request(1, 1, 1, Some(84.5));
        explicit.predicate = Some(Predicate::A);
        assert_eq!(to_upsert(&explicit, 9).unwrap().predicate, Some(Predicate::A));

        assert_eq!(to_upsert(&request(1, 1, 1, None), 9).unwrap().predicate, None);

        let mut bad_semester = request(1, 1, 1, Some(70.0));
        bad_semester.semester = 3;
        assert!(to_upsert(&bad_semester, 9).is_err());
        assert!(to_upsert(&request(1, 1, 1, Some(101.0)), 9).is_err());
    }

    #[tokio::test]
    async fn test_save_then_update_by_id() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school_id = test_support::create_school(&storage, "nilai").await;
        let (year_id, _) = test_support::create_class_setup(&storage, school_id, 30).await;
        let subject_id = test_support::create_subject(&storage, school_id, "MTK").await;
        let student = storage
            .create_student(school_id, test_support::student_record("5001", "Fajar", 2024))
            .await
            .unwrap();

        let saved = save(
            &storage,
            school_id,
            7,
            request(student.id, subject_id, year_id, Some(65.0)),
        )
        .await
        .unwrap();
        assert_eq!(saved.predicate, Some(Predicate::D));

        let mut fix = request(student.id, subject_id, year_id, Some(92.0));
        fix.id = Some(saved.id);
        let updated = save(&storage, school_id, 7, fix.clone()).await.unwrap();
        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.predicate, Some(Predicate::A));

        // 其他学校不能按 id 改
        let err = save(&storage, school_id + 1, 7, fix).await.unwrap_err();
        assert!(matches!(err, SISystemError::NotFound(_)));

        let err = save_bulk(
            &storage,
            school_id,
            7,
            BulkSaveGradesRequest {
                grades: vec![request(student.id, 9999, year_id, Some(80.0))],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SISystemError::Validation(_)));

        let saved = save_bulk(
            &storage,
            school_id,
            7,
            BulkSaveGradesRequest {
                grades: vec![request(student.id, subject_id, year_id, Some(75.0))],
            },
        )
        .await
        .unwrap();
        assert_eq!(saved, 1);
    }
}
