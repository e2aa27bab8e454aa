//! 学生表单规范化

use chrono::Datelike;

use crate::errors::{Result, SISystemError};
use crate::models::students::entities::{EnrollmentType, StudentStatus};
use crate::models::students::requests::{StudentPayload, StudentRecord};
use crate::utils::dates::{parse_date, today};
use crate::utils::text::{non_empty, title_case, title_case_opt};

/// 表单转为存储记录
///
/// `current_status` 为编辑前的状态，新建时为 None。校友入学方式一律视为已毕业。
pub fn to_record(
    payload: StudentPayload,
    current_status: Option<StudentStatus>,
) -> Result<StudentRecord> {
    let nisn = payload.nisn.trim().to_string();
    let nis = payload.nis.trim().to_string();
    let full_name = title_case(payload.full_name.trim());
    let birth_place = title_case(payload.birth_place.trim());
    let religion = payload.religion.trim().to_string();

    if nisn.is_empty() || nis.is_empty() || full_name.is_empty() {
        return Err(SISystemError::validation("NISN, NIS, dan nama lengkap wajib diisi"));
    }
    if birth_place.is_empty() || religion.is_empty() {
        return Err(SISystemError::validation("Tempat lahir dan agama wajib diisi"));
    }
    let birth_date = parse_date(&payload.birth_date)?;

    let max_year = today().year() + 1;
    if payload.admission_year < 1950 || payload.admission_year > max_year {
        return Err(SISystemError::validation(format!(
            "Tahun masuk harus di antara 1950 dan {max_year}"
        )));
    }

    let status = if payload.enrollment_type == EnrollmentType::Alumni {
        StudentStatus::Graduated
    } else {
        match current_status {
            // 编辑：未显式指定则保持原状态
            Some(current) => payload.status.unwrap_or(current),
            None => StudentStatus::Active,
        }
    };

    Ok(StudentRecord {
        nisn,
        nis,
        full_name,
        birth_date: birth_date.format("%Y-%m-%d").to_string(),
        birth_place,
        gender: payload.gender,
        religion,
        address: non_empty(payload.address),
        phone: non_empty(payload.phone),
        photo_url: non_empty(payload.photo_url),
        status,
        admission_year: payload.admission_year,
        enrollment_type: payload.enrollment_type,
        nik: non_empty(payload.nik),
        parent_type: payload.parent_type,
        father_name: title_case_opt(payload.father_name),
        father_phone: non_empty(payload.father_phone),
        mother_name: title_case_opt(payload.mother_name),
        mother_phone: non_empty(payload.mother_phone),
        guardian_name: title_case_opt(payload.guardian_name),
        guardian_phone: non_empty(payload.guardian_phone),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::entities::{Gender, ParentType};

    fn payload() -> StudentPayload {
        StudentPayload {
            nisn: " 0012345678 ".into(),
            nis: "2024001".into(),
            full_name: "ahmad FAUZI".into(),
            birth_date: "2011-03-09".into(),
            birth_place: "bandung".into(),
            gender: Gender::Male,
            religion: "Islam".into(),
            address: Some("   ".into()),
            phone: None,
            photo_url: None,
            status: Some(StudentStatus::Transferred),
            admission_year: 2024,
            enrollment_type: EnrollmentType::New,
            nik: None,
            parent_type: ParentType::Parent,
            father_name: Some("budi".into()),
            father_phone: None,
            mother_name: None,
            mother_phone: None,
            guardian_name: None,
            guardian_phone: None,
        }
    }

    #[test]
    fn test_new_student_is_active_and_title_cased() {
        let record = to_record(payload(), None).unwrap();
        assert_eq!(record.full_name, "Ahmad Fauzi");
        assert_eq!(record.birth_place, "Bandung");
        assert_eq!(record.father_name.as_deref(), Some("Budi"));
        assert_eq!(record.nisn, "0012345678");
        assert_eq!(record.address, None);
        assert_eq!(record.status, StudentStatus::Active);
    }

    #[test]
    fn test_update_keeps_or_overrides_status() {
        let record = to_record(payload(), Some(StudentStatus::Active)).unwrap();
        assert_eq!(record.status, StudentStatus::Transferred);

        let mut unchanged = payload();
        unchanged.status = None;
        let record = to_record(unchanged, Some(StudentStatus::Dropped)).unwrap();
        assert_eq!(record.status, StudentStatus::Dropped);
    }

    #[test]
    fn test_alumni_forces_graduated() {
        let mut alumni = payload();
        alumni.enrollment_type = EnrollmentType::Alumni;
        assert_eq!(to_record(alumni.clone(), None).unwrap().status, StudentStatus::Graduated);
        assert_eq!(
            to_record(alumni, Some(StudentStatus::Active)).unwrap().status,
            StudentStatus::Graduated
        );
    }

    #[test]
    fn test_invalid_birth_date_is_rejected() {
        let mut bad = payload();
        bad.birth_date = "09-03-2011".into();
        assert!(matches!(to_record(bad, None), Err(SISystemError::DateParse(_))));
    }
}
