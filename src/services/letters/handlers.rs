//! 公文登记

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LetterService;
use crate::errors::{Result, SISystemError};
use crate::models::{
    ApiResponse, ErrorCode,
    letters::{CreateLetterRequest, LetterListResponse},
};
use crate::services::{coded_error, current_tenant, error_response, invalidate_dashboard};
use crate::utils::dates::parse_date;
use crate::utils::text::non_empty;

pub(crate) fn normalize_letter(letter: CreateLetterRequest) -> Result<CreateLetterRequest> {
    let letter_number = letter.letter_number.trim().to_string();
    let subject = letter.subject.trim().to_string();
    if letter_number.is_empty() || subject.is_empty() {
        return Err(SISystemError::validation("Nomor surat dan perihal wajib diisi"));
    }
    let date = parse_date(&letter.date)?;

    Ok(CreateLetterRequest {
        letter_number,
        letter_type: letter.letter_type,
        subject,
        sender: non_empty(letter.sender),
        recipient: non_empty(letter.recipient),
        date: date.format("%Y-%m-%d").to_string(),
        file_url: non_empty(letter.file_url),
    })
}

pub async fn list_letters(
    service: &LetterService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match storage.list_letters(school_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            LetterListResponse { items },
            "Daftar surat berhasil dimuat",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn create_letter(
    service: &LetterService,
    letter: CreateLetterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let letter = match normalize_letter(letter) {
        Ok(letter) => letter,
        Err(e) => return Ok(coded_error(&e, ErrorCode::LetterInvalid)),
    };
    let storage = service.get_storage(request);

    match storage.create_letter(school_id, letter).await {
        Ok(letter) => {
            invalidate_dashboard(request, school_id).await;
            Ok(HttpResponse::Created().json(ApiResponse::success(letter, "Surat berhasil dicatat")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_letter(
    service: &LetterService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, school_id) = match current_tenant(request) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = service.get_storage(request);

    match storage.delete_letter(school_id, id).await {
        Ok(true) => {
            invalidate_dashboard(request, school_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Surat berhasil dihapus")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::LetterNotFound,
            "Surat tidak ditemukan",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::letters::LetterType;

    fn letter(number: &str, date: &str) -> CreateLetterRequest {
        CreateLetterRequest {
            letter_number: number.into(),
            letter_type: LetterType::Incoming,
            subject: " Undangan Rapat ".into(),
            sender: Some("Dinas Pendidikan".into()),
            recipient: Some("".into()),
            date: date.into(),
            file_url: None,
        }
    }

    #[test]
    fn test_normalize_letter() {
        let normalized = normalize_letter(letter(" 001/SK/2025 ", "2025-02-03")).unwrap();
        assert_eq!(normalized.letter_number, "001/SK/2025");
        assert_eq!(normalized.subject, "Undangan Rapat");
        assert_eq!(normalized.recipient, None);

        assert!(matches!(
            normalize_letter(letter("  ", "2025-02-03")),
            Err(SISystemError::Validation(_))
        ));
        assert!(matches!(
            normalize_letter(letter("002", "3 Feb 2025")),
            Err(SISystemError::DateParse(_))
        ));
    }
}
