//! 邮件中一键审批/拒绝链接的落地页

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};

use super::RegistrationService;
use crate::config::AppConfig;
use crate::errors::SISystemError;
use crate::mailer::templates::escape_html;
use crate::models::registrations::{
    entities::RegistrationLookup, responses::ApprovalCredentials,
};
use crate::utils::text::normalize_phone;

const PAGE_STYLE: &str = "font-family: Arial, sans-serif; max-width: 560px; margin: 40px auto; \
                          padding: 24px; border: 1px solid #e5e7eb; border-radius: 8px;";

fn html_page(status: StatusCode, title: &str, body: &str) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(format!(
            "<!DOCTYPE html><html lang=\"id\"><head><meta charset=\"UTF-8\">\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\
             <title>{title}</title></head>\
             <body><div style=\"{PAGE_STYLE}\"><h2>{title}</h2>{body}</div></body></html>",
            title = escape_html(title),
        ))
}

/// 缺少令牌 400；找不到或已处理 404
fn error_page(err: &SISystemError) -> HttpResponse {
    let status = match err {
        SISystemError::NotFound(_) | SISystemError::Conflict(_) => StatusCode::NOT_FOUND,
        other => other.status_code(),
    };
    html_page(
        status,
        "Permintaan Tidak Dapat Diproses",
        &format!("<p>{}</p>", escape_html(err.message())),
    )
}

fn missing_token() -> HttpResponse {
    html_page(
        StatusCode::BAD_REQUEST,
        "Token Tidak Ditemukan",
        "<p>Tautan tidak lengkap. Pastikan Anda membuka tautan langsung dari email.</p>",
    )
}

/// 把初始凭据转发给申请人的 WhatsApp 链接
pub(crate) fn whatsapp_link(credentials: &ApprovalCredentials, login_url: &str) -> String {
    let phone = normalize_phone(&credentials.phone);
    let message = format!(
        "Halo {}, pendaftaran {} telah disetujui.\n\n\
         Email: {}\nPassword: {}\n\nSilakan login di {} dan segera ganti password Anda.",
        credentials.full_name,
        credentials.school_name,
        credentials.email,
        credentials.password,
        login_url
    );

    let base = format!("https://wa.me/{phone}");
    match reqwest::Url::parse_with_params(&base, &[("text", message.as_str())]) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::warn!("构建 WhatsApp 链接失败: {}", e);
            base
        }
    }
}

fn approved_page(credentials: &ApprovalCredentials) -> HttpResponse {
    let login_url = AppConfig::get().public_url("/login");
    let link = whatsapp_link(credentials, &login_url);

    html_page(
        StatusCode::OK,
        "Pendaftaran Disetujui",
        &format!(
            "<p>Sekolah <strong>{school}</strong> telah dibuat dan kredensial dikirim ke email pendaftar.</p>\
             <ul style=\"list-style: none; padding: 0;\">\
             <li><strong>Nama:</strong> {name}</li>\
             <li><strong>Email:</strong> {email}</li>\
             <li><strong>Password:</strong> <code>{password}</code></li>\
             <li><strong>No. WhatsApp:</strong> {phone}</li>\
             </ul>\
             <p><a href=\"{link}\" style=\"display: inline-block; padding: 10px 16px; \
             background: #25d366; color: #fff; border-radius: 6px; text-decoration: none;\">\
             Kirim via WhatsApp</a></p>",
            school = escape_html(&credentials.school_name),
            name = escape_html(&credentials.full_name),
            email = escape_html(&credentials.email),
            password = escape_html(&credentials.password),
            phone = escape_html(&credentials.phone),
            link = escape_html(&link),
        ),
    )
}

pub async fn approve_by_token(
    service: &RegistrationService,
    token: Option<String>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
        return Ok(missing_token());
    };

    match service
        .workflow(request)
        .approve(RegistrationLookup::Token(token))
        .await
    {
        Ok(credentials) => Ok(approved_page(&credentials)),
        Err(e) => {
            tracing::warn!("邮件链接审批失败: {}", e);
            Ok(error_page(&e))
        }
    }
}

pub async fn reject_by_token(
    service: &RegistrationService,
    token: Option<String>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
        return Ok(missing_token());
    };

    match service
        .workflow(request)
        .reject(RegistrationLookup::Token(token))
        .await
    {
        Ok(registration) => Ok(html_page(
            StatusCode::OK,
            "Pendaftaran Ditolak",
            &format!(
                "<p>Pendaftaran <strong>{}</strong> telah ditolak dan pendaftar sudah diberi tahu.</p>",
                escape_html(&registration.school_name)
            ),
        )),
        Err(e) => {
            tracing::warn!("邮件链接拒绝失败: {}", e);
            Ok(error_page(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> ApprovalCredentials {
        ApprovalCredentials {
            email: "siti@sekolah.id".into(),
            password: "abc123defgXY!".into(),
            phone: "0812-3456-7890".into(),
            full_name: "Siti Rahma".into(),
            school_name: "SMP Negeri 1".into(),
            school_id: 7,
        }
    }

    #[test]
    fn test_whatsapp_link_uses_international_number() {
        let link = whatsapp_link(&credentials(), "https://sekolah.app/login");
        assert!(link.starts_with("https://wa.me/6281234567890?text="));
        assert!(!link.contains(' '));
        assert!(link.contains("siti%40sekolah.id"));
    }

    #[test]
    fn test_processed_registration_maps_to_not_found() {
        let response = error_page(&SISystemError::conflict("sudah diproses"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(missing_token().status(), StatusCode::BAD_REQUEST);
    }
}
