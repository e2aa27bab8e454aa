//! 路径参数提取器
//!
//! 解析失败时直接返回统一格式的 400 响应，避免 actix 默认的纯文本错误。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use std::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_i64(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(name).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                format!("Parameter '{name}' tidak valid: '{raw}'"),
            ));
            Err(InternalError::from_response(
                format!("invalid path parameter {name}"),
                response,
            )
            .into())
        }
    }
}

macro_rules! define_i64_path_extractor {
    ($($name:ident => $param:literal),+ $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_positive_i64(req, $param).map($name))
                }
            }
        )+
    };
}

define_i64_path_extractor! {
    SafeIDI64 => "id",
    SafeEnrollmentIdI64 => "enrollment_id",
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_rejects_non_numeric_and_non_positive_ids() {
        let req = TestRequest::default()
            .param("id", "abc")
            .to_http_request();
        assert!(parse_positive_i64(&req, "id").is_err());

        let req = TestRequest::default().param("id", "0").to_http_request();
        assert!(parse_positive_i64(&req, "id").is_err());

        let req = TestRequest::default().param("id", "42").to_http_request();
        assert_eq!(parse_positive_i64(&req, "id").unwrap(), 42);
    }
}
