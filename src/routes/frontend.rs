//! 管理后台静态资源
//!
//! 构建产物由 rust-embed 在编译期嵌入，前端路由一律回退到 index.html。
//! index.html 中的 `%SYSTEM_NAME%`、`%APP_URL%` 在返回前按配置替换。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::path::Path;

use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode};

#[derive(Embed)]
#[folder = "frontend/dist/"]
struct DashboardAssets;

const INDEX_FILE: &str = "index.html";

fn extension(path: &str) -> &str {
    Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
}

fn content_type(path: &str) -> &'static str {
    match extension(path) {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "webmanifest" | "map" => "application/json; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// vite 输出到 assets/ 的文件名带 hash，可以长期缓存
fn is_immutable(path: &str) -> bool {
    path.starts_with("assets/") && !matches!(extension(path), "html" | "json")
}

fn render_index(content: &[u8], config: &AppConfig) -> Vec<u8> {
    String::from_utf8_lossy(content)
        .replace("%SYSTEM_NAME%", &config.app.system_name)
        .replace("%APP_URL%", config.app.url.trim_end_matches('/'))
        .into_bytes()
}

/// 未注册的 /api 路径不回退到页面，返回统一的 JSON 404
fn is_api_path(path: &str) -> bool {
    path == "api" || path.starts_with("api/")
}

pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let path = req.match_info().query("tail").trim_start_matches('/');

    if is_api_path(path) {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Endpoint tidak ditemukan",
        )));
    }

    let (file, file_path) = match DashboardAssets::get(path).filter(|_| !path.is_empty()) {
        Some(file) => (Some(file), path),
        None => (DashboardAssets::get(INDEX_FILE), INDEX_FILE),
    };

    let Some(file) = file else {
        tracing::warn!("前端资源未嵌入，无法返回 {}", path);
        return Ok(HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(
                "<!DOCTYPE html><html lang=\"id\"><head><meta charset=\"utf-8\">\
                 <title>Sistem Informasi Sekolah</title></head>\
                 <body><h1>Frontend belum dibangun</h1>\
                 <p>Jalankan <code>cd frontend &amp;&amp; bun run build</code> lalu build ulang server.</p>\
                 </body></html>",
            ));
    };

    let mime = content_type(file_path);
    let body = if file_path == INDEX_FILE {
        render_index(&file.data, AppConfig::get())
    } else {
        file.data.into_owned()
    };

    let cache_control = if is_immutable(file_path) {
        "public, max-age=31536000, immutable"
    } else {
        "no-cache, no-store, must-revalidate"
    };

    Ok(HttpResponse::Ok()
        .content_type(mime)
        .insert_header(("Cache-Control", cache_control))
        .body(body))
}

/// 放在最后注册，作为所有 GET 请求的兜底
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{tail:.*}", web::get().to(serve_frontend));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_hashed_assets_are_immutable() {
        assert!(is_immutable("assets/index-3f2a1c.js"));
        assert!(is_immutable("assets/logo-9a8b.svg"));
        assert!(!is_immutable("index.html"));
        assert!(!is_immutable("favicon.ico"));
        assert_eq!(content_type("manifest.webmanifest"), "application/json; charset=utf-8");
        assert_eq!(content_type("rapor.bin"), "application/octet-stream");
    }

    #[test]
    fn test_index_placeholders_use_config() {
        let mut config = AppConfig::default();
        config.app.system_name = "SIS Nusantara".into();
        config.app.url = "https://sis.example.id/".into();
        let html = render_index(
            b"<title>%SYSTEM_NAME%</title><base href=\"%APP_URL%/\">",
            &config,
        );
        assert_eq!(
            String::from_utf8(html).unwrap(),
            "<title>SIS Nusantara</title><base href=\"https://sis.example.id/\">"
        );
    }

    #[test]
    fn test_api_paths_do_not_fall_back() {
        assert!(is_api_path("api/v1/unknown"));
        assert!(is_api_path("api"));
        assert!(!is_api_path("apiary"));
        assert!(!is_api_path("dashboard/students"));
    }
}
