//! 邮件模板（印尼语）

use super::EmailMessage;
use crate::config::AppConfig;
use crate::models::registrations::entities::PendingRegistration;

const CARD_STYLE: &str = "font-family: sans-serif; max-width: 600px; margin: auto; padding: 20px; border: 1px solid #eee; border-radius: 10px;";
const SIGNATURE: &str = "<p style=\"margin-top: 20px;\">Salam,<br/>Tim Sistem Informasi Sekolah</p>";
const TEXT_SIGNATURE: &str = "Salam,\nTim Sistem Informasi Sekolah";

/// 插入 HTML 前转义用户输入
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn wrap(body: String) -> String {
    format!("<div style=\"{CARD_STYLE}\">{body}{SIGNATURE}</div>")
}

/// 新注册通知，发给平台管理员，附带一键审批/拒绝链接
pub fn registration_request(
    config: &AppConfig,
    admin_email: &str,
    registration: &PendingRegistration,
) -> EmailMessage {
    let approve_url = config.public_url(&format!(
        "/api/registrations/approve?token={}",
        registration.token
    ));
    let reject_url = config.public_url(&format!(
        "/api/registrations/reject?token={}",
        registration.token
    ));
    let school = escape_html(&registration.school_name);
    let name = escape_html(&registration.full_name);
    let email = escape_html(&registration.email);
    let phone = escape_html(&registration.phone);

    let html = wrap(format!(
        "<h2 style=\"color: #333;\">Permintaan Pendaftaran Sekolah Baru</h2>\
         <p>Halo Admin, ada permintaan pendaftaran sekolah baru dengan detail sbb:</p>\
         <ul style=\"list-style: none; padding: 0;\">\
         <li><strong>Nama Sekolah:</strong> {school}</li>\
         <li><strong>Jenjang:</strong> {level}</li>\
         <li><strong>Nama Lengkap:</strong> {name}</li>\
         <li><strong>Email:</strong> {email}</li>\
         <li><strong>No. WhatsApp:</strong> {phone}</li>\
         </ul>\
         <p>\
         <a href=\"{approve_url}\" style=\"background-color: #00b91f; color: white; padding: 12px 24px; text-decoration: none; border-radius: 8px; font-weight: bold;\">Terima &amp; Kirim Password</a> \
         <a href=\"{reject_url}\" style=\"background-color: #e91f1f; color: white; padding: 12px 24px; text-decoration: none; border-radius: 8px; font-weight: bold;\">Tolak Permintaan</a>\
         </p>\
         <p style=\"font-size: 12px; color: #888;\">Klik tombol di atas untuk memproses permintaan ini secara otomatis.</p>",
        level = registration.education_level.as_str().to_uppercase(),
    ));

    let text = format!(
        "Permintaan pendaftaran sekolah baru\n\n\
         Nama Sekolah: {}\nNama Lengkap: {}\nEmail: {}\nNo. WhatsApp: {}\n\n\
         Terima: {approve_url}\nTolak: {reject_url}\n\n{TEXT_SIGNATURE}",
        registration.school_name, registration.full_name, registration.email, registration.phone,
    );

    EmailMessage {
        to: admin_email.to_string(),
        subject: format!(
            "Permintaan Pendaftaran Sekolah Baru: {}",
            registration.school_name
        ),
        html,
        text,
    }
}

/// 告知申请人正在审核
pub fn waiting_verification(to: &str) -> EmailMessage {
    let html = wrap(
        "<h2 style=\"color: #333;\">Pendaftaran Berhasil Terkirim</h2>\
         <p>Halo, terima kasih telah mendaftarkan sekolah Anda.</p>\
         <p>Permintaan Anda sedang ditinjau oleh tim administrator kami. Mohon tunggu verifikasi selanjutnya.</p>\
         <p>Jika disetujui, Anda akan menerima email balasan berisi password untuk masuk ke sistem.</p>"
            .to_string(),
    );
    let text = format!(
        "Halo, terima kasih telah mendaftarkan sekolah Anda.\n\
         Permintaan Anda sedang ditinjau oleh tim administrator kami.\n\
         Jika disetujui, Anda akan menerima email berisi password untuk masuk ke sistem.\n\n{TEXT_SIGNATURE}"
    );

    EmailMessage {
        to: to.to_string(),
        subject: "Pendaftaran Sekolah - Sedang Diverifikasi".to_string(),
        html,
        text,
    }
}

/// 审批通过，发送初始登录凭据
pub fn approval(config: &AppConfig, to: &str, password: &str) -> EmailMessage {
    let login_url = config.public_url("/login");
    let html = wrap(format!(
        "<h2 style=\"color: #00b91f;\">Pendaftaran Sekolah Disetujui!</h2>\
         <p>Selamat, permintaan pendaftaran sekolah Anda telah disetujui.</p>\
         <p>Berikut adalah detail akun Admin Sekolah Anda:</p>\
         <ul style=\"list-style: none; padding: 0;\">\
         <li><strong>Email:</strong> {email}</li>\
         <li><strong>Password:</strong> <code style=\"font-weight: bold;\">{password}</code></li>\
         </ul>\
         <p>Silakan login di: <a href=\"{login_url}\">Halaman Login</a></p>\
         <p style=\"background: #fffbeb; padding: 10px; border-left: 4px solid #f59e0b; font-size: 13px;\">\
         <strong>Penting:</strong> Segera ganti password Anda setelah berhasil masuk demi keamanan data sekolah.</p>",
        email = escape_html(to),
        password = escape_html(password),
    ));
    let text = format!(
        "Selamat, permintaan pendaftaran sekolah Anda telah disetujui.\n\n\
         Email: {to}\nPassword: {password}\n\nLogin: {login_url}\n\n\
         Penting: segera ganti password Anda setelah berhasil masuk.\n\n{TEXT_SIGNATURE}"
    );

    EmailMessage {
        to: to.to_string(),
        subject: "Pendaftaran Sekolah Disetujui".to_string(),
        html,
        text,
    }
}

pub fn rejection(to: &str, school_name: &str) -> EmailMessage {
    let html = wrap(format!(
        "<h2 style=\"color: #e91f1f;\">Pendaftaran Sekolah</h2>\
         <p>Halo, mohon maaf permintaan pendaftaran sekolah <strong>{}</strong> belum dapat kami setujui saat ini.</p>\
         <p>Kemungkinan data yang Anda masukkan kurang lengkap atau tidak valid. Silakan coba mendaftar ulang dengan data yang benar.</p>",
        escape_html(school_name)
    ));
    let text = format!(
        "Halo, mohon maaf permintaan pendaftaran sekolah {school_name} belum dapat kami setujui saat ini.\n\
         Silakan coba mendaftar ulang dengan data yang benar.\n\n{TEXT_SIGNATURE}"
    );

    EmailMessage {
        to: to.to_string(),
        subject: "Pendaftaran Sekolah Belum Disetujui".to_string(),
        html,
        text,
    }
}

/// 找回密码链接
pub fn password_reset(
    config: &AppConfig,
    to: &str,
    token: &str,
    expiry_minutes: i64,
) -> EmailMessage {
    let reset_link = config.public_url(&format!("/reset-password?token={token}"));
    let expiry = if expiry_minutes % 60 == 0 {
        format!("{} jam", expiry_minutes / 60)
    } else {
        format!("{expiry_minutes} menit")
    };

    let html = wrap(format!(
        "<h2 style=\"color: #333;\">Permintaan Atur Ulang Kata Sandi</h2>\
         <p>Halo,</p>\
         <p>Kami menerima permintaan untuk mengatur ulang kata sandi akun Anda. Klik tombol di bawah ini untuk melanjutkan:</p>\
         <p style=\"margin: 30px 0; text-align: center;\">\
         <a href=\"{reset_link}\" style=\"background-color: #3b82f6; color: white; padding: 12px 24px; text-decoration: none; border-radius: 8px; font-weight: bold;\">Atur Ulang Kata Sandi</a></p>\
         <p>Tautan ini akan kedaluwarsa dalam {expiry}. Jika Anda tidak merasa melakukan permintaan ini, silakan abaikan email ini.</p>\
         <p style=\"font-size: 13px; color: #666;\">Jika tombol tidak berfungsi, salin tautan berikut ke browser Anda:<br/>{reset_link}</p>"
    ));
    let text = format!(
        "Kami menerima permintaan untuk mengatur ulang kata sandi akun Anda.\n\n\
         {reset_link}\n\nTautan ini akan kedaluwarsa dalam {expiry}.\n\n{TEXT_SIGNATURE}"
    );

    EmailMessage {
        to: to.to_string(),
        subject: "Atur Ulang Kata Sandi Anda".to_string(),
        html,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::registrations::entities::RegistrationStatus;
    use crate::models::schools::EducationLevel;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.app.url = "https://sis.example".to_string();
        config
    }

    fn registration() -> PendingRegistration {
        PendingRegistration {
            id: 1,
            school_name: "SMP <Harapan>".into(),
            full_name: "Budi Santoso".into(),
            email: "budi@harapan.sch.id".into(),
            phone: "081234567890".into(),
            education_level: EducationLevel::Smp,
            status: RegistrationStatus::Pending,
            token: "tok123".into(),
            processed_at: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_registration_request_links_carry_token() {
        let msg = registration_request(&config(), "admin@sis.example", &registration());
        assert_eq!(msg.to, "admin@sis.example");
        assert!(msg.subject.ends_with("SMP <Harapan>"));
        assert!(
            msg.html
                .contains("https://sis.example/api/registrations/approve?token=tok123")
        );
        assert!(
            msg.text
                .contains("https://sis.example/api/registrations/reject?token=tok123")
        );
        // HTML 中的学校名称已转义
        assert!(msg.html.contains("SMP &lt;Harapan&gt;"));
    }

    #[test]
    fn test_approval_contains_credentials_and_login_link() {
        let msg = approval(&config(), "budi@harapan.sch.id", "abc123XY!");
        assert!(msg.html.contains("abc123XY!"));
        assert!(msg.text.contains("https://sis.example/login"));
    }

    #[test]
    fn test_password_reset_expiry_wording() {
        let msg = password_reset(&config(), "a@b.id", "xyz", 60);
        assert!(msg.html.contains("1 jam"));
        assert!(msg.text.contains("/reset-password?token=xyz"));
        let msg = password_reset(&config(), "a@b.id", "xyz", 30);
        assert!(msg.text.contains("30 menit"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a&b\"<c>'"), "a&amp;b&quot;&lt;c&gt;&#39;");
    }
}
