use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("Invalid time regex"));

// 常见弱密码（不区分大小写）
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "abcd1234",
    "sekolah123",
    "rahasia123",
];

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Format email tidak valid");
    }
    Ok(())
}

/// 规范化邮箱：去空白并转小写
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 校验 HH:MM 格式
pub fn validate_time(value: &str) -> Result<(), String> {
    if TIME_RE.is_match(value) {
        Ok(())
    } else {
        Err(format!("Format waktu harus HH:MM, diterima '{value}'"))
    }
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 密码策略：至少 8 位，同时包含字母和数字，且不是常见弱密码
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password minimal 8 karakter");
    }
    if !password.chars().any(|c| c.is_alphabetic()) {
        errors.push("Password harus mengandung huruf");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password harus mengandung angka");
    }
    if COMMON_PASSWORDS
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password terlalu umum, gunakan password lain");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 新密码与确认密码一起校验
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), String> {
    if password != confirmation {
        return Err("Konfirmasi password tidak cocok".to_string());
    }
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format() {
        assert!(validate_email("kepala@sekolah.sch.id").is_ok());
        assert!(validate_email("no-at-sign.example").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Budi@Sekolah.ID "), "budi@sekolah.id");
    }

    #[test]
    fn test_time_format() {
        assert!(validate_time("07:30").is_ok());
        assert!(validate_time("23:59").is_ok());
        assert!(validate_time("24:00").is_err());
        assert!(validate_time("7:30").is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("guru2025ok").is_valid);
        assert!(!validate_password("short1").is_valid);
        assert!(!validate_password("onlyletters").is_valid);
        assert!(!validate_password("1234567890").is_valid);

        let common = validate_password("Password123");
        assert!(!common.is_valid);
        assert!(common.errors.contains(&"Password terlalu umum, gunakan password lain"));
    }

    #[test]
    fn test_confirmation_must_match() {
        assert!(validate_new_password("guru2025ok", "guru2025ok").is_ok());
        assert_eq!(
            validate_new_password("guru2025ok", "guru2025OK").unwrap_err(),
            "Konfirmasi password tidak cocok"
        );
    }
}
