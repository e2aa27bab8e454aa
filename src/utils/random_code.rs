use rand::Rng;
use rand::distr::{Alphanumeric, SampleString};

const BASE36: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// 审批通过时下发的临时密码：10 位小写字母数字 + 2 位大写字母 + '!'
///
/// 前 10 位中至少有一位数字，保证能通过密码强度校验。
pub fn generate_temporary_password() -> String {
    let mut rng = rand::rng();
    let digit_at = rng.random_range(0..10);
    let mut password: String = (0..10)
        .map(|i| {
            if i == digit_at {
                rng.random_range(b'0'..=b'9') as char
            } else {
                BASE36[rng.random_range(0..BASE36.len())] as char
            }
        })
        .collect();
    for _ in 0..2 {
        password.push(rng.random_range(b'A'..=b'Z') as char);
    }
    password.push('!');
    password
}

/// 初始平台管理员密码
pub fn generate_random_password(len: usize) -> String {
    Alphanumeric.sample_string(&mut rand::rng(), len)
}

/// 找回密码令牌
pub fn generate_recovery_token() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 48)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_password;

    #[test]
    fn test_temporary_password_shape() {
        let password = generate_temporary_password();
        assert_eq!(password.len(), 13);
        assert!(password.ends_with('!'));
        assert!(password[10..12].chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_random_password_length() {
        assert_eq!(generate_random_password(16).len(), 16);
        assert_ne!(generate_recovery_token(), generate_recovery_token());
    }

    #[test]
    fn test_temporary_password_passes_strength_check() {
        for _ in 0..500 {
            let password = generate_temporary_password();
            assert!(password[..10].chars().any(|c| c.is_ascii_digit()), "{password}");
            assert!(validate_password(&password).is_valid, "{password}");
        }
    }
}
