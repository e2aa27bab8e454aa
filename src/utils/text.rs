//! 文本规范化

/// 每个空格分隔的单词首字母大写，其余小写
pub fn title_case(input: &str) -> String {
    input
        .to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 可选姓名：空白视为未填写
pub fn title_case_opt(input: Option<String>) -> Option<String> {
    non_empty(input).map(|s| title_case(&s))
}

/// 空白字符串视为 None
pub fn non_empty(input: Option<String>) -> Option<String> {
    input
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 学校 slug：名称转小写，非字母数字折叠为 '-'，再拼接毫秒时间戳
pub fn slugify_school_name(name: &str, millis: i64) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        format!("sekolah-{millis}")
    } else {
        format!("{slug}-{millis}")
    }
}

/// WhatsApp 号码：只保留数字，0 开头替换为 62，8 开头补 62
pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if let Some(rest) = digits.strip_prefix('0') {
        format!("62{rest}")
    } else if digits.starts_with('8') {
        format!("62{digits}")
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("bUDI santoso"), "Budi Santoso");
        assert_eq!(title_case("siti  aminah"), "Siti  Aminah");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_opt_skips_blank() {
        assert_eq!(title_case_opt(Some("  ".into())), None);
        assert_eq!(title_case_opt(Some("ahmad".into())), Some("Ahmad".into()));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(
            slugify_school_name("SD Negeri 1 Bandung", 1700000000000),
            "sd-negeri-1-bandung-1700000000000"
        );
        assert_eq!(
            slugify_school_name("  SMA  Tunas -- Bangsa! ", 5),
            "sma-tunas-bangsa-5"
        );
        assert_eq!(slugify_school_name("***", 7), "sekolah-7");
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("0812-3456-789"), "628123456789");
        assert_eq!(normalize_phone("812 3456 789"), "628123456789");
        assert_eq!(normalize_phone("+62 812 3456"), "628123456");
    }
}
