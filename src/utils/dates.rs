use chrono::{NaiveDate, NaiveTime};

use crate::errors::{Result, SISystemError};

/// 解析 YYYY-MM-DD
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| SISystemError::date_parse(format!("Tanggal '{value}' tidak valid: {e}")))
}

/// 解析 HH:MM
pub fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|e| SISystemError::date_parse(format!("Waktu '{value}' tidak valid: {e}")))
}

/// 校验日期区间并返回规范化后的字符串
pub fn parse_date_range(start: &str, end: &str) -> Result<(String, String)> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    if start > end {
        return Err(SISystemError::validation(
            "Tanggal mulai tidak boleh setelah tanggal akhir",
        ));
    }
    Ok((
        start.format("%Y-%m-%d").to_string(),
        end.format("%Y-%m-%d").to_string(),
    ))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_and_time() {
        assert!(parse_date("2025-07-14").is_ok());
        assert!(parse_date("14/07/2025").is_err());
        assert!(parse_time("07:15").is_ok());
        assert!(parse_time("7.15").is_err());
    }

    #[test]
    fn test_date_range_order() {
        assert_eq!(
            parse_date_range("2025-01-01", "2025-01-31").unwrap(),
            ("2025-01-01".to_string(), "2025-01-31".to_string())
        );
        assert!(parse_date_range("2025-02-01", "2025-01-31").is_err());
    }
}
