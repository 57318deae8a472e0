use crate::domain::model::DetailedAge;
use chrono::{Months, NaiveDateTime};

/// 以中文單位輸出詳細年齡，省略為零的欄位
pub fn format_detailed_age(age: &DetailedAge) -> String {
    let units = [
        (age.years, "岁"),
        (age.months, "个月"),
        (age.days, "天"),
        (age.hours, "小时"),
        (age.minutes, "分钟"),
        (age.seconds, "秒"),
    ];

    let parts: Vec<String> = units
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();

    if parts.is_empty() {
        "0天".to_string()
    } else {
        parts.join(" ")
    }
}

/// `date` 是否落在參考時間往後三個月之內（月底自動截到當月最後一天）
pub fn is_within_three_months(date: NaiveDateTime, reference: NaiveDateTime) -> bool {
    match reference.checked_add_months(Months::new(3)) {
        Some(limit) => date <= limit,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_skips_zero_units() {
        let age = DetailedAge {
            years: 42,
            months: 2,
            days: 8,
            hours: 17,
            minutes: 51,
            seconds: 0,
        };
        assert_eq!(format_detailed_age(&age), "42岁 2个月 8天 17小时 51分钟");
    }

    #[test]
    fn test_format_zero_age() {
        assert_eq!(format_detailed_age(&DetailedAge::default()), "0天");
    }

    #[test]
    fn test_within_three_months() {
        let reference = NaiveDate::from_ymd_opt(2025, 11, 30)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let end_of_feb = NaiveDate::from_ymd_opt(2026, 2, 28)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(is_within_three_months(end_of_feb, reference));
        assert!(!is_within_three_months(
            end_of_feb + chrono::Duration::days(1),
            reference
        ));
    }
}
