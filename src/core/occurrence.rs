use crate::domain::model::ResolvedBirth;
use crate::domain::ports::LunarConverter;
use crate::utils::error::{BirthdayError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// 公曆生日在指定年份的日期；2 月 29 日在平年順延到 3 月 1 日
pub fn solar_anniversary(birth: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birth.month(), birth.day()).or_else(|| {
        NaiveDate::from_ymd_opt(year, birth.month(), birth.day() - 1)?.succ_opt()
    })
}

/// 農曆生日在指定農曆年對應的公曆日期
pub fn lunar_anniversary<C: LunarConverter>(
    converter: &C,
    birth: &ResolvedBirth,
    lunar_year: i32,
) -> Result<NaiveDate> {
    converter.lunar_to_solar(birth.lunar.with_year(lunar_year))
}

/// 參考日當天或之後最近一次生日的日期（只比較日期，不含時間）
///
/// 農曆生日以參考日所在的農曆年為基準，而不是公曆年份。
pub fn next_occurrence_date<C: LunarConverter>(
    converter: &C,
    birth: &ResolvedBirth,
    is_lunar: bool,
    today: NaiveDate,
) -> Result<NaiveDate> {
    if is_lunar {
        let lunar_year = converter.solar_to_lunar(today)?.year;
        let this_year = lunar_anniversary(converter, birth, lunar_year)?;
        if this_year < today {
            return lunar_anniversary(converter, birth, lunar_year + 1);
        }
        return Ok(this_year);
    }

    let year = today.year();
    let this_year = solar_anniversary(birth.solar_date, year)
        .ok_or_else(|| out_of_range(birth.solar_date, year))?;
    if this_year < today {
        return solar_anniversary(birth.solar_date, year + 1)
            .ok_or_else(|| out_of_range(birth.solar_date, year + 1));
    }
    Ok(this_year)
}

/// 下一次生日，帶上出生時間（沒有則為零點）
///
/// 同一天即使出生時間已過，仍算作「今天」而不是明年。
pub fn next_occurrence<C: LunarConverter>(
    converter: &C,
    birth: &ResolvedBirth,
    is_lunar: bool,
    birth_time: Option<NaiveTime>,
    reference: NaiveDateTime,
) -> Result<NaiveDateTime> {
    let date = next_occurrence_date(converter, birth, is_lunar, reference.date())?;
    Ok(date.and_time(birth_time.unwrap_or(NaiveTime::MIN)))
}

fn out_of_range(birth: NaiveDate, year: i32) -> BirthdayError {
    BirthdayError::invalid_date(
        birth.to_string(),
        format!("anniversary in {} is out of range", year),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::chinese_calendar::ChineseCalendar;
    use crate::core::resolver::{parse_birth_date, resolve};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn resolved(raw: &str, is_lunar: bool) -> ResolvedBirth {
        let calendar = ChineseCalendar::new();
        resolve(&calendar, parse_birth_date(raw, is_lunar).unwrap()).unwrap()
    }

    #[test]
    fn test_solar_birthday_already_passed() {
        let calendar = ChineseCalendar::new();
        let birth = resolved("2000-03-10", false);
        let next = next_occurrence(
            &calendar,
            &birth,
            false,
            None,
            ymd(2025, 6, 1).and_hms_opt(12, 0, 0).unwrap(),
        )
        .unwrap();
        assert_eq!(next, ymd(2026, 3, 10).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_same_day_counts_even_after_birth_time() {
        let calendar = ChineseCalendar::new();
        let birth = resolved("1990-06-01", false);
        let time = NaiveTime::from_hms_opt(6, 0, 0);
        let reference = ymd(2025, 6, 1).and_hms_opt(20, 0, 0).unwrap();
        let next = next_occurrence(&calendar, &birth, false, time, reference).unwrap();
        assert_eq!(next, ymd(2025, 6, 1).and_hms_opt(6, 0, 0).unwrap());
        assert!(next < reference);
    }

    #[test]
    fn test_leap_day_birthday_rolls_to_march_first() {
        assert_eq!(solar_anniversary(ymd(2000, 2, 29), 2025), Some(ymd(2025, 3, 1)));
        assert_eq!(solar_anniversary(ymd(2000, 2, 29), 2028), Some(ymd(2028, 2, 29)));
    }

    #[test]
    fn test_lunar_birthday_uses_reference_lunar_year() {
        let calendar = ChineseCalendar::new();
        let birth = resolved("1983-10-26", true);
        // 2026-02-07 仍是農曆 2025 年，今年的生日 2025-12-15 已過
        let next =
            next_occurrence_date(&calendar, &birth, true, ymd(2026, 2, 7)).unwrap();
        assert_eq!(next, ymd(2026, 12, 4));

        let next =
            next_occurrence_date(&calendar, &birth, true, ymd(2025, 12, 15)).unwrap();
        assert_eq!(next, ymd(2025, 12, 15));

        let next =
            next_occurrence_date(&calendar, &birth, true, ymd(2025, 6, 1)).unwrap();
        assert_eq!(next, ymd(2025, 12, 15));
    }

    #[test]
    fn test_next_occurrence_never_before_reference() {
        let calendar = ChineseCalendar::new();
        let births = [
            resolved("1983-10-26", true),
            resolved("1990-01-01", true),
            resolved("2000-03-10", false),
            resolved("1996-02-29", false),
        ];
        let mut today = ymd(2024, 1, 1);
        while today < ymd(2025, 1, 1) {
            for (idx, birth) in births.iter().enumerate() {
                let next = next_occurrence_date(&calendar, birth, idx < 2, today).unwrap();
                assert!(next >= today);
                assert!((next - today).num_days() <= 385);
            }
            today = today.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_missing_leap_month_fails() {
        let calendar = ChineseCalendar::new();
        let birth = resolved("2023-L02-15", true);
        assert!(next_occurrence_date(&calendar, &birth, true, ymd(2024, 6, 1)).is_err());
    }
}
