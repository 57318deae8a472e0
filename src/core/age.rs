//! age.rs
//!
//! Calendar-aware elapsed time between two instants, in the form
//!     "X years, Y months, Z days, H hours, M minutes, S seconds"
//!
//! Chrono does not provide a year/month/day diff (unlike Python's
//! relativedelta), so the borrowing rules are implemented by hand:
//!   • seconds → minutes → hours → days borrow by 60 / 60 / 24
//!   • day underflow borrows the length of the month before `to`'s month
//!   • month underflow borrows from years
//!
//! Whole-year age for lunar birthdays counts lunar-year boundaries instead.

use crate::core::occurrence::lunar_anniversary;
use crate::domain::model::{DetailedAge, ResolvedBirth};
use crate::domain::ports::LunarConverter;
use crate::utils::error::{BirthdayError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// 計算 `from` 到 `to` 經過的年月日時分秒；`to` 早於 `from` 時回傳錯誤
pub fn decompose(from: NaiveDateTime, to: NaiveDateTime) -> Result<DetailedAge> {
    if to < from {
        return Err(BirthdayError::ReferenceBeforeBirth {
            birth: from,
            reference: to,
        });
    }

    let mut years = i64::from(to.year()) - i64::from(from.year());
    let mut months = i64::from(to.month()) - i64::from(from.month());
    let mut days = i64::from(to.day()) - i64::from(from.day());
    let mut hours = i64::from(to.hour()) - i64::from(from.hour());
    let mut minutes = i64::from(to.minute()) - i64::from(from.minute());
    let mut seconds = i64::from(to.second()) - i64::from(from.second());

    if seconds < 0 {
        seconds += 60;
        minutes -= 1;
    }
    if minutes < 0 {
        minutes += 60;
        hours -= 1;
    }
    if hours < 0 {
        hours += 24;
        days -= 1;
    }

    // Fix day underflow. A single borrow can leave days negative when `from`
    // sits at the end of a long month (Jan 31 → Mar 1), so keep borrowing
    // from earlier months until it is covered.
    let (mut borrow_year, mut borrow_month) = (to.year(), to.month());
    while days < 0 {
        (borrow_year, borrow_month) = previous_month(borrow_year, borrow_month);
        days += i64::from(days_in_month(borrow_year, borrow_month));
        months -= 1;
    }

    // Fix month underflow
    years += months.div_euclid(12);
    months = months.rem_euclid(12);

    Ok(DetailedAge {
        years: to_u32(years),
        months: to_u32(months),
        days: to_u32(days),
        hours: to_u32(hours),
        minutes: to_u32(minutes),
        seconds: to_u32(seconds),
    })
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// 公曆週歲：只看日期，出生日當天算已滿
pub fn whole_years_solar(birth: NaiveDate, reference: NaiveDate) -> Result<u32> {
    Ok(decompose(birth.and_time(NaiveTime::MIN), reference.and_time(NaiveTime::MIN))?.years)
}

/// 農曆週歲：參考日的農曆年減出生農曆年，今年農曆生日還沒到再減一
pub fn whole_years_lunar<C: LunarConverter>(
    converter: &C,
    birth: &ResolvedBirth,
    reference: NaiveDate,
) -> Result<u32> {
    if reference < birth.solar_date {
        return Err(BirthdayError::ReferenceBeforeBirth {
            birth: birth.solar_date.and_time(NaiveTime::MIN),
            reference: reference.and_time(NaiveTime::MIN),
        });
    }

    let lunar_year = converter.solar_to_lunar(reference)?.year;
    let this_year = lunar_anniversary(converter, birth, lunar_year)?;
    let had_birthday = this_year <= reference;

    let mut years = lunar_year - birth.lunar.year;
    if !had_birthday {
        years -= 1;
    }
    Ok(u32::try_from(years).unwrap_or(0))
}

/// 出生到參考日經過的整天數，不看時間
pub fn total_days_lived(birth: NaiveDate, reference: NaiveDate) -> i64 {
    reference.signed_duration_since(birth).num_days()
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Returns number of days in a given year/month (handles leap years)
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// Leap-year rule (Gregorian):
///   - divisible by 4 → leap year
///   - except divisible by 100 → not leap year
///   - except divisible by 400 → leap year
fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::chinese_calendar::ChineseCalendar;
    use crate::core::resolver::{parse_birth_date, resolve};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_lunar_birth_detailed_age() {
        // 農曆 1983-10-26 06:00 即公曆 1983-11-30 06:00
        let age = decompose(at(1983, 11, 30, 6, 0, 0), at(2026, 2, 7, 23, 51, 0)).unwrap();
        assert_eq!(
            (age.years, age.months, age.days, age.hours, age.minutes, age.seconds),
            (42, 2, 8, 17, 51, 0)
        );
    }

    #[test]
    fn test_borrow_chain_from_seconds() {
        let age = decompose(at(2000, 12, 31, 23, 59, 59), at(2001, 1, 1, 0, 0, 0)).unwrap();
        assert_eq!(
            age,
            DetailedAge {
                seconds: 1,
                ..DetailedAge::default()
            }
        );
    }

    #[test]
    fn test_day_borrow_uses_previous_month_length() {
        // 2024 年 2 月有 29 天
        let age = decompose(at(2024, 1, 20, 0, 0, 0), at(2024, 3, 10, 0, 0, 0)).unwrap();
        assert_eq!((age.months, age.days), (1, 19));
        let age = decompose(at(2023, 1, 20, 0, 0, 0), at(2023, 3, 10, 0, 0, 0)).unwrap();
        assert_eq!((age.months, age.days), (1, 18));
    }

    #[test]
    fn test_end_of_month_borrow_stays_non_negative() {
        let age = decompose(at(2023, 1, 31, 0, 0, 0), at(2023, 3, 1, 0, 0, 0)).unwrap();
        assert_eq!((age.years, age.months, age.days), (0, 0, 29));
    }

    #[test]
    fn test_decompose_fields_stay_in_range() {
        let from = at(1996, 2, 29, 13, 45, 30);
        let mut to = ymd(1996, 3, 1).and_hms_opt(0, 0, 0).unwrap();
        while to < at(1999, 3, 1, 0, 0, 0) {
            let age = decompose(from, to).unwrap();
            assert!(age.months < 12);
            assert!(age.days <= 31);
            assert!(age.hours < 24 && age.minutes < 60 && age.seconds < 60);
            to += chrono::Duration::hours(17);
        }
    }

    #[test]
    fn test_reference_before_birth_fails() {
        assert!(matches!(
            decompose(at(2000, 1, 2, 0, 0, 0), at(2000, 1, 1, 0, 0, 0)),
            Err(BirthdayError::ReferenceBeforeBirth { .. })
        ));
    }

    #[test]
    fn test_whole_years_solar_boundary() {
        let birth = ymd(1990, 6, 1);
        assert_eq!(whole_years_solar(birth, ymd(2025, 5, 31)).unwrap(), 34);
        assert_eq!(whole_years_solar(birth, ymd(2025, 6, 1)).unwrap(), 35);
    }

    #[test]
    fn test_whole_years_lunar_counts_lunar_years() {
        let calendar = ChineseCalendar::new();
        let birth = resolve(&calendar, parse_birth_date("1983-10-26", true).unwrap()).unwrap();
        assert_eq!(whole_years_lunar(&calendar, &birth, ymd(2025, 12, 14)).unwrap(), 41);
        assert_eq!(whole_years_lunar(&calendar, &birth, ymd(2025, 12, 15)).unwrap(), 42);
        // 公曆已跨年，但農曆仍是 2025 年
        assert_eq!(whole_years_lunar(&calendar, &birth, ymd(2026, 2, 7)).unwrap(), 42);
        assert_eq!(whole_years_lunar(&calendar, &birth, ymd(2026, 12, 4)).unwrap(), 43);
    }

    #[test]
    fn test_total_days_lived_ignores_time() {
        assert_eq!(total_days_lived(ymd(2000, 3, 10), ymd(2000, 3, 10)), 0);
        assert_eq!(total_days_lived(ymd(2000, 1, 1), ymd(2001, 1, 1)), 366);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2023, 4), 30);
    }
}
