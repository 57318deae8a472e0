//! Chinese lunisolar calendar backed by `icu_calendar`.
//!
//! 農曆年份以 `related_iso`（與之重疊最多的公曆年）表示，月份由 month code
//! 取得：`M05` 為五月，`M05L` 為閏五月。支援的農曆年份為 1900 到 2100。

use crate::domain::model::LunarDate;
use crate::domain::ports::LunarConverter;
use crate::utils::error::{BirthdayError, Result};
use chrono::{Datelike, NaiveDate};
use icu_calendar::chinese::Chinese;
use icu_calendar::types::{Era, MonthCode};
use icu_calendar::{Date, Iso};

pub const FIRST_YEAR: i32 = 1900;
pub const LAST_YEAR: i32 = 2100;

#[derive(Debug, Clone, Copy, Default)]
pub struct ChineseCalendar;

impl ChineseCalendar {
    pub fn new() -> Self {
        Self
    }

    /// 該農曆年的閏月，沒有閏月時回傳 `None`
    pub fn leap_month(&self, year: i32) -> Result<Option<u32>> {
        let (era, number) = year_anchor(year)?;
        for month in 1..=12 {
            if first_of_month(era, number, month, true).is_ok() {
                return Ok(Some(month));
            }
        }
        Ok(None)
    }

    pub fn days_in_month(&self, year: i32, month: u32, is_leap: bool) -> Result<u32> {
        if !(1..=12).contains(&month) {
            return Err(BirthdayError::invalid_date(
                format!("{}-{}", year, month),
                "lunar month must be between 1 and 12",
            ));
        }
        let (era, number) = year_anchor(year)?;
        let first = first_of_month(era, number, month, is_leap).map_err(|_| {
            let label = LunarDate { year, month, day: 1, is_leap };
            if is_leap {
                BirthdayError::invalid_date(
                    label.to_string(),
                    format!("lunar year {} has no leap month {}", year, month),
                )
            } else {
                BirthdayError::invalid_date(label.to_string(), "no such lunar month")
            }
        })?;
        Ok(u32::from(first.days_in_month()))
    }

    pub fn days_in_year(&self, year: i32) -> Result<u32> {
        let (era, number) = year_anchor(year)?;
        let first = first_of_month(era, number, 1, false)?;
        Ok(u32::from(first.days_in_year()))
    }
}

impl LunarConverter for ChineseCalendar {
    fn lunar_to_solar(&self, date: LunarDate) -> Result<NaiveDate> {
        let month_len = self.days_in_month(date.year, date.month, date.is_leap)?;
        if date.day < 1 || date.day > month_len {
            return Err(BirthdayError::invalid_date(
                date.to_string(),
                format!("lunar month only has {} days", month_len),
            ));
        }

        let (era, number) = year_anchor(date.year)?;
        let code = month_code(date.month, date.is_leap)?;
        // day 已確認不超過 30
        let chinese = Date::try_new_from_codes(era, number, code, date.day as u8, Chinese::new())
            .map_err(|e| BirthdayError::invalid_date(date.to_string(), e.to_string()))?;

        let iso = chinese.to_iso();
        NaiveDate::from_ymd_opt(
            iso.year().number,
            iso.month().ordinal,
            iso.day_of_month().0,
        )
        .ok_or_else(|| BirthdayError::invalid_date(date.to_string(), "date out of range"))
    }

    fn solar_to_lunar(&self, date: NaiveDate) -> Result<LunarDate> {
        let chinese = iso_date(date)?.to_calendar(Chinese::new());

        let year = chinese
            .year()
            .related_iso
            .ok_or_else(|| out_of_range(date))?;
        if !(FIRST_YEAR..=LAST_YEAR).contains(&year) {
            return Err(out_of_range(date));
        }

        let code = chinese.month().code;
        let (month, is_leap) = code.parsed().ok_or_else(|| {
            BirthdayError::invalid_date(
                date.to_string(),
                format!("unexpected month code {}", code),
            )
        })?;

        Ok(LunarDate {
            year,
            month: u32::from(month),
            day: chinese.day_of_month().0,
            is_leap,
        })
    }
}

/// 農曆年在 icu 中的紀元與年號
///
/// 公曆 6 月 1 日必定落在 `related_iso` 等於該公曆年的農曆年內。
fn year_anchor(year: i32) -> Result<(Era, i32)> {
    if !(FIRST_YEAR..=LAST_YEAR).contains(&year) {
        return Err(BirthdayError::invalid_date(
            year.to_string(),
            format!(
                "lunar year must be between {} and {}",
                FIRST_YEAR, LAST_YEAR
            ),
        ));
    }
    let mid_year = Date::try_new_iso_date(year, 6, 1)
        .map_err(|e| BirthdayError::invalid_date(year.to_string(), e.to_string()))?
        .to_calendar(Chinese::new())
        .year();
    Ok((mid_year.era, mid_year.number))
}

fn first_of_month(era: Era, number: i32, month: u32, is_leap: bool) -> Result<Date<Chinese>> {
    let code = month_code(month, is_leap)?;
    Date::try_new_from_codes(era, number, code, 1, Chinese::new())
        .map_err(|e| BirthdayError::invalid_date(code.to_string(), e.to_string()))
}

fn month_code(month: u32, is_leap: bool) -> Result<MonthCode> {
    let raw = format!("M{:02}{}", month, if is_leap { "L" } else { "" });
    raw.parse()
        .map_err(|_| BirthdayError::invalid_date(raw.clone(), "invalid lunar month code"))
}

fn iso_date(date: NaiveDate) -> Result<Date<Iso>> {
    let month = date.month() as u8;
    let day = date.day() as u8;
    Date::try_new_iso_date(date.year(), month, day)
        .map_err(|e| BirthdayError::invalid_date(date.to_string(), e.to_string()))
}

fn out_of_range(date: NaiveDate) -> BirthdayError {
    BirthdayError::invalid_date(
        date.to_string(),
        format!(
            "outside the supported lunar years {}..={}",
            FIRST_YEAR, LAST_YEAR
        ),
    )
}
