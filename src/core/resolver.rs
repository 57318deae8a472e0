use crate::domain::model::{BirthDate, LunarDate, Person, ResolvedBirth};
use crate::domain::ports::LunarConverter;
use crate::utils::error::{BirthdayError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{1,4})-(L)?(\d{1,2})-(\d{1,2})$").unwrap())
}

/// 解析儲存的出生日期字串
///
/// 公曆與農曆都使用 `YYYY-MM-DD`；農曆閏月在月份前加 `L`，例如 `2023-L02-15`。
/// 農曆日期是否真的存在由轉換器判斷，這裡只檢查格式。
pub fn parse_birth_date(raw: &str, is_lunar: bool) -> Result<BirthDate> {
    let caps = date_pattern()
        .captures(raw.trim())
        .ok_or_else(|| BirthdayError::invalid_date(raw, "expected YYYY-MM-DD"))?;

    let number = |idx: usize| -> Result<u32> {
        caps[idx]
            .parse::<u32>()
            .map_err(|e| BirthdayError::invalid_date(raw, e.to_string()))
    };
    let year = number(1)? as i32;
    let month = number(3)?;
    let day = number(4)?;
    let is_leap = caps.get(2).is_some();

    if is_lunar {
        if !(1..=12).contains(&month) || !(1..=30).contains(&day) {
            return Err(BirthdayError::invalid_date(
                raw,
                "lunar month must be 1-12 and day 1-30",
            ));
        }
        return Ok(BirthDate::Lunar(LunarDate {
            year,
            month,
            day,
            is_leap,
        }));
    }

    if is_leap {
        return Err(BirthdayError::invalid_date(
            raw,
            "leap month marker is only valid for lunar dates",
        ));
    }
    NaiveDate::from_ymd_opt(year, month, day)
        .map(BirthDate::Solar)
        .ok_or_else(|| BirthdayError::invalid_date(raw, "no such day in the Gregorian calendar"))
}

/// 解析 `HH:MM:SS` 或 `HH:MM`
pub fn parse_birth_time(raw: &str) -> Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|e| BirthdayError::invalid_date(raw, format!("invalid time of day: {}", e)))
}

/// 空白字串視為沒有出生時間
pub fn birth_time_of(person: &Person) -> Result<Option<NaiveTime>> {
    match person.birth_time.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_birth_time(raw).map(Some),
    }
}

/// 解析參考時間：`YYYY-MM-DDTHH:MM:SS`、`YYYY-MM-DD HH:MM:SS` 或只有日期
pub fn parse_reference(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for format in FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| BirthdayError::invalid_date(raw, "expected YYYY-MM-DD[THH:MM:SS]"))
}

pub fn resolve<C: LunarConverter>(converter: &C, birth: BirthDate) -> Result<ResolvedBirth> {
    match birth {
        BirthDate::Lunar(lunar) => Ok(ResolvedBirth {
            lunar,
            solar_date: converter.lunar_to_solar(lunar)?,
        }),
        BirthDate::Solar(solar_date) => Ok(ResolvedBirth {
            lunar: converter.solar_to_lunar(solar_date)?,
            solar_date,
        }),
    }
}

pub fn resolve_person<C: LunarConverter>(converter: &C, person: &Person) -> Result<ResolvedBirth> {
    let birth = parse_birth_date(&person.birth_date, person.is_lunar)?;
    resolve(converter, birth)
}
