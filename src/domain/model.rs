use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Family,
    Friend,
}

/// 儲存層提供的人員紀錄
///
/// `birth_date` 的意義取決於 `is_lunar`：農曆時為農曆年月日，否則為公曆日期。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub birth_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_time: Option<String>,
    #[serde(default)]
    pub is_lunar: bool,
    pub gender: Gender,
    pub category: Category,
    #[serde(default)]
    pub visible_to: Vec<String>,
}

/// 農曆日期，`is_leap` 表示閏月
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LunarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    #[serde(default)]
    pub is_leap: bool,
}

impl LunarDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month,
            day,
            is_leap: false,
        }
    }

    pub fn leap(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month,
            day,
            is_leap: true,
        }
    }

    /// 同一個月日換到另一個農曆年
    pub fn with_year(self, year: i32) -> Self {
        Self { year, ..self }
    }
}

impl fmt::Display for LunarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let leap = if self.is_leap { "L" } else { "" };
        write!(f, "{:04}-{}{:02}-{:02}", self.year, leap, self.month, self.day)
    }
}

/// 通過嚴格解析後的出生日期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthDate {
    Solar(NaiveDate),
    Lunar(LunarDate),
}

/// 同時帶有農曆與公曆表示的出生日期，每次呼叫重新計算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedBirth {
    pub lunar: LunarDate,
    pub solar_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DetailedAge {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

/// 對外顯示的年齡；成年女性的年齡會被隱藏
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "years")]
pub enum Age {
    Known(u32),
    Unknown,
}

impl Age {
    pub fn years(&self) -> Option<u32> {
        match self {
            Age::Known(years) => Some(*years),
            Age::Unknown => None,
        }
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Age::Known(years) => write!(f, "{}岁", years),
            Age::Unknown => f.write_str("-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgePrivacy {
    /// 一般清單：成年女性顯示為未知
    Redact,
    /// 管理面板：一律顯示真實年齡
    Reveal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BirthdayInfo {
    pub person: Person,
    pub next_birthday: NaiveDateTime,
    pub days_until_birthday: i64,
    pub age: Age,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifeStats {
    pub total_days_lived: i64,
    pub detailed_age: DetailedAge,
    pub days_until_next_birthday: i64,
    pub next_birthday: NaiveDateTime,
    pub age_at_next_birthday: u32,
}
