use crate::core::age::{decompose, total_days_lived, whole_years_lunar, whole_years_solar};
use crate::core::occurrence::next_occurrence;
use crate::core::resolver::{birth_time_of, resolve_person};
use crate::domain::model::{
    Age, AgePrivacy, BirthdayInfo, DetailedAge, Gender, LifeStats, Person, ResolvedBirth,
};
use crate::domain::ports::LunarConverter;
use crate::utils::error::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// 女性達到此年齡後，清單中的年齡會隱藏
pub const AGE_PRIVACY_THRESHOLD: u32 = 18;

/// 生日與年齡計算引擎
///
/// 所有方法都是純函式：相同的輸入一定得到相同的結果，不保留任何狀態。
pub struct BirthdayEngine<C: LunarConverter> {
    converter: C,
}

/// 一次呼叫內使用的已解析出生資料
struct Birth<'a> {
    person: &'a Person,
    resolved: ResolvedBirth,
    time: Option<NaiveTime>,
}

impl Birth<'_> {
    fn instant(&self) -> NaiveDateTime {
        self.resolved
            .solar_date
            .and_time(self.time.unwrap_or(NaiveTime::MIN))
    }
}

impl<C: LunarConverter> BirthdayEngine<C> {
    pub fn new(converter: C) -> Self {
        Self { converter }
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    fn prepare<'a>(&self, person: &'a Person) -> Result<Birth<'a>> {
        let resolved = resolve_person(&self.converter, person)?;
        let time = birth_time_of(person)?;
        tracing::debug!(
            name = %person.name,
            lunar = %resolved.lunar,
            solar = %resolved.solar_date,
            "resolved birth"
        );
        Ok(Birth {
            person,
            resolved,
            time,
        })
    }

    pub fn resolve(&self, person: &Person) -> Result<ResolvedBirth> {
        resolve_person(&self.converter, person)
    }

    pub fn next_birthday(
        &self,
        person: &Person,
        reference: NaiveDateTime,
    ) -> Result<NaiveDateTime> {
        let birth = self.prepare(person)?;
        self.next_of(&birth, reference)
    }

    fn next_of(&self, birth: &Birth<'_>, reference: NaiveDateTime) -> Result<NaiveDateTime> {
        next_occurrence(
            &self.converter,
            &birth.resolved,
            birth.person.is_lunar,
            birth.time,
            reference,
        )
    }

    /// 距離下次生日的天數，只比較日期；生日當天為 0
    pub fn days_until_birthday(&self, person: &Person, reference: NaiveDateTime) -> Result<i64> {
        let next = self.next_birthday(person, reference)?;
        Ok(days_between(reference.date(), next.date()))
    }

    pub fn is_birthday_today(&self, person: &Person, reference: NaiveDateTime) -> Result<bool> {
        Ok(self.days_until_birthday(person, reference)? == 0)
    }

    /// 週歲；`AgePrivacy::Redact` 時成年女性回傳 `Age::Unknown`
    pub fn calculate_age(
        &self,
        person: &Person,
        reference: NaiveDateTime,
        privacy: AgePrivacy,
    ) -> Result<Age> {
        let birth = self.prepare(person)?;
        let years = self.whole_years(&birth, reference.date())?;
        Ok(redact(person.gender, years, privacy))
    }

    fn whole_years(&self, birth: &Birth<'_>, reference: NaiveDate) -> Result<u32> {
        if birth.person.is_lunar {
            whole_years_lunar(&self.converter, &birth.resolved, reference)
        } else {
            whole_years_solar(birth.resolved.solar_date, reference)
        }
    }

    /// 從出生（含出生時間）到參考時間的詳細年齡
    pub fn detailed_age(&self, person: &Person, reference: NaiveDateTime) -> Result<DetailedAge> {
        let birth = self.prepare(person)?;
        decompose(birth.instant(), reference)
    }

    pub fn total_days_lived(&self, person: &Person, reference: NaiveDateTime) -> Result<i64> {
        let birth = self.prepare(person)?;
        Ok(total_days_lived(birth.resolved.solar_date, reference.date()))
    }

    /// 清單用的生日資訊，年齡為下次生日當天將滿的歲數
    pub fn birthday_info(&self, person: &Person, reference: NaiveDateTime) -> Result<BirthdayInfo> {
        let birth = self.prepare(person)?;
        let next_birthday = self.next_of(&birth, reference)?;
        let days_until_birthday = days_between(reference.date(), next_birthday.date());
        let years = self.whole_years(&birth, next_birthday.date())?;

        Ok(BirthdayInfo {
            person: person.clone(),
            next_birthday,
            days_until_birthday,
            age: redact(person.gender, years, AgePrivacy::Redact),
            is_today: days_until_birthday == 0,
        })
    }

    /// 在 `window_days` 天內過生日的人，依剩餘天數排序；天數相同時保留輸入順序
    pub fn upcoming_birthdays(
        &self,
        people: &[Person],
        window_days: i64,
        reference: NaiveDateTime,
    ) -> Result<Vec<BirthdayInfo>> {
        let mut upcoming = Vec::new();
        for person in people {
            let info = self.birthday_info(person, reference)?;
            if info.days_until_birthday <= window_days {
                upcoming.push(info);
            }
        }
        upcoming.sort_by_key(|info| info.days_until_birthday);

        tracing::debug!(
            total = people.len(),
            upcoming = upcoming.len(),
            window_days,
            "computed upcoming birthdays"
        );
        Ok(upcoming)
    }

    /// 管理面板用的人生統計，年齡不做隱藏
    pub fn life_stats(&self, person: &Person, reference: NaiveDateTime) -> Result<LifeStats> {
        let birth = self.prepare(person)?;
        let next_birthday = self.next_of(&birth, reference)?;

        Ok(LifeStats {
            total_days_lived: total_days_lived(birth.resolved.solar_date, reference.date()),
            detailed_age: decompose(birth.instant(), reference)?,
            days_until_next_birthday: days_between(reference.date(), next_birthday.date()),
            next_birthday,
            age_at_next_birthday: self.whole_years(&birth, next_birthday.date())?,
        })
    }
}

fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

fn redact(gender: Gender, years: u32, privacy: AgePrivacy) -> Age {
    match privacy {
        AgePrivacy::Redact if gender == Gender::Female && years >= AGE_PRIVACY_THRESHOLD => {
            Age::Unknown
        }
        _ => Age::Known(years),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::chinese_calendar::ChineseCalendar;
    use crate::domain::model::Category;

    fn person(name: &str, birth_date: &str, is_lunar: bool, gender: Gender) -> Person {
        Person {
            id: name.to_lowercase(),
            name: name.to_string(),
            birth_date: birth_date.to_string(),
            birth_time: None,
            is_lunar,
            gender,
            category: Category::Friend,
            visible_to: vec!["all".to_string()],
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_birthday_today() {
        let engine = BirthdayEngine::new(ChineseCalendar::new());
        let p = person("Today", "1990-06-01", false, Gender::Male);
        let reference = at(2025, 6, 1, 15, 30);
        assert!(engine.is_birthday_today(&p, reference).unwrap());
        assert_eq!(engine.days_until_birthday(&p, reference).unwrap(), 0);
    }

    #[test]
    fn test_age_redaction_only_applies_to_adult_women() {
        let engine = BirthdayEngine::new(ChineseCalendar::new());
        let reference = at(2025, 6, 1, 0, 0);

        let adult = person("Adult", "1990-01-01", false, Gender::Female);
        let minor = person("Minor", "2010-01-01", false, Gender::Female);
        let man = person("Man", "1990-01-01", false, Gender::Male);

        assert_eq!(
            engine.calculate_age(&adult, reference, AgePrivacy::Redact).unwrap(),
            Age::Unknown
        );
        assert_eq!(
            engine.calculate_age(&adult, reference, AgePrivacy::Reveal).unwrap(),
            Age::Known(35)
        );
        assert_eq!(
            engine.calculate_age(&minor, reference, AgePrivacy::Redact).unwrap(),
            Age::Known(15)
        );
        assert_eq!(
            engine.calculate_age(&man, reference, AgePrivacy::Redact).unwrap(),
            Age::Known(35)
        );
    }

    #[test]
    fn test_birthday_info_reports_age_being_turned() {
        let engine = BirthdayEngine::new(ChineseCalendar::new());
        let p = person("Solar", "2000-03-10", false, Gender::Male);
        let info = engine.birthday_info(&p, at(2025, 6, 1, 0, 0)).unwrap();
        assert_eq!(info.next_birthday, at(2026, 3, 10, 0, 0));
        assert_eq!(info.days_until_birthday, 282);
        assert_eq!(info.age, Age::Known(26));
        assert!(!info.is_today);
    }

    #[test]
    fn test_life_stats_for_lunar_person() {
        let engine = BirthdayEngine::new(ChineseCalendar::new());
        let mut p = person("Lunar", "1983-10-26", true, Gender::Female);
        p.birth_time = Some("06:00:00".to_string());

        let stats = engine.life_stats(&p, at(2026, 2, 7, 23, 51)).unwrap();
        let age = stats.detailed_age;
        assert_eq!(
            (age.years, age.months, age.days, age.hours, age.minutes, age.seconds),
            (42, 2, 8, 17, 51, 0)
        );
        assert_eq!(stats.next_birthday, at(2026, 12, 4, 6, 0));
        assert_eq!(stats.days_until_next_birthday, 300);
        assert_eq!(stats.age_at_next_birthday, 43);
        assert_eq!(
            stats.total_days_lived,
            (NaiveDate::from_ymd_opt(2026, 2, 7).unwrap()
                - NaiveDate::from_ymd_opt(1983, 11, 30).unwrap())
            .num_days()
        );
    }

    #[test]
    fn test_invalid_record_fails_whole_list() {
        let engine = BirthdayEngine::new(ChineseCalendar::new());
        let people = vec![
            person("Ok", "2000-03-10", false, Gender::Male),
            person("Broken", "2000-02-30", false, Gender::Male),
        ];
        assert!(engine
            .upcoming_birthdays(&people, 365, at(2025, 6, 1, 0, 0))
            .is_err());
    }
}
