use crate::domain::model::{LunarDate, Person};
use crate::utils::error::Result;
use chrono::NaiveDate;

/// 農曆與公曆之間的轉換器
///
/// 實作必須是無狀態的，可以在多個執行緒間共用。
pub trait LunarConverter: Send + Sync {
    /// 農曆年月日轉公曆；不存在的農曆日期回傳 `InvalidDate`
    fn lunar_to_solar(&self, date: LunarDate) -> Result<NaiveDate>;

    fn solar_to_lunar(&self, date: NaiveDate) -> Result<LunarDate>;

    fn is_valid(&self, date: LunarDate) -> bool {
        self.lunar_to_solar(date).is_ok()
    }
}

impl<C: LunarConverter + ?Sized> LunarConverter for &C {
    fn lunar_to_solar(&self, date: LunarDate) -> Result<NaiveDate> {
        (**self).lunar_to_solar(date)
    }

    fn solar_to_lunar(&self, date: NaiveDate) -> Result<LunarDate> {
        (**self).solar_to_lunar(date)
    }
}

pub trait RosterSource {
    fn load_people(&self) -> Result<Vec<Person>>;
}
