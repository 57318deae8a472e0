#[cfg(feature = "cli")]
pub mod cli;
pub mod csv_roster;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, OutputFormat};
pub use csv_roster::CsvRoster;
pub use toml_config::RosterConfig;

use crate::core::resolver::{birth_time_of, parse_birth_date};
use crate::domain::model::Person;
use crate::domain::ports::RosterSource;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, Validate};
use std::path::Path;

/// 依副檔名載入名單：`.csv` 使用 CSV，其餘視為 TOML
pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<RosterConfig> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        let people = CsvRoster::new(path).load_people()?;
        return Ok(RosterConfig {
            people,
            ..RosterConfig::default()
        });
    }
    RosterConfig::from_file(path)
}

/// 只檢查格式；農曆日期是否存在要交給轉換器
impl Validate for Person {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("people.name", &self.name)?;
        parse_birth_date(&self.birth_date, self.is_lunar)?;
        birth_time_of(self)?;
        Ok(())
    }
}
