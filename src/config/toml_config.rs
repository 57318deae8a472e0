use crate::core::resolver::parse_reference;
use crate::domain::model::Person;
use crate::domain::ports::RosterSource;
use crate::utils::error::{BirthdayError, Result};
use crate::utils::validation::{validate_range, Validate};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_WINDOW_DAYS: i64 = 90;
pub const MAX_WINDOW_DAYS: i64 = 366;

/// TOML 名單檔：`[settings]` 加上多個 `[[people]]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub people: Vec<Person>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_window_days")]
    pub window_days: i64,
    /// 固定的參考時間，未設定時使用目前時間
    pub reference: Option<String>,
}

fn default_window_days() -> i64 {
    DEFAULT_WINDOW_DAYS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            reference: None,
        }
    }
}

impl RosterConfig {
    /// 從 TOML 檔案載入名單
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BirthdayError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析名單
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BirthdayError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BIRTHDAY_REFERENCE})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        result.to_string()
    }

    /// 取得設定中的參考時間
    pub fn reference(&self) -> Result<Option<NaiveDateTime>> {
        self.settings
            .reference
            .as_deref()
            .map(parse_reference)
            .transpose()
    }

    pub fn window_days(&self) -> i64 {
        self.settings.window_days
    }

    /// 驗證設定與每一筆人員紀錄的格式
    pub fn validate_config(&self) -> Result<()> {
        validate_range(
            "settings.window_days",
            self.settings.window_days,
            0,
            MAX_WINDOW_DAYS,
        )?;
        self.reference()?;

        for person in &self.people {
            person.validate()?;
        }

        Ok(())
    }
}

impl RosterSource for RosterConfig {
    fn load_people(&self) -> Result<Vec<Person>> {
        Ok(self.people.clone())
    }
}

impl Validate for RosterConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
