pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::core::engine::BirthdayEngine;
pub use adapters::chinese_calendar::ChineseCalendar;
pub use config::{load_roster, CsvRoster, RosterConfig};
pub use domain::model::{
    Age, AgePrivacy, BirthdayInfo, Category, DetailedAge, Gender, LifeStats, LunarDate, Person,
    ResolvedBirth,
};
pub use domain::ports::{LunarConverter, RosterSource};
pub use utils::error::{BirthdayError, Result};
