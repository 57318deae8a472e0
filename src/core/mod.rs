pub mod age;
pub mod engine;
pub mod format;
pub mod occurrence;
pub mod resolver;
pub mod roster;

pub use crate::domain::model::{BirthdayInfo, DetailedAge, LifeStats, Person, ResolvedBirth};
pub use crate::domain::ports::{LunarConverter, RosterSource};
pub use crate::utils::error::Result;
