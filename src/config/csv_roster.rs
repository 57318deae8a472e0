use crate::core::roster::VISIBLE_TO_ALL;
use crate::domain::model::{Category, Gender, Person};
use crate::domain::ports::RosterSource;
use crate::utils::error::{BirthdayError, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

/// CSV 名單，欄位為
/// `id,name,birth_date,birth_time,is_lunar,gender,category,visible_to`
///
/// `visible_to` 以分號分隔；空白時視為所有人可見。
#[derive(Debug, Clone)]
pub struct CsvRoster {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvPerson {
    #[serde(default)]
    id: String,
    name: String,
    birth_date: String,
    birth_time: Option<String>,
    #[serde(default)]
    is_lunar: String,
    gender: Gender,
    category: Category,
    #[serde(default)]
    visible_to: String,
}

impl CsvRoster {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Person>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut people = Vec::new();
        for row in csv_reader.deserialize() {
            let row: CsvPerson = row?;
            people.push(row.into_person()?);
        }
        Ok(people)
    }
}

impl RosterSource for CsvRoster {
    fn load_people(&self) -> Result<Vec<Person>> {
        let file = std::fs::File::open(&self.path)?;
        let people = Self::from_reader(file)?;
        tracing::debug!("Loaded {} people from {}", people.len(), self.path.display());
        Ok(people)
    }
}

impl CsvPerson {
    fn into_person(self) -> Result<Person> {
        let is_lunar = parse_flag(&self.is_lunar)?;
        let visible_to = if self.visible_to.trim().is_empty() {
            vec![VISIBLE_TO_ALL.to_string()]
        } else {
            self.visible_to
                .split(';')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        };

        Ok(Person {
            id: self.id,
            name: self.name,
            birth_date: self.birth_date,
            birth_time: self.birth_time.filter(|t| !t.trim().is_empty()),
            is_lunar,
            gender: self.gender,
            category: self.category,
            visible_to,
        })
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" => Ok(false),
        "1" | "true" | "yes" => Ok(true),
        other => Err(BirthdayError::InvalidConfigValueError {
            field: "is_lunar".to_string(),
            value: other.to_string(),
            reason: "expected true/false or 1/0".to_string(),
        }),
    }
}
