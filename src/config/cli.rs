use crate::domain::model::Category;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, Validate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "birthday-reminder")]
#[command(about = "Track solar and lunar birthdays, ages and life statistics")]
pub struct CliConfig {
    /// Roster file (.toml or .csv)
    #[arg(long, short, default_value = "people.toml")]
    pub roster: String,

    /// Reference time (YYYY-MM-DD[THH:MM:SS]); defaults to the roster setting or now
    #[arg(long)]
    pub at: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum Command {
    /// List birthdays within the next N days
    Upcoming {
        /// Window in days; defaults to the roster setting
        #[arg(long)]
        days: Option<i64>,

        #[arg(long, value_enum)]
        category: Option<CategoryArg>,

        /// Viewer id used for visibility filtering
        #[arg(long)]
        viewer: Option<String>,

        /// Show everyone regardless of visibility
        #[arg(long)]
        admin: bool,
    },
    /// Detailed life statistics for one person
    Stats {
        /// Person name or id
        name: String,
    },
    /// Convert a single date between the lunar and solar calendars
    Convert {
        /// Date to convert (YYYY-MM-DD, lunar leap months as YYYY-LMM-DD)
        date: String,

        /// Treat the input as a lunar date
        #[arg(long)]
        lunar: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum CategoryArg {
    Family,
    Friend,
}

impl From<CategoryArg> for Category {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Family => Category::Family,
            CategoryArg::Friend => Category::Friend,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("roster", &self.roster)?;
        if let Command::Upcoming {
            days: Some(days), ..
        } = &self.command
        {
            validate_range(
                "days",
                *days,
                0,
                crate::config::toml_config::MAX_WINDOW_DAYS,
            )?;
        }
        Ok(())
    }
}
