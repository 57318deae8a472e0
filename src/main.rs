use anyhow::Context;
use birthday_reminder::config::{Command, OutputFormat};
use birthday_reminder::core::format::format_detailed_age;
use birthday_reminder::core::resolver::{parse_birth_date, parse_reference, resolve};
use birthday_reminder::core::roster::RosterFilter;
use birthday_reminder::utils::error::{BirthdayError, ErrorSeverity, Result};
use birthday_reminder::utils::{logger, validation::Validate};
use birthday_reminder::{
    load_roster, BirthdayEngine, BirthdayInfo, ChineseCalendar, CliConfig, Person, RosterConfig,
};
use chrono::NaiveDateTime;
use clap::Parser;
use std::fmt::Write as _;
use std::io::Write;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting birthday-reminder");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        report(&e);
        std::process::exit(1);
    }

    match run(&config) {
        Ok(output) => {
            std::io::stdout()
                .lock()
                .write_all(output.as_bytes())
                .context("failed to write output")?;
        }
        Err(e) => {
            report(&e);

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn report(e: &BirthdayError) {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

fn run(config: &CliConfig) -> Result<String> {
    let engine = BirthdayEngine::new(ChineseCalendar::new());

    match &config.command {
        Command::Convert { date, lunar } => convert(&engine, date, *lunar, config.format),
        Command::Upcoming {
            days,
            category,
            viewer,
            admin,
        } => {
            let roster = load(config)?;
            let reference = reference_time(config, &roster)?;
            let window_days = days.unwrap_or_else(|| roster.window_days());

            // 沒有指定觀看者時不做可見性篩選
            let filter = RosterFilter {
                viewer: viewer.clone(),
                is_admin: *admin || viewer.is_none(),
                category: category.map(Into::into),
            };
            let people = filter.apply(&roster.people);

            let upcoming = engine.upcoming_birthdays(&people, window_days, reference)?;
            tracing::info!(
                "🎂 {} of {} people have a birthday within {} days",
                upcoming.len(),
                people.len(),
                window_days
            );

            match config.format {
                OutputFormat::Json => Ok(serde_json::to_string_pretty(&upcoming)? + "\n"),
                OutputFormat::Text => Ok(render_upcoming(&upcoming, window_days, reference)),
            }
        }
        Command::Stats { name } => {
            let roster = load(config)?;
            let reference = reference_time(config, &roster)?;
            let person = roster
                .people
                .iter()
                .find(|p| p.id == *name || p.name == *name)
                .ok_or_else(|| BirthdayError::InvalidConfigValueError {
                    field: "name".to_string(),
                    value: name.clone(),
                    reason: "no such person in the roster".to_string(),
                })?;

            let stats = engine.life_stats(person, reference)?;
            match config.format {
                OutputFormat::Json => Ok(serde_json::to_string_pretty(&stats)? + "\n"),
                OutputFormat::Text => {
                    let resolved = engine.resolve(person)?;
                    let mut out = String::new();
                    let _ = writeln!(
                        out,
                        "{} (农历 {} / 公历 {})",
                        person.name, resolved.lunar, resolved.solar_date
                    );
                    let _ = writeln!(out, "  年龄: {}", format_detailed_age(&stats.detailed_age));
                    let _ = writeln!(out, "  已生活: {} 天", stats.total_days_lived);
                    let _ = writeln!(
                        out,
                        "  下次生日: {} ({} 天后), 将满 {} 岁",
                        stats.next_birthday.format("%Y-%m-%d %H:%M"),
                        stats.days_until_next_birthday,
                        stats.age_at_next_birthday
                    );
                    Ok(out)
                }
            }
        }
    }
}

fn load(config: &CliConfig) -> Result<RosterConfig> {
    tracing::info!("📁 Loading roster from: {}", config.roster);
    let roster = load_roster(&config.roster)?;
    roster.validate()?;
    tracing::info!("✅ Loaded {} people", roster.people.len());
    Ok(roster)
}

fn reference_time(config: &CliConfig, roster: &RosterConfig) -> Result<NaiveDateTime> {
    if let Some(at) = &config.at {
        return parse_reference(at);
    }
    Ok(roster
        .reference()?
        .unwrap_or_else(|| chrono::Local::now().naive_local()))
}

fn convert(
    engine: &BirthdayEngine<ChineseCalendar>,
    date: &str,
    lunar: bool,
    format: OutputFormat,
) -> Result<String> {
    let resolved = resolve(engine.converter(), parse_birth_date(date, lunar)?)?;
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&resolved)? + "\n"),
        OutputFormat::Text => Ok(format!(
            "农历 {} = 公历 {}\n",
            resolved.lunar, resolved.solar_date
        )),
    }
}

fn render_upcoming(
    upcoming: &[BirthdayInfo],
    window_days: i64,
    reference: NaiveDateTime,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "🎂 {} 天内的生日 (自 {})",
        window_days,
        reference.format("%Y-%m-%d")
    );
    if upcoming.is_empty() {
        let _ = writeln!(out, "  (无)");
        return out;
    }
    for info in upcoming {
        let when = if info.is_today {
            "今天".to_string()
        } else {
            format!("{}天后", info.days_until_birthday)
        };
        let _ = writeln!(
            out,
            "  {:<6} {:<12} {} {}  {}",
            when,
            info.person.name,
            info.next_birthday.format("%Y-%m-%d"),
            calendar_label(&info.person),
            info.age
        );
    }
    out
}

fn calendar_label(person: &Person) -> &'static str {
    if person.is_lunar {
        "农历"
    } else {
        "公历"
    }
}
