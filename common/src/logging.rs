use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use log::{Level, Record};
use std::fmt::Arguments;
use thiserror::Error;

pub const DEFAULT_FORMAT: &str = "[$Y-$m-$D $H:$M $LEVEL] $MESSAGE";

// Longest first, so `$M` never eats the start of `$MESSAGE`.
const TOKENS: [&str; 9] = [
    "$MESSAGE", "$TARGET", "$LEVEL", "$Y", "$m", "$D", "$H", "$M", "$S",
];

#[derive(Error, Debug)]
pub enum LogError {
    #[error("IO Error.")]
    IOError(#[from] std::io::Error),

    #[error("Logger initialization error.")]
    SetLoggerError(log::SetLoggerError),

    #[error("Unknown log level.")]
    UnknownLevel(String),
}

impl LogError {
    pub fn additional_info(&self) -> Option<String> {
        match self {
            LogError::IOError(err) => Some(err.to_string()),
            LogError::SetLoggerError(err) => Some(err.to_string()),
            LogError::UnknownLevel(level) => Some(level.clone()),
        }
    }
}

/// `<title>_<YYYY-MM-DD>.log`, spaces in the title replaced by dashes.
pub fn generate_file_name(title: &str, date: NaiveDate) -> String {
    let title_formatted = title.trim().replace(' ', "-");

    format!(
        "{title_formatted}_{year:04}-{month:02}-{day:02}.log",
        year = date.year(),
        month = date.month(),
        day = date.day(),
    )
}

pub fn parse_format(format: &str, message: &Arguments, record: &Record) -> String {
    render(
        format,
        &Local::now().naive_local(),
        record.level(),
        record.target(),
        &message.to_string(),
    )
}

/// Substitutes every `$Y $m $D $H $M $S $LEVEL $TARGET $MESSAGE` token.
/// Unknown `$` sequences are kept as written.
pub fn render(
    format: &str, time: &NaiveDateTime, level: Level, target: &str, message: &str,
) -> String {
    let value = |token: &str| -> String {
        match token {
            "$Y" => format!("{:04}", time.year()),
            "$m" => format!("{:02}", time.month()),
            "$D" => format!("{:02}", time.day()),
            "$H" => format!("{:02}", time.hour()),
            "$M" => format!("{:02}", time.minute()),
            "$S" => format!("{:02}", time.second()),
            "$LEVEL" => level.as_str().to_string(),
            "$TARGET" => target.to_string(),
            _ => message.to_string(),
        }
    };

    let mut log = String::with_capacity(format.len() + message.len());
    let mut rest = format.trim();
    while let Some(index) = rest.find('$') {
        log.push_str(&rest[..index]);
        rest = &rest[index..];

        match TOKENS.iter().find(|token| rest.starts_with(*token)) {
            Some(token) => {
                log.push_str(&value(*token));
                rest = &rest[token.len()..];
            },
            None => {
                log.push('$');
                rest = &rest[1..];
            },
        }
    }
    log.push_str(rest);

    log
}

pub fn parse_level(level: &str) -> Result<log::LevelFilter, LogError> {
    level
        .trim()
        .parse::<log::LevelFilter>()
        .map_err(|_| LogError::UnknownLevel(level.to_string()))
}
