use chrono::{DateTime, Local};
use colored::*;
use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::error::{EmitterError, Result};
use crate::state::{ActivityLevel, LogEntry};

static CONSOLE_LOGGER: Lazy<ConsoleLogger> = Lazy::new(ConsoleLogger::new);

pub fn init() -> Result<()> {
    init_with_config(LoggerConfig::default())
}

pub fn init_with_config(config: LoggerConfig) -> Result<()> {
    let max_level = config.min_level;
    CONSOLE_LOGGER.update_config(config)?;

    log::set_logger(&*CONSOLE_LOGGER)
        .map_err(|e| EmitterError::LoggerError(format!("Failed to set logger: {}", e)))?;
    log::set_max_level(max_level);
    Ok(())
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LevelFilter,
    pub show_colors: bool,
    pub show_emojis: bool,
    pub show_target: bool,
    pub include_timestamp: bool,
    pub timestamp_format: String,
    pub output_json: bool,
    pub log_file_path: Option<String>,
    pub custom_prefix: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LevelFilter::Info,
            show_colors: true,
            show_emojis: true,
            show_target: true,
            include_timestamp: true,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            output_json: false,
            log_file_path: None,
            custom_prefix: None,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn with_file_output(mut self, path: &str) -> Self {
        self.log_file_path = Some(path.to_string());
        self
    }

    pub fn with_json_output(mut self, enabled: bool) -> Self {
        self.output_json = enabled;
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.custom_prefix = Some(prefix.to_string());
        self
    }

    pub fn production() -> Self {
        Self {
            min_level: LevelFilter::Info,
            show_colors: false,
            show_emojis: false,
            output_json: true,
            log_file_path: Some("genbridge.log".to_string()),
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            min_level: LevelFilter::Debug,
            show_colors: true,
            show_emojis: true,
            output_json: false,
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonLine<'a> {
    timestamp: DateTime<Local>,
    level: &'a str,
    target: &'a str,
    message: String,
}

pub struct ConsoleLogger {
    config: Mutex<LoggerConfig>,
    log_file: Mutex<Option<File>>,
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self {
            config: Mutex::new(LoggerConfig::default()),
            log_file: Mutex::new(None),
        }
    }

    pub fn update_config(&self, new_config: LoggerConfig) -> Result<()> {
        let file = match &new_config.log_file_path {
            Some(path) => Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| {
                        EmitterError::LoggerError(format!("Cannot open log file {}: {}", path, e))
                    })?,
            ),
            None => None,
        };
        *self.log_file.lock().unwrap_or_else(PoisonError::into_inner) = file;
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = new_config;
        Ok(())
    }

    fn render(&self, record: &Record, config: &LoggerConfig) -> String {
        if config.output_json {
            let line = JsonLine {
                timestamp: Local::now(),
                level: record.level().as_str(),
                target: record.target(),
                message: record.args().to_string(),
            };
            return serde_json::to_string(&line).unwrap_or_default();
        }

        let mut output = String::new();
        if let Some(prefix) = &config.custom_prefix {
            output.push_str(&paint(&format!("[{}] ", prefix), config, |s| {
                s.bright_white().bold()
            }));
        }
        if config.include_timestamp {
            let timestamp = Local::now().format(&config.timestamp_format).to_string();
            output.push_str(&paint(&timestamp, config, |s| s.bright_black()));
            output.push(' ');
        }

        let level = record.level();
        let label = if config.show_emojis {
            format!("{} {}", level_emoji(level), level.as_str())
        } else {
            level.as_str().to_string()
        };
        output.push_str(&format!(
            "[{}] ",
            paint(&label, config, |s| s.color(level_color(level)).bold())
        ));

        if config.show_target && !record.target().is_empty() {
            output.push_str(&paint(record.target(), config, |s| s.bright_blue()));
            output.push_str("::");
        }
        output.push_str(&record.args().to_string());
        output
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let config = self.config.lock().unwrap_or_else(PoisonError::into_inner);
        metadata.level() <= config.min_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let config = self.config.lock().unwrap_or_else(PoisonError::into_inner);
        let line = self.render(record, &config);
        println!("{}", line);

        let mut file = self.log_file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(file) = file.as_mut() {
            let plain = if config.show_colors && !config.output_json {
                let plain_config = LoggerConfig {
                    show_colors: false,
                    ..config.clone()
                };
                self.render(record, &plain_config)
            } else {
                line
            };
            let _ = writeln!(file, "{}", plain);
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
        if let Some(file) = self
            .log_file
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            let _ = file.flush();
        }
    }
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Trace => Color::Cyan,
        Level::Debug => Color::Blue,
        Level::Info => Color::Green,
        Level::Warn => Color::Yellow,
        Level::Error => Color::Red,
    }
}

fn level_emoji(level: Level) -> &'static str {
    match level {
        Level::Trace => "🔍",
        Level::Debug => "🐛",
        Level::Info => "💡",
        Level::Warn => "⚠️",
        Level::Error => "❌",
    }
}

fn paint<F>(text: &str, config: &LoggerConfig, style: F) -> String
where
    F: Fn(&str) -> ColoredString,
{
    if config.show_colors {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

/// Renders an activity-log entry the way the console shows process logs.
pub fn format_activity_entry(entry: &LogEntry, colors: bool) -> String {
    let (emoji, color) = match entry.level {
        ActivityLevel::Info => ("📤", Color::Green),
        ActivityLevel::Warning => ("⚠️", Color::Yellow),
        ActivityLevel::Error => ("❌", Color::Red),
    };
    if colors {
        format!(
            "{} {} {}",
            entry.timestamp.bright_black(),
            emoji,
            entry.message.color(color)
        )
    } else {
        format!("{} {} {}", entry.timestamp, emoji, entry.message)
    }
}
