//! CLI commands.

pub mod communities;
pub mod config;
pub mod events;

use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use campusevents_api::EventsApi;
use campusevents_core::{OutputFormat, OutputFormatter};

use crate::actions::Notifier;
use crate::error::{ClientError, ClientResult};

/// Everything a command needs besides its own arguments.
pub struct Context<'a> {
    pub api: &'a dyn EventsApi,
    pub formatter: OutputFormatter,
    pub format: OutputFormat,
    pub notifier: Notifier,
    /// The reference day for date tabs and schedules.
    pub today: NaiveDate,
}

impl<'a> Context<'a> {
    pub fn new(api: &'a dyn EventsApi, today: NaiveDate) -> Self {
        Self {
            api,
            formatter: OutputFormatter::default(),
            format: OutputFormat::Tty,
            notifier: Notifier::quiet(),
            today,
        }
    }

    pub fn with_formatter(mut self, formatter: OutputFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Writes `text` in TTY mode or `value` as pretty JSON.
    pub(crate) fn emit<T: Serialize>(
        &self,
        out: &mut dyn Write,
        text: impl FnOnce() -> String,
        value: &T,
    ) -> ClientResult<()> {
        match self.format {
            OutputFormat::Tty => writeln!(out, "{}", text())?,
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(value)
                    .map_err(|e| ClientError::Action(format!("failed to serialize output: {}", e)))?;
                writeln!(out, "{}", json)?;
            }
        }
        Ok(())
    }
}
