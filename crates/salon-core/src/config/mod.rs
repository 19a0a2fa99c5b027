use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use config::Config;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_APPOINTMENT_MINUTES, DEFAULT_REMINDER_HOUR, DEFAULT_SAME_DAY_REMINDER_HOUR,
};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Attach internal error details to 5xx bodies. Keep off in production.
    #[serde(default)]
    pub expose_error_details: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Where the salon is, and what to assume when a service has no duration.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// IANA zone name used to decide "today" and "now".
    pub timezone: String,
    #[serde(default = "default_service_minutes")]
    pub default_service_minutes: u16,
    /// Run the background reminder sweeps.
    #[serde(default = "default_reminders_enabled")]
    pub reminders_enabled: bool,
    /// Local hour of the sweep that reminds tomorrow's bookings.
    #[serde(default = "default_reminder_hour")]
    pub reminder_hour: u8,
    /// Local hour of the sweep that reminds today's bookings.
    #[serde(default = "default_same_day_reminder_hour")]
    pub same_day_reminder_hour: u8,
}

const fn default_service_minutes() -> u16 {
    DEFAULT_APPOINTMENT_MINUTES
}

const fn default_reminders_enabled() -> bool {
    true
}

const fn default_reminder_hour() -> u8 {
    DEFAULT_REMINDER_HOUR
}

const fn default_same_day_reminder_hour() -> u8 {
    DEFAULT_SAME_DAY_REMINDER_HOUR
}

impl ScheduleConfig {
    /// ## Summary
    /// Parses the configured timezone.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` if the name is not a known IANA zone.
    pub fn tz(&self) -> CoreResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| CoreError::ConfigError(format!("unknown timezone '{}': {e}", self.timezone)))
    }

    /// ## Summary
    /// Returns the salon's wall-clock time right now.
    ///
    /// ## Errors
    /// Returns an error if the configured timezone is invalid.
    pub fn local_now(&self) -> CoreResult<NaiveDateTime> {
        let tz = self.tz()?;
        Ok(Utc::now().with_timezone(&tz).naive_local())
    }

    /// ## Summary
    /// Returns the salon's current calendar day.
    ///
    /// ## Errors
    /// Returns an error if the configured timezone is invalid.
    pub fn local_today(&self) -> CoreResult<NaiveDate> {
        Ok(self.local_now()?.date())
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8698)?
            .set_default("server.expose_error_details", false)?
            .set_default("database.max_connections", 4)?
            .set_default("logging.level", "debug")?
            .set_default("schedule.timezone", "UTC")?
            .set_default(
                "schedule.default_service_minutes",
                i64::from(DEFAULT_APPOINTMENT_MINUTES),
            )?
            .set_default("schedule.reminders_enabled", true)?
            .set_default("schedule.reminder_hour", i64::from(DEFAULT_REMINDER_HOUR))?
            .set_default(
                "schedule.same_day_reminder_hour",
                i64::from(DEFAULT_SAME_DAY_REMINDER_HOUR),
            )?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    // Fail at startup rather than on the first booking request.
    settings.schedule.tz()?;
    Ok(settings)
}
