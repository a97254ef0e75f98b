use std::str::FromStr;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, Utc};
use importer::{HypraceConfig, RetryPolicy};
use scoring::SchedulerConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_keys: String,
    pub rapidapi_key: String,
    pub hyprace_base_url: String,
    pub season_year: i32,
    pub scoring_buffer: Duration,
    pub scored_marker_ttl: StdDuration,
    pub upstream_max_retries: u32,
    pub upstream_backoff_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name).with_context(|| format!("Cannot load {} env variable", name))
        };

        let buffer_hours: i64 = parse_or(&lookup, "SCORING_BUFFER_HOURS", 4)?;
        let scoring_buffer = Duration::try_hours(buffer_hours)
            .with_context(|| format!("SCORING_BUFFER_HOURS out of range: {}", buffer_hours))?;
        let ttl_hours: u64 = parse_or(&lookup, "SCORED_MARKER_TTL_HOURS", 168)?;
        let scored_marker_ttl = ttl_hours
            .checked_mul(3600)
            .map(StdDuration::from_secs)
            .with_context(|| format!("SCORED_MARKER_TTL_HOURS out of range: {}", ttl_hours))?;

        Ok(Self {
            host: required("HOST")?,
            port: required("PORT")?
                .parse()
                .context("PORT must be a number")?,
            database_url: required("DATABASE_URL")?,
            api_keys: lookup("API_KEYS").unwrap_or_default(),
            rapidapi_key: required("RAPIDAPI_KEY")?,
            hyprace_base_url: lookup("HYPRACE_BASE_URL")
                .unwrap_or_else(|| importer::sources::hyprace::DEFAULT_BASE_URL.to_string()),
            season_year: parse_or(&lookup, "SEASON_YEAR", Utc::now().year())?,
            scoring_buffer,
            scored_marker_ttl,
            upstream_max_retries: parse_or(&lookup, "UPSTREAM_MAX_RETRIES", 5)?,
            upstream_backoff_ms: parse_or(&lookup, "UPSTREAM_BACKOFF_MS", 2000)?,
        })
    }

    pub fn hyprace(&self) -> HypraceConfig {
        HypraceConfig {
            base_url: self.hyprace_base_url.clone(),
            api_key: self.rapidapi_key.clone(),
            retry: RetryPolicy::new(
                self.upstream_max_retries,
                StdDuration::from_millis(self.upstream_backoff_ms),
            ),
        }
    }

    pub fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig {
            buffer: self.scoring_buffer,
            marker_ttl: self.scored_marker_ttl,
            ..Default::default()
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", name, raw)),
        None => Ok(default),
    }
}
