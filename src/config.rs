use anyhow::{Context as _, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Deserializer};
use std::fmt::Debug;

use crate::notion_api::DatabaseId;

const DEFAULT_NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";
// WeChat Pay exports are written in China Standard Time
const DEFAULT_UTC_OFFSET: &str = "+08:00";
const DEFAULT_UTC_OFFSET_SECONDS: i32 = 8 * 3600;

/// Connection settings for the Notion API, read from `NOTION_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct NotionConfig {
    pub token: String,
    pub database_id: DatabaseId,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl NotionConfig {
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        envy::prefixed("NOTION_")
            .from_env::<Self>()
            .context("Invalid NOTION_* environment variables")
    }
}

impl Debug for NotionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionConfig")
            .field("token", &"[REDACTED]")
            .field("database_id", &self.database_id)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

fn default_api_base_url() -> String {
    DEFAULT_NOTION_API_BASE_URL.to_string()
}

/// How exported ledger files are interpreted, read from `LEDGER_*` environment variables.
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct LedgerConfig {
    /// Offset of the wall-clock time the exported timestamps are written in
    #[serde(
        default = "default_utc_offset",
        deserialize_with = "deserialize_utc_offset"
    )]
    pub utc_offset: FixedOffset,
}

impl LedgerConfig {
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        envy::prefixed("LEDGER_")
            .from_env::<Self>()
            .context("Invalid LEDGER_* environment variables")
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            utc_offset: default_utc_offset(),
        }
    }
}

fn default_utc_offset() -> FixedOffset {
    match FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECONDS) {
        Some(offset) => offset,
        None => unreachable!("{DEFAULT_UTC_OFFSET} is a valid offset"),
    }
}

fn deserialize_utc_offset<'de, D>(deserializer: D) -> Result<FixedOffset, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_utc_offset(&value).map_err(serde::de::Error::custom)
}

pub fn parse_utc_offset(value: &str) -> Result<FixedOffset> {
    value
        .trim()
        .parse::<FixedOffset>()
        .with_context(|| format!("Invalid UTC offset '{value}', expected something like {DEFAULT_UTC_OFFSET}"))
}

fn load_dotenv() {
    // A missing .env file is fine, the variables may come from the real environment
    if let Err(err) = dotenv::dotenv() {
        log::debug!("Not loading .env file: {err}");
    }
}
