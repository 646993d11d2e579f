use std::path::PathBuf;

use crate::types::Region;

/// Middle East regions polled each cycle, in enumeration order.
pub const DEFAULT_REGIONS: &[(&str, &str)] = &[
    ("AE", "United Arab Emirates"),
    ("SA", "Saudi Arabia"),
    ("EG", "Egypt"),
    ("IQ", "Iraq"),
    ("IR", "Iran"),
    ("JO", "Jordan"),
    ("KW", "Kuwait"),
    ("LB", "Lebanon"),
    ("OM", "Oman"),
    ("PS", "Palestine"),
    ("QA", "Qatar"),
    ("SY", "Syria"),
    ("YE", "Yemen"),
    ("BH", "Bahrain"),
    ("TR", "Turkey"),
    ("IL", "Israel"),
];

/// Build the fixed region table.
pub fn default_regions() -> Vec<Region> {
    DEFAULT_REGIONS
        .iter()
        .map(|(code, name)| Region::new(code, name))
        .collect()
}

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Telegram bot token
    pub telegram_bot_token: String,

    /// Telegram chat (or channel) that receives the alerts
    pub telegram_chat_id: String,

    /// Telegram Bot API base URL (overridable for self-hosted bot API servers)
    pub telegram_api_base: String,

    /// ransomware.live API base URL
    pub feed_base_url: String,

    /// Path of the JSON file holding already-notified victim ids
    pub cache_path: PathBuf,

    /// Seconds between polling cycles. `None` runs a single cycle and exits.
    pub poll_interval_secs: Option<u64>,

    /// Timeout applied to every outbound HTTP request (default: 30)
    pub http_timeout_secs: u64,

    /// Regions polled each cycle
    pub regions: Vec<Region>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            telegram_bot_token: std::env::var("TELEGRAM_BOT_TOKEN").map_err(|_| {
                anyhow::anyhow!("TELEGRAM_BOT_TOKEN environment variable is required")
            })?,
            telegram_chat_id: std::env::var("TELEGRAM_CHAT_ID").map_err(|_| {
                anyhow::anyhow!("TELEGRAM_CHAT_ID environment variable is required")
            })?,
            telegram_api_base: std::env::var("TELEGRAM_API_BASE")
                .unwrap_or_else(|_| "https://api.telegram.org".to_string()),
            feed_base_url: std::env::var("FEED_BASE_URL")
                .unwrap_or_else(|_| "https://api.ransomware.live/v2".to_string()),
            cache_path: std::env::var("VICTIM_CACHE_PATH")
                .unwrap_or_else(|_| "victim_cache.json".to_string())
                .into(),
            poll_interval_secs: std::env::var("POLL_INTERVAL_SECS")
                .ok()
                .map(|v| parse_positive_secs("POLL_INTERVAL_SECS", &v))
                .transpose()?,
            http_timeout_secs: parse_positive_secs(
                "HTTP_TIMEOUT_SECS",
                &std::env::var("HTTP_TIMEOUT_SECS").unwrap_or_else(|_| "30".to_string()),
            )?,
            regions: default_regions(),
        })
    }
}

/// Parse a duration setting in seconds; zero is rejected.
fn parse_positive_secs(name: &str, raw: &str) -> anyhow::Result<u64> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{name} must be a valid u64"))?;
    if secs == 0 {
        return Err(anyhow::anyhow!("{name} must be greater than zero"));
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_regions_order() {
        let regions = default_regions();
        assert_eq!(regions.len(), 16);
        assert_eq!(regions[0], Region::new("AE", "United Arab Emirates"));
        assert_eq!(regions[15], Region::new("IL", "Israel"));
    }

    #[test]
    fn test_default_region_codes_unique() {
        let mut codes: Vec<_> = DEFAULT_REGIONS.iter().map(|(code, _)| *code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), DEFAULT_REGIONS.len());
    }

    #[test]
    fn test_positive_secs_parsed() {
        assert_eq!(parse_positive_secs("HTTP_TIMEOUT_SECS", "30").unwrap(), 30);
        assert_eq!(parse_positive_secs("HTTP_TIMEOUT_SECS", " 5 ").unwrap(), 5);
    }

    #[test]
    fn test_zero_secs_rejected() {
        let err = parse_positive_secs("HTTP_TIMEOUT_SECS", "0").unwrap_err();
        assert_eq!(err.to_string(), "HTTP_TIMEOUT_SECS must be greater than zero");
    }

    #[test]
    fn test_non_numeric_secs_rejected() {
        let err = parse_positive_secs("POLL_INTERVAL_SECS", "soon").unwrap_err();
        assert_eq!(err.to_string(), "POLL_INTERVAL_SECS must be a valid u64");
    }
}
