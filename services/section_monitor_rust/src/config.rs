use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub schedule_url: String,
    pub course_title: String,
    pub check_interval: Duration,

    pub discord_api_base_url: String,
    pub discord_bot_token: String,
    pub discord_recipient_id: String,

    pub stats_log_every_cycles: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let schedule_url =
            env::var("SCHEDULE_URL").context("SCHEDULE_URL must be set (schedule page to scrape)")?;

        let course_title = env::var("COURSE_TITLE")
            .context("COURSE_TITLE must be set (case-sensitive course title to match)")?;

        let check_interval_secs =
            parse_u64_env("CHECK_INTERVAL_SECS", 60).context("CHECK_INTERVAL_SECS")?;

        let discord_api_base_url = env::var("DISCORD_API_BASE_URL")
            .unwrap_or_else(|_| "https://discord.com/api/v10".to_string());

        let discord_bot_token =
            env::var("DISCORD_BOT_TOKEN").context("DISCORD_BOT_TOKEN must be set")?;

        let discord_recipient_id = env::var("DISCORD_RECIPIENT_ID")
            .context("DISCORD_RECIPIENT_ID must be set (user id to DM)")?;

        let stats_log_every_cycles =
            parse_u64_env("STATS_LOG_EVERY_CYCLES", 60).context("STATS_LOG_EVERY_CYCLES")?;

        Ok(Self {
            schedule_url,
            course_title,
            check_interval: Duration::from_secs(check_interval_secs),
            discord_api_base_url,
            discord_bot_token,
            discord_recipient_id,
            stats_log_every_cycles,
        })
    }
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse::<u64>()
        .with_context(|| format!("Invalid {key}: {raw} (expected integer)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u64_env_default() {
        assert_eq!(parse_u64_env("SECTION_MONITOR_TEST_UNSET", 60).unwrap(), 60);
    }

    #[test]
    fn test_parse_u64_env_invalid() {
        env::set_var("SECTION_MONITOR_TEST_BAD_INT", "sixty");
        assert!(parse_u64_env("SECTION_MONITOR_TEST_BAD_INT", 60).is_err());
    }

    #[test]
    fn test_parse_u64_env_set() {
        env::set_var("SECTION_MONITOR_TEST_GOOD_INT", "15");
        assert_eq!(parse_u64_env("SECTION_MONITOR_TEST_GOOD_INT", 60).unwrap(), 15);
    }
}
