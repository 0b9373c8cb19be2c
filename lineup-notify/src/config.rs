//! Notifier settings
//!
//! Each value comes from the first source that provides it: command line or
//! environment (both via clap), then `config.toml`, then the compiled default.

use lineup_common::config::{TomlConfig, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_SERVER_URL};
use lineup_common::MatcherConfig;
use std::time::Duration;

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub server_url: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub exhibitor_id: Option<String>,
}

/// Resolved notifier configuration
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Base URL of lineup-api, without trailing slash
    pub server_url: String,
    pub poll_interval: Duration,
    pub matcher: MatcherConfig,
}

impl NotifyConfig {
    pub fn resolve(cli: CliOverrides, toml: TomlConfig) -> Self {
        let server_url = cli
            .server_url
            .or(toml.server_url)
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        // A zero interval would spin; treat it as one second
        let secs = cli
            .poll_interval_secs
            .or(toml.poll_interval_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
            .max(1);

        let rules = if toml.notifications.is_empty() {
            MatcherConfig::default_rules()
        } else {
            toml.notifications
        };

        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_secs(secs),
            matcher: MatcherConfig::new(rules).with_exhibitor(cli.exhibitor_id.or(toml.exhibitor_id)),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self::resolve(CliOverrides::default(), TomlConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineup_common::NotificationRule;

    #[test]
    fn defaults_apply_without_sources() {
        let config = NotifyConfig::default();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.poll_interval, Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS));
        assert_eq!(config.matcher.rules, MatcherConfig::default_rules());
        assert!(config.matcher.exhibitor_filter.is_none());
    }

    #[test]
    fn command_line_beats_file() {
        let toml = TomlConfig {
            server_url: Some("http://file:1".to_string()),
            poll_interval_secs: Some(30),
            exhibitor_id: Some("from-file".to_string()),
            notifications: vec![NotificationRule::new("Rex", "Open", "B")],
            ..Default::default()
        };
        let cli = CliOverrides {
            server_url: Some("http://cli:2/".to_string()),
            poll_interval_secs: None,
            exhibitor_id: Some("from-cli".to_string()),
        };

        let config = NotifyConfig::resolve(cli, toml);
        assert_eq!(config.server_url, "http://cli:2");
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.matcher.exhibitor_filter.as_deref(), Some("from-cli"));
        assert_eq!(config.matcher.rules, vec![NotificationRule::new("Rex", "Open", "B")]);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let cli = CliOverrides {
            poll_interval_secs: Some(0),
            ..Default::default()
        };
        let config = NotifyConfig::resolve(cli, TomlConfig::default());
        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }
}
