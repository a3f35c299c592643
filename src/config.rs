use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const ENV_FILE: &str = ".env";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub orcid: OrcidConfig,
    #[serde(default)]
    pub bluesky: BlueskyConfig,
    #[serde(default)]
    pub announce: AnnounceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OrcidConfig {
    #[serde(default = "default_orcid_api_base")]
    pub api_base: String,
    pub ids: Vec<String>,
    #[serde(default = "default_days_back")]
    pub days_back: u32,
}

fn default_orcid_api_base() -> String {
    "https://pub.orcid.org/v3.0".to_string()
}

fn default_days_back() -> u32 {
    7
}

#[derive(Debug, Deserialize, Clone)]
pub struct BlueskyConfig {
    #[serde(default = "default_bluesky_api_base")]
    pub api_base: String,
}

fn default_bluesky_api_base() -> String {
    "https://bsky.social".to_string()
}

impl Default for BlueskyConfig {
    fn default() -> Self {
        Self {
            api_base: default_bluesky_api_base(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnnounceConfig {
    #[serde(default = "default_max_posts_total")]
    pub max_posts_total: u32,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default = "default_post_delay_ms")]
    pub post_delay_ms: u64,
}

fn default_max_posts_total() -> u32 {
    5
}

fn default_post_delay_ms() -> u64 {
    1000
}

impl Default for AnnounceConfig {
    fn default() -> Self {
        Self {
            max_posts_total: default_max_posts_total(),
            hashtags: Vec::new(),
            post_delay_ms: default_post_delay_ms(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).with_context(|| "Failed to parse config TOML")?;
        if config.orcid.ids.is_empty() {
            anyhow::bail!("config has no ORCID ids to check (orcid.ids is empty)");
        }
        Ok(config)
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let path = Path::new(ENV_FILE);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };
        // Strip BOM if present (common on Windows-created files)
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        for line in content.lines() {
            let line = line.trim().trim_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim().trim_matches('"').trim_matches('\'');
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
        }
    }

    /// Bluesky credentials come from environment variables (or .env).
    /// Missing credentials are fatal: this tool runs from cron/CI, so
    /// there is no interactive fallback.
    pub fn bluesky_handle() -> Result<String> {
        required_env("BLUESKY_HANDLE")
    }

    pub fn bluesky_app_password() -> Result<String> {
        required_env("BLUESKY_APP_PASSWORD")
    }
}

fn required_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) => {
            let v = sanitize_value(&v);
            if v.is_empty() {
                anyhow::bail!("Missing required environment variable: {}", name);
            }
            Ok(v)
        }
        Err(_) => anyhow::bail!("Missing required environment variable: {}", name),
    }
}

/// Strip carriage returns, BOM, and other invisible chars from an env value.
fn sanitize_value(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses() {
        let config = Config::load(Path::new("config.toml")).unwrap();
        assert!(!config.orcid.ids.is_empty());
        assert_eq!(config.orcid.days_back, 7);
        assert_eq!(config.announce.max_posts_total, 5);
        assert_eq!(config.announce.post_delay_ms, 1000);
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: Config = toml::from_str(
            r#"
            [orcid]
            ids = ["0000-0002-1825-0097"]
            "#,
        )
        .unwrap();
        assert_eq!(config.orcid.api_base, "https://pub.orcid.org/v3.0");
        assert_eq!(config.orcid.days_back, 7);
        assert_eq!(config.bluesky.api_base, "https://bsky.social");
        assert_eq!(config.announce.max_posts_total, 5);
        assert!(config.announce.hashtags.is_empty());
    }

    #[test]
    fn test_empty_id_list_rejected() {
        let err = Config::from_toml_str(
            r#"
            [orcid]
            ids = []
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no ORCID ids"));
    }

    #[test]
    fn test_sanitize_value() {
        assert_eq!(sanitize_value("  abc\r\u{feff}  "), "abc");
    }
}
