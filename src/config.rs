use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base: String,
    pub issues_per_page: u32,
    pub comments_per_page: u32,
    /// Environment variable holding an optional API token.
    pub token_env: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            issues_per_page: 20,
            comments_per_page: 5,
            token_env: Some("GITHUB_TOKEN".to_string()),
            timeout_secs: 30,
        }
    }
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("issuescope").join("config.toml"))
}

impl Config {
    /// Load `~/.config/issuescope/config.toml`, falling back to defaults.
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Config::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Config::default();
        };

        match toml::from_str::<Config>(&content) {
            Ok(config) => config.sanitized(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "invalid config, using defaults"
                );
                Config::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        self.issues_per_page = self.issues_per_page.clamp(1, 100);
        self.comments_per_page = self.comments_per_page.clamp(1, 100);
        if self.api_base.trim().is_empty() {
            self.api_base = DEFAULT_API_BASE.to_string();
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Token from the configured environment variable, if set and non-empty.
    pub fn token(&self) -> Option<String> {
        let var = self.token_env.as_deref()?;
        std::env::var(var).ok().filter(|t| !t.trim().is_empty())
    }
}
