use crate::types::{AppError, AppResult};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub stash: StashConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct StashConfig {
    /// Default stash endpoint, used when the CLI is not given one
    pub url: Option<String>,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stash: StashConfig {
                url: None,
                user_agent: default_user_agent(),
            },
            log: LogConfig {
                filter: "kml_stash=info".to_string(),
            },
        }
    }
}

fn default_user_agent() -> String {
    format!("kml-stash/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let url = match env::var("STASH_URL") {
            Ok(url) if url.trim().is_empty() => None,
            Ok(url) => Some(url.trim().to_string()),
            Err(env::VarError::NotPresent) => None,
            Err(e) => return Err(AppError::Config(format!("STASH_URL: {}", e))),
        };

        Ok(Self {
            stash: StashConfig {
                url,
                user_agent: env::var("STASH_USER_AGENT")
                    .unwrap_or(defaults.stash.user_agent),
            },
            log: LogConfig {
                filter: env::var("RUST_LOG").unwrap_or(defaults.log.filter),
            },
        })
    }

    /// Pick the stash endpoint, preferring an explicit override
    pub fn stash_url(&self, explicit: Option<&str>) -> AppResult<String> {
        explicit
            .map(str::to_string)
            .or_else(|| self.stash.url.clone())
            .ok_or_else(|| {
                AppError::Config("no stash endpoint given; pass --stash-url or set STASH_URL".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.stash.url.is_none());
        assert!(config.stash.user_agent.starts_with("kml-stash/"));
        assert_eq!(config.log.filter, "kml_stash=info");
    }

    #[test]
    fn test_stash_url_precedence() {
        let mut config = Config::default();
        assert!(matches!(config.stash_url(None), Err(AppError::Config(_))));

        config.stash.url = Some("http://env.example/stash".to_string());
        assert_eq!(config.stash_url(None).unwrap(), "http://env.example/stash");
        assert_eq!(
            config.stash_url(Some("http://cli.example/stash")).unwrap(),
            "http://cli.example/stash"
        );
    }
}
