//! crawlrate.toml configuration parser.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::request::{
    Algorithm, Constraint, DEFAULT_MAXIMUM_CONNECTIONS, DEFAULT_TIME_PERIOD, Timing,
};
use crate::strategy::{FillStrategy, Remainder, Weighting};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlrateConfig {
    pub timing: Option<TimingConfig>,
    pub plan: Option<PlanConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default, with = "humantime_serde")]
    pub avg_job_runtime: Option<Duration>,
    #[serde(default, with = "humantime_serde")]
    pub minimum_delay: Option<Duration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    pub algorithm: Option<Algorithm>,
    #[serde(default, with = "humantime_serde")]
    pub time_period: Option<Duration>,
    pub maximum_connections: Option<u32>,
    pub weighting: Option<Weighting>,
    pub remainder: Option<Remainder>,
}

impl CrawlrateConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Per-job timing with defaults filled in.
    pub fn timing(&self) -> Timing {
        let defaults = Timing::default();
        let timing = self.timing.as_ref();
        Timing {
            avg_job_runtime: timing
                .and_then(|t| t.avg_job_runtime)
                .unwrap_or(defaults.avg_job_runtime),
            minimum_delay: timing
                .and_then(|t| t.minimum_delay)
                .unwrap_or(defaults.minimum_delay),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.plan
            .as_ref()
            .and_then(|p| p.algorithm)
            .unwrap_or_default()
    }

    /// The constraint `algorithm` needs, drawn from this config.
    pub fn constraint(&self, algorithm: Algorithm) -> Constraint {
        let plan = self.plan.as_ref();
        match algorithm {
            Algorithm::Duration => Constraint::FixedDuration {
                time_period: plan
                    .and_then(|p| p.time_period)
                    .unwrap_or(DEFAULT_TIME_PERIOD),
            },
            Algorithm::Connections => Constraint::FixedConnections {
                max_connections: plan
                    .and_then(|p| p.maximum_connections)
                    .unwrap_or(DEFAULT_MAXIMUM_CONNECTIONS),
            },
        }
    }

    pub fn fill_strategy(&self) -> FillStrategy {
        let plan = self.plan.as_ref();
        FillStrategy {
            weighting: plan.and_then(|p| p.weighting).unwrap_or_default(),
            remainder: plan.and_then(|p| p.remainder).unwrap_or_default(),
        }
    }

    /// Scaffold a config spelling out every default.
    pub fn scaffold() -> Self {
        let timing = Timing::default();
        CrawlrateConfig {
            timing: Some(TimingConfig {
                avg_job_runtime: Some(timing.avg_job_runtime),
                minimum_delay: Some(timing.minimum_delay),
            }),
            plan: Some(PlanConfig {
                algorithm: Some(Algorithm::Duration),
                time_period: Some(DEFAULT_TIME_PERIOD),
                maximum_connections: Some(DEFAULT_MAXIMUM_CONNECTIONS),
                weighting: Some(Weighting::default()),
                remainder: Some(Remainder::default()),
            }),
        }
    }
}

/// Parse a duration flag: a bare integer is seconds, anything else is a
/// humantime string such as `90s`, `1m30s` or `1h`.
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let input = input.trim();
    if let Ok(secs) = input.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(input).map_err(|e| ConfigError::Duration {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold() {
        let config = CrawlrateConfig::scaffold();
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("avg_job_runtime = \"1m\""));
        assert!(toml_str.contains("algorithm = \"duration\""));
        assert!(toml_str.contains("weighting = \"bottom\""));
    }

    #[test]
    fn test_parse_minimal() {
        let config = CrawlrateConfig::from_toml_str("").unwrap();
        assert_eq!(config.timing(), Timing::default());
        assert_eq!(config.algorithm(), Algorithm::Duration);
        assert_eq!(
            config.constraint(Algorithm::Duration),
            Constraint::FixedDuration {
                time_period: Duration::from_secs(3600)
            }
        );
        assert_eq!(
            config.constraint(Algorithm::Connections),
            Constraint::FixedConnections { max_connections: 5 }
        );
        assert_eq!(config.fill_strategy(), FillStrategy::default());
    }

    #[test]
    fn test_parse_full() {
        let toml_str = r#"
[timing]
avg_job_runtime = "45s"
minimum_delay = "15s"

[plan]
algorithm = "connections"
time_period = "2m"
maximum_connections = 3
weighting = "top"
remainder = "spread"
"#;
        let config = CrawlrateConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.timing(), Timing::from_secs(45, 15));
        assert_eq!(config.algorithm(), Algorithm::Connections);
        assert_eq!(
            config.constraint(Algorithm::Connections),
            Constraint::FixedConnections { max_connections: 3 }
        );
        assert_eq!(
            config.fill_strategy(),
            FillStrategy::new(Weighting::TopHeavy, Remainder::Spread)
        );
    }

    #[test]
    fn test_parse_rejects_unknown_algorithm() {
        let err = CrawlrateConfig::from_toml_str("[plan]\nalgorithm = \"fastest\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crawlrate.toml");
        std::fs::write(&path, "[timing]\nminimum_delay = \"30s\"\n").unwrap();

        let config = CrawlrateConfig::from_file(&path).unwrap();
        assert_eq!(config.timing().minimum_delay, Duration::from_secs(30));

        let missing = CrawlrateConfig::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("60").unwrap(), Duration::from_secs(60));
        assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert!(parse_duration("soon").is_err());
    }
}
