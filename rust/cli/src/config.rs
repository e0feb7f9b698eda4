//! Draw settings resolved from defaults, a TOML file and the environment.
//!
//! Precedence, lowest first: built-in default, the file named by
//! `GROUPDRAW_CONFIG`, then `GROUPDRAW_*` variables. Command-line flags are
//! applied on top by each command.

use groupdraw_engine::lookahead::LookaheadMode;
use serde::{Deserialize, Serialize};
use std::fs;

pub const ENV_CONFIG: &str = "GROUPDRAW_CONFIG";
pub const ENV_SEED: &str = "GROUPDRAW_SEED";
pub const ENV_LOOKAHEAD: &str = "GROUPDRAW_LOOKAHEAD";
pub const ENV_MAX_ATTEMPTS: &str = "GROUPDRAW_MAX_ATTEMPTS";
pub const ENV_POOLS: &str = "GROUPDRAW_POOLS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub lookahead: LookaheadMode,
    /// Sessions `draw` may start before giving up on a dead end
    pub max_attempts: u32,
    /// Pool table JSON; the bundled ranking data when unset
    pub pools: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub lookahead: ValueSource,
    pub max_attempts: ValueSource,
    pub pools: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            lookahead: ValueSource::Default,
            max_attempts: ValueSource::Default,
            pools: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            lookahead: LookaheadMode::default(),
            max_attempts: 10,
            pools: None,
        }
    }
}

#[derive(Debug)]
#[allow(dead_code)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
            other => write!(f, "{:?}", other),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(ENV_CONFIG)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.lookahead {
            cfg.lookahead = parse_lookahead(&v)?;
            sources.lookahead = ValueSource::File;
        }
        if let Some(v) = f.max_attempts {
            cfg.max_attempts = v;
            sources.max_attempts = ValueSource::File;
        }
        if let Some(v) = f.pools {
            cfg.pools = Some(v);
            sources.pools = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var(ENV_SEED)
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(mode) = std::env::var(ENV_LOOKAHEAD)
        && !mode.is_empty()
    {
        cfg.lookahead = parse_lookahead(&mode)?;
        sources.lookahead = ValueSource::Env;
    }
    if let Ok(n) = std::env::var(ENV_MAX_ATTEMPTS)
        && !n.is_empty()
    {
        cfg.max_attempts = n
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid max_attempts".into()))?;
        sources.max_attempts = ValueSource::Env;
    }
    if let Ok(path) = std::env::var(ENV_POOLS)
        && !path.is_empty()
    {
        cfg.pools = Some(path);
        sources.pools = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    lookahead: Option<String>,
    #[serde(default)]
    max_attempts: Option<u32>,
    #[serde(default)]
    pools: Option<String>,
}

fn parse_lookahead(s: &str) -> Result<LookaheadMode, ConfigError> {
    s.parse()
        .map_err(|e: String| ConfigError::Invalid(format!("Invalid lookahead: {}", e)))
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.max_attempts == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: max_attempts must be >=1".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert!(validate(&cfg).is_ok());
        assert_eq!(cfg.lookahead, LookaheadMode::Backtracking);
        assert_eq!(cfg.max_attempts, 10);
    }

    #[test]
    fn zero_attempts_rejected() {
        let cfg = Config {
            max_attempts: 0,
            ..Config::default()
        };
        let e = validate(&cfg).unwrap_err();
        assert!(e.to_string().contains("max_attempts"));
    }

    #[test]
    fn lookahead_aliases() {
        assert_eq!(parse_lookahead("fast").unwrap(), LookaheadMode::Greedy);
        assert_eq!(parse_lookahead("EXACT").unwrap(), LookaheadMode::Backtracking);
        assert!(parse_lookahead("random").is_err());
    }

    #[test]
    fn value_source_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ValueSource::Env).unwrap(), "\"env\"");
    }
}
