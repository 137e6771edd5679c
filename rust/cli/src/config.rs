//! Layered CLI configuration.
//!
//! Values resolve as defaults < TOML file named by `LASTTURN_CONFIG` <
//! `LASTTURN_*` environment variables. Command-line flags are applied on top
//! by each command. Every value remembers where it came from so `lastturn cfg`
//! can show it.

use lastturn_engine::game::MatchConfig;
use serde::{Deserialize, Serialize};
use std::fs;

pub const ENV_CONFIG: &str = "LASTTURN_CONFIG";
pub const ENV_PLAYER: &str = "LASTTURN_PLAYER";
pub const ENV_BOARD_SIZE: &str = "LASTTURN_BOARD_SIZE";
pub const ENV_TOTAL_TIME: &str = "LASTTURN_TOTAL_TIME";
pub const ENV_ACTION_TIME: &str = "LASTTURN_ACTION_TIME";
pub const ENV_AI: &str = "LASTTURN_AI";
pub const ENV_SEED: &str = "LASTTURN_SEED";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub player_name: String,
    pub board_size: usize,
    pub total_time_secs: u32,
    pub action_time_secs: u32,
    pub ai: String,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        let m = MatchConfig::default();
        Self {
            player_name: m.player_name,
            board_size: m.board_size,
            total_time_secs: m.total_time_secs,
            action_time_secs: m.action_time_secs,
            ai: "baseline".into(),
            seed: None,
        }
    }
}

impl Config {
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            player_name: self.player_name.clone(),
            board_size: self.board_size,
            total_time_secs: self.total_time_secs,
            action_time_secs: self.action_time_secs,
            seed: self.seed,
        }
    }
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
    pub player_name: ValueSource,
    pub board_size: ValueSource,
    pub total_time_secs: ValueSource,
    pub action_time_secs: ValueSource,
    pub ai: ValueSource,
    pub seed: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            player_name: ValueSource::Default,
            board_size: ValueSource::Default,
            total_time_secs: ValueSource::Default,
            action_time_secs: ValueSource::Default,
            ai: ValueSource::Default,
            seed: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

#[derive(Debug)]
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
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Resolves the configuration from the process environment.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    load_from(|key| std::env::var(key).ok())
}

/// Resolves the configuration with `lookup` standing in for the environment.
pub fn load_from<F>(lookup: F) -> Result<ConfigResolved, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();
    let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(path) = env(ENV_CONFIG) {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.player_name {
            cfg.player_name = v;
            sources.player_name = ValueSource::File;
        }
        if let Some(v) = f.board_size {
            cfg.board_size = v;
            sources.board_size = ValueSource::File;
        }
        if let Some(v) = f.total_time_secs {
            cfg.total_time_secs = v;
            sources.total_time_secs = ValueSource::File;
        }
        if let Some(v) = f.action_time_secs {
            cfg.action_time_secs = v;
            sources.action_time_secs = ValueSource::File;
        }
        if let Some(v) = f.ai {
            cfg.ai = v;
            sources.ai = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
    }

    if let Some(name) = env(ENV_PLAYER) {
        cfg.player_name = name;
        sources.player_name = ValueSource::Env;
    }
    if let Some(size) = env(ENV_BOARD_SIZE) {
        cfg.board_size = parse_number(&size, "board size")?;
        sources.board_size = ValueSource::Env;
    }
    if let Some(total) = env(ENV_TOTAL_TIME) {
        cfg.total_time_secs = parse_number(&total, "total time")?;
        sources.total_time_secs = ValueSource::Env;
    }
    if let Some(action) = env(ENV_ACTION_TIME) {
        cfg.action_time_secs = parse_number(&action, "action time")?;
        sources.action_time_secs = ValueSource::Env;
    }
    if let Some(ai) = env(ENV_AI) {
        cfg.ai = ai;
        sources.ai = ValueSource::Env;
    }
    if let Some(seed) = env(ENV_SEED) {
        cfg.seed = Some(parse_number(&seed, "seed")?);
        sources.seed = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    player_name: Option<String>,
    #[serde(default)]
    board_size: Option<usize>,
    #[serde(default)]
    total_time_secs: Option<u32>,
    #[serde(default)]
    action_time_secs: Option<u32>,
    #[serde(default)]
    ai: Option<String>,
    #[serde(default)]
    seed: Option<u64>,
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", what, raw)))
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    cfg.match_config()
        .validate()
        .map_err(|e| ConfigError::Invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let resolved = load_from(env_of(&[])).unwrap();
        assert_eq!(resolved.config, Config::default());
        assert_eq!(resolved.config.board_size, 4);
        assert_eq!(resolved.config.total_time_secs, 180);
        assert_eq!(resolved.config.action_time_secs, 30);
        assert_eq!(resolved.sources.seed, ValueSource::Default);
    }

    #[test]
    fn env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "board_size = 6\nplayer_name = \"Ada\"\nseed = 7").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let resolved = load_from(env_of(&[
            (ENV_CONFIG, path.as_str()),
            (ENV_BOARD_SIZE, "5"),
        ]))
        .unwrap();

        assert_eq!(resolved.config.board_size, 5);
        assert_eq!(resolved.sources.board_size, ValueSource::Env);
        assert_eq!(resolved.config.player_name, "Ada");
        assert_eq!(resolved.sources.player_name, ValueSource::File);
        assert_eq!(resolved.config.seed, Some(7));
        assert_eq!(resolved.sources.seed, ValueSource::File);
        assert_eq!(resolved.sources.ai, ValueSource::Default);
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let resolved = load_from(env_of(&[(ENV_SEED, "  "), (ENV_AI, "")])).unwrap();
        assert_eq!(resolved.config.seed, None);
        assert_eq!(resolved.config.ai, "baseline");
    }

    #[test]
    fn rejects_unparsable_and_out_of_range_values() {
        assert!(matches!(
            load_from(env_of(&[(ENV_SEED, "abc")])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            load_from(env_of(&[(ENV_BOARD_SIZE, "9")])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            load_from(env_of(&[(ENV_ACTION_TIME, "0")])),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn unknown_file_keys_are_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "starting_stack = 100").unwrap();
        let path = file.path().to_string_lossy().to_string();
        assert!(matches!(
            load_from(env_of(&[(ENV_CONFIG, path.as_str())])),
            Err(ConfigError::Parse(_))
        ));
    }
}
