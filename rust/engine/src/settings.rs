//! Layered configuration: built-in defaults, then an optional TOML file named
//! by `CARDSENSE_CONFIG`, then individual `CARDSENSE_*` environment variables.
//!
//! ```toml
//! seed = 42
//!
//! [poker]
//! opponents = 2
//! trials = 20000
//!
//! [blackjack]
//! trials = 50000
//! decks = 6
//! dealer_hits_soft_17 = true
//! ```

use std::fs;
use std::path::Path;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blackjack::HouseRules;

pub const CONFIG_ENV: &str = "CARDSENSE_CONFIG";

/// Most opponents a single deck can deal hole cards to alongside a board.
pub const MAX_OPPONENTS: usize = 22;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub seed: Option<u64>,
    pub poker: PokerSettings,
    pub blackjack: BlackjackSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokerSettings {
    pub opponents: usize,
    pub trials: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackjackSettings {
    pub trials: u64,
    pub decks: usize,
    pub dealer_hits_soft_17: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            poker: PokerSettings {
                opponents: 1,
                trials: 10_000,
            },
            blackjack: BlackjackSettings {
                trials: 100_000,
                decks: 4,
                dealer_hits_soft_17: false,
            },
        }
    }
}

impl Settings {
    pub fn house_rules(&self) -> HouseRules {
        HouseRules {
            decks: self.blackjack.decks,
            dealer_hits_soft_17: self.blackjack.dealer_hits_soft_17,
        }
    }

    /// RNG for one analysis: seeded when a seed is configured, random otherwise.
    pub fn rng(&self) -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(self.seed.unwrap_or_else(rand::random))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsSources {
    pub seed: ValueSource,
    pub opponents: ValueSource,
    pub poker_trials: ValueSource,
    pub blackjack_trials: ValueSource,
    pub decks: ValueSource,
    pub dealer_hits_soft_17: ValueSource,
}

impl Default for SettingsSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            opponents: ValueSource::Default,
            poker_trials: ValueSource::Default,
            blackjack_trials: ValueSource::Default,
            decks: ValueSource::Default,
            dealer_hits_soft_17: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingsResolved {
    pub settings: Settings,
    pub sources: SettingsSources,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    poker: FilePoker,
    #[serde(default)]
    blackjack: FileBlackjack,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FilePoker {
    #[serde(default)]
    opponents: Option<usize>,
    #[serde(default)]
    trials: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileBlackjack {
    #[serde(default)]
    trials: Option<u64>,
    #[serde(default)]
    decks: Option<usize>,
    #[serde(default)]
    dealer_hits_soft_17: Option<bool>,
}

pub fn load() -> Result<Settings, ConfigError> {
    load_with_sources().map(|resolved| resolved.settings)
}

/// Resolves settings from the process environment.
pub fn load_with_sources() -> Result<SettingsResolved, ConfigError> {
    let file = match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.is_empty() => Some(fs::read_to_string(path)?),
        _ => None,
    };
    resolve(file.as_deref(), |key| std::env::var(key).ok())
}

/// Reads a TOML file on its own, without environment overrides.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
    let text = fs::read_to_string(path)?;
    resolve(Some(&text), |_| None).map(|resolved| resolved.settings)
}

/// Applies `file` (TOML text) and then `env` lookups over the defaults.
pub fn resolve<E>(file: Option<&str>, env: E) -> Result<SettingsResolved, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let mut cfg = Settings::default();
    let mut sources = SettingsSources::default();

    if let Some(text) = file {
        let f: FileSettings = toml::from_str(text)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.poker.opponents {
            cfg.poker.opponents = v;
            sources.opponents = ValueSource::File;
        }
        if let Some(v) = f.poker.trials {
            cfg.poker.trials = v;
            sources.poker_trials = ValueSource::File;
        }
        if let Some(v) = f.blackjack.trials {
            cfg.blackjack.trials = v;
            sources.blackjack_trials = ValueSource::File;
        }
        if let Some(v) = f.blackjack.decks {
            cfg.blackjack.decks = v;
            sources.decks = ValueSource::File;
        }
        if let Some(v) = f.blackjack.dealer_hits_soft_17 {
            cfg.blackjack.dealer_hits_soft_17 = v;
            sources.dealer_hits_soft_17 = ValueSource::File;
        }
    }

    let var = |key: &str| env(key).filter(|v| !v.is_empty());

    if let Some(v) = var("CARDSENSE_SEED") {
        cfg.seed = Some(parse_number(&v, "seed")?);
        sources.seed = ValueSource::Env;
    }
    if let Some(v) = var("CARDSENSE_OPPONENTS") {
        cfg.poker.opponents = parse_number(&v, "opponents")?;
        sources.opponents = ValueSource::Env;
    }
    if let Some(v) = var("CARDSENSE_POKER_TRIALS") {
        cfg.poker.trials = parse_number(&v, "poker trials")?;
        sources.poker_trials = ValueSource::Env;
    }
    if let Some(v) = var("CARDSENSE_BLACKJACK_TRIALS") {
        cfg.blackjack.trials = parse_number(&v, "blackjack trials")?;
        sources.blackjack_trials = ValueSource::Env;
    }
    if let Some(v) = var("CARDSENSE_DECKS") {
        cfg.blackjack.decks = parse_number(&v, "decks")?;
        sources.decks = ValueSource::Env;
    }
    if let Some(v) = var("CARDSENSE_DEALER_HITS_SOFT_17") {
        cfg.blackjack.dealer_hits_soft_17 = parse_bool(&v)
            .ok_or_else(|| ConfigError::Invalid("Invalid dealer_hits_soft_17".into()))?;
        sources.dealer_hits_soft_17 = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(SettingsResolved {
        settings: cfg,
        sources,
    })
}

fn validate(cfg: &Settings) -> Result<(), ConfigError> {
    if cfg.poker.opponents == 0 || cfg.poker.opponents > MAX_OPPONENTS {
        return Err(ConfigError::Invalid(format!(
            "poker.opponents must be between 1 and {}",
            MAX_OPPONENTS
        )));
    }
    if cfg.poker.trials == 0 {
        return Err(ConfigError::Invalid("poker.trials must be >=1".into()));
    }
    if cfg.blackjack.trials == 0 {
        return Err(ConfigError::Invalid("blackjack.trials must be >=1".into()));
    }
    if cfg.blackjack.decks == 0 {
        return Err(ConfigError::Invalid("blackjack.decks must be >=1".into()));
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(value: &str, name: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("Invalid {}", name)))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
