use crate::core::monetary::{
    CANCEL_CHECK_INTERVAL, MAX_DIFFICULTY, MINING_DIFFICULTY, MINING_INTERVAL_SECS, MINING_REWARD,
    MINING_SENDER,
};
use crate::error::{BlockchainError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

const DIFFICULTY_KEY: &str = "LEDGER_DIFFICULTY";
const MINING_REWARD_KEY: &str = "LEDGER_MINING_REWARD";
const MINING_INTERVAL_KEY: &str = "LEDGER_MINING_INTERVAL_SECS";
const STRICT_BALANCE_KEY: &str = "LEDGER_STRICT_BALANCE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub difficulty: usize,
    pub mining_reward: f64,
    pub mining_sender: String,
    pub mining_interval_secs: u64,
    /// Reject signed transfers whose sender lacks confirmed funds. Off by default.
    pub strict_balance: bool,
    pub cancel_check_interval: u64,
    /// Fixed genesis time; the clock is used when unset
    pub genesis_timestamp: Option<i64>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            difficulty: MINING_DIFFICULTY,
            mining_reward: MINING_REWARD,
            mining_sender: MINING_SENDER.to_string(),
            mining_interval_secs: MINING_INTERVAL_SECS,
            strict_balance: false,
            cancel_check_interval: CANCEL_CHECK_INTERVAL,
            genesis_timestamp: None,
        }
    }
}

impl LedgerConfig {
    pub fn from_toml_str(input: &str) -> Result<LedgerConfig> {
        let config: LedgerConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<LedgerConfig> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Overlay `LEDGER_*` environment variables on top of this config
    pub fn with_env_overrides(mut self) -> Result<LedgerConfig> {
        if let Ok(value) = env::var(DIFFICULTY_KEY) {
            self.difficulty = parse_env(DIFFICULTY_KEY, &value)?;
        }
        if let Ok(value) = env::var(MINING_REWARD_KEY) {
            self.mining_reward = parse_env(MINING_REWARD_KEY, &value)?;
        }
        if let Ok(value) = env::var(MINING_INTERVAL_KEY) {
            self.mining_interval_secs = parse_env(MINING_INTERVAL_KEY, &value)?;
        }
        if let Ok(value) = env::var(STRICT_BALANCE_KEY) {
            self.strict_balance = parse_env(STRICT_BALANCE_KEY, &value)?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.difficulty > MAX_DIFFICULTY {
            return Err(BlockchainError::Config(format!(
                "difficulty must be at most {MAX_DIFFICULTY}, got {}",
                self.difficulty
            )));
        }
        if !self.mining_reward.is_finite() || self.mining_reward < 0.0 {
            return Err(BlockchainError::Config(format!(
                "mining_reward must be a finite non-negative number, got {}",
                self.mining_reward
            )));
        }
        if self.mining_sender.is_empty() {
            return Err(BlockchainError::Config(
                "mining_sender must not be empty".to_string(),
            ));
        }
        if self.mining_interval_secs == 0 {
            return Err(BlockchainError::Config(
                "mining_interval_secs must be positive".to_string(),
            ));
        }
        if self.cancel_check_interval == 0 {
            return Err(BlockchainError::Config(
                "cancel_check_interval must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn mining_interval(&self) -> Duration {
        Duration::from_secs(self.mining_interval_secs)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| BlockchainError::Config(format!("Invalid value for {key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_follow_mining_constants() {
        let config = LedgerConfig::default();
        assert_eq!(config.difficulty, 4);
        assert_eq!(config.mining_reward, 10.0);
        assert_eq!(config.mining_sender, "0x0");
        assert_eq!(config.mining_interval(), Duration::from_secs(30));
        assert!(!config.strict_balance);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = LedgerConfig::from_toml_str("difficulty = 2\nstrict_balance = true\n").unwrap();
        assert_eq!(config.difficulty, 2);
        assert!(config.strict_balance);
        assert_eq!(config.mining_reward, 10.0);
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert!(LedgerConfig::from_toml_str("difficulty = 65").is_err());
        assert!(LedgerConfig::from_toml_str("mining_interval_secs = 0").is_err());
        assert!(LedgerConfig::from_toml_str("mining_sender = \"\"").is_err());
        assert!(LedgerConfig::from_toml_str("mining_reward = -1.0").is_err());
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        let err = LedgerConfig::from_toml_str("difficulty = \"four\"").unwrap_err();
        assert!(matches!(err, BlockchainError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "difficulty = 1\ngenesis_timestamp = 1234").unwrap();
        let config = LedgerConfig::load(file.path()).unwrap();
        assert_eq!(config.difficulty, 1);
        assert_eq!(config.genesis_timestamp, Some(1234));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LedgerConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, BlockchainError::Io(_)));
    }

    #[test]
    fn test_parse_env_reports_key() {
        let err = parse_env::<usize>(DIFFICULTY_KEY, "lots").unwrap_err();
        assert!(err.to_string().contains(DIFFICULTY_KEY));
        assert!(parse_env::<bool>(STRICT_BALANCE_KEY, " true ").unwrap());
    }
}
