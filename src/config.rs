//! Seed configuration for default-constructed random sources.
//!
//! The environment is consulted exactly once, on the default construction
//! path of [`crate::SeedableSource`]. A malformed override is a fatal
//! construction-time error, not a policy-routed condition.

use std::env;
use std::fmt;

/// Environment variable that overrides the default seed.
pub const SEED_ENV: &str = "ROUNDCHECK_SEED";

/// Seed used when no override is present.
pub const DEFAULT_SEED: u64 = 19_811_611;

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The seed override could not be parsed as a `u64`.
    InvalidSeed { value: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSeed { value, reason } => {
                write!(f, "invalid {} value {:?}: {}", SEED_ENV, value, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Resolve the default seed, honoring the `ROUNDCHECK_SEED` override.
pub fn seed_from_env() -> Result<u64, ConfigError> {
    match env::var(SEED_ENV) {
        Ok(raw) => parse_seed(&raw),
        Err(env::VarError::NotPresent) => Ok(DEFAULT_SEED),
        Err(err @ env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidSeed {
            value: "<non-unicode>".to_string(),
            reason: err.to_string(),
        }),
    }
}

fn parse_seed(raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse::<u64>().map_err(|err| ConfigError::InvalidSeed {
        value: raw.to_string(),
        reason: err.to_string(),
    })
}
