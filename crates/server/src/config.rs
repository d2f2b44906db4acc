// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Loading of `voting_rules.json` and `council.json`.
//!
//! A missing file is written out with defaults so operators have a template
//! to edit. Both files are read again on every reload.

use decrees_domain::{DomainError, Seat, VotingRules};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// File holding the voting rules.
pub const RULES_FILE: &str = "voting_rules.json";

/// File holding the council seats.
pub const COUNCIL_FILE: &str = "council.json";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    /// The file is not valid JSON for its layout.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    /// The rules parsed but break a constraint.
    #[error("invalid voting rules in {path}: {source}")]
    InvalidRules { path: String, source: DomainError },
}

/// Contents of `council.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CouncilConfig {
    /// Display name of the council.
    pub council_name: String,
    /// Every declared seat, occupied or not.
    pub seats: Vec<Seat>,
}

impl Default for CouncilConfig {
    fn default() -> Self {
        Self {
            council_name: String::from("The Council"),
            seats: Vec::new(),
        }
    }
}

impl CouncilConfig {
    /// Number of seats that currently have a holder.
    #[must_use]
    pub fn active_seat_count(&self) -> usize {
        self.seats.iter().filter(|seat| seat.is_active()).count()
    }
}

/// Everything read from the configuration directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub rules: VotingRules,
    pub council: CouncilConfig,
}

/// Loads both configuration files from `dir`.
///
/// # Errors
///
/// Returns an error if a file cannot be read, written, or parsed, or if the
/// rules are invalid.
pub fn load(dir: &Path) -> Result<LoadedConfig, ConfigError> {
    let rules: VotingRules = load_rules(dir)?;
    let council: CouncilConfig = load_council(dir)?;

    info!(
        council = %council.council_name,
        seats = council.seats.len(),
        active_seats = council.active_seat_count(),
        majority_mode = %rules.majority_mode,
        min_quorum_percent = rules.min_quorum_percent,
        voting_duration_minutes = rules.voting_duration_minutes,
        "Loaded council configuration"
    );
    Ok(LoadedConfig { rules, council })
}

/// Loads and validates the voting rules.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the rules are
/// invalid.
pub fn load_rules(dir: &Path) -> Result<VotingRules, ConfigError> {
    let path = dir.join(RULES_FILE);
    let rules: VotingRules = load_or_create(&path)?;
    rules
        .validate()
        .map_err(|source| ConfigError::InvalidRules {
            path: path.display().to_string(),
            source,
        })?;
    Ok(rules)
}

/// Loads the council seats.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_council(dir: &Path) -> Result<CouncilConfig, ConfigError> {
    load_or_create(&dir.join(COUNCIL_FILE))
}

fn load_or_create<T>(path: &Path) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Serialize + Default,
{
    let path_str: String = path.display().to_string();
    let io_error = |source: std::io::Error| ConfigError::Io {
        path: path_str.clone(),
        source,
    };

    if !path.exists() {
        let defaults: T = T::default();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json: String =
            serde_json::to_string_pretty(&defaults).map_err(|source| ConfigError::Parse {
                path: path_str.clone(),
                source,
            })?;
        std::fs::write(path, json).map_err(io_error)?;
        warn!(path = %path_str, "Configuration file was missing; wrote defaults");
        return Ok(defaults);
    }

    let contents: String = std::fs::read_to_string(path).map_err(io_error)?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path_str.clone(),
        source,
    })
}
