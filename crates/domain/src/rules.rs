// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Voting rules configuration.
//!
//! The serialized layout matches `voting_rules.json`:
//!
//! ```json
//! {
//!   "majorityMode": "SIMPLE",
//!   "minQuorumPercent": 50,
//!   "tiesPass": false,
//!   "votingDurationMinutes": 0
//! }
//! ```

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Duration;

/// Fraction of cast votes required to enact a decree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MajorityMode {
    /// More than half of the votes cast.
    #[default]
    #[serde(alias = "simple")]
    Simple,
    /// At least two thirds of the votes cast, rounded up.
    #[serde(alias = "two_thirds")]
    TwoThirds,
}

impl MajorityMode {
    /// Returns the string representation used in configuration files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "SIMPLE",
            Self::TwoThirds => "TWO_THIRDS",
        }
    }

    /// Number of yes votes required out of `cast` votes.
    ///
    /// - `Simple`: `floor(cast / 2) + 1`
    /// - `TwoThirds`: `ceil(cast * 2 / 3)`
    #[must_use]
    pub const fn required_yes(&self, cast: u32) -> u32 {
        match self {
            Self::Simple => cast / 2 + 1,
            Self::TwoThirds => (cast * 2).div_ceil(3),
        }
    }
}

impl FromStr for MajorityMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SIMPLE" => Ok(Self::Simple),
            "TWO_THIRDS" | "TWOTHIRDS" => Ok(Self::TwoThirds),
            _ => Err(DomainError::InvalidMajorityMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for MajorityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The rules that decide when and how a decree in `Voting` resolves.
///
/// Rules are read fresh for every evaluation. The only value captured at
/// open time is the voting duration, which is turned into the decree's
/// absolute deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VotingRules {
    /// Majority required to enact.
    #[serde(alias = "majority_mode")]
    pub majority_mode: MajorityMode,
    /// Percentage of active seats that must vote. 0 disables quorum.
    #[serde(alias = "min_quorum_percent")]
    pub min_quorum_percent: u8,
    /// Whether an exact yes/no tie enacts.
    #[serde(alias = "ties_pass")]
    pub ties_pass: bool,
    /// Voting period length in minutes. 0 means no automatic timeout.
    #[serde(alias = "voting_duration_minutes")]
    pub voting_duration_minutes: u32,
}

impl Default for VotingRules {
    fn default() -> Self {
        Self {
            majority_mode: MajorityMode::Simple,
            min_quorum_percent: 50,
            ties_pass: false,
            voting_duration_minutes: 0,
        }
    }
}

impl VotingRules {
    /// Validates the rule values.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuorumPercent` if the quorum percent exceeds 100.
    pub const fn validate(&self) -> Result<(), DomainError> {
        if self.min_quorum_percent > 100 {
            return Err(DomainError::InvalidQuorumPercent(self.min_quorum_percent));
        }
        Ok(())
    }

    /// Returns the voting period, or `None` when voting never times out.
    #[must_use]
    pub fn voting_duration(&self) -> Option<Duration> {
        if self.voting_duration_minutes == 0 {
            None
        } else {
            Some(Duration::minutes(i64::from(self.voting_duration_minutes)))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_simple_majority_required_yes() {
        assert_eq!(MajorityMode::Simple.required_yes(0), 1);
        assert_eq!(MajorityMode::Simple.required_yes(3), 2);
        assert_eq!(MajorityMode::Simple.required_yes(4), 3);
        assert_eq!(MajorityMode::Simple.required_yes(5), 3);
    }

    #[test]
    fn test_two_thirds_required_yes_rounds_up() {
        assert_eq!(MajorityMode::TwoThirds.required_yes(0), 0);
        assert_eq!(MajorityMode::TwoThirds.required_yes(3), 2);
        assert_eq!(MajorityMode::TwoThirds.required_yes(4), 3);
        assert_eq!(MajorityMode::TwoThirds.required_yes(6), 4);
        assert_eq!(MajorityMode::TwoThirds.required_yes(7), 5);
    }

    #[test]
    fn test_default_rules() {
        let rules = VotingRules::default();

        assert_eq!(rules.majority_mode, MajorityMode::Simple);
        assert_eq!(rules.min_quorum_percent, 50);
        assert!(!rules.ties_pass);
        assert_eq!(rules.voting_duration(), None);
    }

    #[test]
    fn test_voting_duration_in_minutes() {
        let rules = VotingRules {
            voting_duration_minutes: 90,
            ..VotingRules::default()
        };

        assert_eq!(rules.voting_duration(), Some(Duration::minutes(90)));
    }

    #[test]
    fn test_validate_rejects_quorum_over_100() {
        let rules = VotingRules {
            min_quorum_percent: 101,
            ..VotingRules::default()
        };

        assert_eq!(
            rules.validate(),
            Err(DomainError::InvalidQuorumPercent(101))
        );
    }

    #[test]
    fn test_deserialize_camel_case_layout() {
        let json = r#"{
            "majorityMode": "TWO_THIRDS",
            "minQuorumPercent": 60,
            "tiesPass": true,
            "votingDurationMinutes": 30
        }"#;

        let rules: VotingRules = serde_json::from_str(json).unwrap();

        assert_eq!(rules.majority_mode, MajorityMode::TwoThirds);
        assert_eq!(rules.min_quorum_percent, 60);
        assert!(rules.ties_pass);
        assert_eq!(rules.voting_duration_minutes, 30);
    }

    #[test]
    fn test_deserialize_fills_missing_fields_with_defaults() {
        let rules: VotingRules = serde_json::from_str(r#"{ "tiesPass": true }"#).unwrap();

        assert_eq!(rules.majority_mode, MajorityMode::Simple);
        assert_eq!(rules.min_quorum_percent, 50);
        assert!(rules.ties_pass);
    }

    #[test]
    fn test_majority_mode_parse() {
        assert_eq!("two_thirds".parse(), Ok(MajorityMode::TwoThirds));
        assert_eq!("Simple".parse(), Ok(MajorityMode::Simple));
        assert!("unanimous".parse::<MajorityMode>().is_err());
    }
}
