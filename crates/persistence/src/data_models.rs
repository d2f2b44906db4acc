// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use decrees_audit::Actor;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

impl From<&Actor> for ActorData {
    fn from(actor: &Actor) -> Self {
        Self {
            id: actor.id.clone(),
            actor_type: actor.actor_type.clone(),
        }
    }
}

impl From<ActorData> for Actor {
    fn from(data: ActorData) -> Self {
        Self::new(data.id, data.actor_type)
    }
}

/// Row type for `decrees`.
pub type DecreeRow = (
    i64,
    String,
    String,
    Option<String>,
    Option<String>,
    String,
    Option<i64>,
    Option<i64>,
    Option<i64>,
);

/// Row type for `decree_votes`.
pub type VoteRow = (i64, String, String);

/// Row type for `decree_history`, without the surrogate key.
pub type HistoryRow = (
    i64,
    String,
    String,
    i32,
    i32,
    i32,
    i32,
    i32,
    i32,
    i64,
    String,
    Option<String>,
);

/// Converts a timestamp to Unix nanoseconds.
///
/// Full precision is kept so a reloaded deadline compares exactly like the
/// one held in memory.
///
/// # Errors
///
/// Returns an error if the timestamp falls outside the range of 64-bit
/// nanoseconds (years 1677 to 2262).
pub fn to_unix_nanos(value: OffsetDateTime) -> Result<i64, PersistenceError> {
    i64::try_from(value.unix_timestamp_nanos())
        .map_err(|_| PersistenceError::ValueOutOfRange(format!("timestamp {value}")))
}

/// Converts Unix nanoseconds back to a UTC timestamp.
///
/// # Errors
///
/// Returns an error if the value is outside the supported date range.
pub fn from_unix_nanos(nanos: i64) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(nanos))
        .map_err(|e| PersistenceError::ReconstructionError(format!("timestamp {nanos}: {e}")))
}

/// Converts a count to an `INTEGER` column value.
///
/// # Errors
///
/// Returns an error if the count exceeds `i32::MAX`.
pub fn to_column_count(value: u32) -> Result<i32, PersistenceError> {
    i32::try_from(value).map_err(|_| PersistenceError::ValueOutOfRange(format!("count {value}")))
}

/// Converts an `INTEGER` column value back to a count.
///
/// # Errors
///
/// Returns an error if the stored value is negative.
pub fn from_column_count(value: i32) -> Result<u32, PersistenceError> {
    u32::try_from(value)
        .map_err(|_| PersistenceError::ReconstructionError(format!("negative count {value}")))
}
