// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Writes the decree collection, id counter, and history.
//!
//! Callers run [`write_store`] inside a transaction so that the whole
//! store write commits or rolls back as one.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use ::decrees::StoreWrite;
use decrees_audit::HistoryEntry;
use decrees_domain::StoredDecree;

use crate::data_models::{ActorData, to_column_count, to_unix_nanos};
use crate::diesel_schema::{decree_history, decree_votes, decrees, store_meta};
use crate::error::PersistenceError;
use crate::queries::NEXT_ID_KEY;

/// Replaces the stored decree collection and appends the optional history entry.
///
/// # Errors
///
/// Returns an error if any statement fails. The caller's transaction must
/// then be rolled back.
pub fn write_store(
    conn: &mut SqliteConnection,
    write: StoreWrite<'_>,
) -> Result<(), PersistenceError> {
    diesel::delete(decree_votes::table).execute(conn)?;
    diesel::delete(decrees::table).execute(conn)?;

    for decree in write.decrees {
        insert_decree(conn, decree)?;
    }

    diesel::replace_into(store_meta::table)
        .values((
            store_meta::meta_key.eq(NEXT_ID_KEY),
            store_meta::meta_value.eq(write.next_id),
        ))
        .execute(conn)?;

    if let Some(entry) = write.history_entry {
        insert_history_entry(conn, entry)?;
    }

    debug!(
        decrees = write.decrees.len(),
        next_id = write.next_id,
        history = write.history_entry.is_some(),
        "Wrote decree store"
    );
    Ok(())
}

fn insert_decree(conn: &mut SqliteConnection, decree: &StoredDecree) -> Result<(), PersistenceError> {
    let decree_id: i64 = decree.id.value();

    diesel::insert_into(decrees::table)
        .values((
            decrees::decree_id.eq(decree_id),
            decrees::status.eq(decree.status.as_str()),
            decrees::title.eq(&decree.title),
            decrees::description.eq(decree.description.as_deref()),
            decrees::category.eq(decree.category.as_deref()),
            decrees::created_by_seat.eq(decree.created_by.value()),
            decrees::voting_opened_at.eq(decree.voting_opened_at.map(to_unix_nanos).transpose()?),
            decrees::voting_closes_at.eq(decree.voting_closes_at.map(to_unix_nanos).transpose()?),
            decrees::expires_at.eq(decree.expires_at.map(to_unix_nanos).transpose()?),
        ))
        .execute(conn)?;

    for (seat, choice) in &decree.votes {
        diesel::insert_into(decree_votes::table)
            .values((
                decree_votes::decree_id.eq(decree_id),
                decree_votes::seat_id.eq(seat.value()),
                decree_votes::choice.eq(choice.as_str()),
            ))
            .execute(conn)?;
    }
    Ok(())
}

fn insert_history_entry(
    conn: &mut SqliteConnection,
    entry: &HistoryEntry,
) -> Result<(), PersistenceError> {
    let closed_by_json: Option<String> = entry
        .closed_by
        .as_ref()
        .map(|actor| serde_json::to_string(&ActorData::from(actor)))
        .transpose()?;

    diesel::insert_into(decree_history::table)
        .values((
            decree_history::decree_id.eq(entry.decree_id.value()),
            decree_history::final_status.eq(entry.final_status.as_str()),
            decree_history::title.eq(&entry.title),
            decree_history::votes_yes.eq(to_column_count(entry.tally.yes)?),
            decree_history::votes_no.eq(to_column_count(entry.tally.no)?),
            decree_history::votes_abstain.eq(to_column_count(entry.tally.abstain)?),
            decree_history::total_votes.eq(to_column_count(entry.total_votes)?),
            decree_history::quorum_required.eq(to_column_count(entry.quorum_required)?),
            decree_history::quorum_met.eq(i32::from(entry.quorum_met)),
            decree_history::closed_at.eq(to_unix_nanos(entry.closed_at)?),
            decree_history::reason.eq(entry.reason.as_str()),
            decree_history::closed_by_json.eq(closed_by_json),
        ))
        .execute(conn)?;

    debug!(decree_id = entry.decree_id.value(), "Appended decree history");
    Ok(())
}
