// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reads the stored decree collection, history, and id counter.

use diesel::prelude::*;
use diesel::SqliteConnection;
use std::collections::BTreeMap;
use tracing::debug;

use ::decrees::PersistedState;
use decrees_audit::{Actor, HistoryEntry};
use decrees_domain::{DecreeId, SeatId, StoredDecree, Tally, VoteChoice};

use crate::data_models::{
    ActorData, DecreeRow, HistoryRow, VoteRow, from_column_count, from_unix_nanos,
};
use crate::diesel_schema::{decree_history, decree_votes, decrees, store_meta};
use crate::error::PersistenceError;

/// `store_meta` key holding the next decree id.
pub const NEXT_ID_KEY: &str = "next_decree_id";

/// Loads everything the decree store needs on startup.
///
/// # Errors
///
/// Returns an error if a query fails or a stored row cannot be reconstructed.
pub fn load_state(conn: &mut SqliteConnection) -> Result<PersistedState, PersistenceError> {
    let rows: Vec<DecreeRow> = decrees::table
        .order(decrees::decree_id.asc())
        .select((
            decrees::decree_id,
            decrees::status,
            decrees::title,
            decrees::description,
            decrees::category,
            decrees::created_by_seat,
            decrees::voting_opened_at,
            decrees::voting_closes_at,
            decrees::expires_at,
        ))
        .load::<DecreeRow>(conn)?;

    let vote_rows: Vec<VoteRow> = decree_votes::table
        .select((
            decree_votes::decree_id,
            decree_votes::seat_id,
            decree_votes::choice,
        ))
        .load::<VoteRow>(conn)?;

    let mut votes_by_decree: BTreeMap<i64, BTreeMap<SeatId, VoteChoice>> = BTreeMap::new();
    for (decree_id, seat_id, choice) in vote_rows {
        votes_by_decree
            .entry(decree_id)
            .or_default()
            .insert(SeatId::new(&seat_id), choice.parse::<VoteChoice>()?);
    }

    let mut stored: Vec<StoredDecree> = Vec::with_capacity(rows.len());
    for row in rows {
        let votes: BTreeMap<SeatId, VoteChoice> =
            votes_by_decree.remove(&row.0).unwrap_or_default();
        stored.push(decree_from_row(row, votes)?);
    }

    let history_rows: Vec<HistoryRow> = decree_history::table
        .order(decree_history::history_id.asc())
        .select((
            decree_history::decree_id,
            decree_history::final_status,
            decree_history::title,
            decree_history::votes_yes,
            decree_history::votes_no,
            decree_history::votes_abstain,
            decree_history::total_votes,
            decree_history::quorum_required,
            decree_history::quorum_met,
            decree_history::closed_at,
            decree_history::reason,
            decree_history::closed_by_json,
        ))
        .load::<HistoryRow>(conn)?;
    let history: Vec<HistoryEntry> = history_rows
        .into_iter()
        .map(history_from_row)
        .collect::<Result<Vec<HistoryEntry>, PersistenceError>>()?;

    let next_id: i64 = store_meta::table
        .filter(store_meta::meta_key.eq(NEXT_ID_KEY))
        .select(store_meta::meta_value)
        .first::<i64>(conn)
        .optional()?
        .unwrap_or(1);

    debug!(
        decrees = stored.len(),
        history = history.len(),
        next_id,
        "Loaded decree store"
    );

    Ok(PersistedState {
        next_id,
        decrees: stored,
        history,
    })
}

fn decree_from_row(
    row: DecreeRow,
    votes: BTreeMap<SeatId, VoteChoice>,
) -> Result<StoredDecree, PersistenceError> {
    let (
        decree_id,
        status,
        title,
        description,
        category,
        created_by_seat,
        voting_opened_at,
        voting_closes_at,
        expires_at,
    ) = row;

    Ok(StoredDecree {
        id: DecreeId::new(decree_id),
        status: status.parse()?,
        title,
        description,
        category,
        created_by: SeatId::new(&created_by_seat),
        voting_opened_at: voting_opened_at.map(from_unix_nanos).transpose()?,
        voting_closes_at: voting_closes_at.map(from_unix_nanos).transpose()?,
        expires_at: expires_at.map(from_unix_nanos).transpose()?,
        votes,
    })
}

fn history_from_row(row: HistoryRow) -> Result<HistoryEntry, PersistenceError> {
    let (
        decree_id,
        final_status,
        title,
        votes_yes,
        votes_no,
        votes_abstain,
        total_votes,
        quorum_required,
        quorum_met,
        closed_at,
        reason,
        closed_by_json,
    ) = row;

    let closed_by: Option<Actor> = closed_by_json
        .map(|json| serde_json::from_str::<ActorData>(&json).map(Actor::from))
        .transpose()?;

    Ok(HistoryEntry {
        decree_id: DecreeId::new(decree_id),
        final_status: final_status.parse()?,
        title,
        tally: Tally {
            yes: from_column_count(votes_yes)?,
            no: from_column_count(votes_no)?,
            abstain: from_column_count(votes_abstain)?,
        },
        total_votes: from_column_count(total_votes)?,
        quorum_required: from_column_count(quorum_required)?,
        quorum_met: quorum_met != 0,
        closed_at: from_unix_nanos(closed_at)?,
        reason: reason.parse()?,
        closed_by,
    })
}
