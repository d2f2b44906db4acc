// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::START;
use crate::{CoreError, DecreeStore, MemoryBackend, PersistedState};
use decrees_audit::{HistoryEntry, HistoryError};
use decrees_domain::{
    ClosureReason, Decree, DecreeId, DecreeStatus, DomainError, SeatId, StoredDecree,
    VotingRules,
};

fn draft(id: i64) -> Decree {
    Decree::new(DecreeId::new(id), &format!("Decree {id}"), SeatId::new("seat_1")).unwrap()
}

#[test]
fn test_open_empty_backend_starts_at_one() {
    let store = DecreeStore::open(MemoryBackend::new()).unwrap();

    assert_eq!(store.next_id(), DecreeId::new(1));
    assert_eq!(store.iter().count(), 0);
}

#[test]
fn test_open_never_allocates_below_stored_ids() {
    let state: PersistedState = PersistedState {
        next_id: 2,
        decrees: vec![draft(7).to_stored()],
        history: Vec::new(),
    };

    let store = DecreeStore::open(MemoryBackend::with_state(state)).unwrap();

    assert_eq!(store.next_id(), DecreeId::new(8));
}

#[test]
fn test_open_rejects_inconsistent_record() {
    let mut stored: StoredDecree = draft(1).to_stored();
    stored.voting_closes_at = Some(START);
    let state: PersistedState = PersistedState {
        next_id: 2,
        decrees: vec![stored],
        history: Vec::new(),
    };

    let result = DecreeStore::open(MemoryBackend::with_state(state));

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InconsistentRecord { .. }))
    ));
}

#[test]
fn test_commit_writes_full_collection() {
    let mut store = DecreeStore::open(MemoryBackend::new()).unwrap();

    store.commit(draft(1), None).unwrap();
    store.commit(draft(2), None).unwrap();

    let state: &PersistedState = store.backend().state();
    assert_eq!(state.decrees.len(), 2);
    assert_eq!(state.next_id, 3);
    assert_eq!(store.next_id(), DecreeId::new(3));
}

#[test]
fn test_commit_refuses_second_history_entry() {
    let mut store = DecreeStore::open(MemoryBackend::new()).unwrap();
    let mut decree: Decree = draft(1);
    decree.transition_to(DecreeStatus::Cancelled).unwrap();
    let entry: HistoryEntry =
        HistoryEntry::capture(&decree, 0, true, START, ClosureReason::Forced, None);
    store.commit(decree.clone(), Some(entry.clone())).unwrap();

    let result = store.commit(decree, Some(entry));

    assert_eq!(
        result,
        Err(CoreError::HistoryViolation(HistoryError::DuplicateEntry(
            DecreeId::new(1)
        )))
    );
    assert_eq!(store.backend().state().history.len(), 1);
}

#[test]
fn test_failed_commit_restores_previous_decree() {
    let mut store = DecreeStore::open(MemoryBackend::new()).unwrap();
    store.commit(draft(1), None).unwrap();
    let mut changed: Decree = draft(1);
    changed.open_voting(START, &VotingRules::default()).unwrap();

    store.backend_mut().set_failing(true);
    let result = store.commit(changed, None);

    assert!(matches!(result, Err(CoreError::PersistenceFailure(_))));
    assert_eq!(store.get(DecreeId::new(1)).unwrap(), &draft(1));
}

#[test]
fn test_failed_remove_keeps_decree() {
    let mut store = DecreeStore::open(MemoryBackend::new()).unwrap();
    store.commit(draft(1), None).unwrap();

    store.backend_mut().set_failing(true);
    let result = store.remove(DecreeId::new(1));

    assert!(result.is_err());
    assert!(store.find(DecreeId::new(1)).is_some());
}

#[test]
fn test_remove_unknown_decree() {
    let mut store = DecreeStore::open(MemoryBackend::new()).unwrap();

    let result = store.remove(DecreeId::new(9));

    assert_eq!(result, Err(CoreError::DecreeNotFound(DecreeId::new(9))));
}
