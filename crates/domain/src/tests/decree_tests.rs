// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Decree, DecreeId, DecreeStatus, DomainError, SeatId, VoteChoice, VotingRules};
use time::{Duration, OffsetDateTime, macros::datetime};

const OPENED: OffsetDateTime = datetime!(2026-03-01 12:00 UTC);

fn draft() -> Decree {
    Decree::new(DecreeId::new(1), "Repair the north wall", SeatId::new("warden")).unwrap()
}

fn rules_with_duration(minutes: u32) -> VotingRules {
    VotingRules {
        voting_duration_minutes: minutes,
        ..VotingRules::default()
    }
}

fn voting(minutes: u32) -> Decree {
    let mut decree = draft();
    decree.open_voting(OPENED, &rules_with_duration(minutes)).unwrap();
    decree
}

#[test]
fn test_new_decree_is_empty_draft() {
    let decree = draft();

    assert_eq!(decree.status(), DecreeStatus::Draft);
    assert_eq!(decree.title(), "Repair the north wall");
    assert_eq!(decree.created_by(), &SeatId::new("warden"));
    assert!(decree.votes().is_empty());
    assert_eq!(decree.voting_opened_at(), None);
    assert_eq!(decree.voting_closes_at(), None);
}

#[test]
fn test_new_decree_rejects_blank_title() {
    let result = Decree::new(DecreeId::new(1), "   ", SeatId::new("warden"));

    assert!(matches!(result, Err(DomainError::InvalidTitle(_))));
}

#[test]
fn test_open_voting_fixes_deadline() {
    let decree = voting(60);

    assert_eq!(decree.status(), DecreeStatus::Voting);
    assert_eq!(decree.voting_opened_at(), Some(OPENED));
    assert_eq!(decree.voting_closes_at(), Some(OPENED + Duration::minutes(60)));
}

#[test]
fn test_open_voting_without_duration_has_no_deadline() {
    let decree = voting(0);

    assert_eq!(decree.voting_opened_at(), Some(OPENED));
    assert_eq!(decree.voting_closes_at(), None);
    assert_eq!(decree.voting_deadline(&VotingRules::default()), None);
    assert!(!decree.is_voting_expired(&VotingRules::default(), OPENED + Duration::days(365)));
}

#[test]
fn test_open_voting_twice_is_refused() {
    let mut decree = voting(60);

    let result = decree.open_voting(OPENED + Duration::minutes(5), &rules_with_duration(5));

    assert!(matches!(result, Err(DomainError::NotDraft { .. })));
    assert_eq!(decree.voting_closes_at(), Some(OPENED + Duration::minutes(60)));
}

#[test]
fn test_stored_deadline_ignores_later_rule_changes() {
    let decree = voting(60);

    let deadline = decree.voting_deadline(&rules_with_duration(5));

    assert_eq!(deadline, Some(OPENED + Duration::minutes(60)));
}

#[test]
fn test_expiry_is_inclusive_of_deadline() {
    let decree = voting(60);
    let rules = VotingRules::default();

    assert!(!decree.is_voting_expired(&rules, OPENED + Duration::minutes(59)));
    assert!(decree.is_voting_expired(&rules, OPENED + Duration::minutes(60)));
}

#[test]
fn test_vote_overwrites_previous_choice() {
    let mut decree = voting(0);
    let seat = SeatId::new("warden");

    assert_eq!(decree.record_vote(seat.clone(), VoteChoice::Yes), Ok(None));
    assert_eq!(
        decree.record_vote(seat, VoteChoice::No),
        Ok(Some(VoteChoice::Yes))
    );
    assert_eq!(decree.votes().len(), 1);
    assert_eq!(decree.tally().no, 1);
    assert_eq!(decree.tally().yes, 0);
}

#[test]
fn test_vote_outside_voting_is_refused() {
    let mut decree = draft();

    let result = decree.record_vote(SeatId::new("warden"), VoteChoice::Yes);

    assert!(matches!(result, Err(DomainError::NotVotingPhase { .. })));
    assert!(decree.votes().is_empty());
}

#[test]
fn test_terminal_decree_is_immutable() {
    let mut decree = voting(0);
    decree
        .record_vote(SeatId::new("warden"), VoteChoice::Yes)
        .unwrap();
    assert_eq!(decree.transition_to(DecreeStatus::Enacted), Ok(DecreeStatus::Voting));
    let before = decree.clone();

    assert!(decree.record_vote(SeatId::new("warden"), VoteChoice::No).is_err());
    assert!(decree.set_title("Another title").is_err());
    assert!(decree.set_description(Some(String::from("text"))).is_err());
    assert!(decree.set_category(Some(String::from("works"))).is_err());
    assert!(decree.set_expires_at(Some(OPENED)).is_err());
    assert!(decree.transition_to(DecreeStatus::Rejected).is_err());
    assert!(decree.transition_to(DecreeStatus::Enacted).is_err());

    assert_eq!(decree, before);
}

#[test]
fn test_enacted_to_voting_is_refused() {
    let mut decree = voting(0);
    decree.transition_to(DecreeStatus::Enacted).unwrap();

    let result = decree.transition_to(DecreeStatus::Voting);

    assert!(matches!(
        result,
        Err(DomainError::InvalidStatusTransition { .. })
    ));
    assert_eq!(decree.status(), DecreeStatus::Enacted);
}

#[test]
fn test_cancelled_to_draft_is_refused() {
    let mut decree = draft();
    decree.transition_to(DecreeStatus::Cancelled).unwrap();

    let result = decree.transition_to(DecreeStatus::Draft);

    assert!(matches!(
        result,
        Err(DomainError::InvalidStatusTransition { .. })
    ));
    assert_eq!(decree.status(), DecreeStatus::Cancelled);
}

#[test]
fn test_draft_cannot_reach_voting_through_transition() {
    let mut decree = draft();

    assert!(decree.transition_to(DecreeStatus::Voting).is_err());
    assert_eq!(decree.status(), DecreeStatus::Draft);
}

#[test]
fn test_edits_while_voting() {
    let mut decree = voting(0);

    decree.set_title("  Rebuild the north wall ").unwrap();
    decree.set_description(Some(String::from("Stone, not timber"))).unwrap();
    decree.set_category(Some(String::from(" Works "))).unwrap();

    assert_eq!(decree.title(), "Rebuild the north wall");
    assert_eq!(decree.description(), Some("Stone, not timber"));
    assert_eq!(decree.category(), Some("Works"));

    decree.set_category(Some(String::from("  "))).unwrap();
    assert_eq!(decree.category(), None);
}

#[test]
fn test_seats_missing_vote() {
    let mut decree = voting(0);
    decree.record_vote(SeatId::new("b"), VoteChoice::Abstain).unwrap();
    let seats = [SeatId::new("a"), SeatId::new("b"), SeatId::new("c")];

    let missing = decree.seats_missing_vote(&seats);

    assert_eq!(missing, vec![SeatId::new("a"), SeatId::new("c")]);
}

#[test]
fn test_legacy_record_falls_back_to_current_duration() {
    let mut stored = voting(0).to_stored();
    stored.voting_closes_at = None;
    let decree = Decree::restore(stored).unwrap();

    assert_eq!(
        decree.voting_deadline(&rules_with_duration(30)),
        Some(OPENED + Duration::minutes(30))
    );
    assert_eq!(decree.voting_deadline(&rules_with_duration(0)), None);
}

#[test]
fn test_restore_round_trips_stored_decree() {
    let mut decree = voting(15);
    decree.record_vote(SeatId::new("a"), VoteChoice::Yes).unwrap();

    let restored = Decree::restore(decree.to_stored()).unwrap();

    assert_eq!(restored, decree);
}

#[test]
fn test_restore_rejects_draft_with_votes() {
    let mut stored = draft().to_stored();
    stored.votes.insert(SeatId::new("a"), VoteChoice::Yes);

    let result = Decree::restore(stored);

    assert!(matches!(
        result,
        Err(DomainError::InconsistentRecord { .. })
    ));
}

#[test]
fn test_restore_rejects_voting_without_open_time() {
    let mut stored = voting(10).to_stored();
    stored.voting_opened_at = None;

    assert!(Decree::restore(stored).is_err());
}

#[test]
fn test_restore_rejects_non_positive_id() {
    let mut stored = draft().to_stored();
    stored.id = DecreeId::new(0);

    assert!(Decree::restore(stored).is_err());
}
