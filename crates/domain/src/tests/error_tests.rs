// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DecreeId, DecreeStatus, DomainError, SeatId};

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::NotVotingPhase {
        decree_id: DecreeId::new(4),
        status: DecreeStatus::Draft,
    };
    assert_eq!(
        format!("{err}"),
        "Decree #4 is not open for voting (status: draft)"
    );

    let err: DomainError = DomainError::DecreeFinalized {
        decree_id: DecreeId::new(2),
        status: DecreeStatus::Enacted,
    };
    assert_eq!(
        format!("{err}"),
        "Decree #2 is enacted and can no longer be modified"
    );

    let err: DomainError = DomainError::SeatNotActive(SeatId::new("regent"));
    assert_eq!(
        format!("{err}"),
        "Seat 'regent' is not an active council seat"
    );

    let err: DomainError = DomainError::InvalidQuorumPercent(120);
    assert_eq!(
        format!("{err}"),
        "Invalid quorum percent: 120. Must be between 0 and 100"
    );

    let err: DomainError = DomainError::InvalidVoteChoice(String::from("maybe"));
    assert_eq!(format!("{err}"), "Invalid vote choice: 'maybe'");
}

#[test]
fn test_invalid_transition_display_names_both_statuses() {
    let err: DomainError = DecreeStatus::Cancelled
        .validate_transition(DecreeStatus::Draft)
        .unwrap_err();

    let message: String = format!("{err}");

    assert!(message.starts_with("Invalid status transition cancelled -> draft"));
}
