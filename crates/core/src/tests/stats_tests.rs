// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{Harness, harness, rules, seat};
use crate::SeatStats;
use decrees_domain::{DecreeId, Seat, SeatId, Tally, VoteChoice};

fn open_by(h: &mut Harness, author: usize, title: &str) -> DecreeId {
    let id: DecreeId = h.council.create_decree(title, &seat(author)).unwrap().id();
    h.council.open_for_voting(id).unwrap();
    id
}

/// Seat 1 authors one enacted, one rejected and one open decree; seat 2
/// authors a draft and abstains on the open decree.
fn busy_council() -> Harness {
    let mut h = harness(2, rules(50, 0));

    let enacted: DecreeId = open_by(&mut h, 1, "Enacted");
    h.council.cast_vote(enacted, &seat(1), VoteChoice::Yes).unwrap();
    h.council.cast_vote(enacted, &seat(2), VoteChoice::Yes).unwrap();

    let rejected: DecreeId = open_by(&mut h, 1, "Rejected");
    h.council.cast_vote(rejected, &seat(1), VoteChoice::No).unwrap();
    h.council.cast_vote(rejected, &seat(2), VoteChoice::No).unwrap();

    h.council.create_decree("Draft", &seat(2)).unwrap();

    let open: DecreeId = open_by(&mut h, 1, "Open");
    h.council.cast_vote(open, &seat(2), VoteChoice::Abstain).unwrap();
    h
}

#[test]
fn test_seat_stats_counts_authoring_and_votes() {
    let h = busy_council();

    let stats: Vec<SeatStats> = h.council.seat_stats();

    assert_eq!(stats.len(), 2);
    let first: &SeatStats = &stats[0];
    assert_eq!(first.seat_id, seat(1));
    assert_eq!(first.display_name, "Seat 1");
    assert_eq!(first.created_total, 3);
    assert_eq!(first.created_enacted, 1);
    assert_eq!(first.created_rejected, 1);
    assert_eq!(first.created_other, 1);
    assert_eq!(
        first.votes,
        Tally {
            yes: 1,
            no: 1,
            abstain: 0
        }
    );
    assert_eq!(first.enacted_percent(), Some(33));
    assert_eq!(first.rejected_percent(), Some(33));

    let second: &SeatStats = &stats[1];
    assert_eq!(second.created_total, 1);
    assert_eq!(second.created_other, 1);
    assert_eq!(
        second.votes,
        Tally {
            yes: 1,
            no: 1,
            abstain: 1
        }
    );
    assert_eq!(second.enacted_percent(), Some(0));
}

#[test]
fn test_seat_stats_lists_undeclared_seats_after_declared() {
    let h = busy_council();
    h.roster.replace(vec![
        Seat::new("seat_2", "Seat 2", Some("holder_2")),
        Seat::new("seat_3", "Seat 3", None),
    ]);

    let stats: Vec<SeatStats> = h.council.seat_stats();

    let order: Vec<&str> = stats.iter().map(|entry| entry.seat_id.value()).collect();
    assert_eq!(order, vec!["seat_2", "seat_3", "seat_1"]);
    assert_eq!(stats[1].created_total, 0);
    assert_eq!(stats[1].votes, Tally::default());
    assert_eq!(stats[1].enacted_percent(), None);
    assert_eq!(stats[2].display_name, "seat_1");
    assert_eq!(stats[2].created_total, 3);
}

#[test]
fn test_seat_stats_for_one_seat() {
    let h = busy_council();

    let found: Option<SeatStats> = h.council.seat_stats_for(&seat(2));
    let missing: Option<SeatStats> = h.council.seat_stats_for(&SeatId::new("stranger"));

    assert_eq!(found.map(|entry| entry.created_total), Some(1));
    assert!(missing.is_none());
}

#[test]
fn test_seat_stats_on_empty_council() {
    let h = harness(3, rules(50, 0));

    let stats: Vec<SeatStats> = h.council.seat_stats();

    assert_eq!(stats.len(), 3);
    assert!(stats.iter().all(|entry| entry.created_total == 0));
    assert!(stats.iter().all(|entry| entry.rejected_percent().is_none()));
}
