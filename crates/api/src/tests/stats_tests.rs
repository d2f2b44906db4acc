// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{councillor, create_draft, create_open, test_council};
use crate::{
    ApiError, CastVoteRequest, SeatStatsInfo, SeatStatsResponse, cast_vote, get_seat_stats,
    get_seat_stats_for,
};
use decrees_domain::VotingRules;

fn vote(seat: &str, choice: &str) -> CastVoteRequest {
    CastVoteRequest {
        seat_id: seat.to_string(),
        choice: choice.to_string(),
    }
}

#[test]
fn test_seat_stats_cover_every_declared_seat() {
    let mut t = test_council(VotingRules::default());
    let id = create_open(&mut t.council, "Granary");
    cast_vote(&mut t.council, id, vote("seat_1", "yes"), &councillor()).unwrap();
    cast_vote(&mut t.council, id, vote("seat_2", "abstain"), &councillor()).unwrap();
    cast_vote(&mut t.council, id, vote("seat_3", "yes"), &councillor()).unwrap();
    create_draft(&mut t.council, "Bridge tolls");

    let response: SeatStatsResponse = get_seat_stats(&t.council);

    let ids: Vec<&str> = response
        .seats
        .iter()
        .map(|seat| seat.seat_id.as_str())
        .collect();
    assert_eq!(ids, vec!["seat_1", "seat_2", "seat_3", "seat_4"]);

    let author: &SeatStatsInfo = &response.seats[0];
    assert_eq!(author.display_name, "Seat 1");
    assert_eq!(author.created_total, 2);
    assert_eq!(author.created_enacted, 1);
    assert_eq!(author.created_other, 1);
    assert_eq!(author.enacted_percent, Some(50));
    assert_eq!(author.rejected_percent, Some(0));
    assert_eq!(author.votes.yes, 1);
    assert_eq!(author.votes.cast, 1);

    assert_eq!(response.seats[1].votes.abstain, 1);
    assert_eq!(response.seats[1].enacted_percent, None);

    let vacant: &SeatStatsInfo = &response.seats[3];
    assert_eq!(vacant.created_total, 0);
    assert_eq!(vacant.votes.cast, 0);
}

#[test]
fn test_seat_stats_for_single_seat() {
    let mut t = test_council(VotingRules::default());
    create_draft(&mut t.council, "Bridge tolls");

    let stats: SeatStatsInfo = get_seat_stats_for(&t.council, "seat_1").unwrap();

    assert_eq!(stats.seat_id, "seat_1");
    assert_eq!(stats.created_total, 1);
}

#[test]
fn test_seat_stats_for_unknown_seat_fails() {
    let t = test_council(VotingRules::default());

    let result = get_seat_stats_for(&t.council, "stranger");

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Seat"
    ));
}
