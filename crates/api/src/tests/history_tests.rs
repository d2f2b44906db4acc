// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{admin, create_draft, create_open, test_council};
use crate::{
    ApiError, ForceStatusRequest, HistoryRequest, force_status, get_history,
};
use decrees_domain::VotingRules;
use time::Duration;

fn cancel(t: &mut super::helpers::TestCouncil, id: i64) {
    force_status(
        &mut t.council,
        id,
        ForceStatusRequest {
            status: String::from("cancelled"),
        },
        &admin(),
    )
    .unwrap();
}

#[test]
fn test_empty_history_is_page_one_of_zero() {
    let t = test_council(VotingRules::default());

    let page = get_history(&t.council, &HistoryRequest::default()).unwrap();

    assert!(page.entries.is_empty());
    assert_eq!(page.page, 1);
    assert_eq!(page.total_pages, 0);
    assert_eq!(page.total_entries, 0);
}

#[test]
fn test_forced_closure_is_recorded_with_actor() {
    let mut t = test_council(VotingRules::default());
    let id = create_open(&mut t.council, "Watchtower");
    t.clock.advance(Duration::minutes(5));
    cancel(&mut t, id);

    let page = get_history(&t.council, &HistoryRequest::default()).unwrap();

    assert_eq!(page.total_entries, 1);
    let entry = &page.entries[0];
    assert_eq!(entry.decree_id, id);
    assert_eq!(entry.final_status, "cancelled");
    assert_eq!(entry.reason, "forced");
    assert_eq!(entry.closed_at, "2026-04-01T09:05:00Z");
    let closed_by = entry.closed_by.as_ref().unwrap();
    assert_eq!(closed_by.id, "clerk");
    assert_eq!(closed_by.actor_type, "admin");
}

#[test]
fn test_history_pages_hold_seven_entries() {
    let mut t = test_council(VotingRules::default());
    for n in 0..9 {
        let id = create_draft(&mut t.council, &format!("Decree {n}"));
        t.clock.advance(Duration::minutes(1));
        cancel(&mut t, id);
    }

    let first = get_history(&t.council, &HistoryRequest::default()).unwrap();
    let second = get_history(
        &t.council,
        &HistoryRequest {
            page: Some(2),
            order: None,
        },
    )
    .unwrap();

    assert_eq!(first.total_pages, 2);
    assert_eq!(first.entries.len(), 7);
    assert_eq!(first.entries[0].decree_id, 9);
    assert_eq!(second.entries.len(), 2);
    assert_eq!(second.entries[1].decree_id, 1);
}

#[test]
fn test_history_page_is_clamped_and_order_respected() {
    let mut t = test_council(VotingRules::default());
    for n in 0..3 {
        let id = create_draft(&mut t.council, &format!("Decree {n}"));
        t.clock.advance(Duration::minutes(1));
        cancel(&mut t, id);
    }

    let page = get_history(
        &t.council,
        &HistoryRequest {
            page: Some(40),
            order: Some(String::from("oldest")),
        },
    )
    .unwrap();

    assert_eq!(page.page, 1);
    let ids: Vec<i64> = page.entries.iter().map(|e| e.decree_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_history_rejects_unknown_order() {
    let t = test_council(VotingRules::default());
    let request = HistoryRequest {
        page: None,
        order: Some(String::from("sideways")),
    };

    let result = get_history(&t.council, &request);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "order"
    ));
}
