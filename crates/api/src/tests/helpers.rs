// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AuthenticatedActor, CreateDecreeRequest, DecreeResponse, Role, create_decree, open_decree,
};
use decrees::{Clock, Collaborators, Council, CouncilRoster, SharedRules, TracingNotifier};
use decrees_domain::{Seat, VotingRules};
use decrees_persistence::Persistence;
use std::sync::{Arc, Mutex};
use time::{Duration, OffsetDateTime, macros::datetime};

pub const START: OffsetDateTime = datetime!(2026-04-01 09:00 UTC);

pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap()
    }
}

pub struct TestCouncil {
    pub council: Council<Persistence>,
    pub clock: Arc<ManualClock>,
}

/// Three occupied seats `seat_1`..`seat_3` and a vacant `seat_4`.
pub fn test_council(rules: VotingRules) -> TestCouncil {
    let mut seats: Vec<Seat> = (1..=3)
        .map(|n| Seat::new(&format!("seat_{n}"), &format!("Seat {n}"), Some("holder")))
        .collect();
    seats.push(Seat::new("seat_4", "Seat 4", None));

    let clock = Arc::new(ManualClock {
        now: Mutex::new(START),
    });
    let collaborators = Collaborators {
        roster: Arc::new(CouncilRoster::new(seats)),
        rules: Arc::new(SharedRules::new(rules)),
        clock: clock.clone(),
        notifier: Arc::new(TracingNotifier),
    };
    let persistence = Persistence::new_in_memory().unwrap();
    TestCouncil {
        council: Council::new(persistence, collaborators).unwrap(),
        clock,
    }
}

pub fn admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("clerk"), Role::Admin)
}

pub fn councillor() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("ana"), Role::Councillor)
}

pub fn create_request(title: &str, author: &str) -> CreateDecreeRequest {
    CreateDecreeRequest {
        title: title.to_string(),
        author_seat: author.to_string(),
        description: None,
        category: None,
    }
}

pub fn create_draft(council: &mut Council<Persistence>, title: &str) -> i64 {
    let response: DecreeResponse =
        create_decree(council, create_request(title, "seat_1"), &councillor()).unwrap();
    response.decree.decree_id
}

pub fn create_open(council: &mut Council<Persistence>, title: &str) -> i64 {
    let id = create_draft(council, title);
    open_decree(council, id, &councillor()).unwrap();
    id
}
