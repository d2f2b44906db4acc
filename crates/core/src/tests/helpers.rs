// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Clock, Collaborators, Council, CouncilRoster, MemoryBackend, Notification, NotificationSink,
    SharedRules,
};
use decrees_domain::{Seat, SeatId, VotingRules};
use std::sync::{Arc, Mutex};
use time::{Duration, OffsetDateTime, macros::datetime};

pub const START: OffsetDateTime = datetime!(2026-04-01 09:00 UTC);

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(start),
        })
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap()
    }
}

/// Keeps every notification it receives.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: &Notification) {
        self.events.lock().unwrap().push(notification.clone());
    }
}

pub struct Harness {
    pub council: Council<MemoryBackend>,
    pub clock: Arc<ManualClock>,
    pub sink: Arc<RecordingSink>,
    pub rules: SharedRules,
    pub roster: CouncilRoster,
}

impl Harness {
    /// Rebuilds the engine from whatever the backend last stored.
    pub fn reload(&self) -> Council<MemoryBackend> {
        Council::new(self.council.backend().clone(), self.collaborators()).unwrap()
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            roster: Arc::new(self.roster.clone()),
            rules: Arc::new(self.rules.clone()),
            clock: self.clock.clone(),
            notifier: self.sink.clone(),
        }
    }
}

pub fn seat(n: usize) -> SeatId {
    SeatId::new(&format!("seat_{n}"))
}

pub fn occupied_seats(count: usize) -> Vec<Seat> {
    (1..=count)
        .map(|n| {
            Seat::new(
                &format!("seat_{n}"),
                &format!("Seat {n}"),
                Some(&format!("holder_{n}")),
            )
        })
        .collect()
}

pub fn rules(min_quorum_percent: u8, voting_duration_minutes: u32) -> VotingRules {
    VotingRules {
        min_quorum_percent,
        voting_duration_minutes,
        ..VotingRules::default()
    }
}

pub fn harness(seat_count: usize, voting_rules: VotingRules) -> Harness {
    harness_with_backend(MemoryBackend::new(), seat_count, voting_rules)
}

pub fn harness_with_backend(
    backend: MemoryBackend,
    seat_count: usize,
    voting_rules: VotingRules,
) -> Harness {
    let clock: Arc<ManualClock> = ManualClock::new(START);
    let sink: Arc<RecordingSink> = Arc::new(RecordingSink::default());
    let shared_rules: SharedRules = SharedRules::new(voting_rules);
    let roster: CouncilRoster = CouncilRoster::new(occupied_seats(seat_count));
    let collaborators: Collaborators = Collaborators {
        roster: Arc::new(roster.clone()),
        rules: Arc::new(shared_rules.clone()),
        clock: clock.clone(),
        notifier: sink.clone(),
    };

    Harness {
        council: Council::new(backend, collaborators).unwrap(),
        clock,
        sink,
        rules: shared_rules,
        roster,
    }
}
