// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Background task running the periodic expiry sweep.

use decrees::{Council, DecreeBackend, SweepReport};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Spawns a task that sweeps every `period` until aborted.
///
/// The engine lock is held only for the sweep itself. Ticks missed while a
/// sweep runs long are delayed rather than bunched up.
pub fn spawn_sweep_task<B>(council: Arc<Mutex<Council<B>>>, period: Duration) -> JoinHandle<()>
where
    B: DecreeBackend + Send + 'static,
{
    info!(period_secs = period.as_secs_f64(), "Starting periodic sweep");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let report: SweepReport = council.lock().await.sweep();
            log_report(&report);
        }
    })
}

fn log_report(report: &SweepReport) {
    for (decree_id, status) in &report.finalized {
        info!(decree_id = %decree_id, status = %status, "Sweep finalized decree");
    }
    for (decree_id, err) in &report.failures {
        warn!(decree_id = %decree_id, error = %err, "Sweep left decree open after a failed write");
    }
    if report.finalized.is_empty() && report.failures.is_empty() {
        debug!(examined = report.examined, "Sweep found nothing to finalize");
    }
}
