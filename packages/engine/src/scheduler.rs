//! Scheduled recomputation loop.
//!
//! Pattern classification and alert synthesis run on a fixed cadence, not
//! per request. A cycle that overruns its timeout is abandoned with a
//! warning; the cache keeps serving the last good statuses and the next
//! tick simply tries again.

use std::time::{Duration, Instant};

use chrono::Utc;

use crate::SurveillanceEngine;

/// Runs the analysis loop until the surrounding task is dropped.
///
/// Spawn it alongside the serving path:
///
/// ```ignore
/// tokio::spawn(scheduler::run_analysis_loop(
///     engine.clone(),
///     Duration::from_secs(15 * 60),
///     Duration::from_secs(60),
/// ));
/// ```
pub async fn run_analysis_loop(
    engine: SurveillanceEngine,
    period: Duration,
    cycle_timeout: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        run_cycle(&engine, cycle_timeout).await;
    }
}

/// Runs a single recomputation cycle with a timeout.
pub async fn run_cycle(engine: &SurveillanceEngine, cycle_timeout: Duration) {
    let started = Instant::now();
    let as_of = Utc::now().date_naive();

    match tokio::time::timeout(cycle_timeout, engine.recompute_all(as_of)).await {
        Ok(published) => {
            log::info!(
                "Analysis cycle published {published} district statuses in {:?}",
                started.elapsed()
            );
        }
        Err(_) => {
            log::warn!(
                "Analysis cycle timed out after {cycle_timeout:?}; keeping previous statuses"
            );
        }
    }
}
