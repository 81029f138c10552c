//! Recurring trigger for the check cycle.
//!
//! - First run after `initial_delay`, then every `interval`
//! - Each cycle is awaited before the next tick, so scheduled runs never overlap
//! - Missed ticks are delayed rather than bursted (`MissedTickBehavior::Delay`)

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::cycle::{CheckCycle, CycleOutcome};

#[derive(Clone)]
pub struct CycleScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    cycle: CheckCycle,
    initial_delay: Duration,
    interval: Duration,
    state: tokio::sync::Mutex<SchedulerState>,
}

#[derive(Default)]
struct SchedulerState {
    task: Option<JoinHandle<()>>,
    cancel: Option<CancellationToken>,
}

impl CycleScheduler {
    pub fn new(cycle: CheckCycle, initial_delay: Duration, interval: Duration) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                cycle,
                initial_delay,
                interval,
                state: tokio::sync::Mutex::new(SchedulerState::default()),
            }),
        }
    }

    /// Spawn the timer task. Calling it again while running is a no-op.
    pub async fn start(&self) {
        let mut st = self.inner.state.lock().await;
        if st.task.is_some() {
            return;
        }

        let tok = CancellationToken::new();
        st.cancel = Some(tok.clone());

        let scheduler = self.clone();
        st.task = Some(tokio::spawn(async move {
            scheduler.run_loop(tok).await;
        }));

        info!(
            initial_delay_secs = self.inner.initial_delay.as_secs(),
            interval_secs = self.inner.interval.as_secs(),
            "scheduler started"
        );
    }

    pub async fn stop(&self) {
        let mut st = self.inner.state.lock().await;
        if let Some(tok) = st.cancel.take() {
            tok.cancel();
        }
        if let Some(task) = st.task.take() {
            // Let an in-flight cycle observe cancellation at its next await.
            let _ = task.await;
        }
    }

    pub async fn is_running(&self) -> bool {
        self.inner.state.lock().await.task.is_some()
    }

    async fn run_loop(&self, cancel: CancellationToken) {
        let first = Instant::now() + self.inner.initial_delay;
        let mut ticker = interval_at(first, self.inner.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
              _ = cancel.cancelled() => break,
              _ = ticker.tick() => {
                tokio::select! {
                  _ = cancel.cancelled() => break,
                  res = self.tick() => {
                    if let Err(e) = res {
                      error!("scheduled check cycle failed: {e}");
                    }
                  }
                }
              }
            }
        }
        info!("scheduler stopped");
    }

    /// One scheduled run: reports to the stored target chat.
    pub async fn tick(&self) -> crate::Result<CycleOutcome> {
        info!("running scheduled domain check");
        self.inner.cycle.run(None).await
    }
}
