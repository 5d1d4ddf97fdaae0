use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use certgen_logging::certgen_trace;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Spawns timer-driven work onto a runtime.
///
/// Every task is a child of one root token, so [`Scheduler::cancel_all`] tears
/// down repeating and pending one-shot tasks together. Once cancelled, tasks
/// scheduled later never run.
#[derive(Debug, Clone)]
pub struct Scheduler {
    handle: Handle,
    root: CancellationToken,
}

impl Scheduler {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            root: CancellationToken::new(),
        }
    }

    /// Runs `tick` every `period`, first after one full period.
    ///
    /// Each tick's future is spawned on its own so a slow tick never delays
    /// the next one.
    pub fn every<F, Fut>(&self, period: Duration, mut tick: F) -> ScheduledTask
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = self.root.child_token();
        let guard = token.clone();
        let handle = self.handle.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = guard.cancelled() => break,
                    _ = interval.tick() => {
                        certgen_trace!("Scheduled tick every {:?}", period);
                        let work = tick();
                        let guard = guard.clone();
                        tokio::spawn(async move {
                            tokio::select! {
                                _ = guard.cancelled() => {}
                                _ = work => {}
                            }
                        });
                    }
                }
            }
        });
        ScheduledTask { token, handle }
    }

    /// Runs `work` once after `delay` unless cancelled first.
    pub fn once<Fut>(&self, delay: Duration, work: Fut) -> ScheduledTask
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = self.root.child_token();
        let guard = token.clone();
        let handle = self.handle.spawn(async move {
            tokio::select! {
                _ = guard.cancelled() => certgen_trace!("One-shot task cancelled"),
                _ = tokio::time::sleep(delay) => work.await,
            }
        });
        ScheduledTask { token, handle }
    }

    pub fn cancel_all(&self) {
        self.root.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.root.is_cancelled()
    }
}

/// Handle to work started by a [`Scheduler`]. Dropping it does not cancel.
#[derive(Debug)]
pub struct ScheduledTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the task to stop. Repeating tasks stop only when cancelled.
    pub async fn join(self) {
        let _ = self.handle.await;
    }
}
