use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval, sleep};
use tracing::{debug, info, warn};

use crate::shutdown::ShutdownSender;

use super::profile::{LoadProfile, ProfilePoint};

/// Work executed by one virtual worker per loop iteration.
#[async_trait]
pub trait WorkerTask: Send + Sync {
    async fn iterate(&self, worker_id: usize);
}

#[derive(Debug, Clone, Copy)]
pub struct DriverSettings {
    /// How often the worker level is recomputed.
    pub tick_interval: Duration,
    /// Pause between iterations of a single worker.
    pub think_time: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverReport {
    pub iterations: u64,
    pub peak_workers: usize,
    pub elapsed: Duration,
    pub interrupted: bool,
}

#[derive(Default)]
struct WorkerCounters {
    iterations: AtomicU64,
    active: AtomicUsize,
    peak: AtomicUsize,
}

struct ActiveGuard<'counters> {
    counters: &'counters WorkerCounters,
}

impl<'counters> ActiveGuard<'counters> {
    fn acquire(counters: &'counters WorkerCounters) -> Self {
        let now_active = counters.active.fetch_add(1, Ordering::Relaxed).saturating_add(1);
        counters.peak.fetch_max(now_active, Ordering::Relaxed);
        Self { counters }
    }
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.counters.active.fetch_sub(1, Ordering::Relaxed);
    }
}

pub struct LoadDriver {
    profile: LoadProfile,
    settings: DriverSettings,
}

impl LoadDriver {
    #[must_use]
    pub const fn new(profile: LoadProfile, settings: DriverSettings) -> Self {
        Self { profile, settings }
    }

    /// Drives workers through the profile until it finishes or shutdown is
    /// signalled, then waits for in-flight iterations to complete.
    pub async fn run<W>(&self, task: Arc<W>, shutdown_tx: &ShutdownSender) -> DriverReport
    where
        W: WorkerTask + 'static,
    {
        let run_start = Instant::now();
        if self.profile.is_empty() {
            info!("Load profile has no stages; nothing to run.");
            return DriverReport::default();
        }

        let stage_count = self.profile.stages().len();
        let counters = Arc::new(WorkerCounters::default());
        let (level_tx, level_rx) = watch::channel(0usize);
        let mut slots: Vec<Option<JoinHandle<()>>> = Vec::new();
        let mut shutdown_rx = shutdown_tx.subscribe();
        let mut tick = interval(self.settings.tick_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut current_stage: Option<usize> = None;
        let mut interrupted = false;

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    interrupted = true;
                    break;
                }
                _ = tick.tick() => {
                    let elapsed = run_start.elapsed();
                    let target = match self.profile.target_at(elapsed) {
                        ProfilePoint::Active(target) => target,
                        ProfilePoint::Finished => break,
                    };

                    let stage_idx = self.profile.stage_index_at(elapsed);
                    if stage_idx != current_stage {
                        if let Some(idx) = stage_idx
                            && let Some(stage) = self.profile.stages().get(idx)
                        {
                            info!(
                                "Stage {}/{}: ramping to {} workers over {:?}",
                                idx.saturating_add(1),
                                stage_count,
                                stage.target,
                                stage.duration
                            );
                        }
                        current_stage = stage_idx;
                    }

                    let level = usize::try_from(target).unwrap_or(usize::MAX);
                    level_tx.send_replace(level);
                    fill_slots(&mut slots, level, &task, &level_rx, &counters, self.settings.think_time);
                }
            }
        }

        if interrupted {
            warn!("Shutdown requested; stopping workers after in-flight probes.");
        } else {
            info!("Load profile complete; waiting for in-flight iterations.");
        }
        level_tx.send_replace(0);
        drop(level_rx);

        for handle in slots.into_iter().flatten() {
            if let Err(err) = handle.await {
                warn!("Worker task failed: {}", err);
            }
        }

        DriverReport {
            iterations: counters.iterations.load(Ordering::Relaxed),
            peak_workers: counters.peak.load(Ordering::Relaxed),
            elapsed: run_start.elapsed(),
            interrupted,
        }
    }
}

fn fill_slots<W>(
    slots: &mut Vec<Option<JoinHandle<()>>>,
    level: usize,
    task: &Arc<W>,
    level_rx: &watch::Receiver<usize>,
    counters: &Arc<WorkerCounters>,
    think_time: Duration,
) where
    W: WorkerTask + 'static,
{
    if slots.len() < level {
        slots.resize_with(level, || None);
    }
    for (worker_id, slot) in slots.iter_mut().enumerate().take(level) {
        let alive = slot.as_ref().is_some_and(|handle| !handle.is_finished());
        if alive {
            continue;
        }
        debug!("Spawning worker {}", worker_id);
        *slot = Some(tokio::spawn(worker_loop(
            worker_id,
            Arc::clone(task),
            level_rx.clone(),
            Arc::clone(counters),
            think_time,
        )));
    }
}

async fn worker_loop<W>(
    worker_id: usize,
    task: Arc<W>,
    mut level_rx: watch::Receiver<usize>,
    counters: Arc<WorkerCounters>,
    think_time: Duration,
) where
    W: WorkerTask + 'static,
{
    let _active = ActiveGuard::acquire(&counters);
    loop {
        if *level_rx.borrow_and_update() <= worker_id {
            break;
        }

        task.iterate(worker_id).await;
        counters.iterations.fetch_add(1, Ordering::Relaxed);

        if think_time.is_zero() {
            tokio::task::yield_now().await;
            continue;
        }
        tokio::select! {
            () = sleep(think_time) => {}
            () = retired(&mut level_rx, worker_id) => break,
        }
    }
    debug!("Worker {} retired", worker_id);
}

async fn retired(level_rx: &mut watch::Receiver<usize>, worker_id: usize) {
    loop {
        if *level_rx.borrow_and_update() <= worker_id {
            return;
        }
        if level_rx.changed().await.is_err() {
            return;
        }
    }
}
