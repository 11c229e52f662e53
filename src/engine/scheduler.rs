use {
    crate::engine::ScanCoordinator,
    std::{sync::Arc, time::Duration},
    tokio::{
        sync::watch,
        task::JoinHandle,
        time::{MissedTickBehavior, interval},
    },
};

/// Running timer loop. Dropping it without `shutdown` leaves the loop running.
pub struct SchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stops new ticks. A pass already spawned finishes on its own.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            log::error!("Scheduler task ended abnormally: {}", e);
        }
    }
}

/// Spawns a pass on every tick, the first one immediately. Ticks that land while a pass is
/// still running are dropped by the coordinator's guard.
pub fn start_scheduler(coordinator: Arc<ScanCoordinator>, every: Duration) -> SchedulerHandle {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = interval(every.max(Duration::from_secs(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        log::info!("⏰ Scheduler started, scanning every {}s", every.as_secs());

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    coordinator.spawn_pass();
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        log::info!("⏰ Scheduler stopped");
    });

    SchedulerHandle { shutdown_tx, task }
}
