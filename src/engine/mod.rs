mod coordinator;
mod core;
mod recorder;
mod scheduler;
mod state;

pub use {
    coordinator::{PassOutcome, ScanCoordinator, ScanReport},
    self::core::{SignalEngine, VenueCheck},
    recorder::TradeRecorder,
    scheduler::{SchedulerHandle, start_scheduler},
    state::{ConnectivityStatus, RunState},
};
