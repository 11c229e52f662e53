use {
    crate::domain::MarketType,
    std::{
        sync::Arc,
        time::{Duration, SystemTime, UNIX_EPOCH},
    },
    tokio::sync::Mutex,
};

/// Header Binance uses to report the weight spent in the current minute.
pub const USED_WEIGHT_HEADER: &str = "x-mbx-used-weight-1m";

/// Per-venue request-weight budget. Spot and futures are metered separately by the
/// exchange, so each gets its own minute counter. Clones share the same counters.
#[derive(Clone)]
pub struct WeightBudget {
    limit: u32,
    venues: Arc<Mutex<[MinuteWindow; 2]>>,
}

#[derive(Debug, Clone, Copy, Default)]
struct MinuteWindow {
    minute: u64,
    used: u32,
}

impl MinuteWindow {
    fn roll(&mut self, now_minute: u64) {
        if now_minute > self.minute {
            self.minute = now_minute;
            self.used = 0;
        }
    }
}

fn slot(market: MarketType) -> usize {
    match market {
        MarketType::Futures => 0,
        MarketType::Spot => 1,
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

impl WeightBudget {
    pub fn new(limit: u32) -> Self {
        let window = MinuteWindow {
            minute: epoch_secs() / 60,
            used: 0,
        };
        Self {
            limit,
            venues: Arc::new(Mutex::new([window; 2])),
        }
    }

    /// Reserves `cost` weight on `market`, sleeping past the wall-clock minute when the
    /// budget is spent. Returns the time spent waiting so callers can account for it.
    pub async fn acquire(&self, market: MarketType, cost: u32, context: &str) -> Duration {
        let mut waited = Duration::ZERO;
        loop {
            let (wait, used) = {
                let mut venues = self.venues.lock().await;
                let window = &mut venues[slot(market)];
                let now = epoch_secs();
                window.roll(now / 60);

                // An oversized call goes through on an untouched minute rather than never.
                if window.used + cost <= self.limit || (window.used == 0 && cost > self.limit) {
                    window.used += cost;
                    return waited;
                }

                let wait = Duration::from_secs(60 - now % 60) + Duration::from_millis(100);
                (wait, window.used)
            };

            log::warn!(
                "🛑 {} weight spent for [{}]: {}/{}, waiting {:.1}s",
                market,
                context,
                used,
                self.limit,
                wait.as_secs_f64()
            );
            tokio::time::sleep(wait).await;
            waited += wait;
        }
    }

    /// Folds in the exchange's own count. Other clients on the same IP spend the
    /// same budget, so the larger of the two wins.
    pub async fn observe_used(&self, market: MarketType, server_used: u32) {
        let mut venues = self.venues.lock().await;
        let window = &mut venues[slot(market)];
        window.roll(epoch_secs() / 60);
        window.used = window.used.max(server_used);
    }

    pub async fn used(&self, market: MarketType) -> u32 {
        let mut venues = self.venues.lock().await;
        let window = &mut venues[slot(market)];
        window.roll(epoch_secs() / 60);
        window.used
    }
}
