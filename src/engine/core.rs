use {
    crate::{
        config::{
            BotConfig, PERSISTENCE, REFERENCE_SYMBOL, TelegramAccount,
            constants::{messages, synthetic},
        },
        data::{KeyValueStore, MarketDataProvider, save_typed},
        domain::{Direction, ExitLevels, MarketType, Ticker, TradeRecord},
        engine::{
            ConnectivityStatus, PassOutcome, RunState, ScanCoordinator, TradeRecorder,
        },
        notify::{DispatchReport, MessageTransport, NotificationDispatcher},
    },
    anyhow::{Result, anyhow},
    chrono::Utc,
    futures::future::join_all,
    rand::Rng,
    serde_json::Value,
    std::sync::Arc,
    strum::IntoEnumIterator,
    tokio::task::JoinHandle,
};

/// Result of pricing the reference symbol on one venue.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueCheck {
    pub market: MarketType,
    pub outcome: Result<Ticker, String>,
}

/// Control surface over one coordinator: status, history, settings and test hooks.
pub struct SignalEngine {
    coordinator: Arc<ScanCoordinator>,
    store: Arc<dyn KeyValueStore>,
}

impl SignalEngine {
    /// Wires the collaborators and hydrates config and trade history from `store`.
    pub async fn bootstrap(
        provider: Arc<dyn MarketDataProvider>,
        transport: Arc<dyn MessageTransport>,
        store: Arc<dyn KeyValueStore>,
        accounts: Vec<TelegramAccount>,
    ) -> Self {
        // 1. Config: persisted keys over defaults
        let defaults = BotConfig::defaults_for(&accounts);
        let config = load_config(store.as_ref(), defaults).await;
        log::info!(
            "⚙️ Watching {} symbols on {} ({} active channels)",
            config.active_symbols.len(),
            config.market_type,
            config.active_channels().len()
        );

        // 2. History
        let recorder = Arc::new(TradeRecorder::hydrate(Arc::clone(&store)).await);

        // 3. Fan-out
        let dispatcher = Arc::new(NotificationDispatcher::new(transport, accounts));

        let coordinator = Arc::new(ScanCoordinator::new(provider, dispatcher, recorder, config));
        Self { coordinator, store }
    }

    pub fn from_parts(coordinator: Arc<ScanCoordinator>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { coordinator, store }
    }

    pub fn coordinator(&self) -> &Arc<ScanCoordinator> {
        &self.coordinator
    }

    /// Startup probe. A dead exchange degrades status; it never aborts.
    pub async fn check_connection(&self) -> ConnectivityStatus {
        let market = self.coordinator.config().market_type;
        let result = self.coordinator.provider().check_connection(market).await;
        self.coordinator.update_state(|s| match result {
            Ok(()) => {
                log::info!("🔌 Connected to Binance {}", market);
                s.connectivity = ConnectivityStatus::Connected;
                s.connectivity
            }
            Err(e) => {
                log::error!("🔌 FAILED to connect to Binance {}: {:#}", market, e);
                s.connectivity = ConnectivityStatus::Failed;
                s.last_error = Some(format!("{:#}", e));
                s.connectivity
            }
        })
    }

    pub fn status(&self) -> RunState {
        self.coordinator.status()
    }

    pub async fn recent_trades(&self) -> Vec<TradeRecord> {
        self.coordinator
            .recorder()
            .recent(PERSISTENCE.history.recent_view)
            .await
    }

    pub fn settings(&self) -> Arc<BotConfig> {
        self.coordinator.config()
    }

    /// Merges `patch` into the live config. Takes effect from the next pass.
    /// A failed save is logged; the in-memory update stands.
    pub async fn update_settings(&self, patch: Value) -> Result<Arc<BotConfig>> {
        let merged = self.coordinator.config().merged(patch)?;
        self.coordinator.replace_config(merged);
        let current = self.coordinator.config();

        if let Err(e) = save_typed(self.store.as_ref(), PERSISTENCE.keys.config, &*current).await {
            log::warn!("💾 Settings applied but not saved: {:#}", e);
        } else {
            log::info!("⚙️ Bot settings updated");
        }
        Ok(current)
    }

    pub fn force_scan(&self) -> JoinHandle<PassOutcome> {
        log::info!("👆 Manual scan requested");
        self.coordinator.spawn_pass()
    }

    /// Records a Long on the reference symbol without consulting the entry rules.
    /// The open-trade count is left alone.
    pub async fn inject_synthetic_signal(&self) -> (TradeRecord, DispatchReport) {
        let config = self.coordinator.config();

        let price = match self
            .coordinator
            .provider()
            .fetch_ticker(REFERENCE_SYMBOL, config.market_type)
            .await
        {
            Ok(ticker) => ticker.last_price,
            Err(e) => {
                log::warn!("🧪 Ticker unavailable for fake signal, using a random price: {:#}", e);
                rand::thread_rng().gen_range(synthetic::FALLBACK_PRICE_MIN..synthetic::FALLBACK_PRICE_MAX)
            }
        };
        let atr = price * synthetic::ATR_FRACTION;
        let levels = ExitLevels::from_atr(Direction::Long, price, atr, &config.risk());

        let record = TradeRecord::new(
            Utc::now(),
            REFERENCE_SYMBOL.to_string(),
            Direction::Long,
            price,
            levels.stop_loss,
        );
        self.coordinator.recorder().push(record.clone()).await;

        let report = self
            .coordinator
            .dispatcher()
            .dispatch(messages::SYNTHETIC_SIGNAL, &config.telegram_channels)
            .await;
        (record, report)
    }

    pub async fn send_test_message(&self) -> DispatchReport {
        let channels = self.coordinator.config().telegram_channels.clone();
        self.coordinator
            .dispatcher()
            .dispatch(messages::TEST_MESSAGE, &channels)
            .await
    }

    /// Prices the reference symbol on every venue independently.
    pub async fn connectivity_test(&self) -> Vec<VenueCheck> {
        let provider = self.coordinator.provider();
        let checks = MarketType::iter().map(|market| async move {
            let outcome = provider
                .fetch_ticker(REFERENCE_SYMBOL, market)
                .await
                .map_err(|e| format!("{:#}", e));
            VenueCheck { market, outcome }
        });
        join_all(checks).await
    }

    /// Tickers from the configured venue, or the other one if the first yields nothing.
    /// Symbols that fail individually are left out.
    pub async fn live_prices(&self, symbols: &[String]) -> Result<Vec<(String, Ticker)>> {
        let primary = self.coordinator.config().market_type;

        for (market, label) in [
            (primary, primary.to_string()),
            (primary.fallback(), format!("{} (Fallback)", primary.fallback())),
        ] {
            let tickers = self.tickers_on(symbols, market).await;
            if !tickers.is_empty() {
                self.coordinator.update_state(|s| {
                    s.connectivity = ConnectivityStatus::Connected;
                    s.last_error = None;
                    s.market_label = label;
                });
                return Ok(tickers);
            }
            log::warn!("📉 No prices from {}", market);
        }

        let message = "Failed to fetch price data from both Futures and Spot markets.";
        self.coordinator.update_state(|s| {
            s.connectivity = ConnectivityStatus::PriceFetchFailed;
            s.last_error = Some(message.to_string());
        });
        Err(anyhow!(message))
    }

    async fn tickers_on(&self, symbols: &[String], market: MarketType) -> Vec<(String, Ticker)> {
        let provider = self.coordinator.provider();
        let fetches = symbols.iter().map(|symbol| async move {
            provider
                .fetch_ticker(symbol, market)
                .await
                .ok()
                .map(|t| (symbol.clone(), t))
        });
        join_all(fetches).await.into_iter().flatten().collect()
    }
}

async fn load_config(store: &dyn KeyValueStore, defaults: BotConfig) -> BotConfig {
    let stored = match store.load(PERSISTENCE.keys.config).await {
        Ok(Some(value)) => value,
        Ok(None) => return defaults,
        Err(e) => {
            log::warn!("⚠️ Config unreadable, using defaults: {:#}", e);
            return defaults;
        }
    };
    defaults.merged(stored).unwrap_or_else(|e| {
        log::warn!("⚠️ Stored config rejected, using defaults: {:#}", e);
        defaults
    })
}
