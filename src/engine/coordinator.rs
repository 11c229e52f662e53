//! One scan pass: fetch, indicators, alignment, entry rules, record, notify.

use {
    crate::{
        analysis::{IndicatorSeries, detect_signal, scan_alignment},
        config::{BINANCE, BotConfig, DF},
        data::MarketDataProvider,
        domain::{Candle, SignalEvent},
        engine::{RunState, TradeRecorder, state::SharedRunState},
        error::SignalError,
        notify::{NotificationDispatcher, signal_message},
        trace_time,
    },
    chrono::Local,
    futures::{StreamExt, future::join_all, stream},
    std::{
        sync::{
            Arc, PoisonError, RwLock,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    },
    tokio::task::JoinHandle,
};

#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    /// Another pass was running; this trigger was dropped.
    Skipped,
    Completed(ScanReport),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    /// Symbols whose data was fetched and evaluated, in configured order.
    pub symbols_evaluated: Vec<String>,
    pub signals: Vec<SignalEvent>,
    pub errors: Vec<(String, SignalError)>,
    /// Open-trade cap was hit, at pass start or mid-pass.
    pub cap_reached: bool,
}

/// Candles for one symbol: higher timeframes in configured order, then the entry timeframe.
struct SymbolCandles {
    higher: Vec<Vec<Candle>>,
    entry: Vec<Candle>,
}

/// Clears the running flag however the pass ends.
struct PassGuard<'a>(&'a AtomicBool);

impl<'a> PassGuard<'a> {
    fn try_begin(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PassGuard(flag))
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ScanCoordinator {
    provider: Arc<dyn MarketDataProvider>,
    dispatcher: Arc<NotificationDispatcher>,
    recorder: Arc<TradeRecorder>,
    config: RwLock<Arc<BotConfig>>,
    state: SharedRunState,
    running: AtomicBool,
    fetch_timeout: Duration,
}

impl ScanCoordinator {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        dispatcher: Arc<NotificationDispatcher>,
        recorder: Arc<TradeRecorder>,
        config: BotConfig,
    ) -> Self {
        let state = SharedRunState::new(RunState::new(config.market_type));
        Self {
            provider,
            dispatcher,
            recorder,
            config: RwLock::new(Arc::new(config)),
            state,
            running: AtomicBool::new(false),
            fetch_timeout: BINANCE.client.symbol_fetch_timeout,
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn provider(&self) -> &Arc<dyn MarketDataProvider> {
        &self.provider
    }

    pub fn dispatcher(&self) -> &Arc<NotificationDispatcher> {
        &self.dispatcher
    }

    pub fn recorder(&self) -> &Arc<TradeRecorder> {
        &self.recorder
    }

    /// The config the next pass will use.
    pub fn config(&self) -> Arc<BotConfig> {
        Arc::clone(&self.config.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Running passes keep the snapshot they started with.
    pub fn replace_config(&self, config: BotConfig) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(config);
    }

    pub fn status(&self) -> RunState {
        self.state.snapshot()
    }

    pub(crate) fn update_state<R>(&self, f: impl FnOnce(&mut RunState) -> R) -> R {
        self.state.update(f)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Fire-and-forget pass through the same overlap guard as the timer.
    pub fn spawn_pass(self: &Arc<Self>) -> JoinHandle<PassOutcome> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move { coordinator.run_pass().await })
    }

    pub async fn run_pass(&self) -> PassOutcome {
        let Some(_guard) = PassGuard::try_begin(&self.running) else {
            log::info!("⏭️ Scan already running, trigger dropped");
            return PassOutcome::Skipped;
        };

        let config = self.config();
        let open_trades = self.update_state(|s| {
            s.last_check_time = Some(Local::now());
            s.open_trade_count
        });

        if open_trades >= config.max_open_trades {
            log::info!(
                "🧢 Open trade cap reached ({}/{}), skipping all symbols",
                open_trades,
                config.max_open_trades
            );
            return PassOutcome::Completed(ScanReport {
                cap_reached: true,
                ..ScanReport::default()
            });
        }

        let report = trace_time!("Scan pass", 10_000_000, {
            self.scan_symbols(&config).await
        });

        log::info!(
            "🔎 Pass done: {} symbols, {} signals, {} errors",
            report.symbols_evaluated.len(),
            report.signals.len(),
            report.errors.len()
        );
        PassOutcome::Completed(report)
    }

    async fn scan_symbols(&self, config: &Arc<BotConfig>) -> ScanReport {
        let mut report = ScanReport::default();

        // Fetches run ahead with bounded concurrency; results are consumed in list order.
        let mut fetched = stream::iter(config.active_symbols.iter().cloned())
            .map(|symbol| async move {
                let candles = self.fetch_symbol(&symbol, config).await;
                (symbol, candles)
            })
            .buffered(BINANCE.limits.concurrent_symbol_fetches.max(1));

        while let Some((symbol, candles)) = fetched.next().await {
            report.symbols_evaluated.push(symbol.clone());

            let evaluated = candles.and_then(|c| evaluate_symbol(&symbol, &c, config));
            match evaluated {
                Ok(Some(event)) => {
                    let open_trades = self.handle_signal(&event, config).await;
                    report.signals.push(event);
                    if open_trades >= config.max_open_trades {
                        log::info!("🧢 Open trade cap reached mid-pass, stopping");
                        report.cap_reached = true;
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) if e.is_routine() => {
                    log::info!("⏳ {}: {}", symbol, e);
                    report.errors.push((symbol, e));
                }
                Err(e) => {
                    log::error!("❌ Error checking {}: {}", symbol, e);
                    self.update_state(|s| s.last_error = Some(format!("Signal Check Error: {}", e)));
                    report.errors.push((symbol, e));
                }
            }
        }
        report
    }

    async fn fetch_symbol(
        &self,
        symbol: &str,
        config: &BotConfig,
    ) -> Result<SymbolCandles, SignalError> {
        let limit = BINANCE.limits.candle_window;
        let market = config.market_type;

        let higher = join_all(
            config
                .higher_timeframes
                .iter()
                .map(|tf| self.provider.fetch_candles(symbol, *tf, limit, market)),
        );
        let entry = self
            .provider
            .fetch_candles(symbol, config.entry_timeframe, limit, market);

        let (higher, entry) = tokio::time::timeout(self.fetch_timeout, async {
            tokio::join!(higher, entry)
        })
        .await
        .map_err(|_| SignalError::Timeout {
            symbol: symbol.to_string(),
            secs: self.fetch_timeout.as_secs(),
        })?;

        let fetch_error = |e: anyhow::Error| SignalError::Fetch {
            symbol: symbol.to_string(),
            reason: format!("{:#}", e),
        };
        let higher = higher
            .into_iter()
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(fetch_error)?;
        let entry = entry.map_err(fetch_error)?;

        Ok(SymbolCandles { higher, entry })
    }

    /// Records, notifies, then counts the trade. Returns the new open-trade count.
    async fn handle_signal(&self, event: &SignalEvent, config: &BotConfig) -> usize {
        log::warn!("🎯 {} SIGNAL for {}", event.direction.to_string().to_uppercase(), event.symbol);

        let (_, levels) = self.recorder.record_signal(event, &config.risk()).await;
        let text = signal_message(event, &levels);
        let delivery = self.dispatcher.dispatch(&text, &config.telegram_channels).await;

        self.update_state(|s| {
            if let Some(failure) = delivery.failures().last() {
                s.last_error = Some(failure.to_string());
            }
            s.open_trade_count += 1;
            s.open_trade_count
        })
    }
}

/// Alignment over the higher timeframes, then the entry rules on the entry timeframe.
fn evaluate_symbol(
    symbol: &str,
    candles: &SymbolCandles,
    config: &BotConfig,
) -> Result<Option<SignalEvent>, SignalError> {
    let params = config.indicator_params();

    // A higher timeframe too short to warm up votes for neither side.
    let higher: Vec<Option<IndicatorSeries>> = candles
        .higher
        .iter()
        .map(|c| IndicatorSeries::compute(c, &params).ok())
        .collect();
    let alignment = scan_alignment(higher.iter().map(Option::as_ref));

    let entry_context = || format!("{} {}", symbol, config.entry_timeframe);
    let entry = IndicatorSeries::compute(&candles.entry, &params).map_err(|e| match e {
        SignalError::DataUnavailable {
            available,
            required,
            ..
        } => SignalError::data_unavailable(entry_context(), available, required),
        other => other,
    })?;
    let (prev, last) = entry.last_two().ok_or_else(|| {
        SignalError::data_unavailable(entry_context(), entry.len(), params.min_candles() + 1)
    })?;

    if DF.log_symbol_evaluation {
        log::info!(
            "📊 {}: align L{}/S{} | RSI {:.1} -> {:.1} | vol {:.0} vs avg {:.0} | close {:.4} vs EMA {:.4}",
            symbol,
            alignment.long_count,
            alignment.short_count,
            prev.rsi,
            last.rsi,
            last.volume,
            last.volume_avg,
            last.close,
            last.ema_entry
        );
    }

    Ok(detect_signal(symbol, &prev, &last, &alignment, &config.thresholds()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_blocks_second_entry_and_releases_on_drop() {
        let flag = AtomicBool::new(false);
        let first = PassGuard::try_begin(&flag);
        assert!(first.is_some());
        assert!(PassGuard::try_begin(&flag).is_none());
        drop(first);
        assert!(PassGuard::try_begin(&flag).is_some());
    }
}
