#![allow(dead_code)]

use {
    anyhow::{Result, anyhow, bail},
    async_trait::async_trait,
    serde_json::Value,
    signal_sniper::{
        BotConfig, ScanCoordinator,
        config::{ChannelConfig, TelegramAccount},
        data::{KeyValueStore, MarketDataProvider},
        domain::{Candle, MarketType, Ticker, Timeframe},
        engine::TradeRecorder,
        notify::{MessageTransport, NotificationDispatcher},
    },
    std::{
        collections::{HashMap, HashSet},
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    },
    tokio::sync::Semaphore,
};

pub fn tf(text: &str) -> Timeframe {
    text.parse().unwrap()
}

/// Small periods so short synthetic series warm up quickly.
pub fn test_config(symbols: &[&str]) -> BotConfig {
    BotConfig {
        active_symbols: symbols.iter().map(|s| s.to_string()).collect(),
        entry_timeframe: tf("5m"),
        higher_timeframes: vec![tf("30m"), tf("1h"), tf("4h")],
        max_open_trades: 2,
        market_type: MarketType::Futures,
        rsi_period: 5,
        rsi_oversold: 30.0,
        rsi_overbought: 70.0,
        volume_avg_period: 3,
        volume_factor: 1.5,
        ema_short_period: 3,
        ema_long_period: 6,
        ema_entry_period: 3,
        atr_period: 3,
        atr_stop_loss_factor: 1.0,
        atr_take_profit_factor: 2.0,
        telegram_channels: vec![ChannelConfig {
            id: 1,
            display_name: "Main".to_string(),
            active: true,
        }],
    }
}

pub fn candles(closes: &[f64], volumes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&c, &v))| Candle::new(i as i64 * 60_000, c, c + 1.0, c - 1.0, c, v))
        .collect()
}

pub fn flat(price: f64, n: usize) -> Vec<Candle> {
    candles(&vec![price; n], &vec![1_000.0; n])
}

pub fn trending(start: f64, step: f64, n: usize) -> Vec<Candle> {
    let closes: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
    candles(&closes, &vec![1_000.0; n])
}

/// Steady decline, then a bounce: RSI(5) goes 27.3 -> 31.9, close ends above EMA(3),
/// last volume is twice its 3-bar average.
pub fn long_entry_series() -> Vec<Candle> {
    let mut closes: Vec<f64> = (0..24).map(|i| 130.0 - i as f64).collect();
    closes.push(108.5);
    closes.push(108.8);
    let mut volumes = vec![1_000.0; closes.len()];
    if let Some(last) = volumes.last_mut() {
        *last = 4_000.0;
    }
    candles(&closes, &volumes)
}

#[derive(Default)]
pub struct MockProvider {
    candles: Mutex<HashMap<(String, Timeframe), Vec<Candle>>>,
    tickers: Mutex<HashMap<(String, MarketType), Ticker>>,
    failing_symbols: Mutex<HashSet<String>>,
    connection_down: Mutex<bool>,
    gate: Option<Arc<Semaphore>>,
    pub candle_calls: AtomicUsize,
}

impl MockProvider {
    /// Every candle fetch waits for a permit until `open_gate` is called.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let provider = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::default()
        };
        (provider, gate)
    }

    pub fn set_candles(&self, symbol: &str, timeframe: &str, data: Vec<Candle>) {
        self.candles
            .lock()
            .unwrap()
            .insert((symbol.to_string(), tf(timeframe)), data);
    }

    /// Two of three higher timeframes bullish, plus the long entry pattern.
    pub fn set_long_setup(&self, symbol: &str) {
        self.set_candles(symbol, "30m", trending(100.0, 1.0, 30));
        self.set_candles(symbol, "1h", trending(100.0, 1.0, 30));
        self.set_candles(symbol, "4h", trending(130.0, -1.0, 30));
        self.set_candles(symbol, "5m", long_entry_series());
    }

    pub fn set_quiet(&self, symbol: &str) {
        for timeframe in ["30m", "1h", "4h", "5m"] {
            self.set_candles(symbol, timeframe, flat(2_000.0, 30));
        }
    }

    pub fn fail_symbol(&self, symbol: &str) {
        self.failing_symbols.lock().unwrap().insert(symbol.to_string());
    }

    pub fn set_ticker(&self, symbol: &str, market: MarketType, last_price: f64) {
        self.tickers.lock().unwrap().insert(
            (symbol.to_string(), market),
            Ticker {
                last_price,
                percent_change: 1.5,
            },
        );
    }

    pub fn set_connection_down(&self, down: bool) {
        *self.connection_down.lock().unwrap() = down;
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        _limit: u32,
        _market: MarketType,
    ) -> Result<Vec<Candle>> {
        self.candle_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await?;
        }
        if self.failing_symbols.lock().unwrap().contains(symbol) {
            bail!("HTTP 429 Too Many Requests");
        }
        Ok(self
            .candles
            .lock()
            .unwrap()
            .get(&(symbol.to_string(), timeframe))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_ticker(&self, symbol: &str, market: MarketType) -> Result<Ticker> {
        self.tickers
            .lock()
            .unwrap()
            .get(&(symbol.to_string(), market))
            .copied()
            .ok_or_else(|| anyhow!("no ticker for {} on {}", symbol, market))
    }

    async fn check_connection(&self, _market: MarketType) -> Result<()> {
        if *self.connection_down.lock().unwrap() {
            bail!("connection refused");
        }
        Ok(())
    }
}

/// Records deliveries; any account whose token is `bad` is rejected.
#[derive(Default)]
pub struct MockTransport {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl MessageTransport for MockTransport {
    async fn send(&self, account: &TelegramAccount, text: &str) -> Result<()> {
        if account.token == "bad" {
            bail!("401 Unauthorized");
        }
        self.sent
            .lock()
            .unwrap()
            .push((account.chat_id.clone(), text.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub entries: Mutex<HashMap<String, Value>>,
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn save(&self, key: &str, value: &Value) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.clone());
        Ok(())
    }
}

pub fn main_account() -> TelegramAccount {
    TelegramAccount::new(1, "good-token", "chat-1", "Main")
}

pub struct Harness {
    pub provider: Arc<MockProvider>,
    pub transport: Arc<MockTransport>,
    pub store: Arc<MemoryStore>,
    pub coordinator: Arc<ScanCoordinator>,
}

pub fn harness(provider: MockProvider, config: BotConfig) -> Harness {
    let provider = Arc::new(provider);
    let transport = Arc::new(MockTransport::default());
    let store = Arc::new(MemoryStore::default());
    let dispatcher = Arc::new(NotificationDispatcher::new(
        transport.clone(),
        vec![main_account()],
    ));
    let recorder = Arc::new(TradeRecorder::new(store.clone()));
    let coordinator = Arc::new(ScanCoordinator::new(
        provider.clone(),
        dispatcher,
        recorder,
        config,
    ));
    Harness {
        provider,
        transport,
        store,
        coordinator,
    }
}
