mod common;

use {
    common::*,
    serde_json::json,
    signal_sniper::{
        BotConfig, SignalEngine,
        config::TelegramAccount,
        data::{JsonFileStore, KeyValueStore},
        domain::{Direction, MarketType},
        engine::{ConnectivityStatus, start_scheduler},
    },
    std::{
        sync::{Arc, atomic::Ordering},
        time::Duration,
    },
};

fn engine_over(h: &Harness) -> SignalEngine {
    SignalEngine::from_parts(Arc::clone(&h.coordinator), h.store.clone())
}

#[tokio::test]
async fn history_is_capped_and_newest_first() {
    let provider = MockProvider::default();
    provider.set_ticker("BTC/USDT", MarketType::Futures, 65_000.0);
    let h = harness(provider, test_config(&["BTC/USDT"]));
    let engine = engine_over(&h);

    let mut ids = Vec::new();
    for _ in 0..60 {
        let (record, _) = engine.inject_synthetic_signal().await;
        ids.push(record.id);
    }

    assert_eq!(h.coordinator.recorder().len().await, 50);
    let all = h.coordinator.recorder().recent(100).await;
    assert_eq!(all.len(), 50);
    assert_eq!(all[0].id, ids[59]);
    assert_eq!(all[49].id, ids[10]);
    assert!(all.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

    let recent = engine.recent_trades().await;
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].id, ids[59]);

    let saved = h.store.entries.lock().unwrap().get("trade_history").cloned().unwrap();
    assert_eq!(saved.as_array().unwrap().len(), 50);
}

#[tokio::test]
async fn synthetic_signal_uses_ticker_and_leaves_open_count() {
    let provider = MockProvider::default();
    provider.set_ticker("BTC/USDT", MarketType::Futures, 65_000.0);
    let h = harness(provider, test_config(&["BTC/USDT"]));
    let engine = engine_over(&h);

    let (record, report) = engine.inject_synthetic_signal().await;
    assert_eq!(record.symbol, "BTC/USDT");
    assert_eq!(record.direction, Direction::Long);
    assert_eq!(record.entry_price, 65_000.0);
    assert!((record.stop_loss_price - 64_350.0).abs() < 1e-6);
    assert_eq!(report.successes(), 1);
    assert!(h.transport.sent.lock().unwrap()[0].1.contains("FAKE SIGNAL"));
    assert_eq!(engine.status().open_trade_count, 0);
}

#[tokio::test]
async fn synthetic_signal_falls_back_to_random_price() {
    let h = harness(MockProvider::default(), test_config(&["BTC/USDT"]));
    let engine = engine_over(&h);

    let (record, _) = engine.inject_synthetic_signal().await;
    assert!((60_000.0..70_000.0).contains(&record.entry_price));
    assert!((record.stop_loss_price - record.entry_price * 0.99).abs() < 1e-6);
}

#[tokio::test]
async fn live_prices_fall_back_to_spot() {
    let provider = MockProvider::default();
    provider.set_ticker("BTC/USDT", MarketType::Spot, 64_000.0);
    let h = harness(provider, test_config(&["BTC/USDT"]));
    let engine = engine_over(&h);

    let prices = engine
        .live_prices(&["BTC/USDT".to_string(), "ETH/USDT".to_string()])
        .await
        .unwrap();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0].0, "BTC/USDT");

    let status = engine.status();
    assert_eq!(status.market_label, "Spot (Fallback)");
    assert_eq!(status.connectivity, ConnectivityStatus::Connected);
}

#[tokio::test]
async fn live_prices_report_total_failure() {
    let h = harness(MockProvider::default(), test_config(&["BTC/USDT"]));
    let engine = engine_over(&h);

    assert!(engine.live_prices(&["BTC/USDT".to_string()]).await.is_err());
    let status = engine.status();
    assert_eq!(status.connectivity, ConnectivityStatus::PriceFetchFailed);
    assert!(status.last_error.is_some());
}

#[tokio::test]
async fn connectivity_test_checks_each_venue() {
    let provider = MockProvider::default();
    provider.set_ticker("BTC/USDT", MarketType::Futures, 65_000.0);
    let h = harness(provider, test_config(&["BTC/USDT"]));
    let engine = engine_over(&h);

    let checks = engine.connectivity_test().await;
    assert_eq!(checks.len(), 2);
    let futures = checks.iter().find(|c| c.market == MarketType::Futures).unwrap();
    let spot = checks.iter().find(|c| c.market == MarketType::Spot).unwrap();
    assert!(futures.outcome.is_ok());
    assert!(spot.outcome.is_err());
}

#[tokio::test]
async fn failed_startup_probe_degrades_status() {
    let provider = MockProvider::default();
    provider.set_connection_down(true);
    let h = harness(provider, test_config(&["BTC/USDT"]));
    let engine = engine_over(&h);

    assert_eq!(engine.check_connection().await, ConnectivityStatus::Failed);
    assert_eq!(engine.status().connectivity, ConnectivityStatus::Failed);

    h.provider.set_connection_down(false);
    assert_eq!(engine.check_connection().await, ConnectivityStatus::Connected);
}

#[tokio::test]
async fn settings_round_trip_through_json_files() {
    let dir = tempfile::tempdir().unwrap();
    let accounts = vec![
        TelegramAccount::new(1, "t1", "c1", "Main"),
        TelegramAccount::new(2, "t2", "c2", "Backup"),
    ];

    let engine = SignalEngine::bootstrap(
        Arc::new(MockProvider::default()),
        Arc::new(MockTransport::default()),
        Arc::new(JsonFileStore::new(dir.path())),
        accounts.clone(),
    )
    .await;
    assert_eq!(*engine.settings(), BotConfig::defaults_for(&accounts));

    let updated = engine
        .update_settings(json!({ "max_open_trades": 4, "active_symbols": ["SOL/USDT"] }))
        .await
        .unwrap();
    assert_eq!(updated.max_open_trades, 4);
    assert!(engine.update_settings(json!({ "rsi_period": 0 })).await.is_err());
    assert_eq!(engine.settings().max_open_trades, 4);

    let reopened = SignalEngine::bootstrap(
        Arc::new(MockProvider::default()),
        Arc::new(MockTransport::default()),
        Arc::new(JsonFileStore::new(dir.path())),
        accounts,
    )
    .await;
    assert_eq!(reopened.settings().max_open_trades, 4);
    assert_eq!(reopened.settings().active_symbols, vec!["SOL/USDT".to_string()]);
    assert_eq!(reopened.settings().telegram_channels.len(), 2);
}

#[tokio::test]
async fn corrupt_files_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), "{ nope").unwrap();
    std::fs::write(dir.path().join("trade_history.json"), "[1, 2").unwrap();

    let store = Arc::new(JsonFileStore::new(dir.path()));
    assert!(store.load("config").await.is_err());

    let engine = SignalEngine::bootstrap(
        Arc::new(MockProvider::default()),
        Arc::new(MockTransport::default()),
        store,
        Vec::new(),
    )
    .await;
    assert_eq!(*engine.settings(), BotConfig::default());
    assert!(engine.recent_trades().await.is_empty());
}

#[tokio::test]
async fn history_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(MockProvider::default());
    provider.set_ticker("BTC/USDT", MarketType::Futures, 65_000.0);

    let engine = SignalEngine::bootstrap(
        provider.clone(),
        Arc::new(MockTransport::default()),
        Arc::new(JsonFileStore::new(dir.path())),
        Vec::new(),
    )
    .await;
    let (first, _) = engine.inject_synthetic_signal().await;
    let (second, _) = engine.inject_synthetic_signal().await;

    let reopened = SignalEngine::bootstrap(
        provider,
        Arc::new(MockTransport::default()),
        Arc::new(JsonFileStore::new(dir.path())),
        Vec::new(),
    )
    .await;
    let ids: Vec<_> = reopened.recent_trades().await.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test(start_paused = true)]
async fn scheduler_scans_immediately_skips_busy_ticks_and_stops() {
    let (provider, gate) = MockProvider::gated();
    provider.set_long_setup("BTC/USDT");
    let h = harness(provider, test_config(&["BTC/USDT"]));
    let coordinator = Arc::new(
        Arc::try_unwrap(h.coordinator)
            .ok()
            .unwrap()
            .with_fetch_timeout(Duration::from_secs(3_600)),
    );
    let every = Duration::from_secs(60);
    let scheduler = start_scheduler(Arc::clone(&coordinator), every);

    // First pass starts without waiting for an interval: three higher timeframes plus entry.
    tokio::time::sleep(Duration::from_secs(1)).await;
    let first_calls = h.provider.candle_calls.load(Ordering::SeqCst);
    assert_eq!(first_calls, 4);
    assert!(coordinator.is_running());

    // Ticks while the pass is blocked are dropped.
    tokio::time::sleep(every * 3).await;
    assert_eq!(h.provider.candle_calls.load(Ordering::SeqCst), first_calls);

    scheduler.shutdown().await;
    gate.add_permits(1_000);
    while coordinator.is_running() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(coordinator.status().open_trade_count, 1);

    tokio::time::sleep(every * 3).await;
    assert_eq!(h.provider.candle_calls.load(Ordering::SeqCst), first_calls);
}
