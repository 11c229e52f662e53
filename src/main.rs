use {
    anyhow::{Context, Result},
    clap::Parser,
    signal_sniper::{
        Cli, Command, PassOutcome, SignalEngine,
        config::{BINANCE, load_telegram_accounts},
        data::{BinanceProvider, JsonFileStore, WeightBudget},
        engine::start_scheduler,
        notify::{DispatchReport, TelegramTransport},
        utils::format_price,
    },
    std::{panic, sync::Arc, time::Duration},
};

fn init_log() {
    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("signal_sniper"), my_code_level)
        .parse_default_env()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));
    init_log();

    let args = Cli::parse();

    // 1. Collaborators
    let limiter = WeightBudget::new(BINANCE.limits.weight_limit_minute);
    let provider = Arc::new(BinanceProvider::new(limiter)?);
    let transport = Arc::new(TelegramTransport::new()?);
    let store = Arc::new(JsonFileStore::new(&args.data_dir));
    let accounts = load_telegram_accounts();
    if accounts.is_empty() {
        log::warn!("📵 No Telegram accounts in the environment, notifications disabled");
    }

    // 2. Engine
    let engine = SignalEngine::bootstrap(provider, transport, store, accounts).await;

    match args.command.clone().unwrap_or(Command::Run) {
        Command::Run => run_forever(&engine, Duration::from_secs(args.interval_secs)).await,
        Command::ScanOnce => {
            engine.check_connection().await;
            let outcome = engine
                .force_scan()
                .await
                .context("Scan task panicked")?;
            print_pass(&outcome);
            Ok(())
        }
        Command::TestNotify => {
            print_dispatch(&engine.send_test_message().await);
            Ok(())
        }
        Command::FakeSignal => {
            let (record, report) = engine.inject_synthetic_signal().await;
            println!(
                "Recorded {} {} @ {} (SL {})",
                record.direction,
                record.symbol,
                format_price(record.entry_price),
                format_price(record.stop_loss_price)
            );
            print_dispatch(&report);
            Ok(())
        }
        Command::Connectivity => {
            for check in engine.connectivity_test().await {
                match check.outcome {
                    Ok(t) => println!(
                        "{:<8} OK   {}",
                        check.market.to_string(),
                        format_price(t.last_price)
                    ),
                    Err(e) => println!("{:<8} FAIL {}", check.market.to_string(), e),
                }
            }
            Ok(())
        }
        Command::Prices => {
            let symbols = engine.settings().active_symbols.clone();
            let prices = engine.live_prices(&symbols).await?;
            println!("Market: {}", engine.status().market_label);
            for (symbol, ticker) in prices {
                println!(
                    "{:<10} {:>14} {:>+7.2}%",
                    symbol,
                    format_price(ticker.last_price),
                    ticker.percent_change
                );
            }
            Ok(())
        }
        Command::Settings { patch } => {
            let current = match patch {
                Some(raw) => {
                    let patch = serde_json::from_str(&raw).context("Settings patch is not JSON")?;
                    engine.update_settings(patch).await?
                }
                None => engine.settings(),
            };
            println!("{}", serde_json::to_string_pretty(&*current)?);
            Ok(())
        }
    }
}

async fn run_forever(engine: &SignalEngine, every: Duration) -> Result<()> {
    let status = engine.check_connection().await;
    log::info!("🔌 Exchange status: {}", status);

    let scheduler = start_scheduler(Arc::clone(engine.coordinator()), every);

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    log::info!("🛑 Shutting down");
    scheduler.shutdown().await;
    Ok(())
}

fn print_pass(outcome: &PassOutcome) {
    match outcome {
        PassOutcome::Skipped => println!("Another scan was running; nothing done."),
        PassOutcome::Completed(report) => {
            println!(
                "Evaluated {} symbols, {} signals{}",
                report.symbols_evaluated.len(),
                report.signals.len(),
                if report.cap_reached { " (open-trade cap reached)" } else { "" }
            );
            for signal in &report.signals {
                println!(
                    "  {} {} @ {}",
                    signal.direction,
                    signal.symbol,
                    format_price(signal.entry_price)
                );
            }
            for (symbol, error) in &report.errors {
                println!("  {}: {}", symbol, error);
            }
        }
    }
}

fn print_dispatch(report: &DispatchReport) {
    if report.is_empty() {
        println!("No active channels.");
        return;
    }
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(()) => println!("{:<16} sent", outcome.channel_name),
            Err(e) => println!("{:<16} FAILED: {}", outcome.channel_name, e),
        }
    }
}
