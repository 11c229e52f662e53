use {
    crate::{
        config::{DF, PERSISTENCE},
        data::{KeyValueStore, load_or, save_typed},
        domain::{ExitLevels, RiskParams, SignalEvent, TradeRecord},
        error::SignalError,
    },
    std::{collections::VecDeque, sync::Arc},
    tokio::sync::Mutex,
};

/// Bounded newest-first trade history, flushed to the store after every write.
pub struct TradeRecorder {
    history: Mutex<VecDeque<TradeRecord>>,
    store: Arc<dyn KeyValueStore>,
    capacity: usize,
}

impl TradeRecorder {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_history(store, Vec::new())
    }

    /// Reads the persisted history; anything unreadable starts empty.
    pub async fn hydrate(store: Arc<dyn KeyValueStore>) -> Self {
        let key = PERSISTENCE.keys.trade_history;
        let records: Vec<TradeRecord> = load_or(store.as_ref(), key, Vec::new()).await;
        log::info!("📚 Loaded {} trade records", records.len().min(PERSISTENCE.history.capacity));
        Self::with_history(store, records)
    }

    fn with_history(store: Arc<dyn KeyValueStore>, records: Vec<TradeRecord>) -> Self {
        let capacity = PERSISTENCE.history.capacity;
        let mut history: VecDeque<TradeRecord> = records.into();
        history.truncate(capacity);
        Self {
            history: Mutex::new(history),
            store,
            capacity,
        }
    }

    /// Turns a signal into a record with ATR-based exits and stores it.
    pub async fn record_signal(
        &self,
        event: &SignalEvent,
        risk: &RiskParams,
    ) -> (TradeRecord, ExitLevels) {
        let levels = ExitLevels::from_atr(event.direction, event.entry_price, event.atr_at_entry, risk);
        let record = TradeRecord::new(
            event.timestamp,
            event.symbol.clone(),
            event.direction,
            event.entry_price,
            levels.stop_loss,
        );
        self.push(record.clone()).await;
        (record, levels)
    }

    /// Prepends, evicts the oldest beyond capacity, then flushes.
    /// The lock spans the flush so concurrent writers land on disk in order.
    pub async fn push(&self, record: TradeRecord) {
        let mut history = self.history.lock().await;
        history.push_front(record);
        history.truncate(self.capacity);

        let snapshot: Vec<&TradeRecord> = history.iter().collect();
        if let Err(e) = self.flush(&snapshot).await {
            log::warn!("💾 {}", e);
        }
    }

    async fn flush(&self, records: &[&TradeRecord]) -> Result<(), SignalError> {
        let key = PERSISTENCE.keys.trade_history;
        save_typed(self.store.as_ref(), key, &records)
            .await
            .map_err(|e| SignalError::Persistence {
                key: key.to_string(),
                reason: format!("{:#}", e),
            })?;
        if DF.log_history_flush {
            log::info!("💾 Flushed {} trade records", records.len());
        }
        Ok(())
    }

    /// Newest first.
    pub async fn recent(&self, n: usize) -> Vec<TradeRecord> {
        self.history.lock().await.iter().take(n).cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.history.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.history.lock().await.is_empty()
    }
}
