//! File persistence configuration

/// Keys handed to the key-value store. The JSON file store maps each to `<key>.json`.
pub struct StoreKeys {
    pub config: &'static str,
    pub trade_history: &'static str,
}

pub struct HistoryConfig {
    /// Records retained in memory and on disk.
    pub capacity: usize,
    /// Records handed to status readers.
    pub recent_view: usize,
}

/// The Master Persistence Configuration
pub struct PersistenceConfig {
    pub keys: StoreKeys,
    pub history: HistoryConfig,
    pub default_data_dir: &'static str,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    keys: StoreKeys {
        config: "config",
        trade_history: "trade_history",
    },
    history: HistoryConfig {
        capacity: 50,
        recent_view: 10,
    },
    default_data_dir: ".",
};
