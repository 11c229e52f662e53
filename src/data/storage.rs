use {
    anyhow::{Context, Result},
    async_trait::async_trait,
    serde::{Serialize, de::DeserializeOwned},
    serde_json::Value,
    std::path::{Path, PathBuf},
};

/// Blob store for configuration and trade history.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved under `key` yet.
    async fn load(&self, key: &str) -> Result<Option<Value>>;
    async fn save(&self, key: &str, value: &Value) -> Result<()>;
}

/// Typed load that never fails: missing, unreadable or mistyped blobs yield `default`.
pub async fn load_or<T>(store: &dyn KeyValueStore, key: &str, default: T) -> T
where
    T: DeserializeOwned,
{
    match store.load(key).await {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(typed) => typed,
            Err(e) => {
                log::warn!("⚠️ Stored `{}` has an unexpected shape, using defaults: {}", key, e);
                default
            }
        },
        Ok(None) => default,
        Err(e) => {
            log::warn!("⚠️ Could not read `{}`, using defaults: {:#}", key, e);
            default
        }
    }
}

pub async fn save_typed<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()>
where
    T: Serialize + Sync,
{
    let json = serde_json::to_value(value).with_context(|| format!("Failed to encode `{}`", key))?;
    store.save(key, &json).await
}

/// One pretty-printed `<key>.json` per key inside `dir`.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };
        let value = serde_json::from_slice(&bytes)
            .with_context(|| format!("Corrupt JSON in {}", path.display()))?;
        Ok(Some(value))
    }

    async fn save(&self, key: &str, value: &Value) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        let body = serde_json::to_vec_pretty(value)?;

        // Write aside then rename so readers never see a half-written file.
        tokio::fs::write(&tmp, body)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("Failed to move {} into place", path.display()))?;
        Ok(())
    }
}
