//! Small persistent key-value settings store.
//!
//! The dashboard keeps exactly one setting, the payout rates, under
//! [`PAYOUT_SETTINGS_KEY`] as a JSON string (`{"newsRate":50,"blogRate":75}`).
//! [`FileStore`] keeps all keys in a single JSON object on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::models::PayoutRateConfig;

pub const PAYOUT_SETTINGS_KEY: &str = "payoutSettings";

/// String keys to string values.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// A JSON object file, rewritten whole on every `set`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map()?.remove(key))
    }

    #[instrument(level = "debug", skip(self, value), fields(path = %self.path.display()))]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced
        let mut map = self.read_map().unwrap_or_else(|e| {
            warn!(error = %e, "Settings file unreadable; starting a fresh one");
            BTreeMap::new()
        });
        map.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&map)?)?;
        debug!("Saved setting");
        Ok(())
    }
}

/// Stored payout rates, or the defaults when nothing usable is stored.
///
/// Never fails: a missing key, an unreadable store, corrupt JSON and
/// negative rates all fall back to [`PayoutRateConfig::default`].
pub fn load_rates(store: &impl KeyValueStore) -> PayoutRateConfig {
    let raw = match store.get(PAYOUT_SETTINGS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No saved payout rates; using defaults");
            return PayoutRateConfig::default();
        }
        Err(e) => {
            warn!(error = %e, "Could not read payout rates; using defaults");
            return PayoutRateConfig::default();
        }
    };

    match serde_json::from_str::<PayoutRateConfig>(&raw) {
        Ok(rates) => match rates.validate() {
            Ok(()) => rates,
            Err(e) => {
                warn!(error = %e, "Saved payout rates are invalid; using defaults");
                PayoutRateConfig::default()
            }
        },
        Err(e) => {
            warn!(error = %e, "Saved payout rates are corrupt; using defaults");
            PayoutRateConfig::default()
        }
    }
}

pub fn save_rates(store: &impl KeyValueStore, rates: &PayoutRateConfig) -> Result<()> {
    store.set(PAYOUT_SETTINGS_KEY, &serde_json::to_string(rates)?)?;
    info!(news_rate = rates.news_rate, blog_rate = rates.blog_rate, "Saved payout rates");
    Ok(())
}
