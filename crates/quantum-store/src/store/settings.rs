//! Settings store.
//!
//! A single operator-configured scalar: the USD → PKR display rate.
//! Modeled as an explicit store object like everything else — loaded at
//! startup, mutated by user action, persisted on change — not as ambient
//! global state.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use quantum_core::{ExchangeRate, DEFAULT_USD_TO_PKR};

use crate::error::StoreResult;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingsState {
    usd_to_pkr_rate: ExchangeRate,
}

impl Default for SettingsState {
    fn default() -> Self {
        SettingsState {
            usd_to_pkr_rate: DEFAULT_USD_TO_PKR,
        }
    }
}

/// Owns the settings scalar(s).
pub struct SettingsStore {
    state: SettingsState,
    snapshot: Arc<Snapshot>,
}

impl SettingsStore {
    pub const NAMESPACE: &'static str = "quantum_erp_settings";

    pub fn load(snapshot: Arc<Snapshot>) -> StoreResult<Self> {
        let state = snapshot.load(Self::NAMESPACE)?.unwrap_or_default();
        Ok(SettingsStore { state, snapshot })
    }

    pub fn exchange_rate(&self) -> ExchangeRate {
        self.state.usd_to_pkr_rate
    }

    pub fn set_exchange_rate(&mut self, rate: ExchangeRate) -> StoreResult<()> {
        debug!(rate = rate.as_f64(), "updating USD → PKR rate");
        self.state.usd_to_pkr_rate = rate;
        self.snapshot.save(Self::NAMESPACE, &self.state)
    }
}
