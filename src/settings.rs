//! User settings container
//! Persisted through the gateway like the feed containers, but with no
//! derived state and no statistics.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::PersistenceGateway;

/// Upper bound enforced by the input-validation boundary. The container
/// itself clamps only the lower bound; see [`validate_auto_advance_delay`].
pub const MAX_AUTO_ADVANCE_DELAY_MS: i64 = 10_000;

/// Which screen edge the one-handed action bar sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbBarPosition {
    Left,
    Right,
}

/// The persisted settings shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPayload {
    pub haptics_enabled: bool,
    pub sound_enabled: bool,
    pub auto_advance_delay_ms: u64,
    pub thumb_bar_position: ThumbBarPosition,
}

impl Default for SettingsPayload {
    fn default() -> Self {
        Self {
            haptics_enabled: true,
            sound_enabled: true,
            auto_advance_delay_ms: 1500,
            thumb_bar_position: ThumbBarPosition::Right,
        }
    }
}

/// Validation failure surfaced at the input boundary; container state is
/// never mutated when this is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("auto-advance delay must be between 0 and {MAX_AUTO_ADVANCE_DELAY_MS} ms, got {0}")]
    AutoAdvanceDelayOutOfRange(i64),
}

/// Boundary validator for the auto-advance delay field
pub fn validate_auto_advance_delay(value: i64) -> Result<u64, SettingsError> {
    if (0..=MAX_AUTO_ADVANCE_DELAY_MS).contains(&value) {
        Ok(value as u64)
    } else {
        Err(SettingsError::AutoAdvanceDelayOutOfRange(value))
    }
}

/// In-memory settings container backed by the persistence gateway
pub struct Settings {
    payload: SettingsPayload,
    gateway: Arc<PersistenceGateway>,
}

impl Settings {
    /// Restore settings from storage, falling back to defaults on first run
    pub async fn hydrate(gateway: Arc<PersistenceGateway>) -> Self {
        let payload = gateway.load_settings().await;
        Self { payload, gateway }
    }

    pub fn payload(&self) -> &SettingsPayload {
        &self.payload
    }

    pub fn haptics_enabled(&self) -> bool {
        self.payload.haptics_enabled
    }

    pub fn sound_enabled(&self) -> bool {
        self.payload.sound_enabled
    }

    pub fn auto_advance_delay_ms(&self) -> u64 {
        self.payload.auto_advance_delay_ms
    }

    pub fn thumb_bar_position(&self) -> ThumbBarPosition {
        self.payload.thumb_bar_position
    }

    pub async fn set_haptics_enabled(&mut self, value: bool) {
        self.payload.haptics_enabled = value;
        self.persist().await;
    }

    pub async fn set_sound_enabled(&mut self, value: bool) {
        self.payload.sound_enabled = value;
        self.persist().await;
    }

    /// Clamps the lower bound only; callers are expected to have run the
    /// value through [`validate_auto_advance_delay`] for the upper bound.
    pub async fn set_auto_advance_delay_ms(&mut self, value: i64) {
        self.payload.auto_advance_delay_ms = value.max(0) as u64;
        self.persist().await;
    }

    pub async fn set_thumb_bar_position(&mut self, position: ThumbBarPosition) {
        self.payload.thumb_bar_position = position;
        self.persist().await;
    }

    /// Restore every field to its default and persist the result
    pub async fn reset(&mut self) {
        self.payload = SettingsPayload::default();
        self.persist().await;
    }

    async fn persist(&self) {
        self.gateway.save_settings(&self.payload).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    async fn settings() -> Settings {
        let gateway = Arc::new(PersistenceGateway::new(Arc::new(MemoryStore::new())));
        Settings::hydrate(gateway).await
    }

    #[tokio::test]
    async fn starts_with_defaults_on_first_run() {
        let settings = settings().await;
        assert!(settings.haptics_enabled());
        assert!(settings.sound_enabled());
        assert_eq!(settings.auto_advance_delay_ms(), 1500);
        assert_eq!(settings.thumb_bar_position(), ThumbBarPosition::Right);
    }

    #[tokio::test]
    async fn setters_persist_across_rehydration() {
        let gateway = Arc::new(PersistenceGateway::new(Arc::new(MemoryStore::new())));
        let mut settings = Settings::hydrate(gateway.clone()).await;
        settings.set_sound_enabled(false).await;
        settings.set_thumb_bar_position(ThumbBarPosition::Left).await;
        settings.set_auto_advance_delay_ms(900).await;

        let restored = Settings::hydrate(gateway).await;
        assert!(!restored.sound_enabled());
        assert_eq!(restored.thumb_bar_position(), ThumbBarPosition::Left);
        assert_eq!(restored.auto_advance_delay_ms(), 900);
    }

    #[tokio::test]
    async fn delay_setter_clamps_lower_bound_only() {
        let mut settings = settings().await;
        settings.set_auto_advance_delay_ms(-500).await;
        assert_eq!(settings.auto_advance_delay_ms(), 0);

        // Out-of-range values that bypass the boundary validator go through
        settings.set_auto_advance_delay_ms(99_000).await;
        assert_eq!(settings.auto_advance_delay_ms(), 99_000);
    }

    #[test]
    fn boundary_validator_enforces_full_range() {
        assert_eq!(validate_auto_advance_delay(0), Ok(0));
        assert_eq!(validate_auto_advance_delay(10_000), Ok(10_000));
        assert_eq!(
            validate_auto_advance_delay(-1),
            Err(SettingsError::AutoAdvanceDelayOutOfRange(-1))
        );
        assert_eq!(
            validate_auto_advance_delay(10_001),
            Err(SettingsError::AutoAdvanceDelayOutOfRange(10_001))
        );
    }

    #[tokio::test]
    async fn reset_restores_defaults() {
        let mut settings = settings().await;
        settings.set_haptics_enabled(false).await;
        settings.reset().await;
        assert_eq!(settings.payload(), &SettingsPayload::default());
    }
}
