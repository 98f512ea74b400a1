use std::sync::Arc;

use quiz_core::model::{AppSettings, Theme};
use storage::repository::SettingsRepository;
use tokio::sync::Mutex;

/// Owns the live settings and writes every change straight through.
///
/// Storage failures never reach the caller: reads fall back to defaults and
/// failed writes are logged while the in-memory value stays current.
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
    current: Mutex<AppSettings>,
}

impl SettingsService {
    /// Read persisted settings, or defaults if missing or unreadable.
    pub async fn load(repo: Arc<dyn SettingsRepository>) -> Self {
        let settings = match repo.get_settings().await {
            Ok(Some(settings)) => settings,
            Ok(None) => AppSettings::default(),
            Err(err) => {
                tracing::warn!(%err, "failed to load settings, using defaults");
                AppSettings::default()
            }
        };
        tracing::debug!(theme = %settings.theme(), volume = settings.music_volume(), "settings loaded");
        Self {
            repo,
            current: Mutex::new(settings),
        }
    }

    pub async fn current(&self) -> AppSettings {
        *self.current.lock().await
    }

    pub async fn theme(&self) -> Theme {
        self.current.lock().await.theme()
    }

    pub async fn set_theme(&self, theme: Theme) -> AppSettings {
        self.update(|settings| settings.with_theme(theme)).await
    }

    /// Switch between dark and light; returns the new theme.
    pub async fn toggle_theme(&self) -> Theme {
        self.update(|settings| settings.with_theme(settings.theme().toggled()))
            .await
            .theme()
    }

    /// Volume is clamped to `0.0..=1.0`.
    pub async fn set_music_volume(&self, volume: f32) -> AppSettings {
        self.update(|settings| settings.with_music_volume(volume))
            .await
    }

    async fn update(&self, change: impl FnOnce(AppSettings) -> AppSettings) -> AppSettings {
        // Held across the save so concurrent updates persist in order.
        let mut current = self.current.lock().await;
        let updated = change(*current);
        *current = updated;
        if let Err(err) = self.repo.save_settings(&updated).await {
            tracing::error!(%err, "failed to persist settings");
        }
        updated
    }
}
