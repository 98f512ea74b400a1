use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MUSIC_VOLUME: f32 = 0.7;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
}

/// Color scheme selected in the menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = SettingsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(SettingsError::UnknownTheme(raw.to_owned())),
        }
    }
}

/// User preferences persisted between launches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppSettings {
    theme: Theme,
    music_volume: f32,
}

impl AppSettings {
    /// Build settings, clamping the volume into `0.0..=1.0`.
    #[must_use]
    pub fn new(theme: Theme, music_volume: f32) -> Self {
        Self {
            theme,
            music_volume: clamp_volume(music_volume),
        }
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }

    #[must_use]
    pub fn with_theme(self, theme: Theme) -> Self {
        Self { theme, ..self }
    }

    #[must_use]
    pub fn with_music_volume(self, music_volume: f32) -> Self {
        Self::new(self.theme, music_volume)
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            music_volume: DEFAULT_MUSIC_VOLUME,
        }
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        return DEFAULT_MUSIC_VOLUME;
    }
    volume.clamp(0.0, 1.0)
}
