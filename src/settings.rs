//! Player preferences
//!
//! Persisted to LocalStorage as JSON. Gameplay tuning lives in `GameConfig`.

use serde::{Deserialize, Serialize};

/// When to show the on-screen left/right buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TouchControls {
    /// Only on touch-capable devices
    #[default]
    Auto,
    Always,
    Never,
}

impl TouchControls {
    /// Resolve against the device's touch support
    pub fn visible(&self, is_touch_device: bool) -> bool {
        match self {
            TouchControls::Auto => is_touch_device,
            TouchControls::Always => true,
            TouchControls::Never => false,
        }
    }
}

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Background music on first interaction
    pub music_enabled: bool,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Jump and game-over sounds
    pub sfx_enabled: bool,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub touch_controls: TouchControls,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_enabled: true,
            music_volume: 0.9,
            sfx_enabled: true,
            sfx_volume: 0.8,
            touch_controls: TouchControls::Auto,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "heart_dodge_settings";

    /// Parse stored JSON, clamping volumes. Unknown or broken data yields defaults.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// JSON form written to LocalStorage
    pub fn to_json(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("Could not serialize settings: {}", e);
                None
            }
        }
    }

    /// Volumes clamped to [0, 1]
    pub fn sanitized(mut self) -> Self {
        self.music_volume = sanitize_volume(self.music_volume);
        self.sfx_volume = sanitize_volume(self.sfx_volume);
        self
    }

    /// Effective music volume (0 when disabled)
    pub fn effective_music_volume(&self) -> f32 {
        if self.music_enabled { self.music_volume } else { 0.0 }
    }

    /// Effective sound effect volume (0 when disabled)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sfx_enabled { self.sfx_volume } else { 0.0 }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Some(json) = self.to_json() {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Could not save settings");
                } else {
                    log::info!("Settings saved");
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

fn sanitize_volume(vol: f32) -> f32 {
    if vol.is_finite() { vol.clamp(0.0, 1.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.music_volume, 0.9);
        assert_eq!(settings.touch_controls, TouchControls::Auto);
    }

    #[test]
    fn test_from_json_clamps_volume() {
        let settings = Settings::from_json(r#"{ "music_volume": 3.5, "sfx_volume": -1.0 }"#);
        assert_eq!(settings.music_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
        assert!(settings.music_enabled);
    }

    #[test]
    fn test_from_json_garbage_falls_back() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }

    #[test]
    fn test_effective_volume_respects_toggle() {
        let settings = Settings {
            music_enabled: false,
            ..Default::default()
        };
        assert_eq!(settings.effective_music_volume(), 0.0);
        assert_eq!(settings.effective_sfx_volume(), 0.8);
    }

    #[test]
    fn test_touch_controls_resolution() {
        assert!(TouchControls::Auto.visible(true));
        assert!(!TouchControls::Auto.visible(false));
        assert!(TouchControls::Always.visible(false));
        assert!(!TouchControls::Never.visible(true));
    }

    #[test]
    fn test_stored_json_round_trips() {
        let settings = Settings {
            music_enabled: false,
            sfx_volume: 0.25,
            touch_controls: TouchControls::Never,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert!(json.contains("\"touch_controls\":\"Never\""));
        assert_eq!(Settings::from_json(&json), settings);
    }

    #[test]
    #[cfg(not(target_arch = "wasm32"))]
    fn test_native_storage_is_a_no_op() {
        Settings {
            music_volume: 0.1,
            ..Default::default()
        }
        .save();
        assert_eq!(Settings::load(), Settings::default());
    }
}
