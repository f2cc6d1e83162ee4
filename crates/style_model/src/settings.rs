//! Engine settings management
//!
//! The layout heuristics (page budget, correction rate, paper pitches) are
//! plain constants in the engine's behavior but live here so a deployment can
//! tune them from a JSON file.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tunable constants of the handwriting engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Character budget per planned page
    pub chars_per_page: usize,
    /// Probability per answer line of a simulated self-correction
    pub correction_probability: f64,
    /// Text written and struck through by a simulated correction
    pub mistake_phrase: String,
    /// Distance kept free between the text and the right page edge
    pub right_gutter: f32,
    /// Indent of list item content from the line start
    pub list_indent: f32,
    /// Vertical gap appended after each exam question
    pub question_gap: f32,
    /// Vertical distance between ruled lines
    pub ruled_line_pitch: u32,
    /// Y position of the first ruled line
    pub ruled_first_line: u32,
    /// Cell size of grid paper
    pub grid_pitch: u32,
    /// Peak-to-peak luminance noise of the paper grain
    pub paper_noise: f32,
    /// Per-page growth of messiness as the writer tires
    pub fatigue_step: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            chars_per_page: 1200,
            correction_probability: 0.01,
            mistake_phrase: "wronng value".to_string(),
            right_gutter: 40.0,
            list_indent: 30.0,
            question_gap: 40.0,
            ruled_line_pitch: 30,
            ruled_first_line: 100,
            grid_pitch: 20,
            paper_noise: 8.0,
            fatigue_step: 0.15,
        }
    }
}

/// Settings manager for loading and saving engine settings
pub struct SettingsManager {
    /// Path to the settings file
    settings_path: PathBuf,
    /// Current settings (cached)
    current: EngineSettings,
}

impl SettingsManager {
    pub fn new(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
            current: EngineSettings::default(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn current(&self) -> &EngineSettings {
        &self.current
    }

    /// Load settings from disk, or fall back to defaults if the file is
    /// missing or cannot be parsed
    pub fn load_sync(&mut self) -> Result<&EngineSettings> {
        if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            match serde_json::from_str::<EngineSettings>(&content) {
                Ok(settings) => {
                    self.current = settings;
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse settings file {:?}, using defaults: {}",
                        self.settings_path,
                        e
                    );
                    self.current = EngineSettings::default();
                }
            }
        } else {
            self.current = EngineSettings::default();
        }
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    /// Replace the cached settings
    pub fn update(&mut self, settings: EngineSettings) {
        self.current = settings;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.chars_per_page, 1200);
        assert!((settings.correction_probability - 0.01).abs() < f64::EPSILON);
        assert_eq!(settings.ruled_line_pitch, 30);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let mut manager = SettingsManager::new(dir.path().join("settings.json"));
        let settings = manager.load_sync().unwrap();
        assert_eq!(*settings, EngineSettings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut manager = SettingsManager::new(&path);
        manager.update(EngineSettings {
            chars_per_page: 800,
            ..EngineSettings::default()
        });
        manager.save_sync().unwrap();

        let mut reloaded = SettingsManager::new(&path);
        assert_eq!(reloaded.load_sync().unwrap().chars_per_page, 800);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "correction_probability": 0.5 }"#).unwrap();

        let mut manager = SettingsManager::new(&path);
        let settings = manager.load_sync().unwrap();
        assert!((settings.correction_probability - 0.5).abs() < f64::EPSILON);
        assert_eq!(settings.chars_per_page, 1200);
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        let mut manager = SettingsManager::new(&path);
        assert_eq!(*manager.load_sync().unwrap(), EngineSettings::default());
    }
}
