//! Stored handwriting style profiles

use crate::{Color, HandwritingStyle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Measurements taken from a photographed handwriting sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleExtractionResult {
    /// Shear angle (degrees) that best straightens the sample's strokes
    pub deskew_angle: f32,
    /// Lean of the handwriting in degrees, positive leaning right.
    /// Always `-deskew_angle`.
    pub slant: f32,
    /// Approximate stroke width in pixels, within [1, 5]
    pub stroke_width: f32,
    /// Average horizontal gap between ink runs, in analysis pixels
    pub avg_spacing: f32,
    /// Messiness score within [0, 1]
    pub messiness: f32,
}

impl StyleExtractionResult {
    /// Result used when a sample cannot be analyzed
    pub const NEUTRAL: StyleExtractionResult = StyleExtractionResult {
        deskew_angle: 0.0,
        slant: 0.0,
        stroke_width: 2.0,
        avg_spacing: 5.0,
        messiness: 0.1,
    };
}

impl Default for StyleExtractionResult {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// A named, persisted handwriting style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleProfile {
    pub id: Uuid,
    pub name: String,
    pub style: HandwritingStyle,
    pub detected_slant: f32,
    pub detected_stroke_width: f32,
    pub messiness_score: f32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StyleProfile {
    /// Wrap a hand-tuned style in a new profile
    pub fn new(name: impl Into<String>, style: HandwritingStyle) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            style,
            detected_slant: 0.0,
            detected_stroke_width: 0.0,
            messiness_score: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a profile from the measurements of an uploaded sample.
    ///
    /// `name` is usually the sample's file name; its stem is used, and an
    /// empty stem falls back to "Custom Style".
    pub fn from_extraction(name: &str, result: &StyleExtractionResult) -> Self {
        let stem = name.split('.').next().unwrap_or_default().trim();
        let name = if stem.is_empty() { "Custom Style" } else { stem };
        let m = result.messiness;

        let style = HandwritingStyle {
            font: "Custom".to_string(),
            size: 24.0,
            color: Color::BLACK,
            line_height: 1.5,
            word_spacing: result.avg_spacing * 0.5,
            letter_spacing: result.avg_spacing * 0.1,
            perturbation: m * 5.0,
            rotation: m * 5.0,
            slant: result.slant,
            baseline_shift: m * 2.0,
        };

        Self {
            detected_slant: result.slant,
            detected_stroke_width: result.stroke_width,
            messiness_score: m,
            ..Self::new(name, style)
        }
    }

    /// Replace the style, bumping the modification time
    pub fn with_style(&self, style: HandwritingStyle) -> Self {
        Self {
            style,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extraction_mapping() {
        let result = StyleExtractionResult {
            deskew_angle: -10.0,
            slant: 10.0,
            stroke_width: 3.0,
            avg_spacing: 10.0,
            messiness: 0.4,
        };
        let profile = StyleProfile::from_extraction("my_sample.png", &result);

        assert_eq!(profile.name, "my_sample");
        assert_eq!(profile.style.size, 24.0);
        assert_eq!(profile.style.color, Color::BLACK);
        assert!((profile.style.word_spacing - 5.0).abs() < 1e-6);
        assert!((profile.style.letter_spacing - 1.0).abs() < 1e-6);
        assert!((profile.style.perturbation - 2.0).abs() < 1e-6);
        assert!((profile.style.rotation - 2.0).abs() < 1e-6);
        assert!((profile.style.baseline_shift - 0.8).abs() < 1e-6);
        assert_eq!(profile.style.slant, 10.0);
        assert_eq!(profile.detected_slant, 10.0);
        assert_eq!(profile.detected_stroke_width, 3.0);
        assert!(profile.style.validate().is_ok());
    }

    #[test]
    fn test_from_extraction_empty_name() {
        let profile = StyleProfile::from_extraction(".png", &StyleExtractionResult::NEUTRAL);
        assert_eq!(profile.name, "Custom Style");
    }

    #[test]
    fn test_with_style_keeps_identity() {
        let profile = StyleProfile::new("Neat", HandwritingStyle::neat());
        let updated = profile.with_style(HandwritingStyle::default());
        assert_eq!(updated.id, profile.id);
        assert_eq!(updated.created_at, profile.created_at);
        assert!(updated.updated_at >= profile.updated_at);
    }

    #[test]
    fn test_profile_json_roundtrip() {
        let profile = StyleProfile::new("Neat", HandwritingStyle::neat());
        let json = serde_json::to_string(&profile).unwrap();
        let back: StyleProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
