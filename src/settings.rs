//! Session settings
//!
//! Supplied by the host at `init`. Invalid fields never fail a session:
//! they are reported and replaced by their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Why a settings value was rejected
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("duration {0}s is outside [{min}, {max}]", min = MIN_DURATION_SECS, max = MAX_DURATION_SECS)]
    DurationOutOfRange(f32),
    #[error("start stage {0} is outside [0, {count})", count = STAGE_COUNT)]
    StageOutOfRange(usize),
    #[error("settings could not be parsed: {0}")]
    Parse(String),
}

/// Session settings consumed by `GameState::init`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Session length; victory fires when elapsed time reaches it
    pub duration_seconds: f32,
    /// Pins the stage for the whole session (disables rotation)
    pub start_stage_index: Option<usize>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            duration_seconds: DEFAULT_DURATION_SECS,
            start_stage_index: None,
        }
    }
}

impl SessionSettings {
    pub fn new(duration_seconds: f32, start_stage_index: Option<usize>) -> Self {
        Self {
            duration_seconds,
            start_stage_index,
        }
    }

    pub fn validate_duration(duration: f32) -> Result<f32, SettingsError> {
        if duration.is_finite() && (MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&duration) {
            Ok(duration)
        } else {
            Err(SettingsError::DurationOutOfRange(duration))
        }
    }

    pub fn validate_stage(stage: usize) -> Result<usize, SettingsError> {
        if stage < STAGE_COUNT {
            Ok(stage)
        } else {
            Err(SettingsError::StageOutOfRange(stage))
        }
    }

    /// Copy of these settings with every invalid field replaced by its default
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let duration_seconds = match Self::validate_duration(self.duration_seconds) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("Ignoring invalid setting: {}", e);
                defaults.duration_seconds
            }
        };
        let start_stage_index = match self.start_stage_index.map(Self::validate_stage) {
            Some(Ok(stage)) => Some(stage),
            Some(Err(e)) => {
                log::warn!("Ignoring invalid setting: {}", e);
                defaults.start_stage_index
            }
            None => None,
        };
        Self {
            duration_seconds,
            start_stage_index,
        }
    }

    /// Parse settings from JSON, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<SessionSettings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("{}", SettingsError::Parse(e.to_string()));
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let defaults = SessionSettings::default();
        assert_eq!(defaults.sanitized(), defaults);
    }

    #[test]
    fn test_out_of_range_fields_fall_back_independently() {
        let s = SessionSettings::new(5.0, Some(3)).sanitized();
        assert_eq!(s.duration_seconds, DEFAULT_DURATION_SECS);
        assert_eq!(s.start_stage_index, Some(3));

        let s = SessionSettings::new(90.0, Some(STAGE_COUNT + 2)).sanitized();
        assert_eq!(s.duration_seconds, 90.0);
        assert_eq!(s.start_stage_index, None);
    }

    #[test]
    fn test_non_finite_duration_rejected() {
        assert!(matches!(
            SessionSettings::validate_duration(f32::NAN),
            Err(SettingsError::DurationOutOfRange(_))
        ));
    }

    #[test]
    fn test_from_json_camel_case_and_partial() {
        let s = SessionSettings::from_json(r#"{"durationSeconds": 60, "startStageIndex": 4}"#);
        assert_eq!(s, SessionSettings::new(60.0, Some(4)));

        let s = SessionSettings::from_json(r#"{"startStageIndex": 1}"#);
        assert_eq!(s.duration_seconds, DEFAULT_DURATION_SECS);
        assert_eq!(s.start_stage_index, Some(1));
    }

    #[test]
    fn test_from_json_garbage_is_default() {
        assert_eq!(SessionSettings::from_json("not json"), SessionSettings::default());
    }
}
