//! Configuration surface consumed by the engine.
//!
//! A [`CipherConfig`] carries everything a transform call needs: the
//! initial rotor offsets, the equation, auto-advance, the operating mode,
//! and for pipelines the step list and loop count. It is a plain value
//! passed into every call; nothing is read from ambient state.
//!
//! JSON keys are camelCase and every field has a default:
//!
//! ```json
//! {
//!   "initialOffsets": [3, 1, 4, 1, 5, 9, 2, 6, 5, 3],
//!   "equation": "exp-combined",
//!   "autoAdvance": true,
//!   "mode": "pipeline",
//!   "pipeline": ["substitution", "sha256", {"stage": "base64"}],
//!   "loopCount": 2,
//!   "glyphs": false
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cascade::{self, PipelineStep};
use crate::equation::EquationKind;
use crate::error::RotorCryptError;
use crate::keystream::DigestAlgorithm;
use crate::rotor::RotorState;

/// Operating mode of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Base32 then the rotor substitution cipher, optionally shown as glyphs.
    #[serde(alias = "enigma")]
    Substitution,
    /// Keyless standard Base64.
    Base64,
    /// SHA-1 keystream cipher.
    #[serde(alias = "sha1")]
    KeystreamSha1,
    /// SHA-256 keystream cipher.
    #[serde(alias = "sha256")]
    KeystreamSha256,
    /// SHA-512 keystream cipher.
    #[serde(alias = "sha512")]
    KeystreamSha512,
    /// Substitution into SHA-256 keystream with carried rotor state.
    #[serde(alias = "cascade")]
    FixedCascade,
    /// User-assembled pipeline.
    #[default]
    #[serde(alias = "custom")]
    Pipeline,
}

impl Mode {
    /// Returns the keystream digest for the keystream modes.
    pub fn digest(self) -> Option<DigestAlgorithm> {
        match self {
            Mode::KeystreamSha1 => Some(DigestAlgorithm::Sha1),
            Mode::KeystreamSha256 => Some(DigestAlgorithm::Sha256),
            Mode::KeystreamSha512 => Some(DigestAlgorithm::Sha512),
            _ => None,
        }
    }
}

/// All settings for a transform call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CipherConfig {
    /// Starting rotor positions, clamped into `[0, 25]`.
    pub initial_offsets: RotorState,
    /// Equation shared by every stage.
    pub equation: EquationKind,
    /// Advance the rotors after every processed unit.
    pub auto_advance: bool,
    /// Operating mode.
    pub mode: Mode,
    /// Pipeline steps, used in [`Mode::Pipeline`].
    pub pipeline: Vec<PipelineStep>,
    /// Passes over the pipeline, at least 1.
    pub loop_count: usize,
    /// Render substitution output with the glyph alphabet.
    pub glyphs: bool,
}

impl Default for CipherConfig {
    fn default() -> Self {
        CipherConfig {
            initial_offsets: RotorState::default(),
            equation: EquationKind::Simple,
            auto_advance: true,
            mode: Mode::Pipeline,
            pipeline: Vec::new(),
            loop_count: 1,
            glyphs: false,
        }
    }
}

impl CipherConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    /// Returns [`RotorCryptError::Configuration`] if the JSON is malformed
    /// or the settings fail [`validate`](Self::validate).
    ///
    /// # Examples
    ///
    /// ```
    /// use rotorcrypt::{CipherConfig, EquationKind, Mode};
    ///
    /// let config = CipherConfig::from_json_str(r#"{"mode": "enigma", "equation": "cubic"}"#).unwrap();
    /// assert_eq!(config.mode, Mode::Substitution);
    /// assert_eq!(config.equation, EquationKind::Cubic);
    /// assert!(config.auto_advance);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, RotorCryptError> {
        let config: CipherConfig = serde_json::from_str(json)
            .map_err(|e| RotorCryptError::config(format!("config parse failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    /// Returns [`RotorCryptError::Configuration`] if the file cannot be
    /// read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RotorCryptError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            RotorCryptError::config(format!("config file {} unreadable: {}", path.display(), e))
        })?;
        let config = Self::from_json_str(&raw)?;
        tracing::debug!(path = %path.display(), mode = ?config.mode, "loaded cipher config");
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`RotorCryptError::Configuration`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, RotorCryptError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| RotorCryptError::config(format!("config serialize failed: {}", e)))
    }

    /// Checks that the settings can run.
    ///
    /// # Errors
    /// Returns [`RotorCryptError::Configuration`] if `loop_count` is 0, or
    /// in pipeline mode if the pipeline fails [`cascade::validate`].
    pub fn validate(&self) -> Result<(), RotorCryptError> {
        if self.loop_count == 0 {
            return Err(RotorCryptError::config("loop count must be at least 1"));
        }
        if self.mode == Mode::Pipeline {
            cascade::validate(&self.pipeline, self.loop_count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::StageId;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config: CipherConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CipherConfig::default());
        assert_eq!(config.loop_count, 1);
        assert!(config.auto_advance);
    }

    #[test]
    fn test_full_document() {
        let config = CipherConfig::from_json_str(
            r#"{
                "initialOffsets": [3, 1, 4, 1, 5, 9, 2, 6, 5, 30],
                "equation": "exp-combined",
                "autoAdvance": false,
                "mode": "custom",
                "pipeline": ["enigma", {"stage": "sha256", "carryState": true}, "base64"],
                "loopCount": 2,
                "glyphs": true
            }"#,
        )
        .unwrap();
        assert_eq!(config.initial_offsets.counters()[9], 25);
        assert_eq!(config.equation, EquationKind::ExpCombined);
        assert!(!config.auto_advance);
        assert_eq!(config.mode, Mode::Pipeline);
        assert_eq!(config.pipeline.len(), 3);
        assert!(config.pipeline[1].carry_state);
        assert_eq!(config.pipeline[2].stage, StageId::Base64);
        assert_eq!(config.loop_count, 2);
        assert!(config.glyphs);
    }

    #[test]
    fn test_mode_aliases() {
        for (alias, mode) in [
            ("\"enigma\"", Mode::Substitution),
            ("\"sha1\"", Mode::KeystreamSha1),
            ("\"keystream-sha512\"", Mode::KeystreamSha512),
            ("\"cascade\"", Mode::FixedCascade),
            ("\"fixed-cascade\"", Mode::FixedCascade),
            ("\"base64\"", Mode::Base64),
        ] {
            assert_eq!(serde_json::from_str::<Mode>(alias).unwrap(), mode);
        }
    }

    #[test]
    fn test_empty_pipeline_rejected() {
        let err = CipherConfig::from_json_str(r#"{"mode": "pipeline"}"#).unwrap_err();
        assert_eq!(err, RotorCryptError::config("pipeline is empty"));
    }

    #[test]
    fn test_empty_pipeline_fine_outside_pipeline_mode() {
        assert!(CipherConfig::from_json_str(r#"{"mode": "sha256"}"#).is_ok());
    }

    #[test]
    fn test_zero_loop_count_rejected() {
        let err = CipherConfig::from_json_str(r#"{"mode": "base64", "loopCount": 0}"#).unwrap_err();
        assert!(matches!(err, RotorCryptError::Configuration(_)));
    }

    #[test]
    fn test_unknown_equation_rejected() {
        let err = CipherConfig::from_json_str(r#"{"equation": "quartic"}"#).unwrap_err();
        assert!(matches!(err, RotorCryptError::Configuration(ref m) if m.starts_with("config parse failed")));
    }

    #[test]
    fn test_unknown_stage_rejected() {
        assert!(CipherConfig::from_json_str(r#"{"pipeline": ["rot13"]}"#).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = CipherConfig {
            initial_offsets: RotorState::new([1, 2, 3, 4, 5, 6, 7, 8, 9, 10]),
            equation: EquationKind::Super,
            pipeline: vec![PipelineStep::new(StageId::Substitution)],
            ..CipherConfig::default()
        };
        let json = config.to_json_string().unwrap();
        assert_eq!(CipherConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"mode": "sha512", "equation": "weighted"}}"#).unwrap();
        let config = CipherConfig::load(file.path()).unwrap();
        assert_eq!(config.mode, Mode::KeystreamSha512);
        assert_eq!(config.mode.digest(), Some(DigestAlgorithm::Sha512));
    }

    #[test]
    fn test_load_missing_file() {
        let err = CipherConfig::load("/nonexistent/rotorcrypt.json").unwrap_err();
        assert!(matches!(err, RotorCryptError::Configuration(ref m) if m.contains("unreadable")));
    }
}
