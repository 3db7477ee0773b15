//! Engine: runs the configured operating mode over a piece of text.

use crate::cascade::{CascadeOrchestrator, StageId};
use crate::config::{CipherConfig, Mode};
use crate::error::RotorCryptError;
use crate::glyph;
use crate::keystream::DigestProvider;
use crate::utils::base64;
use crate::Direction;

/// Text transformer bound to one [`CipherConfig`].
///
/// # Examples
///
/// ```
/// use rotorcrypt::{CipherConfig, Engine};
///
/// let config = CipherConfig::from_json_str(
///     r#"{"mode": "enigma", "glyphs": true, "initialOffsets": [5,0,0,0,0,0,0,0,0,1]}"#,
/// ).unwrap();
/// let engine = Engine::new(config).unwrap();
///
/// let encrypted = engine.encrypt("Meet me at noon").unwrap();
/// assert_eq!(engine.decrypt(&encrypted).unwrap(), "Meet me at noon");
/// ```
#[derive(Debug)]
pub struct Engine<'d> {
    config: CipherConfig,
    orchestrator: CascadeOrchestrator<'d>,
}

impl Engine<'static> {
    /// Creates an engine using the built-in digests.
    ///
    /// # Errors
    /// Returns [`RotorCryptError::Configuration`] if `config` fails validation.
    pub fn new(config: CipherConfig) -> Result<Self, RotorCryptError> {
        config.validate()?;
        let orchestrator = CascadeOrchestrator::new(config.equation, config.auto_advance);
        Ok(Engine {
            config,
            orchestrator,
        })
    }
}

impl<'d> Engine<'d> {
    /// Replaces the digest provider used by keystream stages.
    pub fn with_provider<'p>(self, provider: &'p dyn DigestProvider) -> Engine<'p> {
        Engine {
            config: self.config,
            orchestrator: self.orchestrator.with_provider(provider),
        }
    }

    /// Returns the configuration this engine runs.
    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    /// Encrypts `text` with the configured mode.
    ///
    /// # Errors
    /// - [`RotorCryptError::Configuration`] if `text` is empty.
    /// - Any stage error.
    pub fn encrypt(&self, text: &str) -> Result<String, RotorCryptError> {
        self.run(text, Direction::Encrypt)
    }

    /// Decrypts `text` with the configured mode.
    ///
    /// # Errors
    /// - [`RotorCryptError::Configuration`] if `text` is empty.
    /// - Any stage error.
    pub fn decrypt(&self, text: &str) -> Result<String, RotorCryptError> {
        self.run(text, Direction::Decrypt)
    }

    fn run(&self, text: &str, direction: Direction) -> Result<String, RotorCryptError> {
        if text.is_empty() {
            return Err(RotorCryptError::config("input text is empty"));
        }
        let initial = self.config.initial_offsets;
        tracing::debug!(mode = ?self.config.mode, ?direction, len = text.len(), "engine run");

        match self.config.mode {
            Mode::Substitution => match direction {
                Direction::Encrypt => {
                    let ciphertext =
                        self.orchestrator
                            .apply_stage(StageId::Substitution, text, initial, direction)?;
                    Ok(if self.config.glyphs {
                        glyph::encode(&ciphertext)
                    } else {
                        ciphertext
                    })
                }
                Direction::Decrypt => {
                    let ciphertext = if self.config.glyphs {
                        glyph::decode(text)
                    } else {
                        text.to_string()
                    };
                    self.orchestrator
                        .apply_stage(StageId::Substitution, &ciphertext, initial, direction)
                }
            },
            Mode::Base64 => match direction {
                Direction::Encrypt => Ok(base64::encode(text)),
                Direction::Decrypt => base64::decode(text),
            },
            Mode::KeystreamSha1 | Mode::KeystreamSha256 | Mode::KeystreamSha512 => {
                let stage = self
                    .config
                    .mode
                    .digest()
                    .map(StageId::Keystream)
                    .ok_or_else(|| RotorCryptError::config("keystream mode without digest"))?;
                self.orchestrator.apply_stage(stage, text, initial, direction)
            }
            Mode::FixedCascade => self.orchestrator.run_fixed(text, initial, direction),
            Mode::Pipeline => self.orchestrator.run(
                text,
                initial,
                &self.config.pipeline,
                self.config.loop_count,
                direction,
            ),
        }
    }
}
