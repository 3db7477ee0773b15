//! RotorCrypt reversible rotor cipher engine.
//!
//! A ten-wheel rotor state drives every stage. Each position processed
//! derives a shift from the current wheel positions through a selectable
//! equation, then advances the wheels by that shift. Stages compose into
//! pipelines that are inverted exactly by running them backward.
//!
//! This is a toy cipher for experimentation. It offers no real security.
//!
//! # Architecture
//!
//! ```text
//! EquationKind   (wheel positions -> shift modulo 26 / 10 / 255)
//!     ↓
//! RotorState     (ten-wheel odometer, advanced by each shift)
//!     ↓ drives
//! SubstitutionCipher (A-Z / 0-9 Caesar per symbol)
//! KeystreamCipher    (SHA-1 / SHA-256 / SHA-512 seeded byte stream)
//!     ↓ composed by
//! CascadeOrchestrator (reset-per-step pipelines, loops, fixed cascade)
//!     ↓ configured by
//! Engine + CipherConfig (operating modes, JSON configuration)
//! ```
//!
//! # Examples
//!
//! Run a pipeline forward and back:
//!
//! ```
//! use rotorcrypt::{CascadeOrchestrator, Direction, EquationKind, PipelineStep, RotorState, StageId};
//!
//! let orchestrator = CascadeOrchestrator::new(EquationKind::Simple, true);
//! let zero = RotorState::default();
//! let steps = [PipelineStep::new(StageId::Substitution)];
//!
//! let encrypted = orchestrator.run("Hi", zero, &steps, 1, Direction::Encrypt).unwrap();
//! assert_eq!(encrypted, "JCWU");
//! assert_eq!(orchestrator.run(&encrypted, zero, &steps, 1, Direction::Decrypt).unwrap(), "Hi");
//! ```
//!
//! Drive everything from a JSON configuration:
//!
//! ```
//! use rotorcrypt::{CipherConfig, Engine};
//!
//! let config = CipherConfig::from_json_str(
//!     r#"{"equation": "weighted", "pipeline": ["enigma", "sha512", "base64"], "loopCount": 2}"#,
//! )
//! .unwrap();
//! let engine = Engine::new(config).unwrap();
//!
//! let encrypted = engine.encrypt("attack at dawn").unwrap();
//! assert_eq!(engine.decrypt(&encrypted).unwrap(), "attack at dawn");
//! ```

#![deny(clippy::all)]

pub mod cascade;
pub mod config;
pub mod engine;
pub mod equation;
pub mod error;
pub mod glyph;
pub mod keystream;
pub mod rotor;
pub mod substitution;
pub mod utils;

pub use cascade::{CascadeOrchestrator, PipelineStep, StageId, FIXED_CASCADE};
pub use config::{CipherConfig, Mode};
pub use engine::Engine;
pub use equation::{
    evaluate, shift, EquationKind, Precision, Shift, DIGIT_MODULUS, KEYSTREAM_MODULUS,
    LETTER_MODULUS,
};
pub use error::RotorCryptError;
pub use keystream::{DigestAlgorithm, DigestProvider, KeystreamCipher, RustCryptoDigest};
pub use rotor::{replay, RotorState, Trajectory, ROTOR_COUNT};
pub use substitution::SubstitutionCipher;

/// Direction a stage is run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Forward transform.
    Encrypt,
    /// Exact inverse of [`Direction::Encrypt`].
    Decrypt,
}
