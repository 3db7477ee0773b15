//! CascadeOrchestrator: composes cipher stages into reversible pipelines.
//!
//! A pipeline is an ordered list of stages applied `loop_count` times.
//! Encryption walks the list forward; decryption walks it backward and
//! calls each stage's inverse. Before every stage the rotors are reset to
//! the initial state, so no stage needs to know how far another one
//! advanced them. The single exception is a keystream step marked
//! `carry_state`, which continues from where the substitution step before
//! it stopped; on decryption that position is rebuilt by trajectory replay.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::equation::{EquationKind, Precision, LETTER_MODULUS};
use crate::error::RotorCryptError;
use crate::keystream::{DigestAlgorithm, DigestProvider, KeystreamCipher, RUST_CRYPTO};
use crate::rotor::RotorState;
use crate::substitution::SubstitutionCipher;
use crate::utils::text::utf8;
use crate::utils::{base32, base64};
use crate::Direction;

/// A selectable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StageId {
    /// Base32 encoding followed by the rotor substitution cipher.
    Substitution,
    /// Keyless Base32 text encoding.
    Base32,
    /// Keyless standard Base64 text encoding.
    Base64,
    /// Hash-seeded keystream cipher with Base32 output.
    Keystream(DigestAlgorithm),
}

impl StageId {
    /// All stages, in a fixed order.
    pub const ALL: [StageId; 6] = [
        StageId::Substitution,
        StageId::Base32,
        StageId::Base64,
        StageId::Keystream(DigestAlgorithm::Sha1),
        StageId::Keystream(DigestAlgorithm::Sha256),
        StageId::Keystream(DigestAlgorithm::Sha512),
    ];

    /// Returns the canonical stage name.
    pub fn name(self) -> &'static str {
        match self {
            StageId::Substitution => "substitution",
            StageId::Base32 => "base32",
            StageId::Base64 => "base64",
            StageId::Keystream(DigestAlgorithm::Sha1) => "keystream-sha1",
            StageId::Keystream(DigestAlgorithm::Sha256) => "keystream-sha256",
            StageId::Keystream(DigestAlgorithm::Sha512) => "keystream-sha512",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StageId {
    type Err = RotorCryptError;

    /// Parses a canonical stage name or one of its aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substitution" | "enigma" => Ok(StageId::Substitution),
            "base32" | "base-n" | "base-n-textual-encoding" => Ok(StageId::Base32),
            "base64" => Ok(StageId::Base64),
            "keystream-sha1" | "sha1" => Ok(StageId::Keystream(DigestAlgorithm::Sha1)),
            "keystream-sha256" | "sha256" => Ok(StageId::Keystream(DigestAlgorithm::Sha256)),
            "keystream-sha512" | "sha512" => Ok(StageId::Keystream(DigestAlgorithm::Sha512)),
            other => Err(RotorCryptError::config(format!("unknown stage '{}'", other))),
        }
    }
}

impl TryFrom<String> for StageId {
    type Error = RotorCryptError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StageId> for String {
    fn from(stage: StageId) -> Self {
        stage.name().to_string()
    }
}

/// One entry of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StepRepr")]
pub struct PipelineStep {
    /// Stage to run.
    pub stage: StageId,
    /// Continue from the previous stage's rotor state instead of resetting.
    pub carry_state: bool,
}

/// Accepts either a bare stage name or a `{ stage, carryState }` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum StepRepr {
    Bare(StageId),
    #[serde(rename_all = "camelCase")]
    Full {
        stage: StageId,
        #[serde(default)]
        carry_state: bool,
    },
}

impl From<StepRepr> for PipelineStep {
    fn from(repr: StepRepr) -> Self {
        match repr {
            StepRepr::Bare(stage) => PipelineStep::new(stage),
            StepRepr::Full { stage, carry_state } => PipelineStep { stage, carry_state },
        }
    }
}

impl PipelineStep {
    /// A step that starts from the pipeline's initial rotor state.
    pub const fn new(stage: StageId) -> Self {
        PipelineStep {
            stage,
            carry_state: false,
        }
    }

    /// A step that continues from the previous step's final rotor state.
    pub const fn carried(stage: StageId) -> Self {
        PipelineStep {
            stage,
            carry_state: true,
        }
    }
}

impl From<StageId> for PipelineStep {
    fn from(stage: StageId) -> Self {
        PipelineStep::new(stage)
    }
}

/// The fixed two-stage cascade: substitution, then SHA-256 keystream
/// continuing from the substitution's final rotor state.
pub const FIXED_CASCADE: [PipelineStep; 2] = [
    PipelineStep::new(StageId::Substitution),
    PipelineStep::carried(StageId::Keystream(DigestAlgorithm::Sha256)),
];

/// Checks a pipeline before any stage runs.
///
/// # Errors
/// Returns [`RotorCryptError::Configuration`] if `steps` is empty,
/// `loop_count` is 0, or a step carries state anywhere other than from a
/// resetting substitution step into the keystream step right after it.
pub fn validate(steps: &[PipelineStep], loop_count: usize) -> Result<(), RotorCryptError> {
    if steps.is_empty() {
        return Err(RotorCryptError::config("pipeline is empty"));
    }
    if loop_count == 0 {
        return Err(RotorCryptError::config("loop count must be at least 1"));
    }
    for (i, step) in steps.iter().enumerate() {
        if !step.carry_state {
            continue;
        }
        if !matches!(step.stage, StageId::Keystream(_)) {
            return Err(RotorCryptError::config(format!(
                "step {} ({}) cannot carry rotor state: only keystream stages can",
                i + 1,
                step.stage
            )));
        }
        match i.checked_sub(1).map(|p| steps[p]) {
            Some(previous) if previous.stage == StageId::Substitution && !previous.carry_state => {}
            _ => {
                return Err(RotorCryptError::config(format!(
                    "step {} ({}) carries rotor state but does not follow a substitution step",
                    i + 1,
                    step.stage
                )))
            }
        }
    }
    Ok(())
}

/// Runs single stages and whole pipelines.
///
/// # Examples
///
/// ```
/// use rotorcrypt::{CascadeOrchestrator, Direction, EquationKind, PipelineStep, RotorState, StageId};
///
/// let orchestrator = CascadeOrchestrator::new(EquationKind::Product, true);
/// let initial = RotorState::new([3, 14, 15, 9, 2, 6, 5, 3, 5, 8]);
/// let steps = [
///     PipelineStep::new(StageId::Substitution),
///     PipelineStep::new("sha512".parse().unwrap()),
///     PipelineStep::new(StageId::Base64),
/// ];
///
/// let encrypted = orchestrator.run("hello", initial, &steps, 2, Direction::Encrypt).unwrap();
/// let decrypted = orchestrator.run(&encrypted, initial, &steps, 2, Direction::Decrypt).unwrap();
/// assert_eq!(decrypted, "hello");
/// ```
#[derive(Clone, Copy)]
pub struct CascadeOrchestrator<'d> {
    equation: EquationKind,
    auto_advance: bool,
    precision: Precision,
    provider: &'d dyn DigestProvider,
}

impl fmt::Debug for CascadeOrchestrator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CascadeOrchestrator")
            .field("equation", &self.equation)
            .field("auto_advance", &self.auto_advance)
            .field("precision", &self.precision)
            .finish_non_exhaustive()
    }
}

impl CascadeOrchestrator<'static> {
    /// Creates an orchestrator using the built-in RustCrypto digests.
    ///
    /// # Parameters
    /// - `equation`: Equation shared by every stage.
    /// - `auto_advance`: Whether stages advance the rotors per unit.
    pub fn new(equation: EquationKind, auto_advance: bool) -> Self {
        CascadeOrchestrator {
            equation,
            auto_advance,
            precision: Precision::Arbitrary,
            provider: &RUST_CRYPTO,
        }
    }
}

impl<'d> CascadeOrchestrator<'d> {
    /// Replaces the digest provider used by keystream stages.
    pub fn with_provider<'p>(self, provider: &'p dyn DigestProvider) -> CascadeOrchestrator<'p> {
        CascadeOrchestrator {
            equation: self.equation,
            auto_advance: self.auto_advance,
            precision: self.precision,
            provider,
        }
    }

    /// Overrides the arithmetic precision available to the `super` equation.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Runs `steps` over `text` `loop_count` times.
    ///
    /// # Parameters
    /// - `text`: Plaintext (`Encrypt`) or ciphertext (`Decrypt`).
    /// - `initial`: Rotor state every resetting step starts from.
    /// - `steps`: Pipeline, in encryption order.
    /// - `loop_count`: Number of passes over the pipeline (at least 1).
    /// - `direction`: Forward pipeline or its exact inverse.
    ///
    /// # Errors
    /// - [`RotorCryptError::Configuration`] if the pipeline fails [`validate`];
    ///   nothing runs in that case.
    /// - Any error from a stage, which aborts the whole run.
    pub fn run(
        &self,
        text: &str,
        initial: RotorState,
        steps: &[PipelineStep],
        loop_count: usize,
        direction: Direction,
    ) -> Result<String, RotorCryptError> {
        validate(steps, loop_count)?;

        let mut current = text.to_string();
        for lap in 0..loop_count {
            match direction {
                Direction::Encrypt => {
                    let mut previous_end = initial;
                    for step in steps {
                        let mut state = if step.carry_state { previous_end } else { initial };
                        tracing::debug!(lap, stage = %step.stage, ?direction, "running stage");
                        current = self.run_stage(step.stage, &current, &mut state, direction)?;
                        previous_end = state;
                    }
                }
                Direction::Decrypt => {
                    for step in steps.iter().rev() {
                        let mut state = if step.carry_state {
                            self.recover_carried_state(initial, &current)
                        } else {
                            initial
                        };
                        tracing::debug!(lap, stage = %step.stage, ?direction, "running stage");
                        let output = self.run_stage(step.stage, &current, &mut state, direction);
                        current = if step.carry_state {
                            self.check_replayed_step(output)?
                        } else {
                            output?
                        };
                    }
                }
            }
        }
        Ok(current)
    }

    /// Runs the fixed substitution → SHA-256 keystream cascade.
    ///
    /// The keystream continues from the substitution's final rotor state.
    /// Decryption rebuilds that state by replaying the rotor path with the
    /// letter modulus, which is exact only when the intermediate
    /// substitution output holds no digits.
    ///
    /// # Errors
    /// Any error from either stage.
    pub fn run_fixed(
        &self,
        text: &str,
        initial: RotorState,
        direction: Direction,
    ) -> Result<String, RotorCryptError> {
        self.run(text, initial, &FIXED_CASCADE, 1, direction)
    }

    /// Runs a single stage starting from `initial`.
    ///
    /// # Errors
    /// Any error from the stage.
    pub fn apply_stage(
        &self,
        stage: StageId,
        text: &str,
        initial: RotorState,
        direction: Direction,
    ) -> Result<String, RotorCryptError> {
        let mut state = initial;
        self.run_stage(stage, text, &mut state, direction)
    }

    /// Dispatches one stage, advancing `state` in place.
    fn run_stage(
        &self,
        stage: StageId,
        text: &str,
        state: &mut RotorState,
        direction: Direction,
    ) -> Result<String, RotorCryptError> {
        match stage {
            StageId::Substitution => {
                let cipher = SubstitutionCipher::new(self.equation, self.auto_advance)
                    .with_precision(self.precision);
                match direction {
                    Direction::Encrypt => {
                        let symbols = base32::encode(text.as_bytes());
                        Ok(cipher.transform(&symbols, state, direction))
                    }
                    Direction::Decrypt => {
                        let symbols = cipher.transform(text, state, direction);
                        utf8(base32::decode(&symbols), "substitution")
                    }
                }
            }
            StageId::Base32 => match direction {
                Direction::Encrypt => Ok(base32::encode(text.as_bytes())),
                Direction::Decrypt => utf8(base32::decode(text), "base32"),
            },
            StageId::Base64 => match direction {
                Direction::Encrypt => Ok(base64::encode(text)),
                Direction::Decrypt => base64::decode(text),
            },
            StageId::Keystream(algorithm) => {
                let cipher = KeystreamCipher::new(algorithm, self.equation, self.auto_advance)
                    .with_provider(self.provider)
                    .with_precision(self.precision);
                match direction {
                    Direction::Encrypt => {
                        let bytes = cipher.apply(text.as_bytes(), state, direction)?;
                        Ok(base32::encode(&bytes))
                    }
                    Direction::Decrypt => {
                        let bytes = cipher.apply(&base32::decode(text), state, direction)?;
                        utf8(bytes, "keystream")
                    }
                }
            }
        }
    }

    /// Rebuilds the rotor state a carried keystream step started from.
    ///
    /// The preceding substitution step advanced once per Base32 symbol it
    /// emitted, and the keystream consumed one byte per symbol, so the
    /// number of steps is the decoded length of `ciphertext`.
    fn recover_carried_state(&self, initial: RotorState, ciphertext: &str) -> RotorState {
        if !self.auto_advance {
            return initial;
        }
        let steps = base32::decode(ciphertext).len();
        let mut path = initial
            .trajectory(self.equation, LETTER_MODULUS, true)
            .with_precision(self.precision);
        path.by_ref().take(steps).for_each(drop);
        path.state()
    }

    /// Flags the cases where a replayed carried state may not match the
    /// state encryption used.
    ///
    /// On success the recovered substitution text is checked for digits.
    /// On failure with auto-advance the replay is the likely cause, so it
    /// is logged and named in a `Decode` error.
    fn check_replayed_step(
        &self,
        output: Result<String, RotorCryptError>,
    ) -> Result<String, RotorCryptError> {
        match output {
            Ok(intermediate) => {
                if self.auto_advance && intermediate.bytes().any(|b| b.is_ascii_digit()) {
                    tracing::warn!(
                        "carried rotor state was replayed with the letter modulus but the \
                         substitution output contains digits; decryption may be wrong"
                    );
                }
                Ok(intermediate)
            }
            Err(err) if self.auto_advance => {
                tracing::warn!(error = %err, "carried step failed after rotor state replay");
                Err(match err {
                    RotorCryptError::Decode(msg) => RotorCryptError::decode(format!(
                        "{}; the carried rotor state was rebuilt by replaying the letter \
                         modulus, which is inexact if the substitution output held digits",
                        msg
                    )),
                    other => other,
                })
            }
            Err(err) => Err(err),
        }
    }
}
