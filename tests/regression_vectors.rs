//! Frozen output vectors for the public API.
//!
//! Every expected string below is a snapshot taken from an independent
//! reference computation. Any change in output indicates a regression in
//! the equation engine, the rotor odometer, a codec or a cipher stage.

use rotorcrypt::utils::base32;
use rotorcrypt::{
    shift, CascadeOrchestrator, CipherConfig, Direction, DigestAlgorithm, Engine, EquationKind,
    KeystreamCipher, PipelineStep, RotorCryptError, RotorState, StageId, SubstitutionCipher,
};

const OFFSETS: [i64; 10] = [3, 1, 4, 1, 5, 9, 2, 6, 5, 3];

fn pi_state() -> RotorState {
    RotorState::new(OFFSETS)
}

// ═══════════════════════════════════════════════════════════════════════
// SubstitutionCipher: single symbols
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn substitution_zero_state_is_identity_for_first_letter() {
    let cipher = SubstitutionCipher::new(EquationKind::Simple, true);
    assert_eq!(cipher.encrypt("A", RotorState::default()), "A");
}

#[test]
fn substitution_first_wheel_one_shifts_by_one() {
    let cipher = SubstitutionCipher::new(EquationKind::Simple, true);
    let state = RotorState::new([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(cipher.encrypt("A", state), "B");
}

#[test]
fn substitution_without_advance_uses_one_shift_per_class() {
    let cipher = SubstitutionCipher::new(EquationKind::Weighted, false);
    let state = RotorState::new([2, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(cipher.encrypt("HELLO 123", state), "JGNNQ 345");
}

/// Odd-index wheels at 0 count as 1 in `mult-sum`, and through it in `super`.
#[test]
fn mult_sum_and_super_with_zero_neighbours() {
    let state = RotorState::new([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(shift(&state, 26, EquationKind::MultSum).unwrap(), 1);
    assert_eq!(shift(&state, 26, EquationKind::Super).unwrap(), 10);

    let cipher = SubstitutionCipher::new(EquationKind::MultSum, true);
    assert_eq!(cipher.encrypt("AAAAAAAA", RotorState::default()), "ABCEIQGM");
    assert_eq!(cipher.decrypt("ABCEIQGM", RotorState::default()), "AAAAAAAA");
}

// ═══════════════════════════════════════════════════════════════════════
// Base32 codec
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn base32_single_zero_byte() {
    assert_eq!(base32::encode(&[0x00]), "AA");
    assert_eq!(base32::decode("AA"), vec![0x00]);
}

// ═══════════════════════════════════════════════════════════════════════
// Substitution and keystream stages, one vector per equation
// ═══════════════════════════════════════════════════════════════════════

/// `(equation, substitution("Rotor 42"), keystream-sha256("Rotor 42"))`
/// from state `[3,1,4,1,5,9,2,6,5,3]` with auto-advance.
const STAGE_VECTORS: [(EquationKind, &str, &str); 8] = [
    (EquationKind::Simple, "XJYZM34DAT1ZX", "2BVZTO5KSGVDA"),
    (EquationKind::Exponential, "JGRSB49UOZ0MM", "5DRXZPV6MWBSO"),
    (EquationKind::Cubic, "HMBFG23NTV1LC", "E2QWCQVIKW3TO"),
    (EquationKind::Product, "ORNTM33IAY2VK", "7NTOYXQKBS3RA"),
    (EquationKind::Weighted, "NPJVG15CYQ8RG", "ZDTVZ4LY3OAH2"),
    (EquationKind::ExpCombined, "WRTDY31QCK6XG", "35IAW6RGATEKI"),
    (EquationKind::MultSum, "LLBFY59WQQ4VO", "Y6M6RH7VQFSLW"),
    (EquationKind::Super, "KVXJO33SEY2DW", "7PU3BXTOLR6G4"),
];

#[test]
fn stage_vectors_per_equation() {
    let sha256 = StageId::Keystream(DigestAlgorithm::Sha256);
    for (equation, substitution, keystream) in STAGE_VECTORS {
        let o = CascadeOrchestrator::new(equation, true);
        assert_eq!(
            o.apply_stage(StageId::Substitution, "Rotor 42", pi_state(), Direction::Encrypt)
                .unwrap(),
            substitution,
            "substitution / {}",
            equation
        );
        assert_eq!(
            o.apply_stage(sha256, "Rotor 42", pi_state(), Direction::Encrypt).unwrap(),
            keystream,
            "keystream / {}",
            equation
        );
    }
}

#[test]
fn stage_vectors_decrypt_back() {
    let sha256 = StageId::Keystream(DigestAlgorithm::Sha256);
    for (equation, substitution, keystream) in STAGE_VECTORS {
        let o = CascadeOrchestrator::new(equation, true);
        assert_eq!(
            o.apply_stage(StageId::Substitution, substitution, pi_state(), Direction::Decrypt)
                .unwrap(),
            "Rotor 42"
        );
        assert_eq!(
            o.apply_stage(sha256, keystream, pi_state(), Direction::Decrypt).unwrap(),
            "Rotor 42"
        );
    }
}

#[test]
fn keystream_hello_per_algorithm() {
    for (algorithm, expected) in [
        (DigestAlgorithm::Sha1, "DFIESD4T"),
        (DigestAlgorithm::Sha256, "2HG4PIGX"),
        (DigestAlgorithm::Sha512, "PPKOTAN2"),
    ] {
        let cipher = KeystreamCipher::new(algorithm, EquationKind::Simple, true);
        assert_eq!(cipher.encrypt_text("Hello", RotorState::default()).unwrap(), expected);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Pipelines
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn pipeline_two_loops_frozen() {
    let o = CascadeOrchestrator::new(EquationKind::Weighted, true);
    let steps = [
        PipelineStep::new(StageId::Substitution),
        PipelineStep::new(StageId::Keystream(DigestAlgorithm::Sha1)),
        PipelineStep::new(StageId::Base64),
    ];
    let expected = "RExURVc3WTVIWVE1R1BJTFNLMkxZWTZHSUNUREtOVk0yUDVLTkdYVlYySVpaTEJUVFNJUQ==";
    assert_eq!(o.run("hello", pi_state(), &steps, 2, Direction::Encrypt).unwrap(), expected);
    assert_eq!(o.run(expected, pi_state(), &steps, 2, Direction::Decrypt).unwrap(), "hello");
}

#[test]
fn engine_json_pipeline_matches_orchestrator() {
    let config = CipherConfig::from_json_str(
        r#"{
            "initialOffsets": [3, 1, 4, 1, 5, 9, 2, 6, 5, 3],
            "equation": "weighted",
            "pipeline": ["enigma", "sha1", "base64"],
            "loopCount": 2
        }"#,
    )
    .unwrap();
    let engine = Engine::new(config).unwrap();
    assert_eq!(
        engine.encrypt("hello").unwrap(),
        "RExURVc3WTVIWVE1R1BJTFNLMkxZWTZHSUNUREtOVk0yUDVLTkdYVlYySVpaTEJUVFNJUQ=="
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Fixed cascade
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn fixed_cascade_letters_only_roundtrip() {
    let o = CascadeOrchestrator::new(EquationKind::Simple, true);
    let encrypted = o.run_fixed("Hi", RotorState::default(), Direction::Encrypt).unwrap();
    assert_eq!(encrypted, "WIEASZQ");
    assert_eq!(
        o.run_fixed(&encrypted, RotorState::default(), Direction::Decrypt).unwrap(),
        "Hi"
    );
}

/// "Hello" encodes to `JBSWY3DP`; the digits make the substitution advance
/// with modulus 10 where the replay assumes 26, so decryption desyncs.
#[test]
fn fixed_cascade_digit_intermediate_desyncs() {
    let o = CascadeOrchestrator::new(EquationKind::Simple, true);
    let encrypted = o.run_fixed("Hello", RotorState::default(), Direction::Encrypt).unwrap();
    assert_eq!(encrypted, "OTVD2Y43TUG4Q");
    let err = o
        .run_fixed(&encrypted, RotorState::default(), Direction::Decrypt)
        .unwrap_err();
    assert!(matches!(err, RotorCryptError::Decode(ref m) if m.contains("replaying")));
}
