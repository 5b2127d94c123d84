//! End-to-end signature scenarios.
//!
//! Each test drives [`signature::generate_signature_file`] against a real file
//! and inspects the bytes written to disk.

use std::fs;
use std::num::NonZeroUsize;

use signature::{
    ConfigError, EXIT_IO_FAILURE, Engine, MIB, SignatureConfig, SignatureError, SignatureJob,
    decode_signature, generate_signature_file,
};

fn config(block_size: u64) -> SignatureConfig {
    SignatureConfig::new()
        .with_block_size(block_size)
        .with_parallelism(NonZeroUsize::new(4).expect("workers"))
}

// ============================================================================
// Known Inputs
// ============================================================================

#[test]
fn zero_filled_input_yields_identical_checksums() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("zeros");
    fs::write(&input, vec![0u8; 3 * MIB as usize]).expect("input");

    let expected = crc32fast::hash(&vec![0u8; MIB as usize]);
    for engine in Engine::ALL {
        let report = generate_signature_file(&input, &dir.path().join("zeros"), engine, config(MIB))
            .expect("signature");
        let written = fs::read(report.output_path()).expect("output");
        assert_eq!(written.len(), 12);
        assert_eq!(decode_signature(&written).expect("decode"), vec![expected; 3]);
        assert_eq!(report.layout().block_count(), 3);
    }
}

#[test]
fn single_byte_is_padded_to_a_full_block() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("one");
    fs::write(&input, [0x41]).expect("input");

    let mut padded = vec![0u8; MIB as usize];
    padded[0] = 0x41;
    let expected = crc32fast::hash(&padded);
    assert_ne!(expected, crc32fast::hash(&[0x41]));

    for engine in Engine::ALL {
        let report = generate_signature_file(&input, &dir.path().join("one"), engine, config(MIB))
            .expect("signature");
        let written = fs::read(report.output_path()).expect("output");
        assert_eq!(written, expected.to_ne_bytes().to_vec());
    }
}

#[test]
fn empty_input_writes_empty_signature() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("empty");
    fs::write(&input, []).expect("input");

    for engine in Engine::ALL {
        let report =
            generate_signature_file(&input, &dir.path().join("empty"), engine, config(MIB))
                .expect("signature");
        assert!(report.output_path().exists());
        assert!(fs::read(report.output_path()).expect("output").is_empty());
    }
}

#[test]
fn exact_multiple_has_no_trailing_block() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("exact");
    fs::write(&input, vec![7u8; 4 * 512]).expect("input");

    for engine in Engine::ALL {
        let report = generate_signature_file(&input, &dir.path().join("exact"), engine, config(512))
            .expect("signature");
        assert_eq!(fs::read(report.output_path()).expect("output").len(), 16);
    }
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn zero_block_size_creates_no_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("input");
    fs::write(&input, b"payload").expect("input");
    let base = dir.path().join("out");

    for engine in Engine::ALL {
        let error = generate_signature_file(&input, &base, engine, config(0))
            .expect_err("zero block size");
        assert!(matches!(
            error,
            SignatureError::InvalidConfiguration(ConfigError::ZeroBlockSize)
        ));
        assert!(!engine.output_path(&base).exists());
    }
}

#[test]
fn missing_input_is_unavailable_and_creates_no_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path().join("out");

    let error = generate_signature_file(
        &dir.path().join("does-not-exist"),
        &base,
        Engine::Mapped,
        config(MIB),
    )
    .expect_err("missing input");
    assert!(matches!(error, SignatureError::InputUnavailable { .. }));
    assert_eq!(error.exit_code(), signature::EXIT_INPUT_UNAVAILABLE);
    assert!(!Engine::Mapped.output_path(&base).exists());
}

#[test]
fn input_removed_after_prepare_fails_to_open() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in");
    fs::write(&input, vec![3u8; 4 * 512]).expect("input");
    let base = dir.path().join("out");

    let job = SignatureJob::prepare(&input, &base, config(512)).expect("prepare");
    fs::remove_file(&input).expect("remove input");

    for engine in Engine::ALL {
        let error = job.run(engine).expect_err("input is gone");
        assert!(
            matches!(error, SignatureError::Io { action: "open", .. }),
            "{error}"
        );
        assert_eq!(error.exit_code(), EXIT_IO_FAILURE);
        assert!(!engine.output_path(&base).exists());
    }
}

#[test]
fn existing_output_is_truncated() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("input");
    fs::write(&input, vec![1u8; 100]).expect("input");
    let base = dir.path().join("out");
    fs::write(Engine::Stream.output_path(&base), vec![0xAAu8; 1_000]).expect("stale output");

    let report = generate_signature_file(&input, &base, Engine::Stream, config(64))
        .expect("signature");
    assert_eq!(fs::read(report.output_path()).expect("output").len(), 8);
}
