//! Tests for error types.

use std::path::PathBuf;

use super::error::Error;

#[test]
fn test_error_display_invalid_id() {
    let err = Error::InvalidId(-4);
    assert_eq!(
        err.to_string(),
        "Invalid node id -4: must be in 0..=2147483647"
    );
}

#[test]
fn test_error_display_path_rejected() {
    let err = Error::PathRejected(PathBuf::from("../etc/passwd"));
    assert_eq!(err.to_string(), "Path rejected by policy: ../etc/passwd");
}

#[test]
fn test_error_display_overflow() {
    let err = Error::IntegerOverflow { offset: 17 };
    assert_eq!(
        err.to_string(),
        "Integer overflow in edge list token at byte offset 17"
    );
}

#[test]
fn test_error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}
