use super::errors::StoreError;

#[test]
fn test_display_messages() {
    assert_eq!(
        StoreError::BadPath("/a b".to_string()).to_string(),
        "bad path: /a b"
    );
    assert_eq!(StoreError::BadMutation.to_string(), "bad mutation");
    assert_eq!(StoreError::RevMismatch.to_string(), "rev mismatch");
    assert_eq!(StoreError::TooLate.to_string(), "too late");
    assert_eq!(StoreError::Closed.to_string(), "store closed");
}

#[test]
fn test_glob_errors_convert() {
    let err = glob::Pattern::new("[").unwrap_err();
    let store_err: StoreError = err.into();
    assert!(matches!(store_err, StoreError::BadGlob(_)));
}

#[test]
fn test_errors_are_comparable() {
    assert_eq!(StoreError::BadMutation, StoreError::BadMutation);
    assert_ne!(StoreError::BadMutation, StoreError::RevMismatch);
}
