//! The process-wide provider can only be built once.
//!
//! Kept in its own test binary, with a single test, so nothing else touches
//! the global guard.

use lunchmore_core::{Config, SessionProvider};

#[test]
fn test_global_provider_is_built_once() {
    let cache = tempfile::tempdir().expect("temp dir");

    // A failed build does not use up the guard
    let bad = Config::default()
        .with_api_url("not a url")
        .with_cache_dir(cache.path());
    assert!(SessionProvider::global(&bad).is_err());

    let config = Config::default().with_cache_dir(cache.path());
    assert!(SessionProvider::global(&config).is_ok());

    let err = SessionProvider::global(&config)
        .err()
        .expect("second provider refused");
    assert!(err.to_string().contains("already started"));
}
