//! Shared constants for integration tests.
//!
//! Integration tests are compiled as separate crates (one per top-level file in
//! `tests/`). Placing shared constants under `tests/common/` avoids creating an
//! additional integration test binary while still allowing reuse via:
//!
//! ```rust
//! #[path = "common/test_constants.rs"]
//! mod test_constants;
//! ```

/// Well-formed access key.
pub const ACCESS_KEY: &str = "SCWABCDEFGHIJ0123456";

/// Well-formed secret key.
pub const SECRET_KEY: &str = "6f1e2a3b-4c5d-4e6f-8a9b-0c1d2e3f4a5b";

/// Well-formed organization identifier.
pub const ORGANIZATION_ID: &str = "11111111-2222-3333-4444-555555555555";
