//! Integration tests for the database-backed employee store; see the test
//! targets declared in Cargo.toml.
