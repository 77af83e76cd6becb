//! Integration tests for the patient-journey binary
//!
//! Tests execute the real binary against real RocksDB directories created
//! with `tempfile`.
//!
//! # Test Categories
//! - `pipeline_test`: ingest, run and summary end to end
//! - `exit_code_test`: failure conditions and their exit codes
//!
//! # Running Tests
//! ```bash
//! cargo test --package patient-journey-cli --test integration -- --nocapture
//! ```

pub mod exit_code_test;
pub mod helpers;
pub mod pipeline_test;
