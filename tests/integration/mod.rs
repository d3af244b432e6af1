//! Integration test suite for metaflat
//!
//! End-to-end tests of the library API and the `metaflat` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **convert**: traversal ordering and template selection through the public API
//! - **document**: index documents built from metadata records
//! - **cli**: the binary, its flags, settings file and exit codes

mod cli;
mod convert;
mod document;
