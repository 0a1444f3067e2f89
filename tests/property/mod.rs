//! Property-based tests for selection and checksum invariants

mod determinism;
