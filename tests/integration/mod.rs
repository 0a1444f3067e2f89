//! Integration tests for git tree selection and checksums

mod filter_narrowing;
mod git_submodules;
mod submodules;
pub mod test_utils;
