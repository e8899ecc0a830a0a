//! Shared helpers for the integration test crates
//!
//! Every test binary includes this module but uses a different subset of it.

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod test_repo;

pub use test_repo::TestRepo;

use std::process::Command;

use jjk::jj::constants::MIN_JJ_VERSION;
use jjk::jj::is_version_supported;

/// Is a supported jj binary on PATH?
pub fn jj_available() -> bool {
    let Ok(output) = Command::new("jj").arg("--version").output() else {
        return false;
    };
    let version = String::from_utf8_lossy(&output.stdout);
    let version = version.trim().trim_start_matches("jj ");
    output.status.success() && is_version_supported(version, MIN_JJ_VERSION)
}

/// Return early from a test when jj is not installed
macro_rules! skip_if_no_jj {
    () => {
        if !$crate::common::jj_available() {
            eprintln!("jj not available, skipping test");
            return;
        }
    };
}
