//! Build script for dashkit-cleaner
//!
//! Captures build identification information at compile time:
//! - Git commit hash (short form)
//! - Build timestamp
//! - Build profile (debug/release)
//!
//! Served by `/api/buildinfo` and shown in the page header.

use std::process::Command;

fn main() {
    // Short hash (8 characters); "unknown" outside a git checkout
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    // ISO 8601 with local offset
    // Format: YYYY-MM-DDTHH:MM:SS±HH:MM (e.g., 2026-10-17T14:30:45-05:00)
    let build_timestamp = chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, false);

    // Set by cargo: "debug" or "release"
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    // Read back with env!() in lib.rs
    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", build_timestamp);
    println!("cargo:rustc-env=BUILD_PROFILE={}", profile);

    // No rerun-if-changed directives: cargo reruns this script on every build,
    // keeping the timestamp and hash current
}
