//! Build script for moodring-web
//!
//! Exposes build identification to the crate as compile-time env vars:
//! `MOODRING_GIT_HASH`, `MOODRING_BUILD_TIMESTAMP`, `MOODRING_BUILD_PROFILE`.
//! They are logged at startup and reported by `/health`.

use std::process::Command;

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

fn main() {
    let git_hash = git_short_hash().unwrap_or_else(|| "unknown".to_string());

    // RFC 3339 with local offset, e.g. 2026-10-18T14:30:45-05:00
    let built_at = chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, false);

    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=MOODRING_GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=MOODRING_BUILD_TIMESTAMP={}", built_at);
    println!("cargo:rustc-env=MOODRING_BUILD_PROFILE={}", profile);
}
