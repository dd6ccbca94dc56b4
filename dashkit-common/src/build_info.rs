//! Build identification shared by all services
//!
//! Each service captures its own values at compile time (see the service's
//! `build.rs`) and hands them to the common page shell and `/api/buildinfo`.

use serde::Serialize;

/// Version and build metadata for one service binary
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BuildInfo {
    pub module: &'static str,
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
}

impl BuildInfo {
    /// First 8 characters of the git hash ("unknown" builds are shorter)
    pub fn short_hash(&self) -> &'static str {
        let end = self
            .git_hash
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.git_hash.len());
        &self.git_hash[..end]
    }

    /// One-line identification used in startup logs
    pub fn banner(&self) -> String {
        format!(
            "{} v{} [{}] built {} ({})",
            self.module, self.version, self.git_hash, self.build_timestamp, self.build_profile
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(hash: &'static str) -> BuildInfo {
        BuildInfo {
            module: "dashkit-test",
            version: "0.1.0",
            git_hash: hash,
            build_timestamp: "2026-01-01T00:00:00+00:00",
            build_profile: "debug",
        }
    }

    #[test]
    fn test_short_hash_truncates() {
        assert_eq!(info("0123456789abcdef").short_hash(), "01234567");
    }

    #[test]
    fn test_short_hash_keeps_short_values() {
        assert_eq!(info("unknown").short_hash(), "unknown");
    }

    #[test]
    fn test_banner_mentions_module_and_version() {
        let banner = info("abc").banner();
        assert!(banner.starts_with("dashkit-test v0.1.0"));
        assert!(banner.contains("(debug)"));
    }
}
