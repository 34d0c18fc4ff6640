use anyhow::{Context, Result};
use std::time::Duration;

/// Default user-agent pool for HTTP probes. Modules rotate through these
/// per request instead of relying on a process-wide client default.
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
    "Mozilla/5.0 (X11; Linux x86_64)",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X)",
];

/// Explicit probe configuration, passed by value into modules.
///
/// There is deliberately no process-global state here (no shared sessions,
/// no singleton TLS policy): callers construct one of these and hand it down.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Ceiling on simultaneously in-flight probes.
    pub concurrency: usize,
    /// Timeout applied individually to each probe by the engine.
    pub per_unit_timeout: Duration,
    /// Window for the passive banner read after a TCP connect.
    pub banner_read_timeout: Duration,
    /// Verify TLS certificates on HTTPS probes. Recon targets frequently
    /// present self-signed certificates, so callers may turn this off.
    pub verify_tls: bool,
    /// User-agent pool rotated across HTTP probes.
    pub user_agents: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            concurrency: 50,
            per_unit_timeout: Duration::from_millis(5_000),
            banner_read_timeout: Duration::from_millis(500),
            verify_tls: true,
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ProbeConfig {
    /// Build an HTTP client honoring this configuration. The client is
    /// cheaply cloneable and safe to share across probe units.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .danger_accept_invalid_certs(!self.verify_tls)
            .redirect(reqwest::redirect::Policy::limited(5))
            .connect_timeout(self.per_unit_timeout)
            .build()
            .context("failed to build HTTP client")
    }

    /// Pick a user agent for the i-th probe of a batch. Deterministic
    /// rotation keeps runs reproducible.
    pub fn user_agent(&self, i: usize) -> &str {
        if self.user_agents.is_empty() {
            return "recon-probe-rs";
        }
        &self.user_agents[i % self.user_agents.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_rotation_wraps() {
        let cfg = ProbeConfig::default();
        let n = cfg.user_agents.len();
        assert_eq!(cfg.user_agent(0), cfg.user_agent(n));
    }

    #[test]
    fn empty_pool_falls_back_to_tool_agent() {
        let cfg = ProbeConfig {
            user_agents: Vec::new(),
            ..ProbeConfig::default()
        };
        assert_eq!(cfg.user_agent(3), "recon-probe-rs");
    }
}
