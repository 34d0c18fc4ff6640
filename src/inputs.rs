use anyhow::{Context, Result};
use ipnet::IpNet;
use std::fs;
use std::net::IpAddr;
use std::path::Path;

/// Parse wordlist content: one entry per line, `#` comments and blank lines
/// ignored, surrounding whitespace trimmed.
pub fn parse_wordlist_str(s: &str) -> Vec<String> {
    s.lines()
        .map(|l| l.split('#').next().unwrap_or("").trim())
        .filter(|l| !l.is_empty())
        .map(|l| l.to_string())
        .collect()
}

/// Load a wordlist from a file path.
pub fn load_wordlist_from_path(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("failed to read wordlist: {}", path.as_ref().display()))?;
    Ok(parse_wordlist_str(&content))
}

/// Expand a CIDR string into host addresses, capped at `limit`.
///
/// For IPv4 the network and broadcast addresses are excluded; `ipnet`'s
/// `hosts()` already does this for prefixes shorter than /31.
pub fn expand_cidr(cidr: &str, limit: usize) -> Result<Vec<IpAddr>> {
    let net: IpNet = cidr
        .parse()
        .with_context(|| format!("invalid CIDR block: {cidr}"))?;
    Ok(net.hosts().take(limit).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wordlist_skips_comments_and_blanks() {
        let input = "admin\n# comment\n\n  login  \nbackup # trailing\n";
        assert_eq!(parse_wordlist_str(input), vec!["admin", "login", "backup"]);
    }

    #[test]
    fn expand_small_cidr_excludes_network_and_broadcast() {
        let hosts = expand_cidr("192.168.1.0/30", 16).unwrap();
        let as_str: Vec<String> = hosts.iter().map(|ip| ip.to_string()).collect();
        assert_eq!(as_str, vec!["192.168.1.1", "192.168.1.2"]);
    }

    #[test]
    fn expand_respects_limit() {
        let hosts = expand_cidr("10.0.0.0/24", 5).unwrap();
        assert_eq!(hosts.len(), 5);
        assert_eq!(hosts[0].to_string(), "10.0.0.1");
    }

    #[test]
    fn invalid_cidr_errors() {
        assert!(expand_cidr("not-a-cidr", 10).is_err());
    }
}
