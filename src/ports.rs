use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Parse a ports spec into a deduplicated list of TCP ports (1..=65535).
///
/// Supported formats per line (also valid comma-separated on one line):
/// - single port number: `80`
/// - inclusive range: `8000-8010`
/// - comments: everything after `#` is ignored
/// - whitespace and blank lines are ignored
pub fn parse_ports_str(s: &str) -> Result<Vec<u16>> {
    let mut out: Vec<u16> = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for (idx, raw_line) in s.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.split('#').next().map(str::trim).unwrap_or("");
        if line.is_empty() {
            continue;
        }

        for item in line.split(',').map(str::trim).filter(|i| !i.is_empty()) {
            // Range `start-end`
            if let Some((a, b)) = item.split_once('-') {
                let start = parse_port_str(a.trim())
                    .with_context(|| format!("line {line_no}: invalid start in range: {a}"))?;
                let end = parse_port_str(b.trim())
                    .with_context(|| format!("line {line_no}: invalid end in range: {b}"))?;
                if start > end {
                    bail!("line {line_no}: invalid range {start}-{end} (start > end)");
                }
                for p in start..=end {
                    if seen.insert(p) {
                        out.push(p);
                    }
                }
                continue;
            }

            let p = parse_port_str(item)
                .with_context(|| format!("line {line_no}: invalid port value: {item}"))?;
            if seen.insert(p) {
                out.push(p);
            }
        }
    }

    Ok(out)
}

/// Load a ports list from a file path. Errors if the file cannot be read or parsed.
pub fn load_ports_from_path(path: impl AsRef<Path>) -> Result<Vec<u16>> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("failed to read ports file: {}", path.as_ref().display()))?;
    parse_ports_str(&content)
}

/// A conservative default list of commonly used TCP ports for full scans.
pub fn default_ports() -> Vec<u16> {
    const DEFAULT: &[u16] = &[
        21, 22, 23, 25, 53, 67, 68, 69, 80, 110, 123, 135, 137, 138, 139, 143, 161, 389, 443, 445,
        465, 500, 514, 587, 631, 993, 995, 1025, 1433, 1521, 1723, 1883, 2049, 2375, 2380, 3000,
        3128, 3260, 3306, 3389, 4369, 5000, 5040, 5432, 5672, 5900, 5985, 5986, 6379, 7001, 7002,
        8000, 8008, 8080, 8081, 8088, 8443, 8500, 8888, 9000, 9092, 9200, 9300, 11211, 27017,
    ];
    DEFAULT.to_vec()
}

/// The short list the banner grabber sweeps by default.
pub fn banner_ports() -> Vec<u16> {
    vec![21, 22, 25, 80, 110, 143, 443, 587, 3306, 8080]
}

/// Best-effort service name for a well-known port.
pub fn well_known_service(port: u16) -> Option<&'static str> {
    let name = match port {
        21 => "ftp",
        22 => "ssh",
        23 => "telnet",
        25 => "smtp",
        53 => "dns",
        80 => "http",
        110 => "pop3",
        143 => "imap",
        443 => "https",
        445 => "smb",
        587 => "submission",
        993 => "imaps",
        995 => "pop3s",
        1433 => "mssql",
        3306 => "mysql",
        3389 => "rdp",
        5432 => "postgres",
        5900 => "vnc",
        6379 => "redis",
        8080 => "http-alt",
        8443 => "https-alt",
        9200 => "elasticsearch",
        11211 => "memcached",
        27017 => "mongodb",
        _ => return None,
    };
    Some(name)
}

fn parse_port_str(s: &str) -> Result<u16> {
    let val: u32 = s.parse::<u32>().map_err(|e| anyhow::anyhow!(e))?;
    if val == 0 || val > 65535 {
        bail!("port out of range: {val}");
    }
    Ok(val as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_ports() {
        let input = "80\n22\n   443  \n";
        let ports = parse_ports_str(input).unwrap();
        assert_eq!(ports, vec![80, 22, 443]);
    }

    #[test]
    fn parse_comma_separated_inline() {
        let ports = parse_ports_str("21,22, 80,443").unwrap();
        assert_eq!(ports, vec![21, 22, 80, 443]);
    }

    #[test]
    fn parse_ranges_and_dedup() {
        let input = "8000-8002\n80\n8001\n";
        let ports = parse_ports_str(input).unwrap();
        assert_eq!(ports, vec![8000, 8001, 8002, 80]);
    }

    #[test]
    fn invalid_values_error() {
        let input = "70000\n"; // out of range
        assert!(parse_ports_str(input).is_err());
    }

    #[test]
    fn service_table_knows_common_ports() {
        assert_eq!(well_known_service(22), Some("ssh"));
        assert_eq!(well_known_service(64000), None);
    }
}
