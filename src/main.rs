use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use recon_probe_rs::config::ProbeConfig;
use recon_probe_rs::modules::{
    self, banner_grab, dir_brute, port_scan, reverse_dns, subdomain_brute, vuln_paths,
};
use recon_probe_rs::output::{print_summary, print_table, write_report_json};
use recon_probe_rs::types::OutcomeOrder;
use recon_probe_rs::{inputs, ports};

/// recon-probe-rs — async recon toolkit built on a bounded-concurrency batch probe engine.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "recon-probe-rs",
    version,
    about = "Async recon toolkit: port scan, banner grab, dir/vuln/subdomain enumeration, reverse DNS.",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Max concurrent probes in flight.
    #[arg(long, global = true, default_value_t = 50)]
    concurrency: usize,

    /// Per-probe timeout in milliseconds.
    #[arg(long = "timeout-ms", global = true, default_value_t = 5000)]
    timeout_ms: u64,

    /// Report outcomes in completion order instead of submission order.
    #[arg(long, global = true, default_value_t = false)]
    completion_order: bool,

    /// Skip TLS certificate verification on HTTPS probes.
    #[arg(long, global = true, default_value_t = false)]
    insecure: bool,

    /// Write the report as pretty JSON to this path (optional).
    #[arg(long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// TCP connect scan over a port list.
    Portscan {
        /// Hostname or IP address to scan.
        target: String,
        /// Ports spec: `22,80,443` or `8000-8100` (defaults to common ports).
        #[arg(long)]
        ports: Option<String>,
        /// Read the ports spec from a file instead.
        #[arg(long = "ports-file")]
        ports_file: Option<PathBuf>,
    },
    /// Banner grab on common service ports.
    Banner {
        target: String,
        #[arg(long)]
        ports: Option<String>,
    },
    /// Directory brute force from a wordlist.
    Dirbrute {
        target: String,
        #[arg(long, default_value = "http")]
        scheme: String,
        /// Wordlist file (one path per line); a small built-in list otherwise.
        #[arg(long)]
        wordlist: Option<PathBuf>,
    },
    /// Probe well-known sensitive paths.
    Vulnscan {
        target: String,
        #[arg(long, default_value = "http")]
        scheme: String,
    },
    /// Subdomain brute force via DNS resolution.
    Subenum {
        domain: String,
        /// Wordlist file (one label per line); a small built-in list otherwise.
        #[arg(long)]
        wordlist: Option<PathBuf>,
    },
    /// Reverse-DNS sweep over a CIDR block.
    Revdns {
        cidr: String,
        /// Cap on the number of hosts swept.
        #[arg(long, default_value_t = 256)]
        limit: usize,
    },
    /// List the available modules.
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let cli = Cli::parse();

    let config = ProbeConfig {
        concurrency: cli.concurrency,
        per_unit_timeout: Duration::from_millis(cli.timeout_ms),
        verify_tls: !cli.insecure,
        ..ProbeConfig::default()
    };
    let order = if cli.completion_order {
        OutcomeOrder::Completion
    } else {
        OutcomeOrder::Submission
    };

    // Ctrl-C cancels the running batch; the engine fills the remaining
    // outcome slots instead of tearing the process down mid-scan.
    let cancel = CancellationToken::new();
    let cancel_ctrlc = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        cancel_ctrlc.cancel();
    });

    println!("recon-probe-rs configuration:");
    println!("  concurrency  : {}", config.concurrency);
    println!("  timeout_ms   : {}", cli.timeout_ms);
    println!("  order        : {:?}", order);
    println!("  verify_tls   : {}", config.verify_tls);
    println!();

    match cli.command {
        Command::Portscan {
            target,
            ports: spec,
            ports_file,
        } => {
            let port_list = match (spec, ports_file) {
                (Some(s), _) => ports::parse_ports_str(&s)?,
                (None, Some(path)) => ports::load_ports_from_path(path)?,
                (None, None) => ports::default_ports(),
            };
            let report = port_scan::run(&target, port_list, &config, order, cancel).await?;
            let rows: Vec<Vec<String>> = report
                .findings
                .iter()
                .map(|f| {
                    vec![
                        f.port.to_string(),
                        f.service.unwrap_or("-").to_string(),
                        f.latency_ms.to_string(),
                        f.banner.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            print_table(&["port", "service", "latency_ms", "banner"], &rows);
            finish(&report, cli.output.as_deref())?;
        }
        Command::Banner {
            target,
            ports: spec,
        } => {
            let port_list = match spec {
                Some(s) => ports::parse_ports_str(&s)?,
                None => ports::banner_ports(),
            };
            let report = banner_grab::run(&target, port_list, &config, order, cancel).await?;
            let rows: Vec<Vec<String>> = report
                .findings
                .iter()
                .map(|f| {
                    vec![
                        f.port.to_string(),
                        f.service.unwrap_or("-").to_string(),
                        f.banner.clone().unwrap_or_else(|| "-".to_string()),
                    ]
                })
                .collect();
            print_table(&["port", "service", "banner"], &rows);
            finish(&report, cli.output.as_deref())?;
        }
        Command::Dirbrute {
            target,
            scheme,
            wordlist,
        } => {
            let words = match wordlist {
                Some(path) => inputs::load_wordlist_from_path(path)?,
                None => dir_brute::DEFAULT_WORDLIST
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            };
            let report = dir_brute::run(&target, &scheme, words, &config, order, cancel).await?;
            let rows: Vec<Vec<String>> = report
                .findings
                .iter()
                .map(|f| {
                    vec![
                        f.path.clone(),
                        f.status.to_string(),
                        f.size.to_string(),
                        f.url.clone(),
                    ]
                })
                .collect();
            print_table(&["path", "status", "size", "url"], &rows);
            finish(&report, cli.output.as_deref())?;
        }
        Command::Vulnscan { target, scheme } => {
            let report = vuln_paths::run(&target, &scheme, &config, order, cancel).await?;
            let rows: Vec<Vec<String>> = report
                .findings
                .iter()
                .map(|f| {
                    vec![
                        f.check.clone(),
                        f.status.to_string(),
                        f.length.to_string(),
                        f.leaks.join(", "),
                        f.note.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            print_table(&["check", "status", "length", "leaks", "note"], &rows);
            finish(&report, cli.output.as_deref())?;
        }
        Command::Subenum { domain, wordlist } => {
            let labels = match wordlist {
                Some(path) => inputs::load_wordlist_from_path(path)?,
                None => subdomain_brute::DEFAULT_LABELS
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            };
            let report = subdomain_brute::run(&domain, labels, &config, order, cancel).await?;
            let rows: Vec<Vec<String>> = report
                .findings
                .iter()
                .map(|f| {
                    let ips: Vec<String> = f.ips.iter().map(|ip| ip.to_string()).collect();
                    vec![f.subdomain.clone(), ips.join(", ")]
                })
                .collect();
            print_table(&["subdomain", "ips"], &rows);
            finish(&report, cli.output.as_deref())?;
        }
        Command::Revdns { cidr, limit } => {
            let report = reverse_dns::run(&cidr, limit, &config, order, cancel).await?;
            let rows: Vec<Vec<String>> = report
                .findings
                .iter()
                .map(|f| vec![f.ip.to_string(), f.hostname.clone()])
                .collect();
            print_table(&["ip", "hostname"], &rows);
            finish(&report, cli.output.as_deref())?;
        }
        Command::List => {
            let rows: Vec<Vec<String>> = modules::REGISTRY
                .iter()
                .map(|m| vec![m.id.to_string(), m.summary.to_string()])
                .collect();
            print_table(&["module", "summary"], &rows);
        }
    }

    Ok(())
}

fn finish<T: serde::Serialize>(
    report: &recon_probe_rs::modules::ScanReport<T>,
    output: Option<&std::path::Path>,
) -> Result<()> {
    print_summary(report);
    if let Some(path) = output {
        write_report_json(path, report)?;
        println!("Wrote JSON report to {}", path.display());
    }
    Ok(())
}
