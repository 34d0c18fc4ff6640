use crate::types::FailureReason;
use std::net::IpAddr;
use std::time::Duration;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::TokioAsyncResolver;

/// Build a resolver with a bounded query timeout. The resolver is cheaply
/// cloneable and shared across probe units.
pub fn resolver(timeout: Duration) -> TokioAsyncResolver {
    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    TokioAsyncResolver::tokio(ResolverConfig::default(), opts)
}

/// Forward resolution: all addresses for `name`.
pub async fn lookup_ips(
    resolver: TokioAsyncResolver,
    name: String,
) -> Result<Vec<IpAddr>, FailureReason> {
    let lookup = resolver.lookup_ip(name).await.map_err(classify_resolve)?;
    let ips: Vec<IpAddr> = lookup.iter().collect();
    if ips.is_empty() {
        return Err(FailureReason::DnsError);
    }
    Ok(ips)
}

/// Reverse resolution: the first PTR name for `ip`, without the trailing dot.
pub async fn reverse_hostname(
    resolver: TokioAsyncResolver,
    ip: IpAddr,
) -> Result<String, FailureReason> {
    let lookup = resolver.reverse_lookup(ip).await.map_err(classify_resolve)?;
    lookup
        .iter()
        .next()
        .map(|name| name.to_utf8().trim_end_matches('.').to_string())
        .ok_or(FailureReason::DnsError)
}

fn classify_resolve(err: ResolveError) -> FailureReason {
    match err.kind() {
        ResolveErrorKind::Timeout => FailureReason::Timeout,
        _ => FailureReason::DnsError,
    }
}
