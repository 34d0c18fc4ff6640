use crate::types::FailureReason;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{self, Instant};

/// Ports that usually speak HTTP and stay silent until spoken to.
const HTTP_STIMULUS_PORTS: &[u16] = &[80, 443, 8080, 8443];

/// Successful TCP probe: connect latency plus whatever the peer volunteered.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TcpHit {
    pub latency_ms: u64,
    pub banner: Option<String>,
}

/// Connect to `addr` and passively read a short banner.
///
/// The engine bounds the whole unit; `read_window` only bounds the banner
/// read so a silent-but-open port still reports success quickly.
pub async fn connect_probe(addr: SocketAddr, read_window: Duration) -> Result<TcpHit, FailureReason> {
    let start = Instant::now();
    let mut stream = TcpStream::connect(addr).await.map_err(classify_io)?;
    let latency_ms = start.elapsed().as_millis() as u64;
    let banner = read_banner(&mut stream, 256, read_window).await;
    Ok(TcpHit { latency_ms, banner })
}

/// Connect and actively solicit a banner: web ports get a minimal
/// `HEAD / HTTP/1.0` request first, everything else is read passively.
pub async fn banner_probe(
    addr: SocketAddr,
    host: &str,
    read_window: Duration,
) -> Result<TcpHit, FailureReason> {
    let start = Instant::now();
    let mut stream = TcpStream::connect(addr).await.map_err(classify_io)?;
    let latency_ms = start.elapsed().as_millis() as u64;

    if HTTP_STIMULUS_PORTS.contains(&addr.port()) {
        let req = format!("HEAD / HTTP/1.0\r\nHost: {host}\r\n\r\n");
        if let Err(e) = stream.write_all(req.as_bytes()).await {
            return Err(classify_io(e));
        }
    }

    let banner = read_banner(&mut stream, 1024, read_window).await;
    Ok(TcpHit { latency_ms, banner })
}

/// Read up to `max_bytes` with a short timeout and return a lossy UTF-8
/// string with line breaks escaped. `None` when the peer stays quiet.
async fn read_banner(stream: &mut TcpStream, max_bytes: usize, window: Duration) -> Option<String> {
    let mut buf = vec![0u8; max_bytes];
    match time::timeout(window, stream.read(&mut buf)).await {
        Ok(Ok(n)) if n > 0 => {
            buf.truncate(n);
            let s = String::from_utf8_lossy(&buf).trim().to_string();
            if s.is_empty() {
                None
            } else {
                Some(s.replace('\n', "\\n").replace('\r', "\\r"))
            }
        }
        _ => None,
    }
}

fn classify_io(err: std::io::Error) -> FailureReason {
    match err.kind() {
        ErrorKind::ConnectionRefused => FailureReason::ConnectionRefused,
        ErrorKind::TimedOut => FailureReason::Timeout,
        _ => FailureReason::Unknown,
    }
}
