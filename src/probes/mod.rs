//! Probe actions consumed by the batch engine: TCP connect/banner, HTTP GET,
//! and DNS forward/reverse resolution. Each maps its transport errors into
//! the shared `FailureReason` taxonomy and leaves the overall deadline to the
//! engine's per-unit timeout.
pub mod dns;
pub mod http;
pub mod tcp;
