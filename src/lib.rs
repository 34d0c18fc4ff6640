//! Library crate for recon-probe-rs: a bounded-concurrency batch probe
//! engine plus the enumeration modules built on top of it.
pub mod config;
pub mod engine;
pub mod inputs;
pub mod modules;
pub mod output;
pub mod ports;
pub mod probes;
pub mod types;
