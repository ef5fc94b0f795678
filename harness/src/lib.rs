//! Thin external adapters driving the `engine` crate: an in-memory
//! registry, a deterministic RNG oracle, a sequential matchmaker, and a
//! tracing hook. No HTTP transport; this crate is the in-process harness,
//! not a server.

pub mod hooks;
pub mod matchmaker;
pub mod registry;
pub mod rng;

pub use hooks::{install_tracing, TracingHook};
pub use matchmaker::SequentialMatchmaker;
pub use registry::Registry;
pub use rng::StdRngOracle;
