//! Helpers for tests in this and downstream crates.
pub mod prepare_env;
mod stub_gateway;

pub use stub_gateway::StubGateway;
