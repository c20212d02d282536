//! REST adapter implementing the core ports

mod gateway;

pub use gateway::RestGateway;
