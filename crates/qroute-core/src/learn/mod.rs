pub mod agent;
pub mod config;
pub mod env;
pub mod error;
pub mod exploration;
pub mod ids;
pub mod metrics;
pub mod snapshot;
pub mod table;

#[cfg(test)]
mod tests;
