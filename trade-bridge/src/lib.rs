pub mod arb_log;
pub mod bridge;
pub mod config;
pub mod wire;
