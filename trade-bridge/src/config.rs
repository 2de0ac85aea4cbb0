//! CLI configuration: listen ports plus a venue routing table. The
//! reference bridge hardcoded `ORDER_PORTS = {"EXA": 9101, "EXB": 9102}`;
//! here the same mapping is a repeatable `--route NAME=host:port` flag.

use clap::Parser;
use std::collections::HashMap;
use std::net::SocketAddr;

#[derive(Parser, Debug, Clone)]
#[command(name = "trade-bridge", about = "Bridges a strategy's arb intents to per-venue orders")]
pub struct Config {
    #[arg(long, default_value = "0.0.0.0")]
    pub trade_listen_ip: String,
    #[arg(long, default_value_t = 7000)]
    pub trade_listen_port: u16,

    #[arg(long, default_value = "0.0.0.0")]
    pub fill_listen_ip: String,
    #[arg(long, default_value_t = 7100)]
    pub fill_listen_port: u16,

    /// Venue routing entries as `NAME=host:port`, e.g. `EXA=127.0.0.1:9101`.
    #[arg(long = "route", value_parser = parse_route)]
    pub routes: Vec<(String, SocketAddr)>,

    #[arg(long, default_value = "PT")]
    pub client_id: String,

    #[arg(long, default_value = "arb_log.csv")]
    pub arb_log_path: String,
}

impl Config {
    pub fn route_table(&self) -> HashMap<String, SocketAddr> {
        self.routes.iter().map(|(name, addr)| (name.to_ascii_uppercase(), *addr)).collect()
    }
}

fn parse_route(s: &str) -> Result<(String, SocketAddr), String> {
    let (name, addr) = s.split_once('=').ok_or_else(|| format!("expected NAME=host:port, got {s:?}"))?;
    let addr: SocketAddr = addr.parse().map_err(|e| format!("bad socket address {addr:?}: {e}"))?;
    Ok((name.to_ascii_uppercase(), addr))
}
