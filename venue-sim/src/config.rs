//! CLI configuration surface, one-to-one with the reference simulator's
//! `argparse` definitions (flag names translated to kebab-case).

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "venue-sim", about = "Single-symbol UDP venue simulator")]
pub struct Config {
    #[arg(long)]
    pub exch_id: String,

    #[arg(long, default_value = "BTCUSD")]
    pub symbol: String,

    #[arg(long, default_value_t = 90000.0)]
    pub base_price: f64,

    #[arg(long, default_value_t = 1.0)]
    pub volatility: f64,

    #[arg(long, default_value_t = 0.01)]
    pub tick_size: f64,

    #[arg(long)]
    pub feed_target_ip: String,
    #[arg(long)]
    pub feed_port: u16,

    #[arg(long, default_value = "0.0.0.0")]
    pub order_listen_ip: String,
    #[arg(long, default_value_t = 9000)]
    pub order_port: u16,

    #[arg(long)]
    pub fill_target_ip: String,
    #[arg(long)]
    pub fill_target_port: u16,

    #[arg(long, default_value_t = 50.0)]
    pub tick_hz: f64,

    #[arg(long = "order-latency-us-mean", default_value_t = 0.0)]
    pub order_latency_us_mean: f64,
    #[arg(long = "order-latency-us-std", default_value_t = 0.0)]
    pub order_latency_us_std: f64,
    #[arg(long = "feed-latency-us-mean", default_value_t = 0.0)]
    pub feed_latency_us_mean: f64,
    #[arg(long = "feed-latency-us-std", default_value_t = 0.0)]
    pub feed_latency_us_std: f64,
}
