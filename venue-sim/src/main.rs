use clap::Parser;
use venue_sim::config::Config;
use venue_sim::simulator::ExchangeSimulator;

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = Config::parse();
    let mut sim = ExchangeSimulator::new(&cfg).await?;
    sim.run().await;
}
