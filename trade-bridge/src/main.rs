use clap::Parser;
use tokio::net::UdpSocket;
use trade_bridge::arb_log::ArbLog;
use trade_bridge::bridge::TradeBridge;
use trade_bridge::config::Config;
use trade_bridge::wire;

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();
    let cfg = Config::parse();

    let trade_sock = UdpSocket::bind((cfg.trade_listen_ip.as_str(), cfg.trade_listen_port)).await?;
    let fill_sock = UdpSocket::bind((cfg.fill_listen_ip.as_str(), cfg.fill_listen_port)).await?;
    let order_sock = UdpSocket::bind("0.0.0.0:0").await?;

    let arb_log = ArbLog::open(&cfg.arb_log_path).expect("failed to open arb log");
    let mut bridge = TradeBridge::new(cfg.client_id.clone(), cfg.route_table(), order_sock, arb_log);

    tracing::info!(
        trade = %format!("{}:{}", cfg.trade_listen_ip, cfg.trade_listen_port),
        fill = %format!("{}:{}", cfg.fill_listen_ip, cfg.fill_listen_port),
        routes = cfg.routes.len(),
        "trade bridge up"
    );

    let mut trade_buf = [0u8; 4096];
    let mut fill_buf = [0u8; 4096];
    loop {
        tokio::select! {
            result = trade_sock.recv_from(&mut trade_buf) => {
                let Ok((n, _addr)) = result else { continue };
                let msg = String::from_utf8_lossy(&trade_buf[..n]).trim().to_string();
                match wire::parse_trade_msg(&msg) {
                    Ok(trade) => { bridge.handle_trade(&trade).await; }
                    Err(err) => tracing::warn!(%msg, %err, "bad TRADE message"),
                }
            }
            result = fill_sock.recv_from(&mut fill_buf) => {
                let Ok((n, _addr)) = result else { continue };
                let msg = String::from_utf8_lossy(&fill_buf[..n]).trim().to_string();
                match wire::parse_fill_msg(&msg) {
                    Ok(fill) => {
                        for done in bridge.handle_fill(&fill) {
                            bridge.record_completed_arb(&done);
                        }
                    }
                    Err(err) => tracing::warn!(%msg, %err, "bad FILL message"),
                }
            }
        }
    }
}
