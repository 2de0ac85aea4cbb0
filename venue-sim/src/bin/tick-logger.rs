//! Standalone collector: listens for `TICK` datagrams from two venues and
//! appends each one to a per-venue CSV tape, discarding the wire timestamp
//! in favor of the host's own receive time (so downstream analysis compares
//! apples to apples across venues observed by the same host).

use clap::Parser;
use csv::Writer;
use std::fs::File;
use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::net::UdpSocket;
use venue_sim::wire;

#[derive(Parser, Debug)]
#[command(name = "tick-logger", about = "Logs TICK datagrams from two venues to CSV")]
struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    listen_ip: String,

    #[arg(long, default_value_t = 6001)]
    exa_port: u16,
    #[arg(long, default_value_t = 6002)]
    exb_port: u16,

    #[arg(long, default_value = "exa_ticks.csv")]
    exa_out: String,
    #[arg(long, default_value = "exb_ticks.csv")]
    exb_out: String,
}

fn host_now_ns() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is after the unix epoch")
        .as_nanos()
}

fn open_writer(path: &str) -> csv::Result<Writer<File>> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["ts_ns_host", "exch", "symbol", "bid", "ask", "seq"])?;
    writer.flush()?;
    Ok(writer)
}

async fn log_loop(sock: UdpSocket, mut writer: Writer<File>, label: &str) {
    let mut buf = [0u8; 4096];
    loop {
        let Ok((n, _addr)) = sock.recv_from(&mut buf).await else {
            continue;
        };
        let msg = String::from_utf8_lossy(&buf[..n]);
        let msg = msg.trim();
        match wire::parse_tick_msg(msg) {
            Ok(tick) => {
                let ts_ns_host = host_now_ns();
                let row = [
                    ts_ns_host.to_string(),
                    tick.exch_id,
                    tick.symbol,
                    format!("{:.2}", tick.bid),
                    format!("{:.2}", tick.ask),
                    tick.seq.to_string(),
                ];
                if writer.write_record(&row).is_ok() {
                    let _ = writer.flush();
                }
            }
            Err(err) => {
                tracing::warn!(%label, %msg, %err, "bad TICK message");
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let exa_addr: SocketAddr = format!("{}:{}", args.listen_ip, args.exa_port).parse().unwrap();
    let exb_addr: SocketAddr = format!("{}:{}", args.listen_ip, args.exb_port).parse().unwrap();

    let exa_sock = UdpSocket::bind(exa_addr).await?;
    let exb_sock = UdpSocket::bind(exb_addr).await?;

    let exa_writer = open_writer(&args.exa_out).expect("failed to open EXA tick log");
    let exb_writer = open_writer(&args.exb_out).expect("failed to open EXB tick log");

    tracing::info!(%exa_addr, %exb_addr, "tick logger up");

    tokio::join!(
        log_loop(exa_sock, exa_writer, "EXA"),
        log_loop(exb_sock, exb_writer, "EXB"),
    );

    Ok(())
}
