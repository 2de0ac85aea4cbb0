//! The five-step cooperative loop that drives one venue: pull client
//! orders, release delayed orders into the book, advance background flow,
//! snapshot the top of book, and release delayed ticks.

use crate::config::Config;
use crate::delay_line::DelayLine;
use crate::rfg::RandomOrderFlow;
use crate::wire::{self, ClientMsg};
use orderbook::{BookError, Kind, Order, OrderBook, OrderId, Trade};
use std::net::SocketAddr;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::net::UdpSocket;
use tokio::time::Duration;

pub struct ExchangeSimulator {
    exch_id: String,
    symbol: String,
    seq: u64,

    book: OrderBook,
    rand_flow: RandomOrderFlow,

    order_latency_mean_ns: f64,
    order_latency_std_ns: f64,
    feed_latency_mean_ns: f64,
    feed_latency_std_ns: f64,

    pending_orders: DelayLine<Order>,
    pending_ticks: DelayLine<(f64, f64, u64)>,

    feed_sock: UdpSocket,
    feed_target: SocketAddr,
    fill_sock: UdpSocket,
    fill_target: SocketAddr,
    order_sock: UdpSocket,

    tick_interval_ns: u128,
    last_tick_ns: u128,
    synthetic_mid: f64,

    clock_origin: Instant,
}

fn wall_clock_ns() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is after the unix epoch")
        .as_nanos()
}

impl ExchangeSimulator {
    pub async fn new(cfg: &Config) -> std::io::Result<Self> {
        let feed_sock = UdpSocket::bind("0.0.0.0:0").await?;
        feed_sock
            .connect((cfg.feed_target_ip.as_str(), cfg.feed_port))
            .await?;
        let feed_target: SocketAddr = format!("{}:{}", cfg.feed_target_ip, cfg.feed_port).parse().unwrap();

        let fill_sock = UdpSocket::bind("0.0.0.0:0").await?;
        fill_sock
            .connect((cfg.fill_target_ip.as_str(), cfg.fill_target_port))
            .await?;
        let fill_target: SocketAddr = format!("{}:{}", cfg.fill_target_ip, cfg.fill_target_port)
            .parse()
            .unwrap();

        let order_sock = UdpSocket::bind((cfg.order_listen_ip.as_str(), cfg.order_port)).await?;

        tracing::info!(
            exch_id = %cfg.exch_id,
            symbol = %cfg.symbol,
            feed = %feed_target,
            orders = %format!("{}:{}", cfg.order_listen_ip, cfg.order_port),
            fills = %fill_target,
            order_latency_us = cfg.order_latency_us_mean,
            feed_latency_us = cfg.feed_latency_us_mean,
            "venue simulator up"
        );

        Ok(Self {
            exch_id: cfg.exch_id.clone(),
            symbol: cfg.symbol.clone(),
            seq: 0,
            book: OrderBook::new(cfg.symbol.clone(), cfg.tick_size),
            rand_flow: RandomOrderFlow::new(cfg.exch_id.clone(), cfg.base_price, cfg.volatility),
            order_latency_mean_ns: cfg.order_latency_us_mean.max(0.0) * 1000.0,
            order_latency_std_ns: cfg.order_latency_us_std.max(0.0) * 1000.0,
            feed_latency_mean_ns: cfg.feed_latency_us_mean.max(0.0) * 1000.0,
            feed_latency_std_ns: cfg.feed_latency_us_std.max(0.0) * 1000.0,
            pending_orders: DelayLine::new(),
            pending_ticks: DelayLine::new(),
            feed_sock,
            feed_target,
            fill_sock,
            fill_target,
            order_sock,
            tick_interval_ns: (1e9 / cfg.tick_hz) as u128,
            last_tick_ns: 0,
            synthetic_mid: cfg.base_price,
            clock_origin: Instant::now(),
        })
    }

    fn now_mono_ns(&self) -> u128 {
        self.clock_origin.elapsed().as_nanos()
    }

    /// Runs the simulator forever. One iteration is exactly the five steps:
    /// poll client messages, release due orders, advance background flow,
    /// maybe snapshot the book, release due ticks.
    pub async fn run(&mut self) -> ! {
        loop {
            self.process_client_messages().await;

            let now_mono_ns = self.now_mono_ns();
            self.process_pending_orders(now_mono_ns).await;
            self.step_background_flow(now_mono_ns).await;

            if now_mono_ns - self.last_tick_ns >= self.tick_interval_ns {
                self.publish_tick(now_mono_ns);
                self.last_tick_ns = now_mono_ns;
            }

            self.flush_pending_ticks(now_mono_ns).await;
        }
    }

    async fn process_client_messages(&mut self) {
        let mut buf = [0u8; 4096];
        let result = tokio::time::timeout(Duration::from_millis(5), self.order_sock.recv_from(&mut buf)).await;
        let Ok(read) = result else {
            return;
        };
        let Ok((n, _addr)) = read else {
            return;
        };
        let msg = String::from_utf8_lossy(&buf[..n]);
        let msg = msg.trim();
        if msg.is_empty() {
            return;
        }

        match wire::parse_client_msg(msg) {
            Ok(ClientMsg::New {
                client_id,
                client_order_id,
                side,
                kind,
                price,
                qty,
            }) => {
                let now_mono_ns = self.now_mono_ns();
                let px_ticks = self.book.round_to_ticks(price);
                let order = Order::new(
                    OrderId(client_order_id),
                    client_id,
                    self.symbol.clone(),
                    side,
                    kind,
                    px_ticks,
                    qty,
                    now_mono_ns,
                );
                self.schedule_order(order, now_mono_ns);
            }
            Ok(ClientMsg::Cancel { client_order_id, .. }) => {
                // CXL bypasses the delay line entirely and applies immediately.
                if !self.book.cancel_order(OrderId(client_order_id)) {
                    tracing::warn!(exch_id = %self.exch_id, client_order_id, "cancel failed: order not found");
                }
            }
            Err(err) => {
                tracing::warn!(exch_id = %self.exch_id, %msg, %err, "bad client message");
            }
        }
    }

    fn schedule_order(&mut self, order: Order, now_mono_ns: u128) {
        self.pending_orders.schedule(
            now_mono_ns,
            self.order_latency_mean_ns,
            self.order_latency_std_ns,
            order,
        );
    }

    async fn process_pending_orders(&mut self, now_mono_ns: u128) {
        for mut order in self.pending_orders.release_due(now_mono_ns) {
            // the order's arrival timestamp at the book is the post-delay
            // instant, not its original receipt time.
            order.ts_ns = now_mono_ns;
            match self.book.add_order(order) {
                Ok(trades) => {
                    for trade in trades {
                        self.log_trade(&trade).await;
                    }
                }
                Err(BookError::InvalidOrder { reason }) => {
                    tracing::warn!(exch_id = %self.exch_id, reason, "rejected invalid order");
                }
            }
        }
    }

    async fn step_background_flow(&mut self, now_mono_ns: u128) {
        let trades = self.rand_flow.step(&mut self.book, now_mono_ns);
        for trade in trades {
            self.log_trade(&trade).await;
        }
    }

    async fn log_trade(&mut self, trade: &Trade) {
        tracing::info!(
            exch_id = %self.exch_id,
            symbol = %trade.symbol,
            qty = trade.qty,
            px_ticks = trade.px_ticks,
            taker = %format!("{}:{}", trade.taker_client_id, trade.taker.0),
            maker = %format!("{}:{}", trade.maker_client_id, trade.maker.0),
            "trade"
        );

        let send_ts_ns = wall_clock_ns();
        let price = trade.px_ticks as f64 * self.book.tick_size;
        let msg = wire::format_fill(
            &self.exch_id,
            &trade.symbol,
            price,
            trade.qty,
            &trade.taker_client_id,
            trade.taker.0,
            &trade.maker_client_id,
            trade.maker.0,
            send_ts_ns,
        );
        if let Err(err) = self.fill_sock.send_to(msg.as_bytes(), self.fill_target).await {
            tracing::warn!(exch_id = %self.exch_id, %err, "error sending FILL");
        }
    }

    fn publish_tick(&mut self, now_mono_ns: u128) {
        let (bid_top, ask_top) = self.book.top_of_book();
        let ticks_to_px = |px: i64| px as f64 * self.book.tick_size;

        let (mut bid, mut ask) = (bid_top.map(|(px, _)| ticks_to_px(px)), ask_top.map(|(px, _)| ticks_to_px(px)));

        match (bid, ask) {
            (None, None) => {
                bid = Some(self.synthetic_mid - 0.25);
                ask = Some(self.synthetic_mid + 0.25);
            }
            (None, Some(a)) => bid = Some(a - 0.5),
            (Some(b), None) => ask = Some(b + 0.5),
            _ => {}
        }
        let (bid, ask) = (bid.unwrap(), ask.unwrap());

        self.synthetic_mid = (bid + ask) / 2.0;
        self.seq += 1;

        self.pending_ticks.schedule(
            now_mono_ns,
            self.feed_latency_mean_ns,
            self.feed_latency_std_ns,
            (bid, ask, self.seq),
        );
    }

    async fn flush_pending_ticks(&mut self, now_mono_ns: u128) {
        for (bid, ask, seq) in self.pending_ticks.release_due(now_mono_ns) {
            let send_ts_ns = wall_clock_ns();
            let msg = wire::format_tick(&self.exch_id, &self.symbol, bid, ask, seq, send_ts_ns);
            if let Err(err) = self.feed_sock.send_to(msg.as_bytes(), self.feed_target).await {
                tracing::warn!(exch_id = %self.exch_id, %err, "error sending TICK");
            }
        }
    }
}
