use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use orderbook::{Kind, Order, OrderBook, OrderId, Side};

fn limit(id: u64, symbol: &str, side: Side, px: i64, qty: f64, ts: u128) -> Order {
    Order::new(OrderId(id), "BENCH", symbol, side, Kind::Limit, px, qty, ts)
}

fn bench_order_submission(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_submission");

    for &num_orders in [100, 1000, 10000].iter() {
        group.bench_with_input(
            BenchmarkId::new("non_crossing_orders", num_orders),
            &num_orders,
            |b, &num_orders| {
                b.iter(|| {
                    let mut ob = OrderBook::new("AAPL", 0.01);
                    for i in 0..num_orders {
                        let order = limit(
                            i as u64,
                            "AAPL",
                            if i % 2 == 0 { Side::Bid } else { Side::Ask },
                            if i % 2 == 0 { 10000 - i as i64 } else { 10100 + i as i64 },
                            100.0,
                            i as u128,
                        );
                        black_box(ob.add_order(order).unwrap());
                    }
                })
            },
        );
    }

    group.finish();
}

fn bench_order_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_matching");

    for &depth in [10, 100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::new("crossing_orders", depth),
            &depth,
            |b, &depth| {
                b.iter_batched(
                    || {
                        let mut ob = OrderBook::new("AAPL", 0.01);
                        for i in 0..depth {
                            let ask = limit(i as u64, "AAPL", Side::Ask, 10000 + i as i64, 100.0, i as u128);
                            ob.add_order(ask).unwrap();

                            let bid = limit(
                                (i + depth) as u64,
                                "AAPL",
                                Side::Bid,
                                9999 - i as i64,
                                100.0,
                                (i + depth) as u128,
                            );
                            ob.add_order(bid).unwrap();
                        }
                        ob
                    },
                    |mut ob| {
                        let crossing = limit(
                            (depth * 2) as u64,
                            "AAPL",
                            Side::Bid,
                            10000 + depth as i64,
                            (depth * 50) as f64,
                            (depth * 2) as u128,
                        );
                        black_box(ob.add_order(crossing).unwrap())
                    },
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

fn bench_market_data_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("market_data");

    let mut ob = OrderBook::new("AAPL", 0.01);
    for i in 0..1000u64 {
        let ask = limit(i, "AAPL", Side::Ask, 10000 + i as i64, 100.0, i as u128);
        ob.add_order(ask).unwrap();
        let bid = limit(i + 1000, "AAPL", Side::Bid, 9999 - i as i64, 100.0, (i + 1000) as u128);
        ob.add_order(bid).unwrap();
    }

    group.bench_function("best_bid", |b| b.iter(|| black_box(ob.best_bid())));
    group.bench_function("best_ask", |b| b.iter(|| black_box(ob.best_ask())));
    group.bench_function("top_of_book", |b| b.iter(|| black_box(ob.top_of_book())));

    group.finish();
}

fn bench_price_levels_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("price_levels");

    let mut bids = orderbook::PriceLevels::new(Side::Bid);
    let mut asks = orderbook::PriceLevels::new(Side::Ask);

    for i in 0..1000u64 {
        let bid_order = limit(i, "AAPL", Side::Bid, 9999 - i as i64, 100.0, i as u128);
        let ask_order = limit(i + 1000, "AAPL", Side::Ask, 10000 + i as i64, 100.0, (i + 1000) as u128);
        bids.push(bid_order);
        asks.push(ask_order);
    }

    group.bench_function("best_price_bid", |b| b.iter(|| black_box(bids.best_price())));
    group.bench_function("best_price_ask", |b| b.iter(|| black_box(asks.best_price())));
    group.bench_function("total_len_bid", |b| b.iter(|| black_box(bids.total_len())));
    group.bench_function("best_qty", |b| b.iter(|| black_box(bids.best_qty())));

    group.finish();
}

fn bench_order_cancellation(c: &mut Criterion) {
    let mut group = c.benchmark_group("cancellation");

    for &num_orders in [100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::new("eager_cancel", num_orders),
            &num_orders,
            |b, &num_orders| {
                b.iter_batched(
                    || {
                        let mut bids = orderbook::PriceLevels::new(Side::Bid);
                        let mut order_ids = Vec::new();
                        for i in 0..num_orders {
                            let order = limit(i as u64, "AAPL", Side::Bid, 10000, 100.0, i as u128);
                            order_ids.push(order.id);
                            bids.push(order);
                        }
                        (bids, order_ids)
                    },
                    |(mut bids, order_ids)| {
                        for (i, &order_id) in order_ids.iter().enumerate() {
                            if i % 2 == 0 {
                                black_box(bids.cancel(order_id));
                            }
                        }
                        while bids.pop_best().is_some() {}
                    },
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

fn bench_high_frequency_scenario(c: &mut Criterion) {
    let mut group = c.benchmark_group("hft_scenario");

    group.bench_function("rapid_order_flow", |b| {
        b.iter(|| {
            let mut ob = OrderBook::new("AAPL", 0.01);
            let mut order_id = 1u64;

            for _ in 0..100 {
                for i in 0..5i64 {
                    let ask = limit(order_id, "AAPL", Side::Ask, 10000 + i, 100.0, order_id as u128);
                    order_id += 1;
                    ob.add_order(ask).unwrap();

                    let bid = limit(order_id, "AAPL", Side::Bid, 9999 - i, 100.0, order_id as u128);
                    order_id += 1;
                    ob.add_order(bid).unwrap();
                }

                let crossing = limit(order_id, "AAPL", Side::Bid, 10002, 300.0, order_id as u128);
                order_id += 1;
                black_box(ob.add_order(crossing).unwrap());

                black_box(ob.best_bid());
                black_box(ob.best_ask());
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_order_submission,
    bench_order_matching,
    bench_market_data_access,
    bench_price_levels_operations,
    bench_order_cancellation,
    bench_high_frequency_scenario
);

criterion_main!(benches);
