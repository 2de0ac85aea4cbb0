//! HFT Ledger Performance Test Suite
//!
//! Runs performance tests followed by a basic trading demo showing
//! order placement, matching, cancellation, and the book's error path.

use orderbook::{BookError, Kind, Order, OrderBook, OrderId, Side};


/// Main entry point - runs performance tests and demo.
fn main() {
    println!("=== HFT Ledger Performance Lab ===");

    // Run comprehensive performance tests
    latency_test::run_latency_tests();
    latency_test::run_throughput_test();

    // Run 1-minute sustained throughput test
    println!("\n=== 1-Minute Sustained Throughput Test ===");
    latency_test::run_throughput_test_1min();

    // Show basic order book functionality
    println!("\n=== Basic Demo ===");
    run_basic_demo();
}

/// Demonstrates basic order book functionality: resting liquidity, a
/// partial cross, a market sweep, a cancel, and the InvalidOrder path.
fn run_basic_demo() {
    let mut ob = OrderBook::new("AAPL", 0.01);

    println!("HFT Ledger - Order Book Demo");

    // Add ask order at $150.00
    let ask_order = Order::new(OrderId(1), "C1", "AAPL", Side::Ask, Kind::Limit, 15000, 100.0, 1_000_000_000);

    // Add bid order at $149.50 (creates spread)
    let bid_order = Order::new(OrderId(2), "C2", "AAPL", Side::Bid, Kind::Limit, 14950, 50.0, 1_000_000_001);

    println!("Submitting ask order: {} @ {} ticks", ask_order.qty, ask_order.px_ticks);
    ob.add_order(ask_order).unwrap();

    println!("Submitting bid order: {} @ {} ticks", bid_order.qty, bid_order.px_ticks);
    ob.add_order(bid_order).unwrap();

    println!("Best bid: {:?}", ob.best_bid());
    println!("Best ask: {:?}", ob.best_ask());

    // Crossing bid that will execute against the ask
    let crossing_bid = Order::new(OrderId(3), "C3", "AAPL", Side::Bid, Kind::Limit, 15000, 75.0, 1_000_000_002);

    println!("Submitting crossing bid: {} @ {} ticks", crossing_bid.qty, crossing_bid.px_ticks);
    let trades = ob.add_order(crossing_bid).unwrap();

    println!("Trades executed: {}", trades.len());
    for trade in &trades {
        // Trade prints at maker's price (15000): maker is order 1, taker is order 3.
        println!("  Trade: {} shares @ {} ticks", trade.qty, trade.px_ticks);
    }

    println!("Final best bid: {:?}", ob.best_bid()); // Original bid remains
    println!("Final best ask: {:?}", ob.best_ask()); // 25 shares left of original ask

    // A market order that outruns resting liquidity: the unfilled
    // remainder is silently discarded rather than resting.
    let sweep = Order::new_market(OrderId(4), "C4", "AAPL", Side::Bid, 500.0, 1_000_000_003);
    let trades = ob.add_order(sweep).unwrap();
    println!("Market sweep executed {} trade(s); unfilled remainder discarded", trades.len());
    println!("Best ask after sweep: {:?}", ob.best_ask());

    // Cancel the resting bid.
    println!("Cancelling order 2: {}", ob.cancel_order(OrderId(2)));
    println!("Cancelling order 2 again (already gone): {}", ob.cancel_order(OrderId(2)));

    // Negative quantity is rejected with InvalidOrder rather than a panic.
    let bad = Order::new(OrderId(5), "C5", "AAPL", Side::Bid, Kind::Limit, 14900, -10.0, 1_000_000_004);
    match ob.add_order(bad) {
        Ok(_) => unreachable!("negative quantity must be rejected"),
        Err(BookError::InvalidOrder { reason }) => println!("Rejected bad order as expected: {reason}"),
    }
}
