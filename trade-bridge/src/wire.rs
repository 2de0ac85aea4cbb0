//! Wire codec for the trade bridge's two inbound protocols (`TRADE` from the
//! strategy, `FILL` from a venue) and its one outbound protocol (`NEW` to a
//! venue's order port).

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WireParseError {
    #[error("TRADE requires 11 fields, got {0}")]
    BadTradeArity(usize),
    #[error("FILL requires 10 fields, got {0}")]
    BadFillArity(usize),
    #[error("wrong command tag, expected {expected}")]
    WrongCommand { expected: &'static str },
    #[error("malformed numeric field: {0}")]
    BadNumber(String),
}

/// `TRADE <strategy_id> <legA_exch> <legA_side> <legA_price> <legB_exch>
///        <legB_side> <legB_price> <size> <spread> <ts_ns>`
#[derive(Debug, Clone, PartialEq)]
pub struct TradeMsg {
    pub strategy_id: String,
    pub leg_a_exch: String,
    pub leg_a_side: String,
    pub leg_a_price: f64,
    pub leg_b_exch: String,
    pub leg_b_side: String,
    pub leg_b_price: f64,
    pub size: f64,
    pub spread: f64,
}

pub fn parse_trade_msg(msg: &str) -> Result<TradeMsg, WireParseError> {
    let parts: Vec<&str> = msg.split_whitespace().collect();
    if parts.len() != 11 {
        return Err(WireParseError::BadTradeArity(parts.len()));
    }
    if parts[0].to_ascii_uppercase() != "TRADE" {
        return Err(WireParseError::WrongCommand { expected: "TRADE" });
    }
    let num = |s: &str| s.parse::<f64>().map_err(|_| WireParseError::BadNumber(s.to_string()));
    Ok(TradeMsg {
        strategy_id: parts[1].to_string(),
        leg_a_exch: parts[2].to_string(),
        leg_a_side: parts[3].to_ascii_uppercase(),
        leg_a_price: num(parts[4])?,
        leg_b_exch: parts[5].to_string(),
        leg_b_side: parts[6].to_ascii_uppercase(),
        leg_b_price: num(parts[7])?,
        size: num(parts[8])?,
        spread: num(parts[9])?,
        // parts[10] (ts_ns) is the strategy's own timestamp; the bridge
        // doesn't need it, it stamps its own arb log with its own clock.
    })
}

/// `FILL <exch> <symbol> <price> <qty> <taker_client> <taker_oid>
///       <maker_client> <maker_oid> <ts_ns>`
#[derive(Debug, Clone, PartialEq)]
pub struct FillMsg {
    pub exch_id: String,
    pub symbol: String,
    pub price: f64,
    pub qty: f64,
    pub taker_client: String,
    pub taker_oid: u64,
    pub maker_client: String,
    pub maker_oid: u64,
}

pub fn parse_fill_msg(msg: &str) -> Result<FillMsg, WireParseError> {
    let parts: Vec<&str> = msg.split_whitespace().collect();
    if parts.len() != 10 {
        return Err(WireParseError::BadFillArity(parts.len()));
    }
    if parts[0].to_ascii_uppercase() != "FILL" {
        return Err(WireParseError::WrongCommand { expected: "FILL" });
    }
    let num = |s: &str| s.parse::<f64>().map_err(|_| WireParseError::BadNumber(s.to_string()));
    let int = |s: &str| s.parse::<u64>().map_err(|_| WireParseError::BadNumber(s.to_string()));
    Ok(FillMsg {
        exch_id: parts[1].to_ascii_uppercase(),
        symbol: parts[2].to_string(),
        price: num(parts[3])?,
        qty: num(parts[4])?,
        taker_client: parts[5].to_string(),
        taker_oid: int(parts[6])?,
        maker_client: parts[7].to_string(),
        maker_oid: int(parts[8])?,
    })
}

/// `NEW <client_id> <order_id> <side> L <price> <qty>`
pub fn format_new_limit(client_id: &str, order_id: u64, side_char: char, price: f64, qty: f64) -> String {
    format!("NEW {client_id} {order_id} {side_char} L {price:.6} {qty:.6}")
}
