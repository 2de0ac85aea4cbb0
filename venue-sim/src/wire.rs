//! Hand-rolled ASCII wire codec. All messages are space-separated text, one
//! datagram per message — no serde/JSON on the wire, matching the host
//! system this simulator replaces.

use orderbook::{Kind, Side};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WireParseError {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("NEW requires 7 fields, got {0}")]
    BadNewArity(usize),
    #[error("CXL requires 3 fields, got {0}")]
    BadCxlArity(usize),
    #[error("bad side token {0:?}")]
    BadSide(String),
    #[error("bad order type token {0:?}")]
    BadKind(String),
    #[error("malformed numeric field: {0}")]
    BadNumber(String),
}

/// A decoded client order-entry datagram: `NEW`/`CXL`.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMsg {
    New {
        client_id: String,
        client_order_id: u64,
        side: Side,
        kind: Kind,
        price: f64,
        qty: f64,
    },
    Cancel {
        client_id: String,
        client_order_id: u64,
    },
}

pub fn parse_client_msg(msg: &str) -> Result<ClientMsg, WireParseError> {
    let parts: Vec<&str> = msg.split_whitespace().collect();
    let cmd = parts.first().copied().unwrap_or("").to_ascii_uppercase();

    match cmd.as_str() {
        "NEW" => {
            if parts.len() != 7 {
                return Err(WireParseError::BadNewArity(parts.len()));
            }
            let client_id = parts[1].to_string();
            let client_order_id = parts[2]
                .parse()
                .map_err(|_| WireParseError::BadNumber(parts[2].to_string()))?;
            let side = Side::from_wire(&parts[3].to_ascii_uppercase())
                .ok_or_else(|| WireParseError::BadSide(parts[3].to_string()))?;
            let kind = Kind::from_wire(&parts[4].to_ascii_uppercase())
                .ok_or_else(|| WireParseError::BadKind(parts[4].to_string()))?;
            let price: f64 = parts[5]
                .parse()
                .map_err(|_| WireParseError::BadNumber(parts[5].to_string()))?;
            let qty: f64 = parts[6]
                .parse()
                .map_err(|_| WireParseError::BadNumber(parts[6].to_string()))?;
            Ok(ClientMsg::New {
                client_id,
                client_order_id,
                side,
                kind,
                price,
                qty,
            })
        }
        "CXL" => {
            if parts.len() != 3 {
                return Err(WireParseError::BadCxlArity(parts.len()));
            }
            let client_id = parts[1].to_string();
            let client_order_id = parts[2]
                .parse()
                .map_err(|_| WireParseError::BadNumber(parts[2].to_string()))?;
            Ok(ClientMsg::Cancel {
                client_id,
                client_order_id,
            })
        }
        other => Err(WireParseError::UnknownCommand(other.to_string())),
    }
}

/// `TICK <exch> <symbol> <bid> <ask> <seq> <send_ts_ns>`
pub fn format_tick(exch_id: &str, symbol: &str, bid: f64, ask: f64, seq: u64, send_ts_ns: u128) -> String {
    format!("TICK {exch_id} {symbol} {bid:.2} {ask:.2} {seq} {send_ts_ns}")
}

/// `FILL <exch> <symbol> <price> <qty> <taker_client> <taker_oid> <maker_client> <maker_oid> <ts_ns>`
#[allow(clippy::too_many_arguments)]
pub fn format_fill(
    exch_id: &str,
    symbol: &str,
    price: f64,
    qty: f64,
    taker_client: &str,
    taker_oid: u64,
    maker_client: &str,
    maker_oid: u64,
    send_ts_ns: u128,
) -> String {
    format!(
        "FILL {exch_id} {symbol} {price:.6} {qty:.6} {taker_client} {taker_oid} {maker_client} {maker_oid} {send_ts_ns}"
    )
}

/// A decoded `TICK` datagram, as consumed by `tick-logger`.
#[derive(Debug, Clone, PartialEq)]
pub struct TickMsg {
    pub exch_id: String,
    pub symbol: String,
    pub bid: f64,
    pub ask: f64,
    pub seq: u64,
}

pub fn parse_tick_msg(msg: &str) -> Result<TickMsg, WireParseError> {
    let parts: Vec<&str> = msg.split_whitespace().collect();
    if parts.len() != 7 || parts[0].to_ascii_uppercase() != "TICK" {
        return Err(WireParseError::UnknownCommand(msg.to_string()));
    }
    let bid: f64 = parts[3]
        .parse()
        .map_err(|_| WireParseError::BadNumber(parts[3].to_string()))?;
    let ask: f64 = parts[4]
        .parse()
        .map_err(|_| WireParseError::BadNumber(parts[4].to_string()))?;
    let seq: u64 = parts[5]
        .parse()
        .map_err(|_| WireParseError::BadNumber(parts[5].to_string()))?;
    Ok(TickMsg {
        exch_id: parts[1].to_string(),
        symbol: parts[2].to_string(),
        bid,
        ask,
        seq,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_new_limit() {
        let msg = parse_client_msg("NEW PT 42 B L 100.50 1.25").unwrap();
        assert_eq!(
            msg,
            ClientMsg::New {
                client_id: "PT".into(),
                client_order_id: 42,
                side: Side::Bid,
                kind: Kind::Limit,
                price: 100.50,
                qty: 1.25,
            }
        );
    }

    #[test]
    fn parses_new_market() {
        let msg = parse_client_msg("NEW BG_EXA 7 S M 99.0 0.05").unwrap();
        assert_eq!(
            msg,
            ClientMsg::New {
                client_id: "BG_EXA".into(),
                client_order_id: 7,
                side: Side::Ask,
                kind: Kind::Market,
                price: 99.0,
                qty: 0.05,
            }
        );
    }

    #[test]
    fn parses_cxl() {
        let msg = parse_client_msg("CXL PT 42").unwrap();
        assert_eq!(
            msg,
            ClientMsg::Cancel {
                client_id: "PT".into(),
                client_order_id: 42,
            }
        );
    }

    #[test]
    fn rejects_bad_arity() {
        assert_eq!(parse_client_msg("NEW PT 42 B L 100.5"), Err(WireParseError::BadNewArity(6)));
        assert_eq!(parse_client_msg("CXL PT"), Err(WireParseError::BadCxlArity(2)));
    }

    #[test]
    fn rejects_unknown_command() {
        assert!(matches!(parse_client_msg("PING"), Err(WireParseError::UnknownCommand(_))));
    }

    #[test]
    fn rejects_bad_side_and_kind() {
        assert!(matches!(
            parse_client_msg("NEW PT 1 X L 1.0 1.0"),
            Err(WireParseError::BadSide(_))
        ));
        assert!(matches!(
            parse_client_msg("NEW PT 1 B X 1.0 1.0"),
            Err(WireParseError::BadKind(_))
        ));
    }

    #[test]
    fn formats_tick_and_fill() {
        let tick = format_tick("EXA", "BTCUSD", 90000.1, 90000.6, 5, 123456789);
        assert_eq!(tick, "TICK EXA BTCUSD 90000.10 90000.60 5 123456789");

        let fill = format_fill("EXA", "BTCUSD", 90000.123456, 0.05, "PT", 1, "BG_EXA", 2, 999);
        assert_eq!(fill, "FILL EXA BTCUSD 90000.123456 0.050000 PT 1 BG_EXA 2 999");
    }

    #[test]
    fn parses_tick_round_trip() {
        let tick = format_tick("EXA", "BTCUSD", 90000.1, 90000.6, 5, 123456789);
        let parsed = parse_tick_msg(&tick).unwrap();
        assert_eq!(parsed.exch_id, "EXA");
        assert_eq!(parsed.symbol, "BTCUSD");
        assert_eq!(parsed.seq, 5);
    }
}
