//! RAII wrapper around the realized-arbitrage CSV log: opened once at
//! startup, flushed after every write, and closed when the bridge shuts
//! down (on `Drop`, so a panic or an orderly exit both release the file).

use chrono::Local;
use std::fs::File;

pub struct ArbLog {
    writer: csv::Writer<File>,
}

impl ArbLog {
    pub fn open(path: &str) -> csv::Result<Self> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["arb_id", "timestamp_iso", "size", "buy_px", "sell_px", "spread_realized", "pnl"])?;
        writer.flush()?;
        Ok(Self { writer })
    }

    pub fn record_completed_arb(&mut self, arb_id: u64, size: f64, buy_px: f64, sell_px: f64, spread_realized: f64, pnl: f64) -> csv::Result<()> {
        let ts_iso = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.writer.write_record([
            arb_id.to_string(),
            ts_iso,
            size.to_string(),
            buy_px.to_string(),
            sell_px.to_string(),
            spread_realized.to_string(),
            pnl.to_string(),
        ])?;
        self.writer.flush()
    }
}

impl Drop for ArbLog {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
