//! Tabular records for external analysis.
//!
//! The trade tape and the per-strategy balances are the simulator's only
//! outputs; plotting and hypothesis testing consume these files as pure
//! readers.

use std::io::Write;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::session::SessionReport;

#[derive(Debug, Serialize)]
struct TradeRow<'a> {
    session: &'a str,
    tick: u64,
    price: Decimal,
    quantity: Decimal,
    buyer: &'a str,
    seller: &'a str,
}

#[derive(Debug, Serialize)]
struct BalanceRow<'a> {
    session: &'a str,
    strategy: &'a str,
    traders: u32,
    total_profit: Decimal,
    mean_profit: Decimal,
}

/// Write every session's trades as CSV, one row per trade.
///
/// Headers are written up front so the schema is stable even for runs that
/// produced no trades.
pub fn write_tape_csv<W: Write>(writer: W, reports: &[SessionReport]) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(["session", "tick", "price", "quantity", "buyer", "seller"])?;

    for report in reports {
        for trade in report.tape.trades() {
            wtr.serialize(TradeRow {
                session: &report.session_id,
                tick: trade.tick,
                price: trade.price.inner(),
                quantity: trade.quantity.inner(),
                buyer: trade.buyer.as_str(),
                seller: trade.seller.as_str(),
            })?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Write per-session, per-strategy aggregate profits as CSV
pub fn write_balances_csv<W: Write>(writer: W, reports: &[SessionReport]) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(["session", "strategy", "traders", "total_profit", "mean_profit"])?;

    for report in reports {
        for balance in &report.balances {
            wtr.serialize(BalanceRow {
                session: &report.session_id,
                strategy: &balance.strategy,
                traders: balance.traders,
                total_profit: balance.total_profit,
                mean_profit: balance.mean_profit,
            })?;
        }
    }

    wtr.flush()?;
    Ok(())
}
