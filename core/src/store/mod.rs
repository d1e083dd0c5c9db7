//! SQLite export of generated datasets.
//!
//! RULE: Only the store talks to the database.
//! Generators never see a connection; the store takes finished entities.

use crate::{dataset::Dataset, error::SynthResult, revenue::RevenuePoint};
use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type, Connection};

mod activity;
mod customer;

pub struct DatasetStore {
    conn: Connection,
}

impl DatasetStore {
    pub fn open(path: &str) -> SynthResult<Self> {
        let conn = Connection::open(path)?;
        // WAL only matters for real files; in-memory ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SynthResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SynthResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_dataset.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, dataset: &Dataset, version: &str) -> SynthResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, mode, version, generated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                run_id,
                dataset.seed as i64,
                dataset.mode.as_str(),
                version,
                dataset.generated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn run_count(&self) -> SynthResult<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM run", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Write a whole dataset under `run_id` in one transaction.
    pub fn export_dataset(&self, run_id: &str, dataset: &Dataset, version: &str) -> SynthResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        self.insert_run(run_id, dataset, version)?;
        for c in &dataset.customers {
            self.insert_customer(run_id, c)?;
        }
        for t in &dataset.transactions {
            self.insert_transaction(run_id, t)?;
        }
        for c in &dataset.campaigns {
            self.insert_campaign(run_id, c)?;
        }
        for point in &dataset.revenue {
            self.insert_revenue_point(run_id, point)?;
        }
        tx.commit()?;

        log::info!(
            "exported run {run_id}: {} customers, {} transactions, {} campaigns, {} revenue days",
            dataset.customers.len(),
            dataset.transactions.len(),
            dataset.campaigns.len(),
            dataset.revenue.len()
        );
        Ok(())
    }

    // ── Revenue ────────────────────────────────────────────────

    pub fn insert_revenue_point(&self, run_id: &str, p: &RevenuePoint) -> SynthResult<()> {
        self.conn.execute(
            "INSERT INTO revenue_day (
                run_id, day, deposits, withdrawals, ggr, bonus_cost, ngr, active_players
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                run_id,
                p.date.to_string(),
                p.deposits,
                p.withdrawals,
                p.ggr,
                p.bonus_cost,
                p.ngr,
                p.active_players as i64,
            ],
        )?;
        Ok(())
    }

    pub fn total_ngr(&self, run_id: &str) -> SynthResult<f64> {
        let total: f64 = self.conn.query_row(
            "SELECT COALESCE(SUM(ngr), 0.0) FROM revenue_day WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(total)
    }
}

/// RFC 3339 text column back to a UTC timestamp.
fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Text column holding an enum label.
fn parse_label<T>(idx: usize, raw: &str) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}
