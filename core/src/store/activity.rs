use super::DatasetStore;
use crate::{
    campaign::Campaign,
    error::SynthResult,
    transaction::{Transaction, TransactionKind},
};
use rusqlite::params;

impl DatasetStore {
    // ── Transactions ──────────────────────────────────────────────

    pub fn insert_transaction(&self, run_id: &str, t: &Transaction) -> SynthResult<()> {
        self.conn.execute(
            "INSERT INTO txn (
                txn_id, run_id, customer_id, kind, amount, status,
                game_category, game_name, payment_method, ts
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                &t.id,
                run_id,
                &t.customer_id,
                t.kind.as_str(),
                t.amount,
                t.status.as_str(),
                t.game_category.map(|g| g.as_str()),
                t.game_name.as_deref(),
                t.payment_method.as_deref(),
                t.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn transaction_count(&self, run_id: &str) -> SynthResult<usize> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM txn WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    /// Completed amount of one kind, summed in SQL.
    pub fn completed_total(&self, run_id: &str, kind: TransactionKind) -> SynthResult<f64> {
        let total: f64 = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM txn
             WHERE run_id = ?1 AND kind = ?2 AND status = 'completed'",
            params![run_id, kind.as_str()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Completed bets minus completed wins.
    pub fn gross_gaming_revenue(&self, run_id: &str) -> SynthResult<f64> {
        let bets = self.completed_total(run_id, TransactionKind::Bet)?;
        let wins = self.completed_total(run_id, TransactionKind::Win)?;
        Ok(bets - wins)
    }

    // ── Campaigns ─────────────────────────────────────────────────

    pub fn insert_campaign(&self, run_id: &str, c: &Campaign) -> SynthResult<()> {
        self.conn.execute(
            "INSERT INTO campaign (
                campaign_id, run_id, name, channel, status, target_segment,
                start_date, end_date, sent, opened, clicked, converted,
                revenue, cost, roi
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                &c.id,
                run_id,
                &c.name,
                c.channel.as_str(),
                c.status.as_str(),
                c.target_segment.as_str(),
                c.start_date.to_rfc3339(),
                c.end_date.to_rfc3339(),
                c.funnel.sent as i64,
                c.funnel.opened as i64,
                c.funnel.clicked as i64,
                c.funnel.converted as i64,
                c.revenue,
                c.cost,
                c.roi,
            ],
        )?;
        Ok(())
    }

    pub fn campaign_count(&self, run_id: &str) -> SynthResult<usize> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM campaign WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }
}
