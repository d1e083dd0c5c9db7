use super::{parse_label, parse_timestamp, DatasetStore};
use crate::{
    customer::{Consent, Customer, Segment},
    error::SynthResult,
};
use rusqlite::{params, OptionalExtension, Row};
use std::collections::BTreeMap;

const CUSTOMER_COLUMNS: &str = "customer_id, first_name, last_name, email, phone, country,
    registered_at, last_login_at, segment, vip_level, lifetime_value, total_deposits,
    total_withdrawals, total_bets, total_wins, total_losses, churn_score, favorite_game,
    consent_email, consent_sms, consent_push";

impl DatasetStore {
    // ── Customer ──────────────────────────────────────────────────

    pub fn insert_customer(&self, run_id: &str, c: &Customer) -> SynthResult<()> {
        self.conn.execute(
            "INSERT INTO customer (
                customer_id, run_id, first_name, last_name, email, phone, country,
                registered_at, last_login_at, segment, vip_level, lifetime_value,
                total_deposits, total_withdrawals, total_bets, total_wins, total_losses,
                churn_score, favorite_game, consent_email, consent_sms, consent_push
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                      ?16, ?17, ?18, ?19, ?20, ?21, ?22)",
            params![
                &c.id,
                run_id,
                &c.first_name,
                &c.last_name,
                &c.email,
                &c.phone,
                &c.country,
                c.registered_at.to_rfc3339(),
                c.last_login_at.to_rfc3339(),
                c.segment.as_str(),
                c.vip_level.map(|v| v.as_str()),
                c.lifetime_value,
                c.total_deposits,
                c.total_withdrawals,
                c.total_bets,
                c.total_wins,
                c.total_losses,
                c.churn_score,
                &c.favorite_game,
                c.consent.email,
                c.consent.sms,
                c.consent.push,
            ],
        )?;
        Ok(())
    }

    pub fn customer_count(&self, run_id: &str) -> SynthResult<usize> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM customer WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    pub fn customer_by_id(&self, run_id: &str, customer_id: &str) -> SynthResult<Option<Customer>> {
        let sql = format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE run_id = ?1 AND customer_id = ?2"
        );
        let customer = self
            .conn
            .query_row(&sql, params![run_id, customer_id], customer_from_row)
            .optional()?;
        Ok(customer)
    }

    pub fn customers_in_segment(&self, run_id: &str, segment: Segment) -> SynthResult<Vec<Customer>> {
        let sql = format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer
             WHERE run_id = ?1 AND segment = ?2
             ORDER BY customer_id ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![run_id, segment.as_str()], customer_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn segment_counts(&self, run_id: &str) -> SynthResult<BTreeMap<Segment, usize>> {
        let mut stmt = self.conn.prepare(
            "SELECT segment, COUNT(*) FROM customer WHERE run_id = ?1 GROUP BY segment",
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            let raw: String = row.get(0)?;
            let n: i64 = row.get(1)?;
            Ok((parse_label::<Segment>(0, &raw)?, n as usize))
        })?;
        let mut counts: BTreeMap<Segment, usize> = Segment::ALL.iter().map(|s| (*s, 0)).collect();
        for row in rows {
            let (segment, n) = row?;
            counts.insert(segment, n);
        }
        Ok(counts)
    }
}

fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    let vip_level = match row.get::<_, Option<String>>(9)? {
        Some(raw) => Some(parse_label(9, &raw)?),
        None => None,
    };
    Ok(Customer {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        country: row.get(5)?,
        registered_at: parse_timestamp(6, &row.get::<_, String>(6)?)?,
        last_login_at: parse_timestamp(7, &row.get::<_, String>(7)?)?,
        segment: parse_label(8, &row.get::<_, String>(8)?)?,
        vip_level,
        lifetime_value: row.get(10)?,
        total_deposits: row.get(11)?,
        total_withdrawals: row.get(12)?,
        total_bets: row.get(13)?,
        total_wins: row.get(14)?,
        total_losses: row.get(15)?,
        churn_score: row.get(16)?,
        favorite_game: row.get(17)?,
        consent: Consent {
            email: row.get(18)?,
            sms: row.get(19)?,
            push: row.get(20)?,
        },
    })
}
