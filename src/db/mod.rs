mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

/// A `transactions` row before its timestamp is parsed and images attached.
struct StoredRow {
    id: i64,
    amount: String,
    description: String,
    category: String,
    occurred_at: String,
}

impl StoredRow {
    const COLUMNS: &'static str = "id, amount, description, category, occurred_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            amount: row.get(1)?,
            description: row.get(2)?,
            category: row.get(3)?,
            occurred_at: row.get(4)?,
        })
    }

    fn parsed_amount(&self) -> Decimal {
        parse_amount(self.id, &self.amount)
    }

    /// Parsed timestamp, or the current time when the stored text is malformed.
    fn occurred_at_or_now(&self) -> NaiveDateTime {
        parse_timestamp(&self.occurred_at).unwrap_or_else(|| {
            tracing::warn!(
                id = self.id,
                raw = %self.occurred_at,
                "unparseable occurred_at, substituting current time"
            );
            now_local()
        })
    }
}

fn parse_amount(id: i64, raw: &str) -> Decimal {
    Decimal::from_str(raw).unwrap_or_else(|_| {
        tracing::warn!(id, raw, "unparseable amount, reading as zero");
        Decimal::ZERO
    })
}

/// Newest first; ties broken by id, newest first.
fn sort_newest_first(rows: &mut [(StoredRow, NaiveDateTime)]) {
    rows.sort_by(|(a, a_at), (b, b_at)| b_at.cmp(a_at).then(b.id.cmp(&a.id)));
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            tracing::debug!(version = schema::CURRENT_VERSION, "created ledger schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Writes ────────────────────────────────────────────────

    /// Persist `txn` and its image paths; returns the assigned id.
    /// Any `txn.id` is ignored.
    pub(crate) fn create(&mut self, txn: &Transaction) -> Result<i64> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO transactions (amount, description, category, occurred_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                txn.amount.to_string(),
                txn.description,
                txn.category,
                format_timestamp(&txn.occurred_at),
            ],
        )?;
        let id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO transaction_images (transaction_id, image_path) VALUES (?1, ?2)",
            )?;
            for path in &txn.image_paths {
                stmt.execute(params![id, path])?;
            }
        }
        tx.commit()?;
        tracing::debug!(id, images = txn.image_paths.len(), "created transaction");
        Ok(id)
    }

    /// Overwrite amount, description, category and timestamp of the row
    /// matching `txn.id`. Images are left alone. Returns rows affected (0 or 1).
    pub(crate) fn update_by_id(&self, txn: &Transaction) -> Result<usize> {
        let Some(id) = txn.id else {
            return Ok(0);
        };
        let changed = self.conn.execute(
            "UPDATE transactions
             SET amount = ?1, description = ?2, category = ?3, occurred_at = ?4
             WHERE id = ?5",
            params![
                txn.amount.to_string(),
                txn.description,
                txn.category,
                format_timestamp(&txn.occurred_at),
                id,
            ],
        )?;
        tracing::debug!(id, changed, "updated transaction");
        Ok(changed)
    }

    /// Remove a transaction and all of its image references atomically.
    /// Unknown ids are a no-op.
    pub(crate) fn delete_by_id(&mut self, id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM transaction_images WHERE transaction_id = ?1",
            params![id],
        )?;
        let removed = tx.execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        tx.commit()?;
        tracing::debug!(id, removed, "deleted transaction");
        Ok(())
    }

    // ── Reads ─────────────────────────────────────────────────

    /// Every transaction, newest first.
    ///
    /// Ordering uses parsed timestamps, so rows whose stored text drifted from
    /// the zero-padded layout still sort by when they happened.
    pub(crate) fn list_all(&self) -> Result<Vec<Transaction>> {
        let mut rows: Vec<_> = self
            .stored_rows()?
            .into_iter()
            .map(|row| {
                let at = row.occurred_at_or_now();
                (row, at)
            })
            .collect();
        sort_newest_first(&mut rows);
        rows.into_iter()
            .map(|(row, at)| self.hydrate(row, at))
            .collect()
    }

    /// Transactions whose month label equals `label` (e.g. `"Mar 2025"`), newest first.
    /// A label that does not name a month matches nothing.
    pub(crate) fn list_by_month(&self, label: &str) -> Result<Vec<Transaction>> {
        match MonthLabel::parse(label) {
            Some(month) => self.list_in_month(month),
            None => {
                tracing::debug!(label, "month label does not parse, no matches");
                Ok(Vec::new())
            }
        }
    }

    /// Calendar-month filter over parsed timestamps, the same parse `list_all` uses.
    pub(crate) fn list_in_month(&self, month: MonthLabel) -> Result<Vec<Transaction>> {
        let mut rows = Vec::new();
        for row in self.stored_rows()? {
            match parse_timestamp(&row.occurred_at) {
                Some(at) if month.contains(&at) => rows.push((row, at)),
                Some(_) => {}
                None => tracing::warn!(
                    id = row.id,
                    raw = %row.occurred_at,
                    "unparseable occurred_at, excluded from {month}"
                ),
            }
        }
        sort_newest_first(&mut rows);
        rows.into_iter()
            .map(|(row, at)| self.hydrate(row, at))
            .collect()
    }

    pub(crate) fn get_by_id(&self, id: i64) -> Result<Option<Transaction>> {
        let sql = format!(
            "SELECT {} FROM transactions WHERE id = ?1",
            StoredRow::COLUMNS
        );
        let result = self.conn.query_row(&sql, params![id], StoredRow::from_row);
        match result {
            Ok(row) => {
                let occurred_at = row.occurred_at_or_now();
                Ok(Some(self.hydrate(row, occurred_at)?))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Image references of one transaction, in insertion order.
    pub(crate) fn image_paths(&self, transaction_id: i64) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT image_path FROM transaction_images
             WHERE transaction_id = ?1 ORDER BY image_id",
        )?;
        let rows = stmt.query_map(params![transaction_id], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn transaction_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    /// Distinct category labels in use, sorted.
    pub(crate) fn categories_in_use(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT category FROM transactions WHERE category != '' ORDER BY category",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn stored_rows(&self) -> Result<Vec<StoredRow>> {
        let sql = format!("SELECT {} FROM transactions", StoredRow::COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], StoredRow::from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn hydrate(&self, row: StoredRow, occurred_at: NaiveDateTime) -> Result<Transaction> {
        let amount = row.parsed_amount();
        Ok(Transaction {
            id: Some(row.id),
            amount,
            image_paths: self.image_paths(row.id)?,
            description: row.description,
            category: row.category,
            occurred_at,
        })
    }

    // ── Analytics ─────────────────────────────────────────────

    /// Income, expenses and balance over every transaction.
    pub(crate) fn summary(&self) -> Result<Summary> {
        let mut stmt = self.conn.prepare("SELECT id, amount FROM transactions")?;
        let amounts = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;
        let mut summary = Summary::default();
        for row in amounts {
            let (id, raw) = row?;
            let amount = parse_amount(id, &raw);
            if amount > Decimal::ZERO {
                summary.income += amount;
            } else if amount < Decimal::ZERO {
                summary.expenses += amount;
            }
            summary.balance += amount;
        }
        Ok(summary)
    }

    pub(crate) fn total_balance(&self) -> Result<Decimal> {
        Ok(self.summary()?.balance)
    }

    pub(crate) fn total_income(&self) -> Result<Decimal> {
        Ok(self.summary()?.income)
    }

    pub(crate) fn total_expenses(&self) -> Result<Decimal> {
        Ok(self.summary()?.expenses)
    }

    pub(crate) fn month_summary(&self, label: &str) -> Result<Summary> {
        Ok(Summary::from_transactions(&self.list_by_month(label)?))
    }

    pub(crate) fn balance_for_month(&self, label: &str) -> Result<Decimal> {
        Ok(self.month_summary(label)?.balance)
    }

    pub(crate) fn income_for_month(&self, label: &str) -> Result<Decimal> {
        Ok(self.month_summary(label)?.income)
    }

    pub(crate) fn expenses_for_month(&self, label: &str) -> Result<Decimal> {
        Ok(self.month_summary(label)?.expenses)
    }

    // ── Export ────────────────────────────────────────────────

    /// Write transactions (all, or one month's) to a CSV file. Returns rows written.
    pub(crate) fn export_to_csv(&self, path: &str, month: Option<&str>) -> Result<usize> {
        let txns = match month {
            Some(label) => self.list_by_month(label)?,
            None => self.list_all()?,
        };

        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create export file: {path}"))?;
        wtr.write_record([
            "id",
            "occurred_at",
            "description",
            "category",
            "amount",
            "images",
        ])?;
        for txn in &txns {
            wtr.write_record([
                txn.id.unwrap_or_default().to_string(),
                format_timestamp(&txn.occurred_at),
                txn.description.clone(),
                txn.category.clone(),
                txn.amount.to_string(),
                txn.image_paths.join(";"),
            ])?;
        }
        wtr.flush().context("Failed to write export file")?;
        Ok(txns.len())
    }
}
