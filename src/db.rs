// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;

use crate::engine::alerts::PendingNotification;
use crate::models::{
    Budget, Frequency, Goal, Notification, NotificationKind, RecurringItem, Transaction, TxKind,
};
use crate::utils::DATETIME_FMT;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("io.spendwatch", "Spendwatch", "spendwatch"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("spendwatch.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        category TEXT NOT NULL,
        description TEXT NOT NULL,
        tags TEXT NOT NULL DEFAULT '[]',
        note TEXT,
        currency TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    -- No UNIQUE(category, month, year): duplicate budgets per period are
    -- representable; `doctor` reports them.
    CREATE TABLE IF NOT EXISTS budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category TEXT NOT NULL,
        monthly_limit TEXT NOT NULL,
        threshold TEXT NOT NULL DEFAULT '80',
        month INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
        year INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS goals(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        target TEXT NOT NULL,
        current TEXT NOT NULL DEFAULT '0',
        target_date TEXT NOT NULL,
        color TEXT NOT NULL DEFAULT '#4caf50',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS recurring(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        amount TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        category TEXT NOT NULL,
        description TEXT NOT NULL,
        frequency TEXT NOT NULL CHECK(frequency IN ('daily','weekly','monthly','quarterly','annually')),
        next_due TEXT NOT NULL,
        active INTEGER NOT NULL DEFAULT 1,
        currency TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    -- The UNIQUE index is the dedup contract: at most one notification per
    -- (kind, related entity, period), raced inserts collapse to one row.
    CREATE TABLE IF NOT EXISTS notifications(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL CHECK(kind IN ('budget_warning','budget_exceeded','recurring_due')),
        title TEXT NOT NULL,
        message TEXT NOT NULL,
        related_id INTEGER,
        period TEXT NOT NULL,
        read INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(kind, related_id, period)
    );
    "#,
    )?;
    Ok(())
}

pub fn get_default_currency(conn: &Connection) -> Result<String> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='default_currency'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v.unwrap_or_else(|| "USD".to_string()))
}

pub fn set_default_currency(conn: &Connection, ccy: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('default_currency', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![ccy],
    )?;
    Ok(())
}

fn parse_stored_decimal(s: &str, what: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' in store", what, s))
}

fn parse_stored_datetime(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT)
        .with_context(|| format!("Invalid date-time '{}' in store", s))
}

fn parse_stored_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' in store", s))
}

fn decode_transaction(r: &Row) -> Result<Transaction> {
    let date: String = r.get(1)?;
    let amount: String = r.get(2)?;
    let kind: String = r.get(3)?;
    let tags: String = r.get(6)?;
    let created_at: String = r.get(9)?;
    Ok(Transaction {
        id: r.get(0)?,
        date: parse_stored_datetime(&date)?,
        amount: parse_stored_decimal(&amount, "amount")?,
        kind: TxKind::parse(&kind)?,
        category: r.get(4)?,
        description: r.get(5)?,
        tags: serde_json::from_str(&tags)
            .with_context(|| format!("Invalid tags '{}' in store", tags))?,
        note: r.get(7)?,
        currency: r.get(8)?,
        created_at: parse_stored_datetime(&created_at)?,
    })
}

const TX_COLS: &str =
    "id, date, amount, kind, category, description, tags, note, currency, created_at";

pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let sql = format!("SELECT {} FROM transactions ORDER BY date, id", TX_COLS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(decode_transaction(r)?);
    }
    Ok(out)
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Transaction> {
    let sql = format!("SELECT {} FROM transactions WHERE id=?1", TX_COLS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id])?;
    let r = rows
        .next()?
        .with_context(|| format!("Transaction {} not found", id))?;
    decode_transaction(r)
}

fn decode_budget(r: &Row) -> Result<Budget> {
    let limit: String = r.get(2)?;
    let threshold: String = r.get(3)?;
    let created_at: String = r.get(6)?;
    Ok(Budget {
        id: r.get(0)?,
        category: r.get(1)?,
        monthly_limit: parse_stored_decimal(&limit, "budget limit")?,
        threshold: parse_stored_decimal(&threshold, "threshold")?,
        month: r.get(4)?,
        year: r.get(5)?,
        created_at: parse_stored_datetime(&created_at)?,
    })
}

const BUDGET_COLS: &str = "id, category, monthly_limit, threshold, month, year, created_at";

pub fn load_budgets(conn: &Connection) -> Result<Vec<Budget>> {
    let sql = format!(
        "SELECT {} FROM budgets ORDER BY year, month, category, id",
        BUDGET_COLS
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(decode_budget(r)?);
    }
    Ok(out)
}

pub fn get_budget(conn: &Connection, id: i64) -> Result<Budget> {
    let sql = format!("SELECT {} FROM budgets WHERE id=?1", BUDGET_COLS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id])?;
    let r = rows
        .next()?
        .with_context(|| format!("Budget {} not found", id))?;
    decode_budget(r)
}

fn decode_goal(r: &Row) -> Result<Goal> {
    let target: String = r.get(2)?;
    let current: String = r.get(3)?;
    let target_date: String = r.get(4)?;
    let created_at: String = r.get(6)?;
    Ok(Goal {
        id: r.get(0)?,
        name: r.get(1)?,
        target: parse_stored_decimal(&target, "goal target")?,
        current: parse_stored_decimal(&current, "goal amount")?,
        target_date: parse_stored_date(&target_date)?,
        color: r.get(5)?,
        created_at: parse_stored_datetime(&created_at)?,
    })
}

const GOAL_COLS: &str = "id, name, target, current, target_date, color, created_at";

pub fn load_goals(conn: &Connection) -> Result<Vec<Goal>> {
    let sql = format!("SELECT {} FROM goals ORDER BY target_date, id", GOAL_COLS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(decode_goal(r)?);
    }
    Ok(out)
}

pub fn get_goal(conn: &Connection, id: i64) -> Result<Goal> {
    let sql = format!("SELECT {} FROM goals WHERE id=?1", GOAL_COLS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id])?;
    let r = rows
        .next()?
        .with_context(|| format!("Goal {} not found", id))?;
    decode_goal(r)
}

fn decode_recurring(r: &Row) -> Result<RecurringItem> {
    let amount: String = r.get(1)?;
    let kind: String = r.get(2)?;
    let frequency: String = r.get(5)?;
    let next_due: String = r.get(6)?;
    let created_at: String = r.get(9)?;
    Ok(RecurringItem {
        id: r.get(0)?,
        amount: parse_stored_decimal(&amount, "amount")?,
        kind: TxKind::parse(&kind)?,
        category: r.get(3)?,
        description: r.get(4)?,
        frequency: Frequency::parse(&frequency)?,
        next_due: parse_stored_date(&next_due)?,
        active: r.get(7)?,
        currency: r.get(8)?,
        created_at: parse_stored_datetime(&created_at)?,
    })
}

const RECURRING_COLS: &str =
    "id, amount, kind, category, description, frequency, next_due, active, currency, created_at";

pub fn load_recurring(conn: &Connection) -> Result<Vec<RecurringItem>> {
    let sql = format!(
        "SELECT {} FROM recurring ORDER BY next_due, id",
        RECURRING_COLS
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(decode_recurring(r)?);
    }
    Ok(out)
}

pub fn get_recurring(conn: &Connection, id: i64) -> Result<RecurringItem> {
    let sql = format!("SELECT {} FROM recurring WHERE id=?1", RECURRING_COLS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id])?;
    let r = rows
        .next()?
        .with_context(|| format!("Recurring item {} not found", id))?;
    decode_recurring(r)
}

fn decode_notification(r: &Row) -> Result<Notification> {
    let kind: String = r.get(1)?;
    let read: i64 = r.get(6)?;
    let created_at: String = r.get(7)?;
    Ok(Notification {
        id: r.get(0)?,
        kind: NotificationKind::parse(&kind)?,
        title: r.get(2)?,
        message: r.get(3)?,
        related_id: r.get(4)?,
        period: r.get(5)?,
        read: read != 0,
        created_at: parse_stored_datetime(&created_at)?,
    })
}

pub fn load_notifications(conn: &Connection, unread_only: bool) -> Result<Vec<Notification>> {
    let mut sql = String::from(
        "SELECT id, kind, title, message, related_id, period, read, created_at FROM notifications",
    );
    if unread_only {
        sql.push_str(" WHERE read=0");
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(decode_notification(r)?);
    }
    Ok(out)
}

/// Insert-if-absent keyed by (kind, related_id, period). Returns true when a
/// row was actually recorded, false when the condition was already notified.
pub fn record_notification(conn: &Connection, p: &PendingNotification) -> Result<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO notifications(kind, title, message, related_id, period)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![p.kind.as_str(), p.title, p.message, p.related_id, p.period],
    )?;
    Ok(n > 0)
}
