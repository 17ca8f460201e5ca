// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use chrono::Datelike;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db;
use crate::models::{Transaction, TxKind};
use crate::utils::{
    DATETIME_FMT, maybe_print_json, parse_datetime, parse_decimal, parse_month, pretty_table,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("delete", sub)) => delete(conn, sub)?,
        Some(("replace", sub)) => replace(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn split_tags(s: &str) -> Vec<String> {
    s.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_datetime(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount < Decimal::ZERO {
        bail!("Amount must be non-negative, got {}", amount);
    }
    let kind = TxKind::parse(sub.get_one::<String>("kind").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let description = sub.get_one::<String>("description").unwrap().clone();
    let tags: Vec<String> = sub
        .get_one::<String>("tags")
        .map(|s| split_tags(s))
        .unwrap_or_default();
    let note = sub.get_one::<String>("note").map(|s| s.to_string());
    let currency = match sub.get_one::<String>("currency") {
        Some(c) => c.to_uppercase(),
        None => db::get_default_currency(conn)?,
    };

    conn.execute(
        "INSERT INTO transactions(date, amount, kind, category, description, tags, note, currency)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            date.format(DATETIME_FMT).to_string(),
            amount.to_string(),
            kind.as_str(),
            category,
            description,
            serde_json::to_string(&tags)?,
            note,
            currency
        ],
    )?;
    println!(
        "Recorded {} {} {} in '{}' on {}",
        kind.as_str(),
        currency,
        amount,
        category,
        date.date()
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub currency: String,
    pub category: String,
    pub description: String,
    pub tags: String,
    pub note: String,
}

fn to_row(t: &Transaction) -> TransactionRow {
    TransactionRow {
        id: t.id,
        date: t.date.format(DATETIME_FMT).to_string(),
        kind: t.kind.as_str().into(),
        amount: format!("{:.2}", t.amount),
        currency: t.currency.clone(),
        category: t.category.clone(),
        description: t.description.clone(),
        tags: t.tags.join(","),
        note: t.note.clone().unwrap_or_default(),
    }
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()?;
    let category = sub.get_one::<String>("category");
    let kind = sub
        .get_one::<String>("kind")
        .map(|s| TxKind::parse(s))
        .transpose()?;
    let limit = sub.get_one::<usize>("limit").copied();

    let mut txs = db::load_transactions(conn)?;
    if let Some((y, mo)) = month {
        txs.retain(|t| t.date.year() == y && t.date.month() == mo);
    }
    if let Some(cat) = category {
        txs.retain(|t| &t.category == cat);
    }
    if let Some(k) = kind {
        txs.retain(|t| t.kind == k);
    }
    // Newest first for display, like a transactions screen
    txs.reverse();
    if let Some(n) = limit {
        txs.truncate(n);
    }

    let data: Vec<TransactionRow> = txs.iter().map(to_row).collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    r.tags.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Kind", "Amount", "CCY", "Category", "Description", "Tags", "Note"],
                rows,
            )
        );
    }
    Ok(())
}

fn delete(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        bail!("Transaction {} not found", id);
    }
    println!("Deleted transaction {}", id);
    Ok(())
}

/// Transactions are immutable; editing is a wholesale replacement of the row
/// with any supplied fields overriding the stored ones.
fn replace(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let existing = db::get_transaction(conn, id)?;

    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_datetime(s)?,
        None => existing.date,
    };
    let amount = match sub.get_one::<String>("amount") {
        Some(s) => parse_decimal(s)?,
        None => existing.amount,
    };
    if amount < Decimal::ZERO {
        bail!("Amount must be non-negative, got {}", amount);
    }
    let kind = match sub.get_one::<String>("kind") {
        Some(s) => TxKind::parse(s)?,
        None => existing.kind,
    };
    let category = sub
        .get_one::<String>("category")
        .map(|s| s.trim().to_string())
        .unwrap_or(existing.category);
    let description = sub
        .get_one::<String>("description")
        .cloned()
        .unwrap_or(existing.description);
    let tags = sub
        .get_one::<String>("tags")
        .map(|s| split_tags(s))
        .unwrap_or(existing.tags);
    let note = sub
        .get_one::<String>("note")
        .map(|s| s.to_string())
        .or(existing.note);
    let currency = sub
        .get_one::<String>("currency")
        .map(|s| s.to_uppercase())
        .unwrap_or(existing.currency);

    conn.execute(
        "UPDATE transactions SET date=?1, amount=?2, kind=?3, category=?4, description=?5,
         tags=?6, note=?7, currency=?8 WHERE id=?9",
        params![
            date.format(DATETIME_FMT).to_string(),
            amount.to_string(),
            kind.as_str(),
            category,
            description,
            serde_json::to_string(&tags)?,
            note,
            currency,
            id
        ],
    )?;
    println!("Replaced transaction {}", id);
    Ok(())
}
