// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use chrono::Utc;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db;
use crate::models::{Frequency, RecurringItem, TxKind};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("due", sub)) => due(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount <= Decimal::ZERO {
        bail!("Amount must be positive, got {}", amount);
    }
    let kind = TxKind::parse(sub.get_one::<String>("kind").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let description = sub.get_one::<String>("description").unwrap().clone();
    let frequency = Frequency::parse(sub.get_one::<String>("frequency").unwrap())?;
    let next_due = parse_date(sub.get_one::<String>("due").unwrap())?;
    let currency = match sub.get_one::<String>("currency") {
        Some(c) => c.to_uppercase(),
        None => db::get_default_currency(conn)?,
    };

    conn.execute(
        "INSERT INTO recurring(amount, kind, category, description, frequency, next_due, currency)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            amount.to_string(),
            kind.as_str(),
            category,
            description,
            frequency.as_str(),
            next_due.to_string(),
            currency
        ],
    )?;
    println!(
        "Recurring {} '{}': {} {:.2} {}, next due {}",
        kind.as_str(),
        description,
        currency,
        amount,
        frequency.as_str(),
        next_due
    );
    Ok(())
}

#[derive(Serialize)]
struct RecurringRow {
    id: i64,
    description: String,
    kind: String,
    amount: String,
    currency: String,
    category: String,
    frequency: String,
    next_due: String,
    active: bool,
}

fn to_row(i: &RecurringItem) -> RecurringRow {
    RecurringRow {
        id: i.id,
        description: i.description.clone(),
        kind: i.kind.as_str().into(),
        amount: format!("{:.2}", i.amount),
        currency: i.currency.clone(),
        category: i.category.clone(),
        frequency: i.frequency.as_str().into(),
        next_due: i.next_due.to_string(),
        active: i.active,
    }
}

fn print_rows(sub: &clap::ArgMatches, data: Vec<RecurringRow>) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.description.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.category.clone(),
                    r.frequency.clone(),
                    r.next_due.clone(),
                    if r.active { "yes".into() } else { "no".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Description", "Kind", "Amount", "CCY", "Category", "Frequency", "Next due", "Active"],
                rows
            )
        );
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let items = db::load_recurring(conn)?;
    print_rows(sub, items.iter().map(to_row).collect())
}

fn due(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let on = match sub.get_one::<String>("on") {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };
    let mut items = db::load_recurring(conn)?;
    items.retain(|i| i.active && i.next_due <= on);
    print_rows(sub, items.iter().map(to_row).collect())
}

fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let item = db::get_recurring(conn, id)?;
    let next = item.frequency.advance(item.next_due);
    conn.execute(
        "UPDATE recurring SET next_due=?1 WHERE id=?2",
        params![next.to_string(), id],
    )?;
    println!("'{}' paid for {}, next due {}", item.description, item.next_due, next);
    Ok(())
}
