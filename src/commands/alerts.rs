// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use chrono::Utc;
use rusqlite::{Connection, params};
use serde::Serialize;

use crate::db;
use crate::engine::aggregate;
use crate::engine::alerts::{budget_alert, recurring_alert};
use crate::models::BudgetTiming;
use crate::utils::{DATETIME_FMT, maybe_print_json, parse_date, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("check", sub)) => check(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("read", sub)) => read(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// One evaluation pass: load a consistent snapshot, derive pending
/// notifications, record each with insert-if-absent. Re-running with the
/// same data records nothing new.
fn check(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let on = match sub.get_one::<String>("on") {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };

    let budgets = db::load_budgets(conn)?;
    let txs = db::load_transactions(conn)?;
    let items = db::load_recurring(conn)?;

    let mut recorded = 0usize;
    for b in budgets
        .iter()
        .filter(|b| b.timing(on) == BudgetTiming::Current)
    {
        let usage = aggregate::budget_usage(b, &txs)?;
        if let Some(pending) = budget_alert(b, &usage) {
            if db::record_notification(conn, &pending)? {
                println!("{}: {}", pending.title, pending.message);
                recorded += 1;
            }
        }
    }
    for item in &items {
        if let Some(pending) = recurring_alert(item, on) {
            if db::record_notification(conn, &pending)? {
                println!("{}: {}", pending.title, pending.message);
                recorded += 1;
            }
        }
    }

    if recorded == 0 {
        println!("No new notifications");
    } else {
        println!("Recorded {} notification(s)", recorded);
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let unread_only = sub.get_flag("unread");
    let notes = db::load_notifications(conn, unread_only)?;

    #[derive(Serialize)]
    struct NotificationRow {
        id: i64,
        kind: String,
        title: String,
        message: String,
        period: String,
        read: bool,
        created_at: String,
    }
    let data: Vec<NotificationRow> = notes
        .iter()
        .map(|n| NotificationRow {
            id: n.id,
            kind: n.kind.as_str().into(),
            title: n.title.clone(),
            message: n.message.clone(),
            period: n.period.clone(),
            read: n.read,
            created_at: n.created_at.format(DATETIME_FMT).to_string(),
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.kind.clone(),
                    r.message.clone(),
                    r.period.clone(),
                    if r.read { "yes".into() } else { "no".into() },
                    r.created_at.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Kind", "Message", "Period", "Read", "At"], rows)
        );
    }
    Ok(())
}

fn read(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    if sub.get_flag("all") {
        let n = conn.execute("UPDATE notifications SET read=1 WHERE read=0", [])?;
        println!("Marked {} notification(s) read", n);
        return Ok(());
    }
    let Some(id) = sub.get_one::<i64>("id").copied() else {
        bail!("Pass --id or --all");
    };
    let n = conn.execute("UPDATE notifications SET read=1 WHERE id=?1", params![id])?;
    if n == 0 {
        bail!("Notification {} not found", id);
    }
    println!("Marked notification {} read", id);
    Ok(())
}
