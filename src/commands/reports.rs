// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::db;
use crate::engine::aggregate::{self, Granularity};
use crate::utils::{maybe_print_json, parse_month, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        Some(("spend-by-category", sub)) => spend_by_category(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let granularity = Granularity::parse(sub.get_one::<String>("granularity").unwrap())?;
    let last = sub.get_one::<usize>("last").copied();

    let txs = db::load_transactions(conn)?;
    let buckets = aggregate::cashflow(&txs, granularity);

    #[derive(Serialize)]
    struct CashflowRow {
        period: String,
        income: String,
        expenses: String,
        net: String,
    }
    let mut data: Vec<CashflowRow> = buckets
        .iter()
        .map(|(period, t)| CashflowRow {
            period: period.clone(),
            income: format!("{:.2}", t.income),
            expenses: format!("{:.2}", t.expenses),
            net: format!("{:.2}", t.income - t.expenses),
        })
        .collect();
    if let Some(n) = last {
        let skip = data.len().saturating_sub(n);
        data.drain(..skip);
    }

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.period.clone(),
                    r.income.clone(),
                    r.expenses.clone(),
                    r.net.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Period", "Income", "Expenses", "Net"], rows)
        );
    }
    Ok(())
}

fn spend_by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (year, month) = parse_month(sub.get_one::<String>("month").unwrap())?;

    let txs = db::load_transactions(conn)?;
    let (start, end) = aggregate::month_interval(year, month)?;
    let spending = aggregate::category_spending(&txs, start, end);

    // Largest spenders first
    let mut items: Vec<_> = spending.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let data: Vec<Vec<String>> = items
        .iter()
        .map(|(cat, amt)| vec![cat.clone(), format!("{:.2}", amt)])
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Category", "Spent"], data));
    }
    Ok(())
}
