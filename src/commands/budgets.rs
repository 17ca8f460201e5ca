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
use crate::engine::aggregate;
use crate::utils::{maybe_print_json, parse_decimal, parse_month, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("status", sub)) => status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let limit = parse_decimal(sub.get_one::<String>("limit").unwrap())?;
    if limit <= Decimal::ZERO {
        bail!("Budget limit must be positive, got {}", limit);
    }
    let (year, month) = parse_month(sub.get_one::<String>("month").unwrap())?;
    let threshold = match sub.get_one::<String>("threshold") {
        Some(s) => {
            let t = parse_decimal(s)?;
            if t < Decimal::ZERO || t > Decimal::from(100) {
                bail!("Threshold must be within 0-100, got {}", t);
            }
            t
        }
        None => Decimal::from(80),
    };

    conn.execute(
        "INSERT INTO budgets(category, monthly_limit, threshold, month, year)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            category,
            limit.to_string(),
            threshold.to_string(),
            month,
            year
        ],
    )?;
    println!(
        "Budget set: '{}' {:.2} for {:04}-{:02} (alert at {}%)",
        category, limit, year, month, threshold
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()?;

    let mut budgets = db::load_budgets(conn)?;
    if let Some((y, mo)) = month {
        budgets.retain(|b| b.year == y && b.month == mo);
    }

    let today = Utc::now().date_naive();

    #[derive(Serialize)]
    struct BudgetRow {
        id: i64,
        period: String,
        category: String,
        limit: String,
        threshold: String,
        timing: String,
    }
    let data: Vec<BudgetRow> = budgets
        .iter()
        .map(|b| BudgetRow {
            id: b.id,
            period: b.period_key(),
            category: b.category.clone(),
            limit: format!("{:.2}", b.monthly_limit),
            threshold: format!("{}%", b.threshold),
            timing: b.timing(today).as_str().into(),
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.period.clone(),
                    r.category.clone(),
                    r.limit.clone(),
                    r.threshold.clone(),
                    r.timing.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Month", "Category", "Limit", "Threshold", "Timing"],
                rows
            )
        );
    }
    Ok(())
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (year, month) = parse_month(sub.get_one::<String>("month").unwrap())?;

    let mut budgets = db::load_budgets(conn)?;
    budgets.retain(|b| b.year == year && b.month == month);
    let txs = db::load_transactions(conn)?;

    #[derive(Serialize)]
    struct StatusRow {
        category: String,
        limit: String,
        spent: String,
        used: String,
        remaining: String,
        state: String,
    }
    let mut data = Vec::new();
    for b in &budgets {
        let usage = aggregate::budget_usage(b, &txs)?;
        let state = if usage.over_budget {
            "over budget"
        } else if usage.near_limit {
            "near limit"
        } else {
            "ok"
        };
        data.push(StatusRow {
            category: b.category.clone(),
            limit: format!("{:.2}", b.monthly_limit),
            spent: format!("{:.2}", usage.spent),
            used: format!("{:.1}%", usage.percent_used),
            remaining: format!("{:.2}", usage.remaining),
            state: state.into(),
        });
    }

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.category.clone(),
                    r.limit.clone(),
                    r.spent.clone(),
                    r.used.clone(),
                    r.remaining.clone(),
                    r.state.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Category", "Limit", "Spent", "Used", "Remaining", "State"],
                rows
            )
        );
    }
    Ok(())
}
