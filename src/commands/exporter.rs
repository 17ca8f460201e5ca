// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

use crate::db;
use crate::utils::DATETIME_FMT;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let txs = db::load_transactions(conn)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "kind",
                "amount",
                "currency",
                "category",
                "description",
                "tags",
                "note",
            ])?;
            for t in &txs {
                wtr.write_record([
                    t.date.format(DATETIME_FMT).to_string(),
                    t.kind.as_str().to_string(),
                    t.amount.to_string(),
                    t.currency.clone(),
                    t.category.clone(),
                    t.description.clone(),
                    t.tags.join(","),
                    t.note.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = txs
                .iter()
                .map(|t| {
                    json!({
                        "date": t.date.format(DATETIME_FMT).to_string(),
                        "kind": t.kind.as_str(),
                        "amount": t.amount.to_string(),
                        "currency": t.currency,
                        "category": t.category,
                        "description": t.description,
                        "tags": t.tags,
                        "note": t.note,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
