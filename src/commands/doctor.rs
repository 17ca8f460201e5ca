// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::db;
use crate::utils::pretty_table;

/// Integrity pass over the store. Nothing here blocks normal operation;
/// every finding is something the schema deliberately does not enforce.
pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Duplicate budgets for the same (category, month, year)
    let mut stmt = conn.prepare(
        "SELECT category, month, year, COUNT(*) FROM budgets
         GROUP BY category, month, year HAVING COUNT(*) > 1",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let cat: String = r.get(0)?;
        let month: u32 = r.get(1)?;
        let year: i32 = r.get(2)?;
        let n: i64 = r.get(3)?;
        rows.push(vec![
            "duplicate_budget".into(),
            format!("{} budgets for '{}' in {:04}-{:02}", n, cat, year, month),
        ]);
    }

    // 2) Records that dodge the command-layer validation
    for t in db::load_transactions(conn)? {
        if t.amount < Decimal::ZERO {
            rows.push(vec![
                "negative_amount".into(),
                format!("transaction {} has amount {}", t.id, t.amount),
            ]);
        }
    }
    for b in db::load_budgets(conn)? {
        if b.monthly_limit <= Decimal::ZERO {
            rows.push(vec![
                "non_positive_limit".into(),
                format!("budget {} ('{}') has limit {}", b.id, b.category, b.monthly_limit),
            ]);
        }
    }
    for g in db::load_goals(conn)? {
        if g.target <= Decimal::ZERO {
            rows.push(vec![
                "non_positive_target".into(),
                format!("goal {} ('{}') has target {}", g.id, g.name, g.target),
            ]);
        }
    }

    // 3) Inactive recurring items still carrying an overdue date
    let today = Utc::now().date_naive();
    for i in db::load_recurring(conn)? {
        if !i.active && i.next_due < today {
            rows.push(vec![
                "stale_recurring".into(),
                format!("inactive item {} ('{}') due {}", i.id, i.description, i.next_due),
            ]);
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
