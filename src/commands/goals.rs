// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db;
use crate::engine::progress;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("contribute", sub)) => contribute(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let target = parse_decimal(sub.get_one::<String>("target").unwrap())?;
    if target <= Decimal::ZERO {
        bail!("Goal target must be positive, got {}", target);
    }
    let target_date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let color = sub
        .get_one::<String>("color")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "#4caf50".into());

    conn.execute(
        "INSERT INTO goals(name, target, target_date, color) VALUES (?1, ?2, ?3, ?4)",
        params![name, target.to_string(), target_date.to_string(), color],
    )?;
    println!("Goal '{}': {:.2} by {}", name, target, target_date);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let goals = db::load_goals(conn)?;

    #[derive(Serialize)]
    struct GoalRow {
        id: i64,
        name: String,
        saved: String,
        target: String,
        progress: String,
        target_date: String,
        completed: bool,
    }
    let data: Vec<GoalRow> = goals
        .iter()
        .map(|g| GoalRow {
            id: g.id,
            name: g.name.clone(),
            saved: format!("{:.2}", g.current),
            target: format!("{:.2}", g.target),
            progress: format!("{:.1}%", progress::ratio(g.current, g.target)),
            target_date: g.target_date.to_string(),
            completed: progress::is_completed(g.current, g.target),
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.name.clone(),
                    r.saved.clone(),
                    r.target.clone(),
                    r.progress.clone(),
                    r.target_date.clone(),
                    if r.completed { "yes".into() } else { "no".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Name", "Saved", "Target", "Progress", "By", "Done"],
                rows
            )
        );
    }
    Ok(())
}

fn contribute(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;

    let goal = db::get_goal(conn, id)?;
    let new_current = progress::apply_contribution(goal.current, amount)?;
    conn.execute(
        "UPDATE goals SET current=?1 WHERE id=?2",
        params![new_current.to_string(), id],
    )?;

    let pct = progress::ratio(new_current, goal.target);
    println!(
        "'{}' now at {:.2} of {:.2} ({:.1}%){}",
        goal.name,
        new_current,
        goal.target,
        pct,
        if progress::is_completed(new_current, goal.target) {
            " - completed"
        } else {
            ""
        }
    );
    Ok(())
}
