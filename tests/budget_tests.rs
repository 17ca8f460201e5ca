// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use spendwatch::engine::aggregate::budget_usage;
use spendwatch::models::BudgetTiming;
use spendwatch::{cli, commands, db};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn spend(conn: &Connection, date: &str, category: &str, amount: &str) {
    conn.execute(
        "INSERT INTO transactions(date, amount, kind, category, description, currency)
         VALUES (?1, ?2, 'expense', ?3, 'test', 'USD')",
        params![format!("{} 12:00:00", date), amount, category],
    )
    .unwrap();
}

fn run_budget(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["spendwatch", "budget"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("budget", sub)) = matches.subcommand() {
        commands::budgets::handle(conn, sub)
    } else {
        panic!("budget command not parsed");
    }
}

#[test]
fn usage_over_own_month_only() {
    let conn = setup();
    run_budget(
        &conn,
        &["set", "--category", "Food", "--limit", "500", "--month", "2025-03"],
    )
    .unwrap();
    spend(&conn, "2025-03-05", "Food", "125.50");
    spend(&conn, "2025-03-20", "Food", "74.50");
    spend(&conn, "2025-04-01", "Food", "999"); // next period
    spend(&conn, "2025-03-10", "Transport", "80"); // other category

    let budgets = db::load_budgets(&conn).unwrap();
    let txs = db::load_transactions(&conn).unwrap();
    let usage = budget_usage(&budgets[0], &txs).unwrap();
    assert_eq!(usage.spent, Decimal::from(200));
    assert_eq!(usage.percent_used, Decimal::from(40));
    assert_eq!(usage.remaining, Decimal::from(300));
    assert!(!usage.over_budget);
    assert!(!usage.near_limit);
}

#[test]
fn near_limit_at_threshold_boundary() {
    let conn = setup();
    run_budget(
        &conn,
        &[
            "set",
            "--category",
            "Food",
            "--limit",
            "1000",
            "--month",
            "2025-03",
            "--threshold",
            "80",
        ],
    )
    .unwrap();
    spend(&conn, "2025-03-05", "Food", "800");

    let budgets = db::load_budgets(&conn).unwrap();
    let txs = db::load_transactions(&conn).unwrap();
    let usage = budget_usage(&budgets[0], &txs).unwrap();
    // Exactly at the threshold counts as near-limit
    assert_eq!(usage.percent_used, Decimal::from(80));
    assert!(usage.near_limit);
    assert!(!usage.over_budget);
}

#[test]
fn set_rejects_bad_inputs() {
    let conn = setup();
    assert!(
        run_budget(
            &conn,
            &["set", "--category", "Food", "--limit", "0", "--month", "2025-03"],
        )
        .is_err()
    );
    assert!(
        run_budget(
            &conn,
            &[
                "set",
                "--category",
                "Food",
                "--limit",
                "100",
                "--month",
                "2025-03",
                "--threshold",
                "120",
            ],
        )
        .is_err()
    );
    assert!(db::load_budgets(&conn).unwrap().is_empty());
}

#[test]
fn duplicate_periods_are_representable() {
    // The schema deliberately allows two budgets for one (category, month,
    // year); doctor reports them instead of the store rejecting them.
    let conn = setup();
    for _ in 0..2 {
        run_budget(
            &conn,
            &["set", "--category", "Food", "--limit", "100", "--month", "2025-03"],
        )
        .unwrap();
    }
    let budgets = db::load_budgets(&conn).unwrap();
    assert_eq!(budgets.len(), 2);
    assert_eq!(budgets[0].period_key(), budgets[1].period_key());
}

#[test]
fn timing_against_reference_date() {
    let conn = setup();
    run_budget(
        &conn,
        &["set", "--category", "Food", "--limit", "100", "--month", "2025-03"],
    )
    .unwrap();
    let budgets = db::load_budgets(&conn).unwrap();
    let b = &budgets[0];
    let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
    assert_eq!(b.timing(d("2025-03-15")), BudgetTiming::Current);
    assert_eq!(b.timing(d("2025-04-01")), BudgetTiming::Past);
    assert_eq!(b.timing(d("2025-02-28")), BudgetTiming::Future);
    assert_eq!(b.timing(d("2024-03-15")), BudgetTiming::Future);
}

#[test]
fn zero_limit_usage_resolves_to_zero_percent() {
    let conn = setup();
    // Bypasses command validation the way a hand-edited store would
    conn.execute(
        "INSERT INTO budgets(category, monthly_limit, threshold, month, year)
         VALUES ('Food', '0', '80', 3, 2025)",
        [],
    )
    .unwrap();
    spend(&conn, "2025-03-05", "Food", "50");

    let budgets = db::load_budgets(&conn).unwrap();
    let txs = db::load_transactions(&conn).unwrap();
    let usage = budget_usage(&budgets[0], &txs).unwrap();
    assert!(usage.percent_used.is_zero());
    assert!(usage.over_budget);
}
