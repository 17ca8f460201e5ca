// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use spendwatch::engine::aggregate::{budget_usage, percent_of_limit};
use spendwatch::engine::alerts::{
    BudgetStanding, already_notified, budget_alert, recurring_alert, standing,
};
use spendwatch::models::{Budget, Frequency, NotificationKind, RecurringItem, TxKind};
use spendwatch::{cli, commands, db};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO budgets(category, monthly_limit, threshold, month, year)
         VALUES ('Food', '1000', '80', 3, 2025)",
        [],
    )
    .unwrap();
    conn
}

fn spend(conn: &Connection, date: &str, amount: &str) {
    conn.execute(
        "INSERT INTO transactions(date, amount, kind, category, description, currency)
         VALUES (?1, ?2, 'expense', 'Food', 'test', 'USD')",
        params![format!("{} 12:00:00", date), amount],
    )
    .unwrap();
}

fn run_check(conn: &Connection, on: &str) {
    let matches = cli::build_cli().get_matches_from(["spendwatch", "alert", "check", "--on", on]);
    if let Some(("alert", sub)) = matches.subcommand() {
        commands::alerts::handle(conn, sub).unwrap();
    } else {
        panic!("alert command not parsed");
    }
}

fn notification_count(conn: &Connection, kind: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM notifications WHERE kind=?1",
        params![kind],
        |r| r.get(0),
    )
    .unwrap()
}

#[test]
fn warning_and_exceeded_fire_at_most_once_per_period() {
    let conn = setup();

    // 750 of 1000 = 75%, below the 80% threshold
    spend(&conn, "2025-03-05", "750");
    run_check(&conn, "2025-03-15");
    assert_eq!(notification_count(&conn, "budget_warning"), 0);
    assert_eq!(notification_count(&conn, "budget_exceeded"), 0);

    // 820 of 1000 = 82% -> one warning, and only one on re-evaluation
    spend(&conn, "2025-03-10", "70");
    run_check(&conn, "2025-03-15");
    assert_eq!(notification_count(&conn, "budget_warning"), 1);
    run_check(&conn, "2025-03-16");
    assert_eq!(notification_count(&conn, "budget_warning"), 1);

    // 1050 of 1000 -> one exceeded alongside the earlier warning
    spend(&conn, "2025-03-20", "230");
    run_check(&conn, "2025-03-21");
    assert_eq!(notification_count(&conn, "budget_exceeded"), 1);
    run_check(&conn, "2025-03-22");
    assert_eq!(notification_count(&conn, "budget_exceeded"), 1);
    assert_eq!(notification_count(&conn, "budget_warning"), 1);
}

#[test]
fn check_skips_other_months_budgets() {
    let conn = setup();
    spend(&conn, "2025-03-10", "2000");
    // Reference date outside the budget's period: nothing fires
    run_check(&conn, "2025-04-02");
    assert_eq!(notification_count(&conn, "budget_exceeded"), 0);
}

#[test]
fn standing_transitions() {
    let limit = Decimal::from(1000);
    let threshold = Decimal::from(80);
    assert_eq!(
        standing(Decimal::from(750), limit, threshold),
        BudgetStanding::Normal
    );
    assert_eq!(
        standing(Decimal::from(800), limit, threshold),
        BudgetStanding::Warned
    );
    assert_eq!(
        standing(Decimal::from(1050), limit, threshold),
        BudgetStanding::Exceeded
    );
    // Zero limit never divides; zero spend stays normal
    assert_eq!(
        standing(Decimal::ZERO, Decimal::ZERO, threshold),
        BudgetStanding::Normal
    );
    assert!(percent_of_limit(Decimal::from(10), Decimal::ZERO).is_zero());
}

fn budget(limit: &str, threshold: &str) -> Budget {
    Budget {
        id: 7,
        category: "Food".into(),
        monthly_limit: limit.parse().unwrap(),
        threshold: threshold.parse().unwrap(),
        month: 3,
        year: 2025,
        created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
    }
}

#[test]
fn budget_alert_picks_exceeded_over_warning() {
    let b = budget("1000", "80");
    let usage = budget_usage(&b, &[]).unwrap();
    assert!(budget_alert(&b, &usage).is_none());

    let over = spendwatch::engine::aggregate::BudgetUsage {
        spent: Decimal::from(1050),
        percent_used: Decimal::from(105),
        remaining: Decimal::from(-50),
        over_budget: true,
        near_limit: true,
    };
    let pending = budget_alert(&b, &over).unwrap();
    assert_eq!(pending.kind, NotificationKind::BudgetExceeded);
    assert_eq!(pending.period, "2025-03");
    assert_eq!(pending.related_id, 7);
    assert!(pending.message.contains("Food"));
    assert!(pending.message.contains("50.00"));
}

#[test]
fn dedup_key_respects_period_identity() {
    let conn = setup();
    let b = budget("1000", "80");
    let usage = spendwatch::engine::aggregate::BudgetUsage {
        spent: Decimal::from(850),
        percent_used: Decimal::from(85),
        remaining: Decimal::from(150),
        over_budget: false,
        near_limit: true,
    };
    let pending = budget_alert(&b, &usage).unwrap();
    assert!(db::record_notification(&conn, &pending).unwrap());
    // Same condition again: the insert is a no-op
    assert!(!db::record_notification(&conn, &pending).unwrap());

    // A fresh period is a fresh key
    let mut april = b.clone();
    april.month = 4;
    let pending2 = budget_alert(&april, &usage).unwrap();
    assert!(db::record_notification(&conn, &pending2).unwrap());

    let existing = db::load_notifications(&conn, false).unwrap();
    assert!(already_notified(
        &existing,
        NotificationKind::BudgetWarning,
        7,
        "2025-03"
    ));
    assert!(!already_notified(
        &existing,
        NotificationKind::BudgetExceeded,
        7,
        "2025-03"
    ));
}

fn item(active: bool, due: &str) -> RecurringItem {
    RecurringItem {
        id: 3,
        amount: Decimal::from(15),
        kind: TxKind::Expense,
        category: "Subscriptions".into(),
        description: "Streaming".into(),
        frequency: Frequency::Monthly,
        next_due: NaiveDate::parse_from_str(due, "%Y-%m-%d").unwrap(),
        active,
        currency: "USD".into(),
        created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
    }
}

#[test]
fn recurring_alert_gates_on_active_and_due() {
    let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
    assert!(recurring_alert(&item(true, "2025-03-15"), today).is_some());
    assert!(recurring_alert(&item(true, "2025-03-01"), today).is_some());
    assert!(recurring_alert(&item(true, "2025-03-16"), today).is_none());
    assert!(recurring_alert(&item(false, "2025-03-01"), today).is_none());

    let pending = recurring_alert(&item(true, "2025-03-10"), today).unwrap();
    assert_eq!(pending.kind, NotificationKind::RecurringDue);
    assert_eq!(pending.period, "2025-03-10");
}
