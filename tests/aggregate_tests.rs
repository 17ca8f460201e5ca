// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use spendwatch::engine::aggregate::{
    Granularity, cashflow, category_spending, month_interval, total_expenses, total_income,
    totals_in_range,
};
use spendwatch::models::{Transaction, TxKind};

fn dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn tx(date: &str, amount: &str, kind: TxKind, category: &str) -> Transaction {
    Transaction {
        id: 0,
        date: dt(date),
        amount: amount.parse().unwrap(),
        kind,
        category: category.into(),
        description: String::new(),
        tags: Vec::new(),
        note: None,
        currency: "USD".into(),
        created_at: dt("2025-01-01 00:00:00"),
    }
}

fn sample() -> Vec<Transaction> {
    vec![
        tx("2025-03-01 09:00:00", "2500", TxKind::Income, "Salary"),
        tx("2025-03-05 12:30:00", "40.50", TxKind::Expense, "Food"),
        tx("2025-03-10 19:00:00", "120", TxKind::Expense, "Food"),
        tx("2025-03-12 08:00:00", "60", TxKind::Expense, "Transport"),
        tx("2025-04-01 00:00:00", "99", TxKind::Expense, "Food"),
    ]
}

#[test]
fn partition_law_income_plus_expenses() {
    let txs = sample();
    let (start, end) = month_interval(2025, 3).unwrap();
    let t = totals_in_range(&txs, start, end);
    let matching: Decimal = txs
        .iter()
        .filter(|t| t.date >= start && t.date < end)
        .map(|t| t.amount)
        .sum();
    assert_eq!(t.income + t.expenses, matching);
}

#[test]
fn category_spending_sums_to_total_expenses() {
    let txs = sample();
    let (start, end) = month_interval(2025, 3).unwrap();
    let by_cat = category_spending(&txs, start, end);
    let sum: Decimal = by_cat.values().copied().sum();
    assert_eq!(sum, total_expenses(&txs, start, end));
    // Income never shows up as a category key
    assert!(!by_cat.contains_key("Salary"));
}

#[test]
fn empty_snapshot_yields_zeroes() {
    let (start, end) = month_interval(2025, 3).unwrap();
    let t = totals_in_range(&[], start, end);
    assert!(t.income.is_zero());
    assert!(t.expenses.is_zero());
    assert!(category_spending(&[], start, end).is_empty());
}

#[test]
fn interval_is_half_open() {
    let txs = vec![
        tx("2025-03-01 00:00:00", "10", TxKind::Expense, "Food"), // exactly at start
        tx("2025-04-01 00:00:00", "99", TxKind::Expense, "Food"), // exactly at end
    ];
    let (start, end) = month_interval(2025, 3).unwrap();
    assert_eq!(
        total_expenses(&txs, start, end),
        Decimal::from_str_exact("10").unwrap()
    );
    // Degenerate interval matches nothing
    assert!(total_expenses(&txs, start, start).is_zero());
}

#[test]
fn aggregation_is_idempotent() {
    let txs = sample();
    let (start, end) = month_interval(2025, 3).unwrap();
    let a = category_spending(&txs, start, end);
    let b = category_spending(&txs, start, end);
    assert_eq!(a, b);
}

#[test]
fn month_interval_december_rolls_year() {
    let (start, end) = month_interval(2025, 12).unwrap();
    assert_eq!(start.date(), NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
    assert_eq!(end.date(), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    assert!(month_interval(2025, 13).is_err());
}

#[test]
fn income_listing_matches_kind_filter() {
    let txs = sample();
    let (start, end) = month_interval(2025, 3).unwrap();
    assert_eq!(
        total_income(&txs, start, end),
        Decimal::from_str_exact("2500").unwrap()
    );
    assert_eq!(
        total_expenses(&txs, start, end),
        Decimal::from_str_exact("220.50").unwrap()
    );
}

#[test]
fn cashflow_buckets_by_granularity() {
    let txs = sample();

    let monthly = cashflow(&txs, Granularity::Monthly);
    assert_eq!(monthly.len(), 2);
    let march = &monthly["2025-03"];
    assert_eq!(march.income, Decimal::from_str_exact("2500").unwrap());
    assert_eq!(march.expenses, Decimal::from_str_exact("220.50").unwrap());

    let yearly = cashflow(&txs, Granularity::Yearly);
    assert_eq!(yearly.len(), 1);
    assert_eq!(
        yearly["2025"].expenses,
        Decimal::from_str_exact("319.50").unwrap()
    );

    // 2025-03-05 falls in ISO week 10
    let weekly = cashflow(&txs, Granularity::Weekly);
    assert!(weekly.contains_key("2025-W10"));
}
