// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::EngineError;
use crate::models::{Budget, Transaction, TxKind};

/// Half-open interval `[start, end)` over transaction dates.
fn in_range(t: &Transaction, start: NaiveDateTime, end: NaiveDateTime) -> bool {
    t.date >= start && t.date < end
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
}

pub fn totals_in_range(txs: &[Transaction], start: NaiveDateTime, end: NaiveDateTime) -> Totals {
    let mut t = Totals::default();
    for tx in txs.iter().filter(|tx| in_range(tx, start, end)) {
        match tx.kind {
            TxKind::Income => t.income += tx.amount,
            TxKind::Expense => t.expenses += tx.amount,
        }
    }
    t
}

pub fn total_income(txs: &[Transaction], start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    totals_in_range(txs, start, end).income
}

pub fn total_expenses(txs: &[Transaction], start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    totals_in_range(txs, start, end).expenses
}

/// Expense totals keyed by category label. Categories without a matching
/// expense in the interval are absent from the map.
pub fn category_spending(
    txs: &[Transaction],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> HashMap<String, Decimal> {
    let mut agg: HashMap<String, Decimal> = HashMap::new();
    for tx in txs.iter().filter(|tx| in_range(tx, start, end)) {
        if tx.kind == TxKind::Expense {
            *agg.entry(tx.category.clone()).or_insert(Decimal::ZERO) += tx.amount;
        }
    }
    agg
}

/// `[first of month 00:00, first of next month 00:00)`.
pub fn month_interval(year: i32, month: u32) -> Result<(NaiveDateTime, NaiveDateTime), EngineError> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::InvalidInput(format!("invalid month {}-{}", year, month)))?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| EngineError::InvalidInput(format!("invalid month {}-{}", year, month)))?;
    Ok((
        start.and_hms_opt(0, 0, 0).unwrap(),
        end.and_hms_opt(0, 0, 0).unwrap(),
    ))
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetUsage {
    pub spent: Decimal,
    pub percent_used: Decimal,
    pub remaining: Decimal,
    pub over_budget: bool,
    pub near_limit: bool,
}

/// Spend percentage against a limit; a non-positive limit resolves to 0
/// rather than dividing.
pub fn percent_of_limit(spent: Decimal, limit: Decimal) -> Decimal {
    if limit <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        spent / limit * Decimal::from(100)
    }
}

/// Utilization of one budget over its own month, from a transaction snapshot.
pub fn budget_usage(budget: &Budget, txs: &[Transaction]) -> Result<BudgetUsage, EngineError> {
    let (start, end) = month_interval(budget.year, budget.month)?;
    let spent = category_spending(txs, start, end)
        .remove(&budget.category)
        .unwrap_or(Decimal::ZERO);
    let percent_used = percent_of_limit(spent, budget.monthly_limit);
    Ok(BudgetUsage {
        spent,
        percent_used,
        remaining: budget.monthly_limit - spent,
        over_budget: spent > budget.monthly_limit,
        near_limit: percent_used >= budget.threshold,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Weekly,
    Monthly,
    Yearly,
}

impl Granularity {
    pub fn parse(s: &str) -> Result<Self, EngineError> {
        match s {
            "weekly" => Ok(Granularity::Weekly),
            "monthly" => Ok(Granularity::Monthly),
            "yearly" => Ok(Granularity::Yearly),
            _ => Err(EngineError::InvalidInput(format!(
                "invalid granularity '{}', expected weekly|monthly|yearly",
                s
            ))),
        }
    }
}

fn bucket_key(date: NaiveDateTime, g: Granularity) -> String {
    match g {
        Granularity::Weekly => {
            let w = date.iso_week();
            format!("{:04}-W{:02}", w.year(), w.week())
        }
        Granularity::Monthly => format!("{:04}-{:02}", date.year(), date.month()),
        Granularity::Yearly => format!("{:04}", date.year()),
    }
}

/// Income/expense totals bucketed by calendar period, oldest first.
pub fn cashflow(txs: &[Transaction], g: Granularity) -> BTreeMap<String, Totals> {
    let mut map: BTreeMap<String, Totals> = BTreeMap::new();
    for tx in txs {
        let entry = map.entry(bucket_key(tx.date, g)).or_default();
        match tx.kind {
            TxKind::Income => entry.income += tx.amount,
            TxKind::Expense => entry.expenses += tx.amount,
        }
    }
    map
}
