// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            _ => bail!("Invalid kind '{}', expected income|expense", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annually,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Annually => "annually",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "annually" => Ok(Frequency::Annually),
            _ => bail!(
                "Invalid frequency '{}', expected daily|weekly|monthly|quarterly|annually",
                s
            ),
        }
    }

    /// Next occurrence after `from`. Month-based steps clamp to the last day
    /// of shorter months (Jan 31 + monthly = Feb 28/29).
    pub fn advance(&self, from: NaiveDate) -> NaiveDate {
        match self {
            Frequency::Daily => from + Days::new(1),
            Frequency::Weekly => from + Days::new(7),
            Frequency::Monthly => from + Months::new(1),
            Frequency::Quarterly => from + Months::new(3),
            Frequency::Annually => from + Months::new(12),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BudgetWarning,
    BudgetExceeded,
    RecurringDue,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::BudgetWarning => "budget_warning",
            NotificationKind::BudgetExceeded => "budget_exceeded",
            NotificationKind::RecurringDue => "recurring_due",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "budget_warning" => Ok(NotificationKind::BudgetWarning),
            "budget_exceeded" => Ok(NotificationKind::BudgetExceeded),
            "recurring_due" => Ok(NotificationKind::RecurringDue),
            _ => bail!("Invalid notification kind '{}'", s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDateTime,
    pub amount: Decimal, // non-negative; direction carried by kind
    pub kind: TxKind,
    pub category: String,
    pub description: String,
    pub tags: Vec<String>,
    pub note: Option<String>,
    pub currency: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub category: String,
    pub monthly_limit: Decimal,
    pub threshold: Decimal, // alert percentage, 0..=100
    pub month: u32,         // 1..=12
    pub year: i32,
    pub created_at: NaiveDateTime,
}

/// Where a budget's month sits relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetTiming {
    Past,
    Current,
    Future,
}

impl BudgetTiming {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetTiming::Past => "past",
            BudgetTiming::Current => "current",
            BudgetTiming::Future => "future",
        }
    }
}

impl Budget {
    /// Display/dedup key for the budget's period, e.g. "2025-03".
    pub fn period_key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn timing(&self, today: NaiveDate) -> BudgetTiming {
        match (self.year, self.month).cmp(&(today.year(), today.month())) {
            std::cmp::Ordering::Less => BudgetTiming::Past,
            std::cmp::Ordering::Equal => BudgetTiming::Current,
            std::cmp::Ordering::Greater => BudgetTiming::Future,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub target: Decimal,
    pub current: Decimal, // grows by contributions only
    pub target_date: NaiveDate,
    pub color: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringItem {
    pub id: i64,
    pub amount: Decimal,
    pub kind: TxKind,
    pub category: String,
    pub description: String,
    pub frequency: Frequency,
    pub next_due: NaiveDate,
    pub active: bool,
    pub currency: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub related_id: Option<i64>,
    pub period: String, // period key of the condition: "2025-03" for budgets, due date for recurring
    pub read: bool,
    pub created_at: NaiveDateTime,
}
