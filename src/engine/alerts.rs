// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::aggregate::{BudgetUsage, percent_of_limit};
use crate::models::{Budget, Notification, NotificationKind, RecurringItem};

/// Standing of a budget within its period. Transitions are one-directional
/// per period: once warned or exceeded, the matching notification must not
/// re-fire for the same (budget, month, year).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStanding {
    Normal,
    Warned,
    Exceeded,
}

pub fn standing(spent: Decimal, limit: Decimal, threshold: Decimal) -> BudgetStanding {
    if spent > limit {
        BudgetStanding::Exceeded
    } else if percent_of_limit(spent, limit) >= threshold {
        BudgetStanding::Warned
    } else {
        BudgetStanding::Normal
    }
}

/// A notification the engine wants recorded. Whether it actually lands is
/// decided by the store's insert-if-absent on (kind, related_id, period).
#[derive(Debug, Clone, Serialize)]
pub struct PendingNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub related_id: i64,
    pub period: String,
}

/// At most one pending notification per evaluation; exceeded wins over the
/// warning when both conditions hold.
pub fn budget_alert(budget: &Budget, usage: &BudgetUsage) -> Option<PendingNotification> {
    let period = budget.period_key();
    match standing(usage.spent, budget.monthly_limit, budget.threshold) {
        BudgetStanding::Exceeded => {
            let over = usage.spent - budget.monthly_limit;
            Some(PendingNotification {
                kind: NotificationKind::BudgetExceeded,
                title: "Budget exceeded".into(),
                message: format!(
                    "'{}' spending for {} is over budget by {:.2} (spent {:.2} of {:.2})",
                    budget.category, period, over, usage.spent, budget.monthly_limit
                ),
                related_id: budget.id,
                period,
            })
        }
        BudgetStanding::Warned => Some(PendingNotification {
            kind: NotificationKind::BudgetWarning,
            title: "Budget warning".into(),
            message: format!(
                "'{}' spending for {} reached {:.0}% of its budget ({:.2} remaining)",
                budget.category, period, usage.percent_used, usage.remaining
            ),
            related_id: budget.id,
            period,
        }),
        BudgetStanding::Normal => None,
    }
}

/// Due alert for an active recurring item whose next occurrence has arrived.
/// The period key is the due date itself, so advancing the item re-arms the
/// alert for the next occurrence.
pub fn recurring_alert(item: &RecurringItem, today: NaiveDate) -> Option<PendingNotification> {
    if !item.active || item.next_due > today {
        return None;
    }
    Some(PendingNotification {
        kind: NotificationKind::RecurringDue,
        title: "Recurring item due".into(),
        message: format!(
            "'{}' ({} {:.2}) is due on {}",
            item.description, item.currency, item.amount, item.next_due
        ),
        related_id: item.id,
        period: item.next_due.to_string(),
    })
}

/// Snapshot-side dedup check. The store's unique index is authoritative;
/// this exists for pure evaluation over an already-loaded snapshot.
pub fn already_notified(
    existing: &[Notification],
    kind: NotificationKind,
    related_id: i64,
    period: &str,
) -> bool {
    existing
        .iter()
        .any(|n| n.kind == kind && n.related_id == Some(related_id) && n.period == period)
}
