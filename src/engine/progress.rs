// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::engine::EngineError;

/// Completion percentage clamped to 0..=100. A non-positive target resolves
/// to 0 rather than dividing.
pub fn ratio(current: Decimal, target: Decimal) -> Decimal {
    if target <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let pct = current / target * Decimal::from(100);
    pct.clamp(Decimal::ZERO, Decimal::from(100))
}

pub fn is_completed(current: Decimal, target: Decimal) -> bool {
    current >= target
}

/// Contributions only grow a goal; there is no withdrawal path.
pub fn apply_contribution(current: Decimal, amount: Decimal) -> Result<Decimal, EngineError> {
    if amount <= Decimal::ZERO {
        return Err(EngineError::InvalidInput(format!(
            "contribution must be positive, got {}",
            amount
        )));
    }
    Ok(current + amount)
}
