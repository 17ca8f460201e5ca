// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod alerts;
pub mod budgets;
pub mod doctor;
pub mod exporter;
pub mod goals;
pub mod recurring;
pub mod reports;
pub mod settings;
pub mod transactions;
