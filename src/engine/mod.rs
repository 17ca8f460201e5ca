// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure computation over in-memory record snapshots. Nothing in this
//! module performs I/O; callers load a consistent snapshot first and
//! evaluate against it.

pub mod aggregate;
pub mod alerts;
pub mod error;
pub mod progress;

pub use error::EngineError;
