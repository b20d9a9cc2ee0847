// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod config;
mod error;
mod history;
mod ledger;
mod lottery;
mod redistribution;
mod resolver;
mod sequencer;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::apply;
pub use command::{AssignMode, Command};
pub use config::{DEFAULT_HISTORY_CAPACITY, EngineConfig, RedistributionPolicy};
pub use error::CoreError;
pub use history::{History, Snapshot};
pub use ledger::QuotaLedger;
pub use lottery::Lottery;
pub use redistribution::{Redistribution, eligible_pool, redistribute};
pub use resolver::{Decision, decide};
pub use sequencer::{SequencerState, TurnSequencer};
pub use state::{AllocationState, AutoStep, Outcome, TransitionResult};
