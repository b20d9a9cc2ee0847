// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Roster sessions and the registry that owns them.
//!
//! Each roster is an independent allocation with its own state, random
//! source and audit log behind one `RwLock`. Writers hold the lock for the
//! whole transition, so commands against one roster are serialized while
//! reads and other rosters proceed.

use duty_roster::{AllocationState, EngineConfig, Lottery};
use duty_roster_audit::{AuditLog, DEFAULT_AUDIT_CAPACITY};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

/// One roster's allocation and its history of record.
#[derive(Debug)]
pub struct RosterSession {
    /// The current allocation state.
    pub state: AllocationState,
    /// The random source for draws and redistribution.
    pub lottery: Lottery,
    /// Every committed event, in order.
    pub audit: AuditLog,
}

impl RosterSession {
    /// Creates an empty session.
    ///
    /// With a seed the session's draws are reproducible.
    #[must_use]
    pub fn new(config: EngineConfig, seed: Option<u64>, audit_capacity: usize) -> Self {
        Self {
            state: AllocationState::new(config),
            lottery: seed.map_or_else(Lottery::from_entropy, Lottery::seeded),
            audit: AuditLog::with_capacity(audit_capacity),
        }
    }
}

/// Shared handle to one roster.
pub type SharedRoster = Arc<RwLock<RosterSession>>;

/// All rosters known to the server, keyed by name.
#[derive(Debug)]
pub struct RosterRegistry {
    rosters: Mutex<HashMap<String, SharedRoster>>,
    config: EngineConfig,
    seed: Option<u64>,
    audit_capacity: usize,
}

impl RosterRegistry {
    /// Creates an empty registry whose rosters use `config` and `seed`.
    #[must_use]
    pub fn new(config: EngineConfig, seed: Option<u64>) -> Self {
        Self {
            rosters: Mutex::new(HashMap::new()),
            config,
            seed,
            audit_capacity: DEFAULT_AUDIT_CAPACITY,
        }
    }

    /// Sets how many audit entries each roster keeps.
    #[must_use]
    pub const fn with_audit_capacity(mut self, audit_capacity: usize) -> Self {
        self.audit_capacity = audit_capacity;
        self
    }

    /// Returns the roster, if it exists.
    pub async fn get(&self, name: &str) -> Option<SharedRoster> {
        self.rosters.lock().await.get(name).cloned()
    }

    /// Returns the roster, creating an empty one on first use.
    pub async fn get_or_create(&self, name: &str) -> SharedRoster {
        let mut rosters = self.rosters.lock().await;
        Arc::clone(rosters.entry(name.to_string()).or_insert_with(|| {
            info!(roster = name, "Created roster");
            Arc::new(RwLock::new(RosterSession::new(self.config, self.seed, self.audit_capacity)))
        }))
    }

    /// Names of all rosters, sorted.
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rosters.lock().await.keys().cloned().collect();
        names.sort();
        names
    }
}
