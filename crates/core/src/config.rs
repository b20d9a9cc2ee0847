// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Number of snapshots kept for undo unless configured otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Who may receive quota forfeited by a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RedistributionPolicy {
    /// Every roster member except the one passing.
    #[default]
    AllOthers,
    /// Only other members that still hold quota. Falls back to
    /// `AllOthers` when nobody else holds quota.
    OthersWithQuota,
}

impl RedistributionPolicy {
    /// Converts this policy to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AllOthers => "all-others",
            Self::OthersWithQuota => "others-with-quota",
        }
    }
}

impl std::fmt::Display for RedistributionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunables for one allocation engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of undo snapshots; the oldest is evicted first.
    pub history_capacity: usize,
    /// Recipient pool used when a member passes.
    pub redistribution: RedistributionPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            redistribution: RedistributionPolicy::default(),
        }
    }
}
