// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::config::EngineConfig;
use crate::history::{History, Snapshot};
use crate::ledger::QuotaLedger;
use crate::redistribution::Redistribution;
use crate::sequencer::{SequencerState, TurnSequencer};
use duty_roster_audit::{Action, Actor, AuditEvent, Cause, StateDigest};
use duty_roster_domain::{
    AllocationProgress, DomainError, MemberId, MemberProfile, MemberTally, Period, QuotaDraw,
    Slot, SlotId, progress, remaining_preferences, summarize,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The complete allocation state of one roster.
///
/// One instance per roster. Every change goes through `apply`, which
/// returns a new state and leaves this one untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationState {
    /// The month being allocated, once initialised.
    pub period: Option<Period>,
    /// The slot catalog, ids dense over `[0, slots.len())`.
    pub slots: Vec<Slot>,
    /// Members fixed by the last quota draw.
    pub roster: Vec<MemberId>,
    /// Remaining quota per member.
    pub ledger: QuotaLedger,
    /// The last quota draw, kept for display.
    pub quota_draw: Option<QuotaDraw>,
    /// The turn rotation, once an order exists.
    pub sequencer: Option<TurnSequencer>,
    /// Absence and preferences per member. Survives period changes.
    pub profiles: BTreeMap<MemberId, MemberProfile>,
    /// Undo snapshots.
    pub history: History,
    /// The last forfeiture summary.
    pub last_action_log: Option<String>,
    /// Set by undo; suppresses auto-fill until the next command.
    pub undo_pending: bool,
    /// Engine tunables.
    pub config: EngineConfig,
}

impl AllocationState {
    /// Creates an empty state with the given configuration.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            period: None,
            slots: Vec::new(),
            roster: Vec::new(),
            ledger: QuotaLedger::new(),
            quota_draw: None,
            sequencer: None,
            profiles: BTreeMap::new(),
            history: History::new(config.history_capacity),
            last_action_log: None,
            undo_pending: false,
            config,
        }
    }

    /// Number of slots with an owner.
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_free()).count()
    }

    /// The member whose turn it is, if an order exists.
    #[must_use]
    pub fn current_picker(&self) -> Option<&MemberId> {
        self.sequencer.as_ref().and_then(TurnSequencer::current)
    }

    /// The member whose turn it is, only while someone still holds quota.
    #[must_use]
    pub fn next_picker(&self) -> Option<MemberId> {
        match self.sequencer_state() {
            SequencerState::Active => self.current_picker().cloned(),
            SequencerState::Idle | SequencerState::Exhausted => None,
        }
    }

    /// Where the turn rotation stands.
    #[must_use]
    pub fn sequencer_state(&self) -> SequencerState {
        self.sequencer
            .as_ref()
            .map_or(SequencerState::Idle, |seq| seq.state(&self.ledger))
    }

    /// A member's profile, or the default one if never set.
    #[must_use]
    pub fn profile(&self, member: &MemberId) -> MemberProfile {
        self.profiles.get(member).cloned().unwrap_or_default()
    }

    /// Returns true if the member is marked absent.
    #[must_use]
    pub fn is_absent(&self, member: &MemberId) -> bool {
        self.profiles.get(member).is_some_and(|p| p.absent)
    }

    /// Returns true if the member is part of the roster.
    #[must_use]
    pub fn has_member(&self, member: &MemberId) -> bool {
        self.roster.contains(member)
    }

    /// Looks up a slot by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SlotNotFound` if the id is out of range.
    pub fn slot(&self, slot_id: SlotId) -> Result<&Slot, DomainError> {
        self.slots
            .get(slot_id.index())
            .ok_or(DomainError::SlotNotFound { slot_id })
    }

    /// Preference ids a member could still receive, in list order.
    #[must_use]
    pub fn remaining_preferences(&self, member: &MemberId) -> Vec<SlotId> {
        self.profiles
            .get(member)
            .map(|p| remaining_preferences(&p.preferences, &self.slots))
            .unwrap_or_default()
    }

    /// Day, night and total counts per member.
    #[must_use]
    pub fn summary(&self) -> Vec<MemberTally> {
        summarize(&self.roster, &self.slots)
    }

    /// Overall assignment progress.
    #[must_use]
    pub fn progress(&self) -> AllocationProgress {
        progress(&self.slots)
    }

    /// Captures what undo restores.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            slots: self.slots.clone(),
            quotas: self.ledger.clone(),
            current_index: self.sequencer.as_ref().map(TurnSequencer::current_index),
            last_action_log: self.last_action_log.clone(),
        }
    }

    /// Pushes the current state onto the undo history.
    pub(crate) fn save_snapshot(&mut self) {
        let snapshot: Snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    /// Puts a snapshot back in place.
    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        self.slots = snapshot.slots;
        self.ledger = snapshot.quotas;
        self.last_action_log = snapshot.last_action_log;
        if let Some(seq) = self.sequencer.as_mut() {
            if let Some(index) = snapshot.current_index {
                seq.restore_index(index);
            }
            seq.settle(&self.ledger);
        }
    }

    /// Binds a free slot to `member` and debits one unit of quota.
    ///
    /// Callers check that the slot is free.
    pub(crate) fn bind(
        &mut self,
        slot_id: SlotId,
        member: &MemberId,
    ) -> Result<(Slot, i64), DomainError> {
        let slot: &mut Slot = self
            .slots
            .get_mut(slot_id.index())
            .ok_or(DomainError::SlotNotFound { slot_id })?;
        slot.owner = Some(member.clone());
        let bound: Slot = slot.clone();
        Ok((bound, self.ledger.debit(member)))
    }

    /// Moves the turn past the current picker.
    pub(crate) fn advance_turn(&mut self) {
        if let Some(seq) = self.sequencer.as_mut() {
            seq.advance(&self.ledger);
        }
    }

    /// Moves the turn only if the current picker holds no quota.
    pub(crate) fn settle_turn(&mut self) {
        if let Some(seq) = self.sequencer.as_mut() {
            seq.settle(&self.ledger);
        }
    }

    /// Compact view for audit records.
    #[must_use]
    pub fn digest(&self) -> StateDigest {
        StateDigest {
            assigned: self.assigned_count(),
            total_slots: self.slots.len(),
            remaining_quota: self.ledger.total(),
            current_picker: self.next_picker(),
        }
    }

    /// Builds the audit event for a transition that ended in this state.
    pub(crate) fn audit_event(
        &self,
        before: StateDigest,
        actor: Actor,
        cause: Cause,
        action: Action,
    ) -> AuditEvent {
        AuditEvent::new(self.period, actor, cause, action, before, self.digest())
    }
}

impl Default for AllocationState {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A new period's catalog was generated.
    PeriodInitialized {
        /// The period.
        period: Period,
        /// Size of the new catalog.
        total_slots: usize,
    },
    /// Quotas were drawn.
    QuotasDrawn {
        /// The split and its groups.
        draw: QuotaDraw,
        /// True if an existing order was dropped because the roster changed.
        order_cleared: bool,
    },
    /// A selection order was drawn or set.
    OrderSet {
        /// The new order.
        order: Vec<MemberId>,
        /// Whose turn it is now.
        next_picker: Option<MemberId>,
    },
    /// A slot was bound.
    SlotAssigned {
        /// The slot after binding.
        slot: Slot,
        /// The target's quota after the debit.
        remaining_quota: i64,
        /// True if the debit took the quota below zero.
        overdrawn: bool,
        /// Whose turn it is now.
        next_picker: Option<MemberId>,
    },
    /// A member passed.
    TurnPassed {
        /// The member who passed.
        member: MemberId,
        /// `None` if there was nothing to give up.
        redistribution: Option<Redistribution>,
        /// Whose turn it is now.
        next_picker: Option<MemberId>,
    },
    /// A slot's owner was cleared.
    SlotReleased {
        /// The slot after release.
        slot: Slot,
        /// Who held it.
        former_owner: MemberId,
        /// The former owner's quota after the refund.
        refunded_quota: i64,
    },
    /// The last snapshot was restored.
    Undone {
        /// Snapshots left after this undo.
        remaining_history: usize,
        /// Whose turn it is now.
        next_picker: Option<MemberId>,
    },
    /// A member's absence or preferences changed.
    ProfileUpdated {
        /// The member.
        member: MemberId,
        /// The profile after the change.
        profile: MemberProfile,
    },
    /// Auto-fill was re-enabled after an undo.
    AutoFillResumed,
}

/// An action the preference resolver took for an absent member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoStep {
    /// The first usable preference was bound.
    Assigned {
        /// The absent member.
        member: MemberId,
        /// The slot bound.
        slot_id: SlotId,
    },
    /// No preference was usable, so the member passed.
    Passed {
        /// What was handed out.
        redistribution: Redistribution,
    },
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition and any auto-fill.
    pub new_state: AllocationState,
    /// What the command itself did.
    pub outcome: Outcome,
    /// Auto-fill steps taken after the command, in order.
    pub auto_steps: Vec<AutoStep>,
    /// One event for the command, then one per auto-fill step.
    pub audit_events: Vec<AuditEvent>,
}
