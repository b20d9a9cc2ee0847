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
    clippy::all
)]

use duty_roster_domain::{MemberId, Period};
use serde::{Deserialize, Serialize};

/// Who initiated a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    /// A person operating the roster.
    Operator,
    /// The preference resolver acting for an absent member.
    AutoFill,
    /// Server-side housekeeping.
    System,
}

/// Represents the entity performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Identifier of the operator or process.
    pub id: String,
    /// What kind of actor this is.
    pub kind: ActorKind,
}

impl Actor {
    /// Creates a new Actor.
    #[must_use]
    pub const fn new(id: String, kind: ActorKind) -> Self {
        Self { id, kind }
    }

    /// The actor recorded for resolver steps.
    #[must_use]
    pub fn auto_fill() -> Self {
        Self::new(String::from("auto-fill"), ActorKind::AutoFill)
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    /// Request or event identifier.
    pub id: String,
    /// Human-readable trigger.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The command name (e.g., "`AssignSlot`", "`PassTurn`").
    pub name: String,
    /// Optional additional details, such as the forfeiture summary.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A compact view of allocation state on one side of a transition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateDigest {
    /// Slots with an owner.
    pub assigned: usize,
    /// Size of the catalog.
    pub total_slots: usize,
    /// Sum of all ledger entries.
    pub remaining_quota: i64,
    /// The member whose turn it is, if the sequencer is active.
    pub current_picker: Option<MemberId>,
}

/// An immutable audit event representing a state transition.
///
/// Every successful command produces exactly one event. Resolver steps
/// produce one event each, attributed to the auto-fill actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// The period the roster was on, if one was initialised.
    pub period: Option<Period>,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// State before the transition.
    pub before: StateDigest,
    /// State after the transition.
    pub after: StateDigest,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    #[must_use]
    pub const fn new(
        period: Option<Period>,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateDigest,
        after: StateDigest,
    ) -> Self {
        Self {
            period,
            actor,
            cause,
            action,
            before,
            after,
        }
    }
}

/// Entries kept per trail unless configured otherwise.
pub const DEFAULT_AUDIT_CAPACITY: usize = 10_000;

/// Append-only trail of audit events with sequence numbers.
///
/// Holds at most `capacity` entries; the oldest are evicted first.
/// Sequence numbers keep counting across evictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
    capacity: usize,
    next_sequence: u64,
}

/// An audit event with its position in the trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// 1-based position in the trail.
    pub sequence: u64,
    /// The recorded event.
    pub event: AuditEvent,
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLog {
    /// Creates an empty trail holding `DEFAULT_AUDIT_CAPACITY` entries.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_capacity(DEFAULT_AUDIT_CAPACITY)
    }

    /// Creates an empty trail holding at most `capacity` entries (minimum 1).
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: if capacity == 0 { 1 } else { capacity },
            next_sequence: 1,
        }
    }

    /// Maximum number of entries kept.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends an event and returns its sequence number.
    pub fn record(&mut self, event: AuditEvent) -> u64 {
        let sequence: u64 = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push(AuditEntry { sequence, event });
        if self.entries.len() > self.capacity {
            let excess: usize = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
        }
        sequence
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Entries recorded after `sequence`.
    #[must_use]
    pub fn since(&self, sequence: u64) -> &[AuditEntry] {
        let start: usize = self.entries.partition_point(|e| e.sequence <= sequence);
        &self.entries[start..]
    }

    /// Entries recorded while the roster was on `period`.
    pub fn for_period(&self, period: Period) -> impl Iterator<Item = &AuditEntry> {
        self.entries
            .iter()
            .filter(move |e| e.event.period == Some(period))
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn event(name: &str, period: Option<Period>) -> AuditEvent {
        AuditEvent::new(
            period,
            Actor::new(String::from("desk-1"), ActorKind::Operator),
            Cause::new(String::from("req-1"), String::from("Operator request")),
            Action::new(String::from(name), None),
            StateDigest::default(),
            StateDigest {
                assigned: 1,
                total_slots: 30,
                remaining_quota: 29,
                current_picker: Some(MemberId::new("Lee")),
            },
        )
    }

    #[test]
    fn test_auto_fill_actor() {
        let actor: Actor = Actor::auto_fill();
        assert_eq!(actor.kind, ActorKind::AutoFill);
        assert_eq!(actor.id, "auto-fill");
    }

    #[test]
    fn test_log_assigns_increasing_sequence() {
        let mut log: AuditLog = AuditLog::new();
        assert!(log.is_empty());

        assert_eq!(log.record(event("DrawQuotas", None)), 1);
        assert_eq!(log.record(event("DrawOrder", None)), 2);
        assert_eq!(log.record(event("AssignSlot", None)), 3);

        assert_eq!(log.len(), 3);
        assert_eq!(log.entries()[2].event.action.name, "AssignSlot");
    }

    #[test]
    fn test_since_returns_newer_entries() {
        let mut log: AuditLog = AuditLog::new();
        log.record(event("DrawQuotas", None));
        log.record(event("DrawOrder", None));
        log.record(event("AssignSlot", None));

        let newer: &[AuditEntry] = log.since(1);
        assert_eq!(newer.len(), 2);
        assert_eq!(newer[0].sequence, 2);
        assert!(log.since(3).is_empty());
        assert_eq!(log.since(0).len(), 3);
    }

    #[test]
    fn test_for_period_filters_entries() {
        let feb: Period = Period::new(2026, 2).unwrap();
        let mar: Period = Period::new(2026, 3).unwrap();

        let mut log: AuditLog = AuditLog::new();
        log.record(event("InitPeriod", Some(feb)));
        log.record(event("InitPeriod", Some(mar)));
        log.record(event("AssignSlot", Some(mar)));

        assert_eq!(log.for_period(feb).count(), 1);
        assert_eq!(log.for_period(mar).count(), 2);
    }

    #[test]
    fn test_capacity_evicts_oldest_and_keeps_numbering() {
        let mut log: AuditLog = AuditLog::with_capacity(2);
        log.record(event("DrawQuotas", None));
        log.record(event("DrawOrder", None));

        assert_eq!(log.record(event("AssignSlot", None)), 3);
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].sequence, 2);
        assert_eq!(log.since(0).len(), 2);
        assert_eq!(log.since(2)[0].event.action.name, "AssignSlot");
    }

    #[test]
    fn test_zero_capacity_keeps_latest() {
        let mut log: AuditLog = AuditLog::with_capacity(0);
        log.record(event("DrawQuotas", None));
        log.record(event("DrawOrder", None));

        assert_eq!(log.capacity(), 1);
        assert_eq!(log.entries()[0].event.action.name, "DrawOrder");
        assert_eq!(AuditLog::default().capacity(), DEFAULT_AUDIT_CAPACITY);
    }

    #[test]
    fn test_event_serializes_actor_kind() {
        let json: String = serde_json::to_string(&event("PassTurn", None)).unwrap();
        assert!(json.contains("\"kind\":\"Operator\""));
        assert!(json.contains("\"current_picker\":\"Lee\""));
    }
}
