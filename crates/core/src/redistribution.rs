// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Forfeiture of remaining quota.
//!
//! A member who passes gives up everything they still hold. Each forfeited
//! unit goes to a recipient drawn uniformly, with replacement, from the
//! eligible pool. Quota only moves: the ledger total is unchanged.

use crate::config::RedistributionPolicy;
use crate::ledger::QuotaLedger;
use crate::lottery::Lottery;
use duty_roster_domain::{DomainError, MemberId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The result of one forfeiture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redistribution {
    /// The member who passed.
    pub member: MemberId,
    /// Units given up.
    pub forfeited: i64,
    /// Units received per recipient.
    pub recipients: BTreeMap<MemberId, i64>,
}

impl Redistribution {
    /// Operator-facing summary, e.g. `Kim passed → Lee(+1), Park(+2)`.
    #[must_use]
    pub fn summary(&self) -> String {
        let received: Vec<String> = self
            .recipients
            .iter()
            .map(|(member, count)| format!("{member}(+{count})"))
            .collect();
        format!("{} passed → {}", self.member, received.join(", "))
    }
}

/// Lists the members eligible to receive `member`'s quota.
#[must_use]
pub fn eligible_pool(
    roster: &[MemberId],
    ledger: &QuotaLedger,
    member: &MemberId,
    policy: RedistributionPolicy,
) -> Vec<MemberId> {
    let others: Vec<MemberId> = roster.iter().filter(|m| *m != member).cloned().collect();

    match policy {
        RedistributionPolicy::AllOthers => others,
        RedistributionPolicy::OthersWithQuota => {
            let holders: Vec<MemberId> = others
                .iter()
                .filter(|m| ledger.has_quota(m))
                .cloned()
                .collect();
            if holders.is_empty() { others } else { holders }
        }
    }
}

/// Moves all of `member`'s quota to randomly drawn recipients.
///
/// Returns `Ok(None)` without touching the ledger when the member holds
/// nothing to give.
///
/// # Errors
///
/// Returns `DomainError::NoRedistributionRecipients` if the pool is empty.
/// The ledger is unchanged on error.
pub fn redistribute(
    ledger: &mut QuotaLedger,
    roster: &[MemberId],
    member: &MemberId,
    policy: RedistributionPolicy,
    lottery: &mut Lottery,
) -> Result<Option<Redistribution>, DomainError> {
    let forfeited: i64 = ledger.get(member);
    if forfeited <= 0 {
        return Ok(None);
    }

    let pool: Vec<MemberId> = eligible_pool(roster, ledger, member, policy);
    if pool.is_empty() {
        return Err(DomainError::NoRedistributionRecipients {
            member: member.clone(),
        });
    }

    let mut recipients: BTreeMap<MemberId, i64> = BTreeMap::new();
    for _ in 0..forfeited {
        if let Some(recipient) = lottery.pick(&pool) {
            *recipients.entry(recipient.clone()).or_insert(0) += 1;
        }
    }

    ledger.take_all(member);
    for (recipient, count) in &recipients {
        ledger.credit(recipient, *count);
    }

    Ok(Some(Redistribution {
        member: member.clone(),
        forfeited,
        recipients,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Vec<MemberId> {
        names.iter().map(|n| MemberId::new(n)).collect()
    }

    fn ledger_of(quotas: &[(&str, i64)]) -> QuotaLedger {
        let mut ledger: QuotaLedger = QuotaLedger::new();
        for (name, quota) in quotas {
            ledger.credit(&MemberId::new(name), *quota);
        }
        ledger
    }

    #[test]
    fn test_pool_excludes_passer() {
        let members: Vec<MemberId> = roster(&["A", "B", "C"]);
        let ledger: QuotaLedger = ledger_of(&[("A", 2), ("B", 0), ("C", 1)]);

        let pool: Vec<MemberId> = eligible_pool(
            &members,
            &ledger,
            &MemberId::new("A"),
            RedistributionPolicy::AllOthers,
        );
        assert_eq!(pool, roster(&["B", "C"]));
    }

    #[test]
    fn test_pool_with_quota_filter_and_fallback() {
        let members: Vec<MemberId> = roster(&["A", "B", "C"]);
        let ledger: QuotaLedger = ledger_of(&[("A", 2), ("B", 0), ("C", 1)]);
        let pool: Vec<MemberId> = eligible_pool(
            &members,
            &ledger,
            &MemberId::new("A"),
            RedistributionPolicy::OthersWithQuota,
        );
        assert_eq!(pool, roster(&["C"]));

        let drained: QuotaLedger = ledger_of(&[("A", 2), ("B", 0), ("C", 0)]);
        let fallback: Vec<MemberId> = eligible_pool(
            &members,
            &drained,
            &MemberId::new("A"),
            RedistributionPolicy::OthersWithQuota,
        );
        assert_eq!(fallback, roster(&["B", "C"]));
    }

    #[test]
    fn test_redistribute_conserves_total() {
        let members: Vec<MemberId> = roster(&["A", "B", "C", "D"]);
        for seed in 0..50 {
            let mut ledger: QuotaLedger = ledger_of(&[("A", 3), ("B", 1), ("C", 0), ("D", 2)]);
            let mut lottery: Lottery = Lottery::seeded(seed);

            let result: Redistribution = redistribute(
                &mut ledger,
                &members,
                &MemberId::new("A"),
                RedistributionPolicy::AllOthers,
                &mut lottery,
            )
            .unwrap()
            .unwrap();

            assert_eq!(ledger.total(), 6);
            assert_eq!(ledger.get(&MemberId::new("A")), 0);
            assert_eq!(result.forfeited, 3);
            assert_eq!(result.recipients.values().sum::<i64>(), 3);
            assert!(!result.recipients.contains_key(&MemberId::new("A")));
        }
    }

    #[test]
    fn test_nothing_to_pass_is_noop() {
        let members: Vec<MemberId> = roster(&["A", "B"]);
        let mut ledger: QuotaLedger = ledger_of(&[("A", 0), ("B", 2)]);
        let before: QuotaLedger = ledger.clone();

        let result: Option<Redistribution> = redistribute(
            &mut ledger,
            &members,
            &MemberId::new("A"),
            RedistributionPolicy::AllOthers,
            &mut Lottery::seeded(1),
        )
        .unwrap();

        assert!(result.is_none());
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_sole_member_cannot_pass() {
        let members: Vec<MemberId> = roster(&["A"]);
        let mut ledger: QuotaLedger = ledger_of(&[("A", 2)]);

        let result = redistribute(
            &mut ledger,
            &members,
            &MemberId::new("A"),
            RedistributionPolicy::AllOthers,
            &mut Lottery::seeded(1),
        );

        assert_eq!(
            result,
            Err(DomainError::NoRedistributionRecipients {
                member: MemberId::new("A")
            })
        );
        assert_eq!(ledger.get(&MemberId::new("A")), 2);
    }

    #[test]
    fn test_summary_format() {
        let mut recipients: BTreeMap<MemberId, i64> = BTreeMap::new();
        recipients.insert(MemberId::new("Park"), 2);
        recipients.insert(MemberId::new("Lee"), 1);
        let redistribution: Redistribution = Redistribution {
            member: MemberId::new("Kim"),
            forfeited: 3,
            recipients,
        };

        assert_eq!(redistribution.summary(), "Kim passed → Lee(+1), Park(+2)");
    }
}
