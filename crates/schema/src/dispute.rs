// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{
    round::chronological, BigInt, CourtSnapshot, EntityRef, Id, LifecycleState, Period, Round,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispute {
    pub id: Id,
    #[serde(rename = "subcourtID")]
    pub court: CourtSnapshot,
    pub arbitrable: EntityRef,
    pub creator: EntityRef,
    /// Index into the arbitrable's ruling options, 0 refuses to arbitrate.
    #[serde(rename = "currentRulling")]
    pub current_ruling: BigInt,
    pub period: Period,
    pub last_period_change: BigInt,
    pub start_time: BigInt,
    pub ruled: bool,
}

/// Where a dispute would stand if every expired period was passed on time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectedPeriod {
    pub period: Period,
    pub started_at: BigInt,
    pub ends_at: BigInt,
}

impl Dispute {
    /// When the current period can be passed.
    pub fn period_deadline(&self) -> BigInt {
        &self.last_period_change + self.court.time_periods.duration(self.period)
    }

    /// Ruling once it can no longer change.
    pub fn final_ruling(&self) -> Option<&BigInt> {
        self.ruled.then_some(&self.current_ruling)
    }

    /// Periods are passed by transactions, so the indexed `period` lags
    /// behind wall clock time. This walks the court's time periods forward
    /// from the last recorded change up to `now`, stopping at `execution`.
    /// Appeals cannot be predicted and a ruled dispute stays where it is.
    pub fn projected_period(&self, now: &BigInt) -> ProjectedPeriod {
        let time_periods = &self.court.time_periods;
        let mut period = self.period;
        let mut started_at = self.last_period_change.clone();
        let mut ends_at = &started_at + time_periods.duration(period);

        if !self.ruled {
            while *now >= ends_at {
                let Some(next) = period.next() else { break };
                period = next;
                started_at = ends_at;
                ends_at = &started_at + time_periods.duration(period);
            }
        }

        ProjectedPeriod {
            period,
            started_at,
            ends_at,
        }
    }
}

/// Dispute together with its rounds and their votes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeWithRounds {
    #[serde(flatten)]
    pub dispute: Dispute,
    /// Oldest first: the initial round, then one round per appeal.
    #[serde(deserialize_with = "chronological")]
    pub rounds: Vec<Round>,
}

impl DisputeWithRounds {
    pub fn lifecycle_state(&self) -> LifecycleState {
        LifecycleState {
            period: self.dispute.period,
            rounds: self.rounds.len(),
            ruled: self.dispute.ruled,
        }
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn appeals(&self) -> usize {
        self.rounds.len().saturating_sub(1)
    }
}

impl std::ops::Deref for DisputeWithRounds {
    type Target = Dispute;

    fn deref(&self) -> &Self::Target {
        &self.dispute
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispute() -> Dispute {
        serde_json::from_str(test_assets::DISPUTE).unwrap()
    }

    #[test]
    fn decodes_lightweight_dispute() {
        let dispute = dispute();
        assert_eq!(dispute.period, Period::Vote);
        assert!(!dispute.ruled);
        assert_eq!(dispute.final_ruling(), None);
        assert_eq!(dispute.court.id.as_str(), "2");
        assert!(dispute.court.policy.is_some());
        // vote lasts 583200s from the last period change at 1650000000
        assert_eq!(dispute.period_deadline(), BigInt::from(1650583200u64));
    }

    #[test]
    fn projection_stays_before_deadline() {
        let dispute = dispute();
        let projected = dispute.projected_period(&BigInt::from(1650583199u64));
        assert_eq!(projected.period, Period::Vote);
        assert_eq!(projected.started_at, BigInt::from(1650000000u64));
    }

    #[test]
    fn projection_walks_expired_periods() {
        let dispute = dispute();
        // vote ends at 1650583200, appeal lasts 388800s and ends at 1650972000
        let projected = dispute.projected_period(&BigInt::from(1650583200u64));
        assert_eq!(projected.period, Period::Appeal);
        assert_eq!(projected.ends_at, BigInt::from(1650972000u64));

        let projected = dispute.projected_period(&BigInt::from(1750000000u64));
        assert_eq!(projected.period, Period::Execution);
        assert_eq!(projected.started_at, BigInt::from(1650972000u64));
    }

    #[test]
    fn ruled_dispute_does_not_move() {
        let mut dispute = dispute();
        dispute.ruled = true;
        dispute.period = Period::Execution;
        let projected = dispute.projected_period(&BigInt::from(1750000000u64));
        assert_eq!(projected.period, Period::Execution);
        assert_eq!(projected.started_at, dispute.last_period_change);
        assert_eq!(dispute.final_ruling(), Some(&dispute.current_ruling));
    }

    #[test]
    fn scenario_vote_period_two_votes_out_of_order() {
        let dispute: DisputeWithRounds =
            serde_json::from_str(test_assets::DISPUTE_WITH_VOTES).unwrap();
        assert_eq!(dispute.period, Period::Vote);
        assert!(!dispute.ruled);
        assert_eq!(dispute.rounds.len(), 1);

        let votes = &dispute.rounds[0].votes;
        assert_eq!(votes.len(), 2);
        assert_eq!(votes[0].vote_id, BigInt::from(0u64));
        assert_eq!(votes[1].vote_id, BigInt::from(1u64));
        // ids are kept byte for byte
        assert_eq!(
            votes[1].address.id.as_str(),
            "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B"
        );
    }

    #[test]
    fn rounds_are_chronological() {
        let dispute: DisputeWithRounds =
            serde_json::from_str(test_assets::DISPUTE_APPEALED).unwrap();
        let ids: Vec<_> = dispute.rounds.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1041-0", "1041-1"]);
        assert_eq!(dispute.appeals(), 1);
        assert_eq!(dispute.current_round().unwrap().id.as_str(), "1041-1");
        assert_eq!(
            dispute.lifecycle_state(),
            LifecycleState {
                period: Period::Execution,
                rounds: 2,
                ruled: true,
            }
        );
    }

    #[test]
    fn ruled_dispute_rejects_new_rounds() {
        let before: DisputeWithRounds =
            serde_json::from_str(test_assets::DISPUTE_APPEALED).unwrap();
        let mut after = before.clone();
        after.rounds.push(after.rounds[1].clone());
        before
            .lifecycle_state()
            .check_progression(&after.lifecycle_state())
            .unwrap_err();
        before
            .lifecycle_state()
            .check_progression(&before.lifecycle_state())
            .unwrap();
    }

    #[test]
    fn unknown_period_is_a_shape_mismatch() {
        let mut value: serde_json::Value = serde_json::from_str(test_assets::DISPUTE).unwrap();
        value["period"] = serde_json::json!("deliberation");
        let err = serde_json::from_value::<Dispute>(value).unwrap_err();
        assert!(err.to_string().contains("deliberation"));
    }
}
