// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::BigInt;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("{entity} `{id}`: disputesCount {total} != openDisputes {open} + closedDisputes {closed}")]
    DisputeTotal {
        entity: &'static str,
        id: String,
        total: BigInt,
        open: BigInt,
        closed: BigInt,
    },
    #[error("{entity} `{id}`: phase counts add up to {phases}, openDisputes is {open}")]
    PhaseTotal {
        entity: &'static str,
        id: String,
        phases: BigInt,
        open: BigInt,
    },
    #[error("Court `{id}`: disputesNum {total} != disputesOngoing {ongoing} + disputesClosed {closed}")]
    CourtDisputeTotal {
        id: String,
        total: BigInt,
        ongoing: BigInt,
        closed: BigInt,
    },
}

/// Dispute counters partitioned by state, shared by the protocol-wide
/// counter and by every arbitrable contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeCounts {
    pub disputes_count: BigInt,
    pub open_disputes: BigInt,
    pub closed_disputes: BigInt,
    pub evidence_phase_disputes: BigInt,
    pub commit_phase_disputes: BigInt,
    pub voting_phase_disputes: BigInt,
    pub appeal_phase_disputes: BigInt,
}

impl DisputeCounts {
    /// Sum of the disputes in evidence, commit, vote and appeal.
    pub fn phase_total(&self) -> BigInt {
        [
            &self.evidence_phase_disputes,
            &self.commit_phase_disputes,
            &self.voting_phase_disputes,
            &self.appeal_phase_disputes,
        ]
        .into_iter()
        .sum()
    }

    pub fn check(&self, entity: &'static str, id: &str) -> Result<(), InvariantError> {
        let open_and_closed = &self.open_disputes + &self.closed_disputes;
        if self.disputes_count != open_and_closed {
            return Err(InvariantError::DisputeTotal {
                entity,
                id: id.to_string(),
                total: self.disputes_count.clone(),
                open: self.open_disputes.clone(),
                closed: self.closed_disputes.clone(),
            });
        }
        let phases = self.phase_total();
        if phases != self.open_disputes {
            return Err(InvariantError::PhaseTotal {
                entity,
                id: id.to_string(),
                phases,
                open: self.open_disputes.clone(),
            });
        }
        Ok(())
    }
}
