// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{BigInt, DisputeCounts, DisputeWithRounds, Id, InvariantError};

/// Contract consuming arbitration, with its disputes embedded so that a
/// single query returns everything needed to render it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arbitrable {
    pub id: Id,
    #[serde(flatten)]
    pub disputes_counts: DisputeCounts,
    pub eth_fees: BigInt,
    pub eth_rewards: BigInt,
    pub disputes: Vec<DisputeWithRounds>,
}

impl Arbitrable {
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.disputes_counts.check("Arbitrable", self.id.as_str())
    }

    pub fn ruled_disputes(&self) -> impl Iterator<Item = &DisputeWithRounds> {
        self.disputes.iter().filter(|dispute| dispute.ruled)
    }
}
