// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{BigInt, DisputeCounts, Id, InvariantError};

/// Id of the singleton counter entity.
pub const COUNTER_ID: &str = "ID";

/// Protocol-wide statistics (`KlerosCounter`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub id: Id,
    pub courts_count: BigInt,
    #[serde(flatten)]
    pub disputes: DisputeCounts,
    pub active_jurors: BigInt,
    pub inactive_jurors: BigInt,
    pub drawn_jurors: BigInt,
    pub number_of_arbitrables: BigInt,
    pub token_staked: BigInt,
    #[serde(rename = "totalETHFees")]
    pub total_eth_fees: BigInt,
    pub total_token_redistributed: BigInt,
    #[serde(rename = "totalUSDthroughContract")]
    pub total_usd_through_contract: BigInt,
}

impl Counter {
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.disputes.check("KlerosCounter", self.id.as_str())
    }
}
