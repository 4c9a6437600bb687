// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{BigInt, EntityRef, Id};

/// A juror (un)staking in a subcourt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeSet {
    pub id: Id,
    pub address: EntityRef,
    #[serde(rename = "subcourtID")]
    pub subcourt_id: BigInt,
    pub stake: BigInt,
    pub new_total_stake: BigInt,
    pub timestamp: BigInt,
}

/// Stake event flattened for reporting, with the gas cost of the staking
/// transaction. The subgraph does not index gas for stakes, so the cost is
/// supplied by the caller when it is known.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeData {
    pub id: Id,
    pub juror: Id,
    pub stake: BigInt,
    pub total_stake: BigInt,
    pub subcourt_id: BigInt,
    pub timestamp: BigInt,
    pub gascost: Option<BigInt>,
}

impl StakeData {
    pub fn new(stake_set: StakeSet, gascost: Option<BigInt>) -> Self {
        Self {
            id: stake_set.id,
            juror: stake_set.address.id,
            stake: stake_set.stake,
            total_stake: stake_set.new_total_stake,
            subcourt_id: stake_set.subcourt_id,
            timestamp: stake_set.timestamp,
            gascost,
        }
    }
}

impl From<StakeSet> for StakeData {
    fn from(stake_set: StakeSet) -> Self {
        Self::new(stake_set, None)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn stake_data_projection() {
        let stakes: Vec<StakeSet> = serde_json::from_str(test_assets::STAKE_SETS).unwrap();
        assert_eq!(stakes.len(), 2);

        let data = StakeData::new(stakes[1].clone(), Some(BigInt::from(3_100_000u64)));
        assert_eq!(data.juror, stakes[1].address.id);
        assert_eq!(data.total_stake, stakes[1].new_total_stake);
        assert_eq!(
            serde_json::to_value(&data).unwrap()["gascost"],
            json!("3100000")
        );

        let unstaked = StakeData::from(stakes[1].clone());
        assert_eq!(unstaked.stake, BigInt::from(0u64));
        assert_eq!(unstaked.gascost, None);
    }
}
