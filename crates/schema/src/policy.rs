// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{BigInt, Id};

/// Policy document recorded for a subcourt. Never updated, a policy change
/// records a new entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: Id,
    #[serde(rename = "subcourtID")]
    pub subcourt_id: BigInt,
    pub policy: String,
    pub contract_address: String,
    pub timestamp: BigInt,
    pub block_number: BigInt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_policy() {
        let policy: Policy = serde_json::from_str(test_assets::POLICY).unwrap();
        assert_eq!(policy.subcourt_id, BigInt::from(2u64));
        assert_eq!(
            policy.contract_address,
            "0xCb4Aae35333193232421E86Cd2E9b6C91F3B125F"
        );
        assert!(policy.policy.starts_with("/ipfs/"));
    }
}
