// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{ids::nullable, BigInt, EntityRef, Id, InvariantError, TimePeriods};

/// `policy { policy }` selection: the policy document URI of a court.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyText {
    pub policy: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub id: Id,
    #[serde(rename = "subcourtID")]
    pub subcourt_id: BigInt,
    pub disputes_ongoing: BigInt,
    pub disputes_closed: BigInt,
    pub disputes_num: BigInt,
    #[serde(rename = "childs")]
    pub children: Vec<EntityRef>,
    /// `None` for the root court.
    #[serde(deserialize_with = "nullable")]
    pub parent: Option<EntityRef>,
    #[serde(deserialize_with = "nullable")]
    pub policy: Option<PolicyText>,
    pub token_staked: BigInt,
    pub active_jurors: BigInt,
    pub hidden_votes: bool,
    pub min_stake: BigInt,
    pub alpha: BigInt,
    pub fee_for_juror: BigInt,
    pub jurors_for_court_jump: BigInt,
    pub time_periods: TimePeriods,
    #[serde(rename = "totalETHFees")]
    pub total_eth_fees: BigInt,
    pub total_token_redistributed: BigInt,
}

impl Court {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let ongoing_and_closed = &self.disputes_ongoing + &self.disputes_closed;
        if ongoing_and_closed != self.disputes_num {
            return Err(InvariantError::CourtDisputeTotal {
                id: self.id.to_string(),
                total: self.disputes_num.clone(),
                ongoing: self.disputes_ongoing.clone(),
                closed: self.disputes_closed.clone(),
            });
        }
        Ok(())
    }
}

/// Court data embedded into a dispute.
///
/// This is a copy taken when the dispute was fetched, it is not kept in
/// sync with the [`Court`] entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtSnapshot {
    pub id: Id,
    pub time_periods: TimePeriods,
    #[serde(deserialize_with = "nullable")]
    pub policy: Option<PolicyText>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Period;

    #[test]
    fn root_court_has_explicit_absent_parent() {
        let court: Court = serde_json::from_str(test_assets::COURT).unwrap();
        assert!(court.is_root());
        assert_eq!(court.parent, None);
        assert_eq!(
            court.children,
            vec![EntityRef::new("1"), EntityRef::new("2")]
        );
        assert_eq!(
            court.time_periods.duration(Period::Commit),
            &BigInt::from(583200u64)
        );
        court.check_invariants().unwrap();

        let encoded = serde_json::to_value(&court).unwrap();
        assert_eq!(encoded["parent"], json!(null));
    }

    #[test]
    fn missing_parent_key_is_not_the_root() {
        let mut value: serde_json::Value = serde_json::from_str(test_assets::COURT).unwrap();
        value.as_object_mut().unwrap().remove("parent");
        let err = serde_json::from_value::<Court>(value).unwrap_err();
        assert!(err.to_string().contains("parent"));
    }

    #[test]
    fn wrong_number_of_time_periods_is_rejected() {
        let mut value: serde_json::Value = serde_json::from_str(test_assets::COURT).unwrap();
        value["timePeriods"] = json!(["280800", "583200", "583200", "388800"]);
        serde_json::from_value::<Court>(value).unwrap_err();
    }

    #[test]
    fn dispute_totals_are_checked() {
        let mut court: Court = serde_json::from_str(test_assets::COURT).unwrap();
        court.disputes_num = BigInt::from(1u64);
        assert!(matches!(
            court.check_invariants(),
            Err(InvariantError::CourtDisputeTotal { .. })
        ));
    }
}
