// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thegraph_core::alloy::primitives::{keccak256, B256};
use thiserror::Error;

use crate::{ids::nullable, BigInt, BigIntError, EntityRef, Id};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    #[error("Commit `{0}` is not a 32-byte hex string")]
    InvalidCommit(String),
    #[error(transparent)]
    Word(#[from] BigIntError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitStatus {
    /// The juror never committed, the court does not hide votes.
    NotCommitted,
    /// Committed but not revealed yet.
    Pending,
    Valid,
    Mismatch,
}

/// Full vote entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: Id,
    pub dispute: EntityRef,
    pub round: EntityRef,
    #[serde(rename = "voteID")]
    pub vote_id: BigInt,
    pub address: EntityRef,
    choice: BigInt,
    pub voted: bool,
    salt: BigInt,
    pub timestamp: BigInt,
    #[serde(deserialize_with = "nullable")]
    pub commit: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub commit_gas_used: Option<BigInt>,
    #[serde(deserialize_with = "nullable")]
    pub commit_gas_price: Option<BigInt>,
    #[serde(deserialize_with = "nullable")]
    pub commit_gas_cost: Option<BigInt>,
    #[serde(deserialize_with = "nullable")]
    pub cast_gas_used: Option<BigInt>,
    #[serde(deserialize_with = "nullable")]
    pub cast_gas_price: Option<BigInt>,
    #[serde(deserialize_with = "nullable")]
    pub cast_gas_cost: Option<BigInt>,
    pub total_gas_cost: BigInt,
}

/// `keccak256(choice ‖ salt)` with both values as 32-byte big-endian words,
/// which is what jurors submit during the commit period.
pub fn commitment(choice: &BigInt, salt: &BigInt) -> Result<B256, BigIntError> {
    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(&choice.to_u256()?.to_be_bytes::<32>());
    preimage[32..].copy_from_slice(&salt.to_u256()?.to_be_bytes::<32>());
    Ok(keccak256(preimage))
}

impl Vote {
    /// The juror's choice, only once the vote has been cast or revealed.
    pub fn choice(&self) -> Option<&BigInt> {
        self.voted.then_some(&self.choice)
    }

    pub fn salt(&self) -> Option<&BigInt> {
        self.voted.then_some(&self.salt)
    }

    pub fn verify_commit(&self) -> Result<CommitStatus, CommitError> {
        let Some(commit) = &self.commit else {
            return Ok(CommitStatus::NotCommitted);
        };
        let committed =
            B256::from_str(commit).map_err(|_| CommitError::InvalidCommit(commit.clone()))?;
        let (Some(choice), Some(salt)) = (self.choice(), self.salt()) else {
            return Ok(CommitStatus::Pending);
        };
        if commitment(choice, salt)? == committed {
            Ok(CommitStatus::Valid)
        } else {
            tracing::warn!(vote = %self.id, "Revealed vote does not match its commit");
            Ok(CommitStatus::Mismatch)
        }
    }

    /// Gas spent on the commit and on the vote itself, where known.
    pub fn spent_gas_cost(&self) -> BigInt {
        [&self.commit_gas_cost, &self.cast_gas_cost]
            .into_iter()
            .flatten()
            .sum()
    }
}

/// Groups votes by round, oldest round first, ordering each round's votes
/// by `voteID`.
///
/// Round ids are `<dispute>-<round index>`, which gives their order.
/// Rounds whose id does not end in an index follow, in order of first
/// appearance.
pub fn votes_by_round(votes: Vec<Vote>) -> Vec<(Id, Vec<Vote>)> {
    let mut rounds: Vec<(Id, Vec<Vote>)> = Vec::new();
    for vote in votes {
        match rounds.iter_mut().find(|(round, _)| *round == vote.round.id) {
            Some((_, round_votes)) => round_votes.push(vote),
            None => rounds.push((vote.round.id.clone(), vec![vote])),
        }
    }
    rounds.sort_by_key(|(round, _)| round_index(round).map_or((1, 0), |index| (0, index)));
    for (_, round_votes) in rounds.iter_mut() {
        round_votes.sort_by(|a, b| a.vote_id.cmp(&b.vote_id));
    }
    rounds
}

fn round_index(round: &Id) -> Option<u64> {
    let (_, index) = round.as_str().rsplit_once('-')?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    index.parse().ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn vote() -> Vote {
        serde_json::from_str(test_assets::VOTE).unwrap()
    }

    #[test]
    fn revealed_vote_matches_commit() {
        let vote = vote();
        assert_eq!(vote.choice(), Some(&BigInt::from(2u64)));
        assert_eq!(vote.verify_commit(), Ok(CommitStatus::Valid));
        assert_eq!(vote.spent_gas_cost(), vote.total_gas_cost);
    }

    #[test]
    fn tampered_reveal_is_a_mismatch() {
        let mut value: serde_json::Value = serde_json::from_str(test_assets::VOTE).unwrap();
        value["choice"] = json!("1");
        let vote: Vote = serde_json::from_value(value).unwrap();
        assert_eq!(vote.verify_commit(), Ok(CommitStatus::Mismatch));
    }

    #[test]
    fn consumers_must_check_voted_before_choice() {
        let mut value: serde_json::Value = serde_json::from_str(test_assets::VOTE).unwrap();
        value["voted"] = json!(false);
        let vote: Vote = serde_json::from_value(value).unwrap();
        // the raw choice is in the payload but unreliable
        assert_eq!(vote.choice(), None);
        assert_eq!(vote.salt(), None);
        assert_eq!(vote.verify_commit(), Ok(CommitStatus::Pending));
    }

    #[test]
    fn plain_vote_has_no_commit() {
        let mut value: serde_json::Value = serde_json::from_str(test_assets::VOTE).unwrap();
        value["commit"] = json!(null);
        value["commitGasUsed"] = json!(null);
        value["commitGasPrice"] = json!(null);
        value["commitGasCost"] = json!(null);
        let vote: Vote = serde_json::from_value(value).unwrap();
        assert_eq!(vote.verify_commit(), Ok(CommitStatus::NotCommitted));
        assert_eq!(vote.spent_gas_cost(), vote.cast_gas_cost.clone().unwrap());
    }

    #[test]
    fn malformed_commit_is_reported() {
        let mut value: serde_json::Value = serde_json::from_str(test_assets::VOTE).unwrap();
        value["commit"] = json!("0x1234");
        let vote: Vote = serde_json::from_value(value).unwrap();
        assert_eq!(
            vote.verify_commit(),
            Err(CommitError::InvalidCommit("0x1234".to_string()))
        );
    }

    #[test]
    fn groups_votes_per_round_in_slot_order() {
        let mut first = vote();
        let mut second = vote();
        let mut other_round = vote();
        first.vote_id = BigInt::from(3u64);
        second.vote_id = BigInt::from(1u64);
        other_round.round = EntityRef::new("1040-1");

        let grouped = votes_by_round(vec![first, other_round, second]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0.as_str(), "1040-0");
        assert_eq!(
            grouped[0]
                .1
                .iter()
                .map(|v| v.vote_id.clone())
                .collect::<Vec<_>>(),
            vec![BigInt::from(1u64), BigInt::from(3u64)]
        );
        assert_eq!(grouped[1].0.as_str(), "1040-1");
    }

    #[test]
    fn appeal_round_listed_first_still_comes_last() {
        let mut appeal = vote();
        appeal.id = Id::new("1040-1-0");
        appeal.round = EntityRef::new("1040-1");
        let mut tenth = vote();
        tenth.id = Id::new("1040-10-0");
        tenth.round = EntityRef::new("1040-10");
        let initial = vote();

        let order = votes_by_round(vec![tenth, appeal, initial])
            .into_iter()
            .flat_map(|(_, votes)| votes)
            .map(|v| v.id.to_string())
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["1040-0-0", "1040-1-0", "1040-10-0"]);
    }

    #[test]
    fn rounds_without_index_follow_in_arrival_order() {
        let mut b = vote();
        b.round = EntityRef::new("round-b");
        let mut a = vote();
        a.round = EntityRef::new("round-a");
        let initial = vote();

        let rounds = votes_by_round(vec![b, a, initial])
            .into_iter()
            .map(|(round, _)| round.to_string())
            .collect::<Vec<_>>();
        assert_eq!(rounds, vec!["1040-0", "round-b", "round-a"]);
    }
}
