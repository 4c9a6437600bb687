// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{BigInt, EntityRef, Id};

/// Vote as embedded in a [`Round`].
///
/// It carries no reference back to its round; the round owns it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundVote {
    #[serde(rename = "voteID")]
    pub vote_id: BigInt,
    pub address: EntityRef,
    choice: BigInt,
    pub voted: bool,
    pub timestamp: BigInt,
}

impl RoundVote {
    /// The juror's choice, only once the vote has been cast or revealed.
    pub fn choice(&self) -> Option<&BigInt> {
        self.voted.then_some(&self.choice)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: Id,
    pub winning_choice: BigInt,
    pub start_time: BigInt,
    /// Ordered by draw slot, whatever order the response used.
    #[serde(deserialize_with = "by_vote_id")]
    pub votes: Vec<RoundVote>,
}

impl Round {
    /// Number of revealed votes per choice. Votes that were not cast yet are
    /// left out, their `choice` is a placeholder.
    pub fn tally(&self) -> BTreeMap<BigInt, usize> {
        let mut tally = BTreeMap::new();
        for choice in self.votes.iter().filter_map(RoundVote::choice) {
            *tally.entry(choice.clone()).or_insert(0) += 1;
        }
        tally
    }

    pub fn pending_votes(&self) -> usize {
        self.votes.iter().filter(|vote| !vote.voted).count()
    }
}

fn by_vote_id<'de, D>(deserializer: D) -> Result<Vec<RoundVote>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut votes = Vec::<RoundVote>::deserialize(deserializer)?;
    votes.sort_by(|a, b| a.vote_id.cmp(&b.vote_id));
    Ok(votes)
}

/// Orders rounds by start time. Rounds starting at the same time keep the
/// response order.
pub(crate) fn chronological<'de, D>(deserializer: D) -> Result<Vec<Round>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut rounds = Vec::<Round>::deserialize(deserializer)?;
    rounds.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    Ok(rounds)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn round() -> Round {
        serde_json::from_value(json!({
            "id": "1040-0",
            "winningChoice": "1",
            "startTime": "1649000000",
            "votes": [
                { "voteID": "2", "address": { "id": "0xc" }, "choice": "1", "voted": true, "timestamp": "1650000300" },
                { "voteID": "0", "address": { "id": "0xa" }, "choice": "1", "voted": true, "timestamp": "1650000200" },
                { "voteID": "1", "address": { "id": "0xb" }, "choice": "2", "voted": false, "timestamp": "0" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn votes_are_ordered_by_vote_id() {
        let ids: Vec<_> = round().votes.iter().map(|v| v.vote_id.clone()).collect();
        assert_eq!(
            ids,
            vec![BigInt::from(0u64), BigInt::from(1u64), BigInt::from(2u64)]
        );
    }

    #[test]
    fn unrevealed_choice_is_not_exposed() {
        let round = round();
        let pending = &round.votes[1];
        assert!(!pending.voted);
        assert_eq!(pending.choice(), None);
        // the placeholder still survives a round trip
        assert_eq!(serde_json::to_value(pending).unwrap()["choice"], json!("2"));
    }

    #[test]
    fn tally_counts_revealed_votes_only() {
        let round = round();
        assert_eq!(
            round.tally(),
            BTreeMap::from([(BigInt::from(1u64), 2)])
        );
        assert_eq!(round.pending_votes(), 1);
    }
}
