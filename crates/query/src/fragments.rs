// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

//! Named selection sets, one per entity kind.
//!
//! Each fragment selects exactly the fields of the matching
//! `arbitration_schema` type, so a response decodes without missing or
//! unknown keys.

use std::collections::HashSet;

use graphql_parser::query as q;

use crate::{
    selection::{fragment_definitions, SelectionTree},
    CatalogError,
};

/// Revision of the fragment catalog. Bumped whenever a selection changes.
pub const CATALOG_VERSION: &str = "1.1.0";

/// A named GraphQL fragment and the fragments it spreads.
#[derive(Debug)]
pub struct Fragment {
    pub name: &'static str,
    pub type_condition: &'static str,
    pub text: &'static str,
    /// Fragments spread directly by `text`.
    pub dependencies: &'static [&'static Fragment],
}

impl Fragment {
    /// The fragment followed by every fragment it spreads, transitively,
    /// each one included once.
    pub fn document(&self) -> String {
        let mut included = Vec::new();
        self.collect(&mut included);
        render(&included)
    }

    /// Response shape selected by the fragment, spreads resolved.
    pub fn selection(&self) -> Result<SelectionTree, CatalogError> {
        let document = self.document();
        let parsed = q::parse_query::<String>(&document).map_err(|e| CatalogError::Parse {
            name: self.name.to_string(),
            message: e.to_string(),
        })?;
        let fragments = fragment_definitions(&parsed);
        let own = fragments
            .get(self.name)
            .copied()
            .ok_or_else(|| CatalogError::UndefinedFragment(self.name.to_string()))?;
        let mut visiting = HashSet::from([self.name]);
        SelectionTree::resolve(&own.selection_set, &fragments, &mut visiting, 0)
    }

    fn collect<'a>(&'a self, included: &mut Vec<&'a Fragment>) {
        if included.iter().any(|fragment| fragment.name == self.name) {
            return;
        }
        included.push(self);
        for dependency in self.dependencies {
            dependency.collect(included);
        }
    }
}

/// Appends every fragment reachable from `fragments` to an operation.
pub fn compose(operation: &str, fragments: &[&Fragment]) -> String {
    let mut included = Vec::new();
    for fragment in fragments {
        fragment.collect(&mut included);
    }
    format!("{}\n\n{}", operation.trim(), render(&included))
}

fn render(fragments: &[&Fragment]) -> String {
    fragments
        .iter()
        .map(|fragment| fragment.text.trim())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub static COUNTER_FIELDS: Fragment = Fragment {
    name: "CounterFields",
    type_condition: "KlerosCounter",
    text: r#"
fragment CounterFields on KlerosCounter {
  id
  courtsCount
  disputesCount
  openDisputes
  closedDisputes
  evidencePhaseDisputes
  commitPhaseDisputes
  votingPhaseDisputes
  appealPhaseDisputes
  activeJurors
  inactiveJurors
  drawnJurors
  numberOfArbitrables
  tokenStaked
  totalETHFees
  totalTokenRedistributed
  totalUSDthroughContract
}
"#,
    dependencies: &[],
};

pub static COURT_FIELDS: Fragment = Fragment {
    name: "CourtFields",
    type_condition: "Court",
    text: r#"
fragment CourtFields on Court {
  id
  subcourtID
  disputesOngoing
  disputesClosed
  disputesNum
  childs {
    id
  }
  parent {
    id
  }
  policy {
    policy
  }
  tokenStaked
  activeJurors
  hiddenVotes
  minStake
  alpha
  feeForJuror
  jurorsForCourtJump
  timePeriods
  totalETHFees
  totalTokenRedistributed
}
"#,
    dependencies: &[],
};

/// Lightweight dispute: no rounds, the court embedded as a snapshot.
pub static DISPUTE_FIELDS: Fragment = Fragment {
    name: "DisputeFields",
    type_condition: "Dispute",
    text: r#"
fragment DisputeFields on Dispute {
  id
  subcourtID {
    id
    timePeriods
    policy {
      policy
    }
  }
  arbitrable {
    id
  }
  creator {
    id
  }
  currentRulling
  period
  lastPeriodChange
  startTime
  ruled
}
"#,
    dependencies: &[],
};

pub static ROUND_VOTE_FIELDS: Fragment = Fragment {
    name: "RoundVoteFields",
    type_condition: "Vote",
    text: r#"
fragment RoundVoteFields on Vote {
  voteID
  address {
    id
  }
  choice
  voted
  timestamp
}
"#,
    dependencies: &[],
};

pub static ROUND_FIELDS: Fragment = Fragment {
    name: "RoundFields",
    type_condition: "Round",
    text: r#"
fragment RoundFields on Round {
  id
  winningChoice
  startTime
  votes(first: 1000, orderBy: voteID, orderDirection: asc) {
    ...RoundVoteFields
  }
}
"#,
    dependencies: &[&ROUND_VOTE_FIELDS],
};

pub static DISPUTE_WITH_VOTES_FIELDS: Fragment = Fragment {
    name: "DisputeWithVotesFields",
    type_condition: "Dispute",
    text: r#"
fragment DisputeWithVotesFields on Dispute {
  ...DisputeFields
  rounds(first: 1000, orderBy: startTime, orderDirection: asc) {
    ...RoundFields
  }
}
"#,
    dependencies: &[&DISPUTE_FIELDS, &ROUND_FIELDS],
};

pub static VOTE_FIELDS: Fragment = Fragment {
    name: "VoteFields",
    type_condition: "Vote",
    text: r#"
fragment VoteFields on Vote {
  id
  dispute {
    id
  }
  round {
    id
  }
  voteID
  address {
    id
  }
  choice
  voted
  salt
  timestamp
  commit
  commitGasUsed
  commitGasPrice
  commitGasCost
  castGasUsed
  castGasPrice
  castGasCost
  totalGasCost
}
"#,
    dependencies: &[],
};

pub static POLICY_FIELDS: Fragment = Fragment {
    name: "PolicyFields",
    type_condition: "Policy",
    text: r#"
fragment PolicyFields on Policy {
  id
  subcourtID
  policy
  contractAddress
  timestamp
  blockNumber
}
"#,
    dependencies: &[],
};

pub static ARBITRABLE_FIELDS: Fragment = Fragment {
    name: "ArbitrableFields",
    type_condition: "Arbitrable",
    text: r#"
fragment ArbitrableFields on Arbitrable {
  id
  disputesCount
  openDisputes
  closedDisputes
  evidencePhaseDisputes
  commitPhaseDisputes
  votingPhaseDisputes
  appealPhaseDisputes
  ethFees
  ethRewards
  disputes(first: 1000, orderBy: startTime, orderDirection: asc) {
    ...DisputeWithVotesFields
  }
}
"#,
    dependencies: &[&DISPUTE_WITH_VOTES_FIELDS],
};

pub static STAKE_SET_FIELDS: Fragment = Fragment {
    name: "StakeSetFields",
    type_condition: "StakeSet",
    text: r#"
fragment StakeSetFields on StakeSet {
  id
  address {
    id
  }
  subcourtID
  stake
  newTotalStake
  timestamp
}
"#,
    dependencies: &[],
};

/// Every fragment of the catalog.
pub static FRAGMENTS: &[&Fragment] = &[
    &COUNTER_FIELDS,
    &COURT_FIELDS,
    &DISPUTE_FIELDS,
    &DISPUTE_WITH_VOTES_FIELDS,
    &ROUND_FIELDS,
    &ROUND_VOTE_FIELDS,
    &VOTE_FIELDS,
    &POLICY_FIELDS,
    &ARBITRABLE_FIELDS,
    &STAKE_SET_FIELDS,
];

pub fn fragment(name: &str) -> Option<&'static Fragment> {
    FRAGMENTS.iter().copied().find(|fragment| fragment.name == name)
}
