// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

//! Typed queries built from the fragment catalog.
//!
//! Documents are composed once per process and handed out as
//! `&'static str`, which is what [`QueryBody`] expects.

use std::sync::LazyLock;

use arbitration_schema::{
    Arbitrable, Counter, Court, Dispute, DisputeWithRounds, Policy, StakeSet, Vote,
};
use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

use crate::fragments::{
    compose, ARBITRABLE_FIELDS, COUNTER_FIELDS, COURT_FIELDS, DISPUTE_FIELDS,
    DISPUTE_WITH_VOTES_FIELDS, POLICY_FIELDS, STAKE_SET_FIELDS, VOTE_FIELDS,
};

/// Largest page the backend serves for a list field.
pub const MAX_FIRST: u32 = 1000;

/// A query of the catalog.
pub trait CatalogQuery: GraphQLQuery {
    const OPERATION_NAME: &'static str;

    /// Response field holding the result.
    const ROOT_FIELD: &'static str;

    fn document() -> &'static str;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NoVariables {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IdVariables {
    pub id: String,
}

impl IdVariables {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListVariables {
    pub first: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisputeVotesVariables {
    pub dispute: String,
    pub first: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JurorStakesVariables {
    pub juror: String,
    pub first: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterResponse {
    pub kleros_counter: Option<Counter>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtResponse {
    pub court: Option<Court>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtsResponse {
    pub courts: Vec<Court>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeResponse {
    pub dispute: Option<Dispute>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeWithVotesResponse {
    pub dispute: Option<DisputeWithRounds>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeVotesResponse {
    pub votes: Vec<Vote>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyResponse {
    pub policy: Option<Policy>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrableResponse {
    pub arbitrable: Option<Arbitrable>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JurorStakesResponse {
    pub stake_sets: Vec<StakeSet>,
}

macro_rules! catalog_query {
    (
        $(#[$meta:meta])*
        $query:ident {
            document: $document:ident,
            root_field: $root_field:literal,
            variables: $variables:ty,
            response: $response:ty,
            operation: $operation:literal,
            fragments: [$($fragment:expr),* $(,)?] $(,)?
        }
    ) => {
        static $document: LazyLock<String> =
            LazyLock::new(|| compose($operation, &[$(&$fragment),*]));

        $(#[$meta])*
        pub struct $query;

        impl GraphQLQuery for $query {
            type Variables = $variables;
            type ResponseData = $response;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $document.as_str(),
                    operation_name: stringify!($query),
                }
            }
        }

        impl CatalogQuery for $query {
            const OPERATION_NAME: &'static str = stringify!($query);
            const ROOT_FIELD: &'static str = $root_field;

            fn document() -> &'static str {
                $document.as_str()
            }
        }
    };
}

catalog_query! {
    /// The protocol-wide counter singleton.
    CounterQuery {
        document: COUNTER_QUERY,
        root_field: "klerosCounter",
        variables: NoVariables,
        response: CounterResponse,
        operation: r#"
query CounterQuery {
  klerosCounter(id: "ID") {
    ...CounterFields
  }
}
"#,
        fragments: [COUNTER_FIELDS],
    }
}

catalog_query! {
    CourtQuery {
        document: COURT_QUERY,
        root_field: "court",
        variables: IdVariables,
        response: CourtResponse,
        operation: r#"
query CourtQuery($id: ID!) {
  court(id: $id) {
    ...CourtFields
  }
}
"#,
        fragments: [COURT_FIELDS],
    }
}

catalog_query! {
    /// Every court, enough to build the whole court tree.
    CourtsQuery {
        document: COURTS_QUERY,
        root_field: "courts",
        variables: ListVariables,
        response: CourtsResponse,
        operation: r#"
query CourtsQuery($first: Int!) {
  courts(first: $first, orderBy: subcourtID, orderDirection: asc) {
    ...CourtFields
  }
}
"#,
        fragments: [COURT_FIELDS],
    }
}

catalog_query! {
    DisputeQuery {
        document: DISPUTE_QUERY,
        root_field: "dispute",
        variables: IdVariables,
        response: DisputeResponse,
        operation: r#"
query DisputeQuery($id: ID!) {
  dispute(id: $id) {
    ...DisputeFields
  }
}
"#,
        fragments: [DISPUTE_FIELDS],
    }
}

catalog_query! {
    /// A dispute with all of its rounds and their votes.
    DisputeWithVotesQuery {
        document: DISPUTE_WITH_VOTES_QUERY,
        root_field: "dispute",
        variables: IdVariables,
        response: DisputeWithVotesResponse,
        operation: r#"
query DisputeWithVotesQuery($id: ID!) {
  dispute(id: $id) {
    ...DisputeWithVotesFields
  }
}
"#,
        fragments: [DISPUTE_WITH_VOTES_FIELDS],
    }
}

catalog_query! {
    /// Full vote entities of a dispute, across rounds.
    DisputeVotesQuery {
        document: DISPUTE_VOTES_QUERY,
        root_field: "votes",
        variables: DisputeVotesVariables,
        response: DisputeVotesResponse,
        operation: r#"
query DisputeVotesQuery($dispute: String!, $first: Int!) {
  votes(where: { dispute: $dispute }, first: $first, orderBy: voteID, orderDirection: asc) {
    ...VoteFields
  }
}
"#,
        fragments: [VOTE_FIELDS],
    }
}

catalog_query! {
    PolicyQuery {
        document: POLICY_QUERY,
        root_field: "policy",
        variables: IdVariables,
        response: PolicyResponse,
        operation: r#"
query PolicyQuery($id: ID!) {
  policy(id: $id) {
    ...PolicyFields
  }
}
"#,
        fragments: [POLICY_FIELDS],
    }
}

catalog_query! {
    ArbitrableQuery {
        document: ARBITRABLE_QUERY,
        root_field: "arbitrable",
        variables: IdVariables,
        response: ArbitrableResponse,
        operation: r#"
query ArbitrableQuery($id: ID!) {
  arbitrable(id: $id) {
    ...ArbitrableFields
  }
}
"#,
        fragments: [ARBITRABLE_FIELDS],
    }
}

catalog_query! {
    /// Stake history of a juror, oldest first.
    JurorStakesQuery {
        document: JUROR_STAKES_QUERY,
        root_field: "stakeSets",
        variables: JurorStakesVariables,
        response: JurorStakesResponse,
        operation: r#"
query JurorStakesQuery($juror: String!, $first: Int!) {
  stakeSets(where: { address: $juror }, first: $first, orderBy: timestamp, orderDirection: asc) {
    ...StakeSetFields
  }
}
"#,
        fragments: [STAKE_SET_FIELDS],
    }
}

/// Operation name and document of every query in the catalog.
pub fn query_documents() -> Vec<(&'static str, &'static str)> {
    fn entry<Q: CatalogQuery>() -> (&'static str, &'static str) {
        (Q::OPERATION_NAME, Q::document())
    }

    vec![
        entry::<CounterQuery>(),
        entry::<CourtQuery>(),
        entry::<CourtsQuery>(),
        entry::<DisputeQuery>(),
        entry::<DisputeWithVotesQuery>(),
        entry::<DisputeVotesQuery>(),
        entry::<PolicyQuery>(),
        entry::<ArbitrableQuery>(),
        entry::<JurorStakesQuery>(),
    ]
}
