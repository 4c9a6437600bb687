// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use arbitration_query::{
    queries::{
        DisputeVotesVariables, IdVariables, JurorStakesVariables, ListVariables, NoVariables,
    },
    ArbitrableQuery, CatalogQuery, CounterQuery, CourtQuery, CourtsQuery, DisputeQuery,
    DisputeVotesQuery, DisputeWithVotesQuery, JurorStakesQuery, PolicyQuery, MAX_FIRST,
};
use arbitration_schema::{
    Arbitrable, Counter, Court, CourtTree, Dispute, DisputeWithRounds, Policy, StakeSet, Vote,
    COUNTER_ID,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{QueryError, SubgraphBackend};

/// Decodes a GraphQL response envelope.
///
/// Errors are failures whether or not data came with them, and so is a
/// response carrying neither.
pub fn decode_response<T: DeserializeOwned>(operation: &str, raw: &str) -> Result<T, QueryError> {
    let response: graphql_client::Response<T> =
        serde_json::from_str(raw).map_err(|source| QueryError::Decode {
            operation: operation.to_string(),
            source,
        })?;

    let errors = response.errors.filter(|errors| !errors.is_empty());
    match (response.data, errors) {
        (Some(data), None) => Ok(data),
        (Some(_), Some(errors)) => Err(QueryError::PartialResults(errors)),
        (None, Some(errors)) => Err(QueryError::GraphQL(errors)),
        (None, None) => Err(QueryError::NoData(operation.to_string())),
    }
}

/// Typed access to the arbitration subgraph through a [`SubgraphBackend`].
pub struct SubgraphReader<B> {
    backend: B,
    first: u32,
}

impl<B: SubgraphBackend> SubgraphReader<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            first: MAX_FIRST,
        }
    }

    /// Page size of list queries, capped at [`MAX_FIRST`].
    pub fn with_page_size(mut self, first: u32) -> Self {
        self.first = first.clamp(1, MAX_FIRST);
        self
    }

    pub fn page_size(&self) -> u32 {
        self.first
    }

    pub async fn query<Q: CatalogQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, QueryError> {
        let body = serde_json::to_value(Q::build_query(variables)).map_err(|source| {
            QueryError::Encode {
                operation: Q::OPERATION_NAME.to_string(),
                source,
            }
        })?;

        debug!(operation = Q::OPERATION_NAME, "Querying subgraph");
        let raw = self.backend.execute(body).await.map_err(|err| {
            warn!(
                operation = Q::OPERATION_NAME,
                "Failed to query subgraph: {err:#}"
            );
            QueryError::Transport(err)
        })?;

        decode_response(Q::OPERATION_NAME, &raw).inspect_err(|err| {
            warn!(operation = Q::OPERATION_NAME, "{err}");
        })
    }

    /// The counter singleton. Unlike other entities it always exists once
    /// the subgraph has indexed anything, so its absence is an error.
    pub async fn counter(&self) -> Result<Counter, QueryError> {
        self.query::<CounterQuery>(NoVariables::default())
            .await?
            .kleros_counter
            .ok_or_else(|| QueryError::NotFound {
                entity: "KlerosCounter",
                id: COUNTER_ID.to_string(),
            })
    }

    pub async fn court(&self, id: &str) -> Result<Option<Court>, QueryError> {
        Ok(self.query::<CourtQuery>(IdVariables::new(id)).await?.court)
    }

    pub async fn courts(&self) -> Result<Vec<Court>, QueryError> {
        Ok(self
            .query::<CourtsQuery>(ListVariables { first: self.first })
            .await?
            .courts)
    }

    pub async fn court_tree(&self) -> anyhow::Result<CourtTree> {
        let courts = self.courts().await?;
        Ok(CourtTree::new(courts)?)
    }

    pub async fn dispute(&self, id: &str) -> Result<Option<Dispute>, QueryError> {
        Ok(self.query::<DisputeQuery>(IdVariables::new(id)).await?.dispute)
    }

    pub async fn dispute_with_votes(
        &self,
        id: &str,
    ) -> Result<Option<DisputeWithRounds>, QueryError> {
        Ok(self
            .query::<DisputeWithVotesQuery>(IdVariables::new(id))
            .await?
            .dispute)
    }

    /// Full vote entities of a dispute, oldest round first, each round in
    /// `voteID` order.
    pub async fn dispute_votes(&self, dispute: &str) -> Result<Vec<Vote>, QueryError> {
        let votes = self
            .query::<DisputeVotesQuery>(DisputeVotesVariables {
                dispute: dispute.to_string(),
                first: self.first,
            })
            .await?
            .votes;
        Ok(arbitration_schema::votes_by_round(votes)
            .into_iter()
            .flat_map(|(_, votes)| votes)
            .collect())
    }

    pub async fn policy(&self, id: &str) -> Result<Option<Policy>, QueryError> {
        Ok(self.query::<PolicyQuery>(IdVariables::new(id)).await?.policy)
    }

    pub async fn arbitrable(&self, id: &str) -> Result<Option<Arbitrable>, QueryError> {
        Ok(self
            .query::<ArbitrableQuery>(IdVariables::new(id))
            .await?
            .arbitrable)
    }

    pub async fn juror_stakes(&self, juror: &str) -> Result<Vec<StakeSet>, QueryError> {
        Ok(self
            .query::<JurorStakesQuery>(JurorStakesVariables {
                juror: juror.to_string(),
                first: self.first,
            })
            .await?
            .stake_sets)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use arbitration_query::queries::CounterResponse;
    use arbitration_schema::{BigInt, Period};
    use async_trait::async_trait;
    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;

    /// Answers every request with the same body and records what was sent.
    struct MockBackend {
        response: Result<String, String>,
        requests: Mutex<Vec<serde_json::Value>>,
    }

    impl MockBackend {
        fn responding(field: &str, payload: &str) -> Self {
            Self::raw(test_assets::graphql_response(field, payload))
        }

        fn raw(body: impl Into<String>) -> Self {
            Self {
                response: Ok(body.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn last_request(&self) -> serde_json::Value {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl SubgraphBackend for MockBackend {
        async fn execute(&self, body: serde_json::Value) -> anyhow::Result<String> {
            self.requests.lock().unwrap().push(body);
            self.response.clone().map_err(anyhow::Error::msg)
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn fetches_counter() {
        let reader = SubgraphReader::new(MockBackend::responding(
            "klerosCounter",
            test_assets::COUNTER,
        ));
        let counter = reader.counter().await.unwrap();
        assert_eq!(counter.courts_count, BigInt::from(23u64));

        let request = reader.backend.last_request();
        assert_eq!(request["operationName"], json!("CounterQuery"));
        assert_eq!(request["query"], json!(CounterQuery::document()));
    }

    #[tokio::test]
    #[traced_test]
    async fn missing_counter_is_not_found() {
        let reader = SubgraphReader::new(MockBackend::responding("klerosCounter", "null"));
        assert!(matches!(
            reader.counter().await,
            Err(QueryError::NotFound { entity: "KlerosCounter", .. })
        ));
    }

    #[tokio::test]
    #[traced_test]
    async fn missing_dispute_is_none() {
        let reader = SubgraphReader::new(MockBackend::responding("dispute", "null"));
        assert_eq!(reader.dispute("404").await.unwrap(), None);
        assert_eq!(reader.backend.last_request()["variables"], json!({ "id": "404" }));
    }

    #[tokio::test]
    #[traced_test]
    async fn fetches_dispute_with_votes() {
        let reader = SubgraphReader::new(MockBackend::responding(
            "dispute",
            test_assets::DISPUTE_WITH_VOTES,
        ));
        let dispute = reader.dispute_with_votes("1040").await.unwrap().unwrap();
        assert_eq!(dispute.period, Period::Vote);
        assert_eq!(dispute.rounds[0].votes.len(), 2);
    }

    #[tokio::test]
    #[traced_test]
    async fn list_queries_use_the_page_size() {
        let reader = SubgraphReader::new(MockBackend::responding(
            "stakeSets",
            test_assets::STAKE_SETS,
        ))
        .with_page_size(50);
        let stakes = reader.juror_stakes("0xabc").await.unwrap();
        assert_eq!(stakes.len(), 2);
        assert_eq!(
            reader.backend.last_request()["variables"],
            json!({ "juror": "0xabc", "first": 50 })
        );

        assert_eq!(
            SubgraphReader::new(MockBackend::raw("")).with_page_size(5000).page_size(),
            MAX_FIRST
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn builds_court_tree() {
        let reader = SubgraphReader::new(MockBackend::responding("courts", test_assets::COURTS));
        let tree = reader.court_tree().await.unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.root().id.as_str(), "0");
    }

    #[tokio::test]
    #[traced_test]
    async fn dispute_votes_are_grouped_by_round() {
        let vote: serde_json::Value = serde_json::from_str(test_assets::VOTE).unwrap();
        let mut later = vote.clone();
        later["id"] = json!("1040-1-0");
        later["round"] = json!({ "id": "1040-1" });
        let mut second = vote.clone();
        second["id"] = json!("1040-0-1");
        second["voteID"] = json!("1");
        let payload = json!([second, later, vote]).to_string();

        let reader = SubgraphReader::new(MockBackend::responding("votes", &payload));
        let ids: Vec<_> = reader
            .dispute_votes("1040")
            .await
            .unwrap()
            .into_iter()
            .map(|vote| vote.id.to_string())
            .collect();
        assert_eq!(ids, vec!["1040-0-0", "1040-0-1", "1040-1-0"]);
    }

    #[tokio::test]
    #[traced_test]
    async fn appeal_votes_listed_first_come_after_initial_round() {
        let initial: serde_json::Value = serde_json::from_str(test_assets::VOTE).unwrap();
        let mut appeal = initial.clone();
        appeal["id"] = json!("1040-1-0");
        appeal["round"] = json!({ "id": "1040-1" });
        // both hold slot 0, the backend is free to list the appeal round first
        let payload = json!([appeal, initial]).to_string();

        let reader = SubgraphReader::new(MockBackend::responding("votes", &payload));
        let ids: Vec<_> = reader
            .dispute_votes("1040")
            .await
            .unwrap()
            .into_iter()
            .map(|vote| vote.id.to_string())
            .collect();
        assert_eq!(ids, vec!["1040-0-0", "1040-1-0"]);
    }

    struct Unencodable;

    impl serde::Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("variables cannot be encoded"))
        }
    }

    struct UnencodableQuery;

    impl graphql_client::GraphQLQuery for UnencodableQuery {
        type Variables = Unencodable;
        type ResponseData = CounterResponse;

        fn build_query(variables: Self::Variables) -> graphql_client::QueryBody<Self::Variables> {
            graphql_client::QueryBody {
                variables,
                query: "query UnencodableQuery { __typename }",
                operation_name: "UnencodableQuery",
            }
        }
    }

    impl CatalogQuery for UnencodableQuery {
        const OPERATION_NAME: &'static str = "UnencodableQuery";
        const ROOT_FIELD: &'static str = "__typename";

        fn document() -> &'static str {
            "query UnencodableQuery { __typename }"
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn encoding_failure_never_reaches_the_backend() {
        let reader = SubgraphReader::new(MockBackend::responding("klerosCounter", "null"));
        let err = reader.query::<UnencodableQuery>(Unencodable).await.unwrap_err();
        assert!(matches!(
            &err,
            QueryError::Encode { operation, .. } if operation == "UnencodableQuery"
        ));
        assert!(err.to_string().contains("variables cannot be encoded"));
        assert!(reader.backend.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    #[traced_test]
    async fn transport_failure_is_logged() {
        let reader = SubgraphReader::new(MockBackend::failing("connection refused"));
        let err = reader.policy("2-0xcb").await.unwrap_err();
        assert!(matches!(err, QueryError::Transport(_)));
        assert!(logs_contain("Failed to query subgraph: connection refused"));
    }

    #[test]
    fn errors_without_data_are_failures() {
        let err = decode_response::<CounterResponse>(
            "CounterQuery",
            r#"{ "errors": [{ "message": "indexing_error" }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::GraphQL(errors) if errors[0].message == "indexing_error"));
    }

    #[test]
    fn errors_with_data_are_partial_results() {
        let err = decode_response::<CounterResponse>(
            "CounterQuery",
            r#"{ "data": { "klerosCounter": null }, "errors": [{ "message": "store error" }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::PartialResults(_)));
    }

    #[test]
    fn null_data_without_errors_is_a_failure() {
        let err = decode_response::<CounterResponse>("CounterQuery", r#"{ "data": null }"#)
            .unwrap_err();
        assert!(matches!(err, QueryError::NoData(operation) if operation == "CounterQuery"));
    }

    #[test]
    fn empty_error_list_is_ignored() {
        let body = format!(
            r#"{{ "data": {{ "klerosCounter": {} }}, "errors": [] }}"#,
            test_assets::COUNTER
        );
        let response = decode_response::<CounterResponse>("CounterQuery", &body).unwrap();
        assert!(response.kleros_counter.is_some());
    }

    #[test]
    fn shape_mismatch_is_a_decode_error() {
        let err = decode_response::<CounterResponse>(
            "CounterQuery",
            r#"{ "data": { "klerosCounter": { "id": "ID" } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::Decode { .. }));
    }
}
