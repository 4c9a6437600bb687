// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Failed to encode the variables of `{operation}`: {source}")]
    Encode {
        operation: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to query the subgraph: {0:#}")]
    Transport(anyhow::Error),
    #[error("Subgraph returned errors: {}", messages(.0))]
    GraphQL(Vec<graphql_client::Error>),
    #[error("Unsupported partial results. Errors: {}", messages(.0))]
    PartialResults(Vec<graphql_client::Error>),
    #[error("No data or errors returned for `{0}`")]
    NoData(String),
    #[error("Failed to decode the response to `{operation}`: {source}")]
    Decode {
        operation: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: String },
}

fn messages(errors: &[graphql_client::Error]) -> String {
    errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
