// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;

/// Transport to the indexing backend.
///
/// Receives a serialized [`graphql_client::QueryBody`] and returns the raw
/// response body. Implementations own endpoints, authentication and
/// retries; the reader never retries.
#[async_trait]
pub trait SubgraphBackend: Send + Sync {
    async fn execute(&self, body: serde_json::Value) -> anyhow::Result<String>;
}

#[async_trait]
impl<B> SubgraphBackend for Arc<B>
where
    B: SubgraphBackend + ?Sized,
{
    async fn execute(&self, body: serde_json::Value) -> anyhow::Result<String> {
        self.as_ref().execute(body).await
    }
}
