// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

//! Field-selection catalog of the arbitration subgraph.
//!
//! Fragments select the fields of each entity kind, queries compose them
//! into documents implementing [`graphql_client::GraphQLQuery`], and
//! [`validate_catalog`] checks everything against the backend's SDL.

mod error;
pub mod fragments;
pub mod queries;
mod selection;
mod validation;

pub use crate::{
    error::{CatalogError, ValidationError},
    fragments::{fragment, Fragment, CATALOG_VERSION, FRAGMENTS},
    queries::{
        query_documents, ArbitrableQuery, CatalogQuery, CounterQuery, CourtQuery, CourtsQuery,
        DisputeQuery, DisputeVotesQuery, DisputeWithVotesQuery, JurorStakesQuery, PolicyQuery,
        MAX_FIRST,
    },
    selection::SelectionTree,
    validation::{validate_catalog, ApiSchema},
};

/// Copy of the backend's published schema the catalog was written against.
pub const BUNDLED_SCHEMA: &str = include_str!("../graphql/arbitration.schema.graphql");
