// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

mod backend;
mod error;
mod reader;

pub use crate::{
    backend::SubgraphBackend,
    error::QueryError,
    reader::{decode_response, SubgraphReader},
};
