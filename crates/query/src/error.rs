// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// A defect of one catalog definition (fragment or operation) with
/// respect to the backend schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("`{definition}` does not parse: {message}")]
    Parse { definition: String, message: String },
    #[error("`{definition}` refers to unknown type `{type_name}`")]
    UnknownType {
        definition: String,
        type_name: String,
    },
    #[error("`{definition}` selects unknown field `{field}` on `{type_name}`")]
    UnknownField {
        definition: String,
        type_name: String,
        field: String,
    },
    #[error("`{definition}` passes unknown argument `{argument}` to `{type_name}.{field}`")]
    UnknownArgument {
        definition: String,
        type_name: String,
        field: String,
        argument: String,
    },
    #[error("`{definition}` selects `{type_name}.{field}` without a sub-selection")]
    MissingSelection {
        definition: String,
        type_name: String,
        field: String,
    },
    #[error("`{definition}` has a sub-selection on leaf field `{type_name}.{field}`")]
    UnexpectedSelection {
        definition: String,
        type_name: String,
        field: String,
    },
    #[error("`{definition}` spreads `{fragment}` (on `{found}`) where `{expected}` is selected")]
    SpreadTypeMismatch {
        definition: String,
        fragment: String,
        expected: String,
        found: String,
    },
    #[error("`{definition}` spreads undefined fragment `{fragment}`")]
    UndefinedFragment { definition: String, fragment: String },
    #[error("`{0}` is not a query")]
    NotAQuery(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Failed to parse `{name}`: {message}")]
    Parse { name: String, message: String },
    #[error("Undefined fragment `{0}`")]
    UndefinedFragment(String),
    #[error("Circular fragment reference through `{0}`")]
    CircularFragment(String),
    #[error("Selection exceeds the maximum nesting depth of {0}")]
    TooDeep(usize),
    #[error("Failed to parse the schema: {0}")]
    Schema(String),
    #[error("Catalog does not match the schema: {}", describe(.0))]
    Invalid(Vec<ValidationError>),
}

fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
