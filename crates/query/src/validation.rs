// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use std::collections::{HashMap, HashSet};

use graphql_parser::{query as q, schema};

use crate::{
    fragments::FRAGMENTS, queries::query_documents, selection::fragment_definitions,
    CatalogError, ValidationError,
};

const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

#[derive(Debug)]
enum TypeInfo {
    /// Scalars and enums.
    Leaf,
    Object(HashMap<String, FieldInfo>),
}

#[derive(Debug)]
struct FieldInfo {
    arguments: HashSet<String>,
    type_name: String,
}

/// Selectable types of a published GraphQL schema.
#[derive(Debug)]
pub struct ApiSchema {
    types: HashMap<String, TypeInfo>,
}

impl ApiSchema {
    pub fn parse(sdl: &str) -> Result<Self, CatalogError> {
        let document = schema::parse_schema::<String>(sdl)
            .map_err(|e| CatalogError::Schema(e.to_string()))?;

        let mut types: HashMap<String, TypeInfo> = BUILTIN_SCALARS
            .iter()
            .map(|name| (name.to_string(), TypeInfo::Leaf))
            .collect();

        for definition in &document.definitions {
            let schema::Definition::TypeDefinition(definition) = definition else {
                continue;
            };
            match definition {
                schema::TypeDefinition::Scalar(scalar) => {
                    types.insert(scalar.name.clone(), TypeInfo::Leaf);
                }
                schema::TypeDefinition::Enum(enum_type) => {
                    types.insert(enum_type.name.clone(), TypeInfo::Leaf);
                }
                schema::TypeDefinition::Object(object) => {
                    types.insert(object.name.clone(), object_info(&object.fields));
                }
                schema::TypeDefinition::Interface(interface) => {
                    types.insert(interface.name.clone(), object_info(&interface.fields));
                }
                schema::TypeDefinition::Union(union) => {
                    types.insert(union.name.clone(), TypeInfo::Object(HashMap::new()));
                }
                schema::TypeDefinition::InputObject(_) => {}
            }
        }

        Ok(Self { types })
    }

    /// Checks every definition of a query document. Fragments are checked
    /// against their type condition, operations against `Query`.
    pub fn validate(&self, name: &str, document: &str) -> Vec<ValidationError> {
        let parsed = match q::parse_query::<String>(document) {
            Ok(parsed) => parsed,
            Err(e) => {
                return vec![ValidationError::Parse {
                    definition: name.to_string(),
                    message: e.to_string(),
                }]
            }
        };
        let fragments = fragment_definitions(&parsed);

        let mut errors = Vec::new();
        for definition in &parsed.definitions {
            match definition {
                q::Definition::Fragment(fragment) => {
                    let q::TypeCondition::On(on) = &fragment.type_condition;
                    match self.types.get(on) {
                        Some(TypeInfo::Object(_)) => self.check_selection(
                            &fragment.name,
                            on,
                            &fragment.selection_set,
                            &fragments,
                            &mut errors,
                        ),
                        _ => errors.push(ValidationError::UnknownType {
                            definition: fragment.name.clone(),
                            type_name: on.clone(),
                        }),
                    }
                }
                q::Definition::Operation(q::OperationDefinition::Query(query)) => {
                    let operation = query.name.as_deref().unwrap_or(name);
                    self.check_selection(
                        operation,
                        "Query",
                        &query.selection_set,
                        &fragments,
                        &mut errors,
                    );
                }
                q::Definition::Operation(q::OperationDefinition::SelectionSet(selection_set)) => {
                    self.check_selection(name, "Query", selection_set, &fragments, &mut errors);
                }
                q::Definition::Operation(q::OperationDefinition::Mutation(mutation)) => {
                    errors.push(ValidationError::NotAQuery(
                        mutation.name.clone().unwrap_or_else(|| name.to_string()),
                    ));
                }
                q::Definition::Operation(q::OperationDefinition::Subscription(subscription)) => {
                    errors.push(ValidationError::NotAQuery(
                        subscription.name.clone().unwrap_or_else(|| name.to_string()),
                    ));
                }
            }
        }
        errors
    }

    fn check_selection(
        &self,
        definition: &str,
        type_name: &str,
        selection_set: &q::SelectionSet<String>,
        fragments: &HashMap<&str, &q::FragmentDefinition<String>>,
        errors: &mut Vec<ValidationError>,
    ) {
        let Some(TypeInfo::Object(fields)) = self.types.get(type_name) else {
            return;
        };

        for item in &selection_set.items {
            match item {
                q::Selection::Field(field) => {
                    if field.name == "__typename" {
                        continue;
                    }
                    let Some(info) = fields.get(&field.name) else {
                        errors.push(ValidationError::UnknownField {
                            definition: definition.to_string(),
                            type_name: type_name.to_string(),
                            field: field.name.clone(),
                        });
                        continue;
                    };
                    for (argument, _) in &field.arguments {
                        if !info.arguments.contains(argument) {
                            errors.push(ValidationError::UnknownArgument {
                                definition: definition.to_string(),
                                type_name: type_name.to_string(),
                                field: field.name.clone(),
                                argument: argument.clone(),
                            });
                        }
                    }
                    let has_selection = !field.selection_set.items.is_empty();
                    match self.types.get(&info.type_name) {
                        None => errors.push(ValidationError::UnknownType {
                            definition: definition.to_string(),
                            type_name: info.type_name.clone(),
                        }),
                        Some(TypeInfo::Leaf) if has_selection => {
                            errors.push(ValidationError::UnexpectedSelection {
                                definition: definition.to_string(),
                                type_name: type_name.to_string(),
                                field: field.name.clone(),
                            })
                        }
                        Some(TypeInfo::Leaf) => {}
                        Some(TypeInfo::Object(_)) if !has_selection => {
                            errors.push(ValidationError::MissingSelection {
                                definition: definition.to_string(),
                                type_name: type_name.to_string(),
                                field: field.name.clone(),
                            })
                        }
                        Some(TypeInfo::Object(_)) => self.check_selection(
                            definition,
                            &info.type_name,
                            &field.selection_set,
                            fragments,
                            errors,
                        ),
                    }
                }
                q::Selection::FragmentSpread(spread) => {
                    let Some(fragment) = fragments.get(spread.fragment_name.as_str()) else {
                        errors.push(ValidationError::UndefinedFragment {
                            definition: definition.to_string(),
                            fragment: spread.fragment_name.clone(),
                        });
                        continue;
                    };
                    let q::TypeCondition::On(on) = &fragment.type_condition;
                    if on != type_name {
                        errors.push(ValidationError::SpreadTypeMismatch {
                            definition: definition.to_string(),
                            fragment: spread.fragment_name.clone(),
                            expected: type_name.to_string(),
                            found: on.clone(),
                        });
                    }
                }
                q::Selection::InlineFragment(inline) => {
                    let target = match &inline.type_condition {
                        Some(q::TypeCondition::On(on)) => on.as_str(),
                        None => type_name,
                    };
                    if target != type_name {
                        errors.push(ValidationError::SpreadTypeMismatch {
                            definition: definition.to_string(),
                            fragment: format!("... on {target}"),
                            expected: type_name.to_string(),
                            found: target.to_string(),
                        });
                        continue;
                    }
                    self.check_selection(
                        definition,
                        type_name,
                        &inline.selection_set,
                        fragments,
                        errors,
                    );
                }
            }
        }
    }
}

fn object_info(fields: &[schema::Field<String>]) -> TypeInfo {
    TypeInfo::Object(
        fields
            .iter()
            .map(|field| {
                let info = FieldInfo {
                    arguments: field.arguments.iter().map(|a| a.name.clone()).collect(),
                    type_name: named_type(&field.field_type).to_string(),
                };
                (field.name.clone(), info)
            })
            .collect(),
    )
}

fn named_type<'a>(field_type: &'a schema::Type<String>) -> &'a str {
    match field_type {
        schema::Type::NamedType(name) => name.as_str(),
        schema::Type::ListType(inner) | schema::Type::NonNullType(inner) => named_type(inner),
    }
}

/// Checks every fragment and every query of the catalog against `sdl`.
///
/// A fragment spread by several documents is reported once per defect.
pub fn validate_catalog(sdl: &str) -> Result<(), CatalogError> {
    let schema = ApiSchema::parse(sdl)?;

    let mut documents: Vec<(&str, String)> = FRAGMENTS
        .iter()
        .map(|fragment| (fragment.name, fragment.document()))
        .collect();
    documents.extend(
        query_documents()
            .into_iter()
            .map(|(name, document)| (name, document.to_string())),
    );

    let mut errors: Vec<ValidationError> = Vec::new();
    for (name, document) in &documents {
        for error in schema.validate(name, document) {
            if !errors.contains(&error) {
                errors.push(error);
            }
        }
    }

    if errors.is_empty() {
        tracing::debug!(documents = documents.len(), "Catalog matches the schema");
        Ok(())
    } else {
        Err(CatalogError::Invalid(errors))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::BUNDLED_SCHEMA;

    fn schema() -> ApiSchema {
        ApiSchema::parse(BUNDLED_SCHEMA).unwrap()
    }

    #[test]
    fn catalog_matches_bundled_schema() {
        validate_catalog(BUNDLED_SCHEMA).unwrap();
    }

    #[test]
    fn dropped_field_breaks_the_catalog() {
        let sdl = BUNDLED_SCHEMA.replace("  ethRewards: BigInt!\n", "");
        let Err(CatalogError::Invalid(errors)) = validate_catalog(&sdl) else {
            panic!("catalog should not match");
        };
        assert_eq!(
            errors,
            vec![ValidationError::UnknownField {
                definition: "ArbitrableFields".to_string(),
                type_name: "Arbitrable".to_string(),
                field: "ethRewards".to_string(),
            }]
        );
    }

    #[test]
    fn unparsable_schema_is_reported() {
        assert!(matches!(
            validate_catalog("type Court {"),
            Err(CatalogError::Schema(_))
        ));
    }

    #[rstest]
    #[case::unknown_field(
        "fragment F on Court { id nickname }",
        ValidationError::UnknownField {
            definition: "F".to_string(),
            type_name: "Court".to_string(),
            field: "nickname".to_string(),
        }
    )]
    #[case::unknown_argument(
        "fragment F on Court { childs(limit: 3) { id } }",
        ValidationError::UnknownArgument {
            definition: "F".to_string(),
            type_name: "Court".to_string(),
            field: "childs".to_string(),
            argument: "limit".to_string(),
        }
    )]
    #[case::missing_selection(
        "fragment F on Court { parent }",
        ValidationError::MissingSelection {
            definition: "F".to_string(),
            type_name: "Court".to_string(),
            field: "parent".to_string(),
        }
    )]
    #[case::unexpected_selection(
        "fragment F on Court { id { value } }",
        ValidationError::UnexpectedSelection {
            definition: "F".to_string(),
            type_name: "Court".to_string(),
            field: "id".to_string(),
        }
    )]
    #[case::spread_type_mismatch(
        "fragment F on Court { parent { ...G } } fragment G on Dispute { id }",
        ValidationError::SpreadTypeMismatch {
            definition: "F".to_string(),
            fragment: "G".to_string(),
            expected: "Court".to_string(),
            found: "Dispute".to_string(),
        }
    )]
    #[case::undefined_fragment(
        r#"query Q { court(id: "0") { ...Missing } }"#,
        ValidationError::UndefinedFragment {
            definition: "Q".to_string(),
            fragment: "Missing".to_string(),
        }
    )]
    #[case::unknown_type(
        "fragment F on Judge { id }",
        ValidationError::UnknownType {
            definition: "F".to_string(),
            type_name: "Judge".to_string(),
        }
    )]
    #[case::mutation(
        "mutation M { court { id } }",
        ValidationError::NotAQuery("M".to_string())
    )]
    fn reports_defect(#[case] document: &str, #[case] expected: ValidationError) {
        assert_eq!(schema().validate("test", document), vec![expected]);
    }

    #[test]
    fn typename_and_matching_inline_fragments_are_accepted() {
        let errors = schema().validate(
            "test",
            r#"query { court(id: "0") { __typename ... on Court { id } } }"#,
        );
        assert_eq!(errors, vec![]);
    }
}
