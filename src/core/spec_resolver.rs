// src/core/spec_resolver.rs

use crate::models::ToolSpecRecord;
use serde_json::{Map, Value};
use thiserror::Error;

/// An xcspec record before inheritance, kept untyped since a child may omit
/// any field and inherit it from its parent.
pub type RawRecord = Map<String, Value>;

/// Errors raised while resolving a tool definition.
#[derive(Error, Debug)]
pub enum ResolverError {
    /// No record has the identifier.
    #[error("Found no tool with identifier '{identifier}' in the spec.")]
    SpecNotFound {
        /// The identifier looked up.
        identifier: String,
    },
    /// The `BasedOn` chain loops.
    #[error("Circular 'BasedOn' inheritance detected: {cycle_path}")]
    CyclicInheritance {
        /// The identifiers of the loop, joined with arrows.
        cycle_path: String,
    },
    /// The flattened record is not a tool definition.
    #[error("Spec record '{identifier}' is malformed: {source}")]
    MalformedRecord {
        /// The identifier looked up.
        identifier: String,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// The document is neither a record nor an array of records.
    #[error("A spec document must be an array of records or a single record, found {found}.")]
    UnexpectedDocument {
        /// The JSON kind of the document.
        found: &'static str,
    },
}

type ResolverResult<T> = Result<T, ResolverError>;

/// Every record of one xcspec file, in file order.
#[derive(Debug, Clone, Default)]
pub struct SpecDocument {
    records: Vec<RawRecord>,
}

impl SpecDocument {
    /// Builds a document from the JSON form of an xcspec. Non-object array
    /// entries carry no tool definition and are skipped.
    pub fn from_value(value: Value) -> ResolverResult<Self> {
        let records = match value {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
            Value::Object(map) => vec![map],
            other => {
                return Err(ResolverError::UnexpectedDocument {
                    found: json_kind(&other),
                });
            }
        };
        Ok(Self { records })
    }

    /// Number of records, including the ones that are never resolved.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the document has no record at all.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolves a tool and flattens its `BasedOn` chain into a single record.
    ///
    /// Fields are merged shallowly, root first: a descendant's field replaces the
    /// ancestor's, so a child-declared `Options` array replaces the parent's
    /// instead of extending it.
    ///
    /// # Errors
    /// `SpecNotFound` if the tool or any ancestor is missing, `CyclicInheritance`
    /// if the chain loops, `MalformedRecord` if the flattened record lacks the
    /// fields of a tool definition.
    pub fn resolve_tool(&self, identifier: &str) -> ResolverResult<ToolSpecRecord> {
        let chain = self.build_inheritance_chain(identifier)?;
        log::debug!(
            "Resolved inheritance chain for '{}' ({} level(s)).",
            identifier,
            chain.len()
        );
        let merged = merge_chain_into_record(chain);
        serde_json::from_value(Value::Object(merged)).map_err(|source| {
            ResolverError::MalformedRecord {
                identifier: identifier.to_string(),
                source,
            }
        })
    }

    /// When several records share an identifier, the last one wins.
    fn find_raw(&self, identifier: &str) -> Option<&RawRecord> {
        self.records
            .iter()
            .rev()
            .find(|record| string_field(record, "Identifier") == Some(identifier))
    }

    /// Returns the chain root-first, leaf last.
    fn build_inheritance_chain(&self, leaf: &str) -> ResolverResult<Vec<&RawRecord>> {
        let mut chain = Vec::new();
        let mut visited: Vec<String> = Vec::new();
        let mut current = Some(leaf.to_string());

        while let Some(identifier) = current {
            if visited.contains(&identifier) {
                visited.push(identifier);
                return Err(ResolverError::CyclicInheritance {
                    cycle_path: visited.join(" -> "),
                });
            }
            let record = self
                .find_raw(&identifier)
                .ok_or_else(|| ResolverError::SpecNotFound {
                    identifier: identifier.clone(),
                })?;
            current = string_field(record, "BasedOn").map(str::to_string);
            visited.push(identifier);
            chain.push(record);
        }
        chain.reverse();
        Ok(chain)
    }
}

fn merge_chain_into_record(chain: Vec<&RawRecord>) -> RawRecord {
    let mut resolved = RawRecord::new();
    for record in chain {
        for (key, value) in record {
            resolved.insert(key.clone(), value.clone());
        }
    }
    resolved
}

fn string_field<'a>(record: &'a RawRecord, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
