//! Source side of the translation: CloudFormation-style resources
//!
//! A `Stack` is the ordered list of resources to transform plus the token
//! table their consumers use to reference runtime attributes. Order matters:
//! a `Ref` can only point at a resource declared earlier.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::token::TokenTable;
use crate::{Error, Result};

/// One resource definition in the source tree
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceResource {
    /// Stable identifier, unique within the stack
    pub logical_id: String,
    /// Resource type tag (e.g. `AWS::RDS::DBInstance`)
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Rendered property tree, possibly containing intrinsic expressions
    #[serde(default)]
    pub properties: Value,
}

impl SourceResource {
    /// Create a new resource definition
    pub fn new(
        logical_id: impl Into<String>,
        resource_type: impl Into<String>,
        properties: Value,
    ) -> Self {
        Self {
            logical_id: logical_id.into(),
            resource_type: resource_type.into(),
            properties,
        }
    }
}

/// Operations a scope must offer to host source resources.
///
/// Implemented by `Stack` directly and by anything that plays the stack role
/// through delegation.
pub trait ResourceScope {
    /// Add a resource, rejecting duplicate logical ids
    fn add_resource(&mut self, resource: SourceResource) -> Result<()>;

    /// Resources in declaration order
    fn resources(&self) -> &[SourceResource];

    /// Token table backing attribute references
    fn tokens(&self) -> &TokenTable;

    /// Mint a token referencing a runtime attribute of a resource
    fn get_att(&mut self, logical_id: &str, attribute: &str) -> String;
}

/// Ordered collection of source resources
#[derive(Clone, Debug, Default)]
pub struct Stack {
    resources: Vec<SourceResource>,
    tokens: TokenTable,
}

impl Stack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stack with a pre-populated token table
    pub fn with_tokens(tokens: TokenTable) -> Self {
        Self {
            resources: Vec::new(),
            tokens,
        }
    }

    /// Look up a resource by logical id
    pub fn resource(&self, logical_id: &str) -> Option<&SourceResource> {
        self.resources.iter().find(|r| r.logical_id == logical_id)
    }
}

impl ResourceScope for Stack {
    fn add_resource(&mut self, resource: SourceResource) -> Result<()> {
        if self.resource(&resource.logical_id).is_some() {
            return Err(Error::DuplicateLogicalId {
                logical_id: resource.logical_id,
            });
        }
        self.resources.push(resource);
        Ok(())
    }

    fn resources(&self) -> &[SourceResource] {
        &self.resources
    }

    fn tokens(&self) -> &TokenTable {
        &self.tokens
    }

    fn get_att(&mut self, logical_id: &str, attribute: &str) -> String {
        self.tokens.get_att(logical_id, attribute)
    }
}
