//! The per-resource-type mapping contract
//!
//! A `ResourceMapper` turns one resolved CloudFormation resource into one ACK
//! object. Besides the transform itself it declares which property carries
//! the resource name, which runtime attributes the ACK object exposes in its
//! status, and how a `Ref` inside its properties resolves.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use ackbridge_common::{ApiObject, Chart, Error, Result};

/// Which source property names the resource, and where the name lives in the target spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMapping {
    /// Source property holding an explicit name (e.g. `bucketName`)
    pub cfn_property: &'static str,
    /// JSON pointer of the name inside the target object (e.g. `/spec/name`)
    pub spec_path: &'static str,
}

/// A runtime attribute exposed through the target object's status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportMapping {
    /// Dotted path below `.status` (e.g. `endpoint.address`)
    pub field: &'static str,
    /// CloudFormation attribute name (e.g. `Endpoint.Address`)
    pub attribute: &'static str,
}

/// How a `Ref` resolves for a mapper
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefMapping {
    /// The referenced object's name
    #[default]
    Name,
    /// The referenced object's ARN (no resolution strategy yet)
    Arn,
}

impl fmt::Display for RefMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Arn => write!(f, "arn"),
        }
    }
}

/// Transforms one CloudFormation resource type into an ACK resource.
///
/// Implementations must be pure with respect to their inputs: `map` only ever
/// sees fully resolved properties and may add auxiliary objects (e.g. a
/// Secret) to the chart, but must not touch objects it did not create.
pub trait ResourceMapper: Send + Sync {
    /// CloudFormation type handled (e.g. `AWS::S3::Bucket`)
    fn resource_type(&self) -> &'static str;

    /// Name correspondence between source property and target spec
    fn name_mapping(&self) -> NameMapping;

    /// Runtime attributes exposed by the target object
    fn export_mappings(&self) -> &'static [ExportMapping] {
        &[]
    }

    /// Resolution mode for `Ref` expressions in this resource's properties
    fn ref_mapping(&self) -> RefMapping {
        RefMapping::Name
    }

    /// Kind of the produced object, for listings
    fn target_kind(&self) -> &'static str;

    /// Build the target object for `logical_id`.
    ///
    /// The returned object is not yet in the chart; the caller adds it under
    /// `logical_id`.
    fn map(&self, chart: &mut Chart, logical_id: &str, properties: &Value) -> Result<ApiObject>;
}

/// Deserialize resolved properties into a mapper's typed view
pub fn parse_properties<T: DeserializeOwned>(
    logical_id: &str,
    resource_type: &str,
    properties: &Value,
) -> Result<T> {
    let properties = match properties {
        Value::Null => Value::Object(Default::default()),
        other => other.clone(),
    };
    serde_json::from_value(properties)
        .map_err(|e| Error::invalid_properties(logical_id, resource_type, e.to_string()))
}
