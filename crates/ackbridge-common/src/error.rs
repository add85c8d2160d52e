//! Error types for ackbridge
//!
//! Every variant is fatal for a synthesis run: there is no partial output mode.
//! Variants carry the logical id, resource type and (for attribute errors) the
//! consuming object so a failure can be located in the source tree directly.

use thiserror::Error;

/// Main error type for ackbridge operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// No mapper is registered for a source resource type
    #[error("unable to transform resource '{logical_id}' of type '{resource_type}': mapper is not registered")]
    UnmappedResourceType {
        /// Source resource type tag (e.g. `AWS::S3::Bucket`)
        resource_type: String,
        /// Logical id of the resource that could not be mapped
        logical_id: String,
    },

    /// A property tree contains an intrinsic function other than `Ref`
    #[error("unable to resolve intrinsic function '{intrinsic}' at '{path}' of resource '{logical_id}' ({resource_type})")]
    UnsupportedIntrinsic {
        /// The offending expression, rendered as JSON
        intrinsic: String,
        /// JSON pointer of the expression inside the resource properties
        path: String,
        /// Logical id of the owning resource
        logical_id: String,
        /// Type of the owning resource
        resource_type: String,
    },

    /// A mapper declares a reference mode with no resolution strategy
    #[error("unsupported ref mapping '{mode}' for resource '{logical_id}' ({resource_type})")]
    UnsupportedReferenceMode {
        /// The declared mode
        mode: String,
        /// Logical id of the owning resource
        logical_id: String,
        /// Type of the owning resource
        resource_type: String,
    },

    /// A `Ref` points at a logical id that has not been transformed yet
    #[error("unable to resolve Ref to '{target}' at '{path}' of resource '{logical_id}' ({resource_type}): no such object in chart")]
    UnresolvedReference {
        /// The referenced logical id
        target: String,
        /// JSON pointer of the reference inside the resource properties
        path: String,
        /// Logical id of the owning resource
        logical_id: String,
        /// Type of the owning resource
        resource_type: String,
    },

    /// A consumer reads a runtime attribute that was never exported
    #[error("unable to transform attribute '{attribute}' of '{logical_id}' for env variable '{variable}' in resource '{consumer}': field export not registered")]
    UnresolvedAttributeReference {
        /// Logical id of the resource owning the attribute
        logical_id: String,
        /// Attribute name (e.g. `Endpoint.Address`)
        attribute: String,
        /// Name of the consuming object
        consumer: String,
        /// Environment variable holding the reference
        variable: String,
    },

    /// Two source resources share a logical id
    #[error("duplicate logical id '{logical_id}' in stack")]
    DuplicateLogicalId {
        /// The duplicated logical id
        logical_id: String,
    },

    /// Two chart objects share an id
    #[error("duplicate object id '{id}' in chart '{chart}'")]
    DuplicateId {
        /// The duplicated object id
        id: String,
        /// Chart the object was added to
        chart: String,
    },

    /// Resolved properties do not have the shape the mapper expects
    #[error("invalid properties for resource '{logical_id}' ({resource_type}): {message}")]
    InvalidProperties {
        /// Logical id of the resource
        logical_id: String,
        /// Type of the resource
        resource_type: String,
        /// What was wrong
        message: String,
    },

    /// A JSON patch could not be applied while rendering an object
    #[error("failed to apply patch to '{object}': {message}")]
    Patch {
        /// Id of the object being rendered
        object: String,
        /// Underlying patch error
        message: String,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The object kind being serialized (if known)
        kind: Option<String>,
    },

    /// YAML parse or emit error
    #[error("yaml error: {0}")]
    Yaml(String),
}

impl Error {
    /// Create an invalid properties error
    pub fn invalid_properties(
        logical_id: impl Into<String>,
        resource_type: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::InvalidProperties {
            logical_id: logical_id.into(),
            resource_type: resource_type.into(),
            message: msg.into(),
        }
    }

    /// Create a serialization error without kind context
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: None,
        }
    }

    /// Create a serialization error for a specific object kind
    pub fn serialization_for(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: Some(kind.into()),
        }
    }

    /// Logical id of the source resource this error is about, if any
    pub fn logical_id(&self) -> Option<&str> {
        match self {
            Self::UnmappedResourceType { logical_id, .. }
            | Self::UnsupportedIntrinsic { logical_id, .. }
            | Self::UnsupportedReferenceMode { logical_id, .. }
            | Self::UnresolvedReference { logical_id, .. }
            | Self::UnresolvedAttributeReference { logical_id, .. }
            | Self::DuplicateLogicalId { logical_id }
            | Self::InvalidProperties { logical_id, .. } => Some(logical_id),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::serialization(e.to_string())
    }
}
