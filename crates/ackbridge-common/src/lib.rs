//! Common types for ackbridge: source stacks, target charts, errors and utilities
//!
//! The source side is a `Stack` of CloudFormation-style resources plus the
//! token table behind their runtime attributes. The target side is a `Chart`
//! of Kubernetes manifests that are edited only through JSON patches.

#![deny(missing_docs)]

pub mod chart;
pub mod error;
pub mod k8s;
pub mod manifest;
pub mod source;
pub mod telemetry;
pub mod token;
pub mod yaml;

pub use chart::Chart;
pub use error::Error;
pub use manifest::{ApiObject, ApiObjectRef};
pub use source::{ResourceScope, SourceResource, Stack};
pub use token::{TokenResolver, TokenTable};

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Namespace assumed for objects that do not declare one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Prefix of every intrinsic function key (`Fn::GetAtt`, `Fn::Join`, ...)
pub const INTRINSIC_PREFIX: &str = "Fn::";

/// Key of a name reference expression
pub const REF_KEY: &str = "Ref";
