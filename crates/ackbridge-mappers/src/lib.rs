//! CloudFormation to ACK resource mappers
//!
//! Each supported CloudFormation resource type has a `ResourceMapper` that
//! builds the matching AWS Controllers for Kubernetes custom resource and
//! declares the runtime attributes the ACK controller publishes in status.
//! Mappers are collected in a `MapperRegistry` handed to the adapter.

pub mod ack;
pub mod mapper;
pub mod mappers;
pub mod registry;

pub use ack::AckKind;
pub use mapper::{ExportMapping, NameMapping, RefMapping, ResourceMapper};
pub use registry::MapperRegistry;
