//! Lookup table from CloudFormation type to mapper
//!
//! Built once per synthesis run and handed to the adapter; nothing here is
//! global, so independent runs cannot see each other's registrations.

use std::collections::BTreeMap;

use tracing::debug;

use ackbridge_common::{Error, Result};

use crate::mapper::ResourceMapper;
use crate::mappers::{
    Ec2SecurityGroupMapper, IamPolicyMapper, IamRoleMapper, LambdaFunctionMapper,
    RdsDbInstanceMapper, RdsDbSubnetGroupMapper, S3BucketMapper,
};

/// Registered mappers keyed by CloudFormation type
#[derive(Default)]
pub struct MapperRegistry {
    mappers: BTreeMap<&'static str, Box<dyn ResourceMapper>>,
}

impl MapperRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in mapper
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(RdsDbInstanceMapper);
        registry.register(Ec2SecurityGroupMapper);
        registry.register(RdsDbSubnetGroupMapper);
        registry.register(IamPolicyMapper);
        registry.register(IamRoleMapper);
        registry.register(LambdaFunctionMapper);
        registry.register(S3BucketMapper);
        registry
    }

    /// Register a mapper. A later registration for the same type replaces the earlier one.
    pub fn register(&mut self, mapper: impl ResourceMapper + 'static) {
        let resource_type = mapper.resource_type();
        if self.mappers.insert(resource_type, Box::new(mapper)).is_some() {
            debug!(resource_type, "Replaced previously registered mapper");
        }
    }

    /// Mapper for a type, if registered
    pub fn try_find(&self, resource_type: &str) -> Option<&dyn ResourceMapper> {
        self.mappers.get(resource_type).map(|m| m.as_ref())
    }

    /// Mapper for the type of `logical_id`, failing if none is registered
    pub fn lookup(&self, resource_type: &str, logical_id: &str) -> Result<&dyn ResourceMapper> {
        self.try_find(resource_type)
            .ok_or_else(|| Error::UnmappedResourceType {
                resource_type: resource_type.to_string(),
                logical_id: logical_id.to_string(),
            })
    }

    /// Registered mappers ordered by type
    pub fn iter(&self) -> impl Iterator<Item = &dyn ResourceMapper> {
        self.mappers.values().map(|m| m.as_ref())
    }

    /// Number of registered mappers
    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    /// Whether no mappers are registered
    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }
}
