//! Two-phase transformation of a source stack into an ACK chart
//!
//! Phase one maps every resource in declaration order: resolve intrinsics,
//! run the mapper, fix up auto-assigned names, bind exports. Phase two
//! rewrites consumers that read runtime attributes. Any error aborts the run.

use serde_json::Value;
use tracing::{debug, info, instrument};

use ackbridge_common::manifest::{add_op, parse_pointer, pointer};
use ackbridge_common::{Chart, Result, SourceResource, TokenResolver};
use ackbridge_mappers::MapperRegistry;

use crate::exports::{bind_exports, ExportTable};
use crate::resolver::IntrinsicResolver;
use crate::rewriter::AttributeRewriter;

/// Orchestrates mapping and attribute rewriting for one synthesis run
pub struct Adapter {
    registry: MapperRegistry,
    exports: ExportTable,
}

impl Adapter {
    /// Create an adapter over an explicit registry
    pub fn new(registry: MapperRegistry) -> Self {
        Self {
            registry,
            exports: ExportTable::new(),
        }
    }

    /// Registry in use
    pub fn registry(&self) -> &MapperRegistry {
        &self.registry
    }

    /// Exports registered so far
    pub fn exports(&self) -> &ExportTable {
        &self.exports
    }

    /// Map every resource into the chart, in order
    #[instrument(skip_all, fields(chart = %chart.name(), resources = resources.len()))]
    pub fn transform_resources(
        &mut self,
        chart: &mut Chart,
        resources: &[SourceResource],
    ) -> Result<()> {
        for resource in resources {
            self.transform_resource(chart, resource)?;
        }
        info!(
            resources = resources.len(),
            exports = self.exports.len(),
            "Mapped source resources"
        );
        Ok(())
    }

    fn transform_resource(&mut self, chart: &mut Chart, resource: &SourceResource) -> Result<()> {
        let logical_id = resource.logical_id.as_str();
        let resource_type = resource.resource_type.as_str();
        let mapper = self.registry.lookup(resource_type, logical_id)?;

        let resolved = IntrinsicResolver::new(chart, logical_id, resource_type, mapper.ref_mapping())
            .resolve(&resource.properties)?;

        let object = mapper.map(chart, logical_id, &resolved)?;
        let name_mapping = mapper.name_mapping();
        // an empty identifier counts as unnamed
        let named = resolved
            .get(name_mapping.cfn_property)
            .is_some_and(|v| !v.is_null() && v.as_str() != Some(""));

        let added = chart.add(object)?;
        if !named {
            let name = added.name().to_string();
            added.add_json_patch(add_op(
                parse_pointer(name_mapping.spec_path)?,
                Value::String(name.clone()),
            ));
            added.add_json_patch(add_op(pointer(["metadata", "name"]), Value::String(name)));
        }
        debug!(
            logical_id,
            resource_type,
            kind = %added.kind(),
            name = %added.name(),
            generated_name = !named,
            "Mapped resource"
        );

        let target = added.object_ref();
        for declaration in bind_exports(chart, logical_id, &target, mapper.export_mappings())? {
            self.exports.insert(declaration);
        }
        Ok(())
    }

    /// Rewrite attribute references in every object; returns the number of patches queued
    #[instrument(skip_all, fields(chart = %chart.name()))]
    pub fn transform_attributes(
        &self,
        chart: &mut Chart,
        tokens: &dyn TokenResolver,
    ) -> Result<usize> {
        let rewriter = AttributeRewriter::new(tokens, &self.exports);
        let mut patched = 0;
        for object in chart.api_objects_mut() {
            let ops = rewriter.rewrite(object)?;
            patched += ops.len();
            for op in ops {
                object.add_json_patch(op);
            }
        }
        info!(patches = patched, "Rewrote attribute references");
        Ok(patched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ackbridge_common::{ApiObject, Error, TokenTable};
    use ackbridge_mappers::{NameMapping, ResourceMapper};
    use serde_json::json;

    fn rds(id: &str, properties: Value) -> SourceResource {
        SourceResource::new(id, "AWS::RDS::DBInstance", properties)
    }

    fn adapter() -> Adapter {
        Adapter::new(MapperRegistry::with_defaults())
    }

    #[test]
    fn test_named_resource_keeps_its_name() {
        let mut chart = Chart::new("test");
        adapter()
            .transform_resources(
                &mut chart,
                &[rds("Db", json!({"dbInstanceIdentifier": "orders", "engine": "postgres"}))],
            )
            .unwrap();

        let db = chart.try_find_child("Db").unwrap();
        assert_eq!(db.name(), "orders");
        assert!(db.patches().is_empty());
    }

    #[test]
    fn test_unnamed_resource_gets_name_patched_into_spec() {
        let mut chart = Chart::new("test");
        adapter()
            .transform_resources(&mut chart, &[rds("Db", json!({"engine": "postgres"}))])
            .unwrap();

        let rendered = chart.try_find_child("Db").unwrap().to_json().unwrap();
        let name = chart.allocate_name("Db");
        assert_eq!(rendered["metadata"]["name"], name);
        assert_eq!(rendered["spec"]["dbInstanceIdentifier"], name);
    }

    #[test]
    fn test_empty_identifier_gets_generated_name() {
        let mut chart = Chart::new("test");
        adapter()
            .transform_resources(&mut chart, &[rds("Db", json!({"dbInstanceIdentifier": ""}))])
            .unwrap();

        let rendered = chart.try_find_child("Db").unwrap().to_json().unwrap();
        let name = chart.allocate_name("Db");
        assert_eq!(rendered["metadata"]["name"], name);
        assert_eq!(rendered["spec"]["dbInstanceIdentifier"], name);
    }

    #[test]
    fn test_refs_resolve_to_earlier_resources() {
        let mut chart = Chart::new("test");
        adapter()
            .transform_resources(
                &mut chart,
                &[
                    SourceResource::new(
                        "Subnets",
                        "AWS::RDS::DBSubnetGroup",
                        json!({"dbSubnetGroupName": "db-subnets", "subnetIds": ["subnet-1"]}),
                    ),
                    rds("Db", json!({"dbSubnetGroupName": {"Ref": "Subnets"}})),
                ],
            )
            .unwrap();

        let db = chart.try_find_child("Db").unwrap();
        assert_eq!(db.field("spec").unwrap()["dbSubnetGroupName"], "db-subnets");
    }

    #[test]
    fn test_forward_ref_fails() {
        let mut chart = Chart::new("test");
        let err = adapter()
            .transform_resources(
                &mut chart,
                &[
                    rds("Db", json!({"dbSubnetGroupName": {"Ref": "Subnets"}})),
                    SourceResource::new("Subnets", "AWS::RDS::DBSubnetGroup", json!({})),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { ref target, .. } if target == "Subnets"));
    }

    #[test]
    fn test_unmapped_type_aborts_before_producing_anything() {
        let mut chart = Chart::new("test");
        let err = adapter()
            .transform_resources(
                &mut chart,
                &[SourceResource::new("Thing", "Z::W::Thing", json!({}))],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnmappedResourceType { ref resource_type, ref logical_id }
                if resource_type == "Z::W::Thing" && logical_id == "Thing"
        ));
        assert!(chart.api_objects().is_empty());
    }

    #[test]
    fn test_exports_registered_per_resource() {
        let mut chart = Chart::new("test");
        let mut adapter = adapter();
        adapter
            .transform_resources(&mut chart, &[rds("Db", json!({"dbInstanceIdentifier": "orders"}))])
            .unwrap();

        assert_eq!(adapter.exports().len(), 2);
        let address = adapter.exports().find("Db", "Endpoint.Address").unwrap();
        assert_eq!(address.target.name, "orders");
        assert!(chart.try_find_child("DbConfigMap").is_some());
    }

    #[test]
    fn test_attribute_phase_counts_patches() {
        let mut tokens = TokenTable::new();
        let address = tokens.get_att("Db", "Endpoint.Address");
        let port = tokens.get_att("Db", "Endpoint.Port");

        let mut chart = Chart::new("test");
        let mut adapter = adapter();
        adapter
            .transform_resources(&mut chart, &[rds("Db", json!({"dbInstanceIdentifier": "orders"}))])
            .unwrap();
        chart
            .add(
                ApiObject::from_manifest(
                    "App",
                    json!({
                        "apiVersion": "batch/v1",
                        "kind": "Job",
                        "metadata": {"name": "migrate"},
                        "spec": {"template": {"spec": {"containers": [{
                            "name": "migrate",
                            "env": [
                                {"name": "DB_HOST", "value": address},
                                {"name": "DB_PORT", "value": port}
                            ]
                        }]}}}
                    }),
                )
                .unwrap(),
            )
            .unwrap();

        assert_eq!(adapter.transform_attributes(&mut chart, &tokens).unwrap(), 4);
        assert_eq!(adapter.transform_attributes(&mut chart, &tokens).unwrap(), 0);
    }

    struct ArnMapper;

    impl ResourceMapper for ArnMapper {
        fn resource_type(&self) -> &'static str {
            "Test::Arn::Consumer"
        }

        fn name_mapping(&self) -> NameMapping {
            NameMapping {
                cfn_property: "name",
                spec_path: "/spec/name",
            }
        }

        fn ref_mapping(&self) -> ackbridge_mappers::RefMapping {
            ackbridge_mappers::RefMapping::Arn
        }

        fn target_kind(&self) -> &'static str {
            "Consumer"
        }

        fn map(&self, _chart: &mut Chart, logical_id: &str, _properties: &Value) -> Result<ApiObject> {
            Ok(ApiObject::new(
                logical_id,
                kube::core::GroupVersionKind::gvk("test", "v1", "Consumer"),
            ))
        }
    }

    #[test]
    fn test_arn_mode_mapper_fails_on_ref() {
        let mut registry = MapperRegistry::with_defaults();
        registry.register(ArnMapper);
        let mut chart = Chart::new("test");
        let err = Adapter::new(registry)
            .transform_resources(
                &mut chart,
                &[
                    rds("Db", json!({})),
                    SourceResource::new("C", "Test::Arn::Consumer", json!({"db": {"Ref": "Db"}})),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedReferenceMode { .. }));
    }
}
