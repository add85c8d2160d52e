//! End-to-end synthesis tests
//!
//! Drive the full pipeline from an input document (or a programmatically
//! built chart) to rendered manifests.

use std::path::PathBuf;

use serde_json::{json, Value};

use ackbridge::config::SynthInput;
use ackbridge_adapter::AckChart;
use ackbridge_common::yaml::parse_yaml_multi;
use ackbridge_common::{ApiObject, Error, ResourceScope, SourceResource};
use ackbridge_mappers::MapperRegistry;

fn demo_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/rds-db-instance.yaml")
}

fn find<'a>(docs: &'a [Value], kind: &str) -> Vec<&'a Value> {
    docs.iter().filter(|d| d["kind"] == kind).collect()
}

fn consumer(env: Value) -> ApiObject {
    ApiObject::from_manifest(
        "Workload",
        json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": "workload"},
            "spec": {"template": {"spec": {"containers": [
                {"name": "main", "image": "app", "env": env}
            ]}}}
        }),
    )
    .unwrap()
}

// =============================================================================
// Demo document
// =============================================================================

#[test]
fn demo_document_wires_endpoint_into_workload() {
    let input = SynthInput::load(&demo_path()).unwrap();
    let docs = input
        .into_chart("rdsdbinstancechart", None, MapperRegistry::with_defaults())
        .unwrap()
        .synth()
        .unwrap();

    let instance = find(&docs, "DBInstance")[0];
    let name = instance["metadata"]["name"].as_str().unwrap();
    assert!(name.starts_with("rdsdbinstancechart-postgresqldatabaseinstance-"));
    assert_eq!(instance["spec"]["dbInstanceIdentifier"], name);
    assert_eq!(instance["spec"]["allocatedStorage"], 100);

    let subnet_group = find(&docs, "DBSubnetGroup")[0];
    assert_eq!(
        instance["spec"]["dbSubnetGroupName"],
        subnet_group["metadata"]["name"]
    );
    assert_eq!(subnet_group["spec"]["name"], subnet_group["metadata"]["name"]);

    let secret = find(&docs, "Secret")[0];
    assert_eq!(instance["spec"]["masterUserPassword"]["name"], secret["metadata"]["name"]);

    let exports = find(&docs, "FieldExport");
    assert_eq!(exports.len(), 2);
    let carrier = find(&docs, "ConfigMap")
        .into_iter()
        .find(|cm| cm["metadata"]["name"] == exports[0]["spec"]["to"]["name"])
        .unwrap();
    // the subnet group has a carrier of its own
    assert_eq!(find(&docs, "ConfigMap").len(), 2);
    for export in &exports {
        assert_eq!(export["spec"]["to"]["name"], carrier["metadata"]["name"]);
        assert_eq!(export["spec"]["from"]["resource"]["name"], name);
    }

    let workload = find(&docs, "Deployment")[0];
    let env = &workload["spec"]["template"]["spec"]["containers"][0]["env"];
    for (index, var) in ["DB_ADDRESS", "DB_PORT"].iter().enumerate() {
        assert_eq!(env[index]["name"], *var);
        assert!(env[index].get("value").is_none());
        let selector = &env[index]["valueFrom"]["configMapKeyRef"];
        assert_eq!(selector["name"], carrier["metadata"]["name"]);
        let key = format!("default.{}", exports[index]["metadata"]["name"].as_str().unwrap());
        assert_eq!(selector["key"], key);
    }
}

#[test]
fn demo_document_renders_as_yaml_stream() {
    let input = SynthInput::load(&demo_path()).unwrap();
    let rendered = ackbridge::commands::synth::synth(input, "demo", Some("apps")).unwrap();

    let docs = parse_yaml_multi(&rendered).unwrap();
    // workload, subnet group, secret, instance, two carriers, two field exports
    assert_eq!(docs.len(), 8);
    assert!(docs.iter().all(|d| d["metadata"]["namespace"] == "apps"));
    assert!(!rendered.contains("${Token["));
}

// =============================================================================
// Programmatic charts
// =============================================================================

#[test]
fn attribute_reference_reads_from_carrier() {
    let mut chart = AckChart::new("test", MapperRegistry::with_defaults());
    chart
        .add_resource(SourceResource::new(
            "Db",
            "AWS::RDS::DBInstance",
            json!({"engine": "postgres"}),
        ))
        .unwrap();
    let token = chart.get_att("Db", "Endpoint.Address");
    chart
        .add_manifest(consumer(json!([{"name": "DB_ADDR", "value": token}])))
        .unwrap();

    let docs = chart.synth().unwrap();
    let export = docs
        .iter()
        .find(|d| d["kind"] == "FieldExport" && d["spec"]["from"]["path"] == ".status.endpoint.address")
        .unwrap();
    let var = &find(&docs, "Deployment")[0]["spec"]["template"]["spec"]["containers"][0]["env"][0];
    assert_eq!(
        var["valueFrom"]["configMapKeyRef"]["key"],
        format!("default.{}", export["metadata"]["name"].as_str().unwrap())
    );
    assert_eq!(
        var["valueFrom"]["configMapKeyRef"]["name"],
        export["spec"]["to"]["name"]
    );
}

#[test]
fn unmapped_type_aborts_the_run() {
    let mut chart = AckChart::new("test", MapperRegistry::with_defaults());
    chart
        .add_resource(SourceResource::new("Bucket", "AWS::S3::Bucket", json!({})))
        .unwrap();
    chart
        .add_resource(SourceResource::new("Thing", "Z::W::Thing", json!({})))
        .unwrap();

    let err = chart.synth().unwrap_err();
    assert!(matches!(
        err,
        Error::UnmappedResourceType { ref resource_type, .. } if resource_type == "Z::W::Thing"
    ));
}

#[test]
fn join_intrinsic_aborts_with_property_path() {
    let mut chart = AckChart::new("test", MapperRegistry::with_defaults());
    chart
        .add_resource(SourceResource::new(
            "Bucket",
            "AWS::S3::Bucket",
            json!({"bucketName": {"Fn::Join": ["-", ["assets", "prod"]]}}),
        ))
        .unwrap();

    let err = chart.synth().unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedIntrinsic { ref path, ref logical_id, .. }
            if path == "/bucketName" && logical_id == "Bucket"
    ));
}

#[test]
fn attribute_without_export_aborts_the_run() {
    let mut chart = AckChart::new("test", MapperRegistry::with_defaults());
    chart
        .add_resource(SourceResource::new("Bucket", "AWS::S3::Bucket", json!({})))
        .unwrap();
    let token = chart.get_att("Bucket", "Arn");
    chart
        .add_manifest(consumer(json!([{"name": "BUCKET_ARN", "value": token}])))
        .unwrap();

    let err = chart.synth().unwrap_err();
    assert!(matches!(
        err,
        Error::UnresolvedAttributeReference { ref logical_id, ref attribute, ref consumer, .. }
            if logical_id == "Bucket" && attribute == "Arn" && consumer == "workload"
    ));
}

#[test]
fn synth_is_deterministic() {
    let render = || {
        let input = SynthInput::load(&demo_path()).unwrap();
        ackbridge::commands::synth::synth(input, "demo", None).unwrap()
    };
    assert_eq!(render(), render());
}
