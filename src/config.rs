//! Input document for `ackbridge synth`
//!
//! ```yaml
//! resources:
//!   - logicalId: Db
//!     type: AWS::RDS::DBInstance
//!     properties: {engine: postgres}
//! manifests:
//!   - apiVersion: apps/v1
//!     kind: Deployment
//!     ...
//! tokens:
//!   "${Token[TOKEN.0]}": {"Fn::GetAtt": [Db, Endpoint.Address]}
//! ```
//!
//! Manifests are added to the chart under `<kind><metadata.name>`, or
//! `Manifest<index>` when either is missing.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use ackbridge_adapter::AckChart;
use ackbridge_common::yaml::parse_yaml;
use ackbridge_common::{
    ApiObject, Chart, ResourceScope, SourceResource, Stack, TokenTable,
};
use ackbridge_mappers::MapperRegistry;

use crate::{Error, Result};

/// Parsed synth input
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SynthInput {
    /// Source resources in declaration order
    #[serde(default)]
    pub resources: Vec<SourceResource>,
    /// Plain Kubernetes objects, typically attribute consumers
    #[serde(default)]
    pub manifests: Vec<Value>,
    /// Tokens used by the manifests and the intrinsics they stand for
    #[serde(default)]
    pub tokens: TokenTable,
}

impl SynthInput {
    /// Parse from YAML text; an empty document is an empty input
    pub fn from_yaml(input: &str) -> Result<Self> {
        let value = parse_yaml(input)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|e| Error::input(e.to_string()))
    }

    /// Read and parse a file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let input = Self::from_yaml(&text)?;
        debug!(
            path = %path.display(),
            resources = input.resources.len(),
            manifests = input.manifests.len(),
            tokens = input.tokens.len(),
            "Loaded synth input"
        );
        Ok(input)
    }

    /// Build the chart: resources go to its stack, manifests straight into the chart
    pub fn into_chart(
        self,
        chart_name: &str,
        namespace: Option<&str>,
        registry: MapperRegistry,
    ) -> Result<AckChart> {
        let chart = Chart::new(chart_name).with_namespace(namespace);
        let mut stack = Stack::with_tokens(self.tokens);
        for resource in self.resources {
            stack.add_resource(resource)?;
        }

        let mut ack_chart = AckChart::with_stack(chart, stack, registry);
        for (index, manifest) in self.manifests.into_iter().enumerate() {
            let kind = manifest.get("kind").and_then(Value::as_str);
            let name = manifest.pointer("/metadata/name").and_then(Value::as_str);
            let id = match (kind, name) {
                (Some(kind), Some(name)) => format!("{kind}{name}"),
                _ => format!("Manifest{index}"),
            };
            ack_chart.add_manifest(ApiObject::from_manifest(id, manifest)?)?;
        }
        Ok(ack_chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ackbridge_common::TokenResolver;
    use serde_json::json;

    const INPUT: &str = r#"
resources:
  - logicalId: Db
    type: AWS::RDS::DBInstance
    properties:
      engine: postgres
manifests:
  - apiVersion: v1
    kind: ConfigMap
    metadata:
      name: settings
  - apiVersion: v1
    kind: ConfigMap
tokens:
  "${Token[TOKEN.0]}":
    Fn::GetAtt: [Db, Endpoint.Address]
"#;

    #[test]
    fn test_parses_all_sections() {
        let input = SynthInput::from_yaml(INPUT).unwrap();
        assert_eq!(input.resources.len(), 1);
        assert_eq!(input.resources[0].resource_type, "AWS::RDS::DBInstance");
        assert_eq!(input.manifests.len(), 2);
        assert_eq!(
            input.tokens.resolve("${Token[TOKEN.0]}"),
            Some(json!({"Fn::GetAtt": ["Db", "Endpoint.Address"]}))
        );
    }

    #[test]
    fn test_empty_document_is_empty_input() {
        let input = SynthInput::from_yaml("").unwrap();
        assert!(input.resources.is_empty());
        assert!(input.tokens.is_empty());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let err = SynthInput::from_yaml("resourcez: []").unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }

    #[test]
    fn test_manifest_ids() {
        let chart = SynthInput::from_yaml(INPUT)
            .unwrap()
            .into_chart("c", Some("apps"), MapperRegistry::with_defaults())
            .unwrap();
        let objects = chart.chart().api_objects();
        assert_eq!(objects[0].id(), "ConfigMapsettings");
        assert_eq!(objects[1].id(), "Manifest1");
        assert_eq!(objects[1].namespace(), Some("apps"));
        assert_eq!(chart.resources().len(), 1);
    }

    #[test]
    fn test_same_name_across_kinds() {
        let input = SynthInput::from_yaml(
            r#"
manifests:
  - {apiVersion: apps/v1, kind: Deployment, metadata: {name: app}}
  - {apiVersion: v1, kind: Service, metadata: {name: app}}
"#,
        )
        .unwrap();
        let chart = input
            .into_chart("c", None, MapperRegistry::with_defaults())
            .unwrap();
        let objects = chart.chart().api_objects();
        assert_eq!(objects[0].id(), "Deploymentapp");
        assert_eq!(objects[1].id(), "Serviceapp");
        assert!(objects.iter().all(|o| o.name() == "app"));
    }

    #[test]
    fn test_duplicate_logical_ids_rejected() {
        let input = SynthInput::from_yaml(
            r#"
resources:
  - {logicalId: B, type: "AWS::S3::Bucket"}
  - {logicalId: B, type: "AWS::S3::Bucket"}
"#,
        )
        .unwrap();
        let err = input
            .into_chart("c", None, MapperRegistry::with_defaults())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::Synth(ackbridge_common::Error::DuplicateLogicalId { .. })
        ));
    }
}
