//! Intrinsic resolution for resource properties
//!
//! Walks a property tree depth-first and replaces every `{"Ref": id}` with the
//! name of the object already produced for `id`. Any `Fn::*` expression is
//! rejected: ACK has no way to evaluate them, and passing them through would
//! produce manifests the controller cannot reconcile.
//!
//! A value is an intrinsic candidate only if it is an object with exactly one
//! key; anything else is ordinary structured data.

use serde_json::{Map, Value};
use tracing::trace;

use ackbridge_common::{Chart, Error, Result, INTRINSIC_PREFIX, REF_KEY};
use ackbridge_mappers::RefMapping;

/// Resolves intrinsics in one resource's properties against a chart
pub struct IntrinsicResolver<'a> {
    chart: &'a Chart,
    logical_id: &'a str,
    resource_type: &'a str,
    ref_mapping: RefMapping,
}

impl<'a> IntrinsicResolver<'a> {
    /// Create a resolver for the resource `logical_id`
    pub fn new(
        chart: &'a Chart,
        logical_id: &'a str,
        resource_type: &'a str,
        ref_mapping: RefMapping,
    ) -> Self {
        Self {
            chart,
            logical_id,
            resource_type,
            ref_mapping,
        }
    }

    /// Resolve the whole tree, failing on the first unsupported expression
    pub fn resolve(&self, properties: &Value) -> Result<Value> {
        let mut path = Vec::new();
        self.resolve_value(properties, &mut path)
    }

    fn resolve_value(&self, value: &Value, path: &mut Vec<String>) -> Result<Value> {
        match value {
            Value::Object(fields) => match single_entry(fields) {
                Some((key, _)) if key.starts_with(INTRINSIC_PREFIX) => {
                    Err(Error::UnsupportedIntrinsic {
                        intrinsic: value.to_string(),
                        path: render_path(path),
                        logical_id: self.logical_id.to_string(),
                        resource_type: self.resource_type.to_string(),
                    })
                }
                Some((key, target)) if key == REF_KEY => self.resolve_ref(target, path),
                _ => self.resolve_object(fields, path),
            },
            Value::Array(items) => {
                let mut resolved = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    path.push(index.to_string());
                    resolved.push(self.resolve_value(item, path)?);
                    path.pop();
                }
                Ok(Value::Array(resolved))
            }
            scalar => Ok(scalar.clone()),
        }
    }

    fn resolve_object(&self, fields: &Map<String, Value>, path: &mut Vec<String>) -> Result<Value> {
        let mut resolved = Map::with_capacity(fields.len());
        for (key, field) in fields {
            path.push(key.clone());
            resolved.insert(key.clone(), self.resolve_value(field, path)?);
            path.pop();
        }
        Ok(Value::Object(resolved))
    }

    fn resolve_ref(&self, target: &Value, path: &[String]) -> Result<Value> {
        let target_id = match target {
            Value::String(id) => id.as_str(),
            other => {
                return Err(Error::invalid_properties(
                    self.logical_id,
                    self.resource_type,
                    format!("Ref at '{}' must name a logical id, got {other}", render_path(path)),
                ))
            }
        };

        let referenced = self.chart.try_find_child(target_id).ok_or_else(|| {
            Error::UnresolvedReference {
                target: target_id.to_string(),
                path: render_path(path),
                logical_id: self.logical_id.to_string(),
                resource_type: self.resource_type.to_string(),
            }
        })?;

        match self.ref_mapping {
            RefMapping::Name => {
                trace!(
                    logical_id = %self.logical_id,
                    target = %target_id,
                    name = %referenced.name(),
                    "Resolved Ref by name"
                );
                Ok(Value::String(referenced.name().to_string()))
            }
            RefMapping::Arn => Err(Error::UnsupportedReferenceMode {
                mode: self.ref_mapping.to_string(),
                logical_id: self.logical_id.to_string(),
                resource_type: self.resource_type.to_string(),
            }),
        }
    }
}

/// The only entry of a single-key object
pub(crate) fn single_entry(fields: &Map<String, Value>) -> Option<(&String, &Value)> {
    if fields.len() == 1 {
        fields.iter().next()
    } else {
        None
    }
}

fn render_path(path: &[String]) -> String {
    jsonptr::PointerBuf::from_tokens(path.iter().cloned()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ackbridge_common::ApiObject;
    use kube::core::GroupVersionKind;
    use rstest::rstest;
    use serde_json::json;

    fn chart_with_group() -> Chart {
        let mut chart = Chart::new("test");
        chart
            .add(
                ApiObject::new(
                    "Sg",
                    GroupVersionKind::gvk("ec2.services.k8s.aws", "v1alpha1", "SecurityGroup"),
                )
                .with_name(Some("db-access")),
            )
            .unwrap();
        chart
    }

    fn resolve(chart: &Chart, properties: Value) -> Result<Value> {
        IntrinsicResolver::new(chart, "Db", "AWS::RDS::DBInstance", RefMapping::Name)
            .resolve(&properties)
    }

    #[test]
    fn test_ref_resolves_to_name() {
        let chart = chart_with_group();
        let resolved = resolve(
            &chart,
            json!({"vpcSecurityGroups": [{"Ref": "Sg"}], "engine": "postgres"}),
        )
        .unwrap();
        assert_eq!(
            resolved,
            json!({"vpcSecurityGroups": ["db-access"], "engine": "postgres"})
        );
    }

    #[test]
    fn test_ref_to_unproduced_id_fails() {
        let chart = chart_with_group();
        let err = resolve(&chart, json!({"dbSubnetGroupName": {"Ref": "Later"}})).unwrap_err();
        assert!(matches!(
            err,
            Error::UnresolvedReference { ref target, ref path, .. }
                if target == "Later" && path == "/dbSubnetGroupName"
        ));
    }

    #[rstest]
    #[case(json!({"a": {"Fn::Join": ["", ["x", "y"]]}}), "/a")]
    #[case(json!({"a": [{"b": {"Fn::GetAtt": ["Sg", "GroupId"]}}]}), "/a/0/b")]
    #[case(json!({"a": {"b": {"c": {"d": {"Fn::Sub": "${AWS::Region}"}}}}}), "/a/b/c/d")]
    #[case(json!({"Fn::Select": [0, ["x"]]}), "")]
    fn test_intrinsics_rejected_at_any_depth(#[case] properties: Value, #[case] expected: &str) {
        let chart = chart_with_group();
        let err = resolve(&chart, properties).unwrap_err();
        assert!(
            matches!(err, Error::UnsupportedIntrinsic { ref path, .. } if path == expected),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_intrinsic_error_names_expression() {
        let chart = chart_with_group();
        let err = resolve(&chart, json!({"tags": {"Fn::Join": ["-", ["a", "b"]]}})).unwrap_err();
        let Error::UnsupportedIntrinsic { intrinsic, logical_id, .. } = err else {
            panic!("expected UnsupportedIntrinsic");
        };
        assert!(intrinsic.contains("Fn::Join"));
        assert_eq!(logical_id, "Db");
    }

    #[test]
    fn test_multi_key_objects_are_data() {
        let chart = chart_with_group();
        let data = json!({"doc": {"Ref": "Sg", "Other": 1}});
        assert_eq!(resolve(&chart, data.clone()).unwrap(), data);
    }

    #[test]
    fn test_other_single_key_objects_are_data() {
        let chart = chart_with_group();
        let data = json!({"tags": [{"Key": "team"}], "code": {"imageUri": "img"}});
        assert_eq!(resolve(&chart, data.clone()).unwrap(), data);
    }

    #[test]
    fn test_single_key_data_is_recursed() {
        let chart = chart_with_group();
        let resolved = resolve(&chart, json!({"outer": {"inner": {"Ref": "Sg"}}})).unwrap();
        assert_eq!(resolved, json!({"outer": {"inner": "db-access"}}));
    }

    #[test]
    fn test_scalars_pass_through() {
        let chart = chart_with_group();
        for value in [json!(null), json!(3), json!("x"), json!(true), json!([1, "a"])] {
            assert_eq!(resolve(&chart, value.clone()).unwrap(), value);
        }
    }

    #[test]
    fn test_arn_mode_fails_loudly() {
        let chart = chart_with_group();
        let err = IntrinsicResolver::new(&chart, "Fn", "AWS::Lambda::Function", RefMapping::Arn)
            .resolve(&json!({"role": {"Ref": "Sg"}}))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedReferenceMode { ref mode, .. } if mode == "arn"
        ));
    }

    #[test]
    fn test_non_string_ref_rejected() {
        let chart = chart_with_group();
        let err = resolve(&chart, json!({"a": {"Ref": 7}})).unwrap_err();
        assert!(matches!(err, Error::InvalidProperties { .. }));
    }
}
