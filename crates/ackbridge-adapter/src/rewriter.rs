//! Attribute rewriting for workload containers
//!
//! A consumer that read a runtime attribute (`Fn::GetAtt`) of a source
//! resource ends up with an unresolved token as a literal env var value. The
//! rewriter swaps each such variable for one that reads the exported value from
//! the resource's carrier ConfigMap.
//!
//! Only container env vars are rewritten: they are the one place Kubernetes
//! lets a manifest read a value from a ConfigMap. Tokens anywhere else stay in
//! place.

use json_patch::PatchOperation;
use serde_json::Value;
use tracing::{debug, warn};

use ackbridge_common::k8s::EnvVar;
use ackbridge_common::manifest::{add_op, pointer, remove_op};
use ackbridge_common::token::FN_GET_ATT;
use ackbridge_common::{ApiObject, Error, Result, TokenResolver};

use crate::exports::ExportTable;
use crate::resolver::single_entry;

/// Path to the container list for kinds that embed a pod spec
pub fn containers_path(kind: &str) -> Option<&'static [&'static str]> {
    match kind {
        "Pod" => Some(&["spec", "containers"]),
        "Deployment" | "StatefulSet" | "DaemonSet" | "Job" | "ReplicaSet" => {
            Some(&["spec", "template", "spec", "containers"])
        }
        "CronJob" => Some(&["spec", "jobTemplate", "spec", "template", "spec", "containers"]),
        _ => None,
    }
}

/// Rewrites attribute tokens in consumer containers into carrier lookups
pub struct AttributeRewriter<'a> {
    tokens: &'a dyn TokenResolver,
    exports: &'a ExportTable,
}

impl<'a> AttributeRewriter<'a> {
    /// Create a rewriter over the exports registered during mapping
    pub fn new(tokens: &'a dyn TokenResolver, exports: &'a ExportTable) -> Self {
        Self { tokens, exports }
    }

    /// Patches that rewrite every attribute reference in `object`.
    ///
    /// Works on the rendered object, so variables already rewritten by an
    /// earlier pass produce no patches.
    pub fn rewrite(&self, object: &ApiObject) -> Result<Vec<PatchOperation>> {
        let Some(path) = containers_path(object.kind()) else {
            return Ok(Vec::new());
        };

        let rendered = object.to_json()?;
        let Some(containers) = path
            .iter()
            .try_fold(&rendered, |value, key| value.get(*key))
        else {
            return Ok(Vec::new());
        };
        let Some(containers) = containers.as_array() else {
            return Ok(Vec::new());
        };

        let mut ops = Vec::new();
        for (i, container) in containers.iter().enumerate() {
            let Some(env) = container.get("env").and_then(Value::as_array) else {
                continue;
            };
            for (j, var) in env.iter().enumerate() {
                let name = var.get("name").and_then(Value::as_str).unwrap_or_default();
                // only literal string values are converted to valueFrom
                let Some(value) = var.get("value").and_then(Value::as_str) else {
                    continue;
                };
                let Some(replacement) = self.rewrite_var(object, name, value)? else {
                    continue;
                };
                debug!(
                    consumer = %object.name(),
                    container = container.get("name").and_then(serde_json::Value::as_str).unwrap_or_default(),
                    variable = %name,
                    "Rewriting env variable to read from field export"
                );
                let var_path = pointer(
                    path.iter()
                        .map(|s| s.to_string())
                        .chain([i.to_string(), "env".to_string(), j.to_string()]),
                );
                ops.push(remove_op(var_path.clone()));
                ops.push(add_op(var_path, serde_json::to_value(replacement)?));
            }
        }
        Ok(ops)
    }

    fn rewrite_var(&self, object: &ApiObject, name: &str, value: &str) -> Result<Option<EnvVar>> {
        if !self.tokens.is_unresolved(value) {
            return Ok(None);
        }

        let Some(Value::Object(resolved)) = self.tokens.resolve(value) else {
            warn!(
                consumer = %object.name(),
                variable = %name,
                "Env variable holds a token that is not an attribute reference, leaving as is"
            );
            return Ok(None);
        };
        let Some((key, args)) = single_entry(&resolved).filter(|(k, _)| k.starts_with(FN_GET_ATT))
        else {
            warn!(
                consumer = %object.name(),
                variable = %name,
                "Env variable holds an intrinsic other than Fn::GetAtt, leaving as is"
            );
            return Ok(None);
        };

        let (logical_id, attribute) = get_att_args(args).ok_or_else(|| {
            Error::serialization_for(
                object.kind(),
                format!(
                    "malformed {key} arguments {args} for env variable '{name}' in resource '{}'",
                    object.name()
                ),
            )
        })?;

        let export = self.exports.find(&logical_id, &attribute).ok_or_else(|| {
            Error::UnresolvedAttributeReference {
                logical_id: logical_id.clone(),
                attribute: attribute.clone(),
                consumer: object.name().to_string(),
                variable: name.to_string(),
            }
        })?;

        Ok(Some(EnvVar::from_config_map(
            name,
            export.config_map_name.clone(),
            export.config_map_key(),
        )))
    }
}

/// `[logicalId, attribute]`, or the `"logicalId.attribute"` shorthand
fn get_att_args(args: &Value) -> Option<(String, String)> {
    match args {
        Value::Array(items) => match items.as_slice() {
            [Value::String(id), Value::String(attr)] => Some((id.clone(), attr.clone())),
            _ => None,
        },
        Value::String(s) => s
            .split_once('.')
            .map(|(id, attr)| (id.to_string(), attr.to_string())),
        _ => None,
    }
}
