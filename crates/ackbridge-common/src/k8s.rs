//! Core Kubernetes types produced or inspected during translation

use std::collections::BTreeMap;

use kube::core::GroupVersionKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::manifest::ApiObject;
use crate::Result;

// =============================================================================
// ConfigMap and Secret
// =============================================================================

/// Kubernetes ConfigMap body
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigMap {
    /// String data
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl ConfigMap {
    /// Group/version/kind of a ConfigMap
    pub fn gvk() -> GroupVersionKind {
        GroupVersionKind::gvk("", "v1", "ConfigMap")
    }

    /// Add a data entry
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Wrap into a chart object with the given id
    pub fn into_api_object(self, id: impl Into<String>) -> Result<ApiObject> {
        let mut obj = ApiObject::new(id, Self::gvk());
        if !self.data.is_empty() {
            obj = obj.with_field("data", serde_json::to_value(self.data)?);
        }
        Ok(obj)
    }
}

/// Kubernetes Secret body
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    /// String data (auto-encoded to base64 by K8s)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub string_data: BTreeMap<String, String>,
    /// Secret type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
}

impl Default for Secret {
    fn default() -> Self {
        Self {
            string_data: BTreeMap::new(),
            type_: Some("Opaque".to_string()),
        }
    }
}

impl Secret {
    /// Group/version/kind of a Secret
    pub fn gvk() -> GroupVersionKind {
        GroupVersionKind::gvk("", "v1", "Secret")
    }

    /// Add a data entry
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.string_data.insert(key.into(), value.into());
        self
    }

    /// Wrap into a chart object with the given id
    pub fn into_api_object(self, id: impl Into<String>) -> Result<ApiObject> {
        let mut obj = ApiObject::new(id, Self::gvk());
        if let Value::Object(fields) = serde_json::to_value(self)? {
            for (key, value) in fields {
                obj = obj.with_field(key, value);
            }
        }
        Ok(obj)
    }
}

// =============================================================================
// Container environment
// =============================================================================

/// Environment variable as it appears in a container spec
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    /// Variable name
    pub name: String,
    /// Literal value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Indirect value source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_from: Option<EnvVarSource>,
}

impl EnvVar {
    /// Variable reading a key from a ConfigMap
    pub fn from_config_map(
        name: impl Into<String>,
        config_map: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: None,
            value_from: Some(EnvVarSource {
                config_map_key_ref: Some(ConfigMapKeySelector {
                    key: key.into(),
                    name: config_map.into(),
                }),
            }),
        }
    }
}

/// Indirect value source for an env var
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnvVarSource {
    /// ConfigMap key reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map_key_ref: Option<ConfigMapKeySelector>,
}

/// Selects one key of a ConfigMap
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigMapKeySelector {
    /// Key to read
    pub key: String,
    /// ConfigMap name
    pub name: String,
}
