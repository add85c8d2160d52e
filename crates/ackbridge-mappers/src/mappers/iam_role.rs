//! AWS::IAM::Role → Role
//!
//! Inline policies collapse into the list of their names.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ackbridge_common::{ApiObject, Chart, Result};

use crate::ack::AckKind;
use crate::mapper::{parse_properties, NameMapping, ResourceMapper};
use crate::mappers::iam_policy::document_string;

const RESOURCE_TYPE: &str = "AWS::IAM::Role";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfnRoleProps {
    role_name: Option<String>,
    assume_role_policy_document: Option<Value>,
    description: Option<String>,
    max_session_duration: Option<i64>,
    path: Option<String>,
    #[serde(default)]
    policies: Vec<CfnInlinePolicy>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfnInlinePolicy {
    policy_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoleSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assume_role_policy_document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_session_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    policies: Vec<String>,
}

/// Maps IAM roles
#[derive(Debug, Default, Clone, Copy)]
pub struct IamRoleMapper;

impl ResourceMapper for IamRoleMapper {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn name_mapping(&self) -> NameMapping {
        NameMapping {
            cfn_property: "roleName",
            spec_path: "/spec/name",
        }
    }

    fn target_kind(&self) -> &'static str {
        AckKind::Role.kind_str()
    }

    fn map(&self, _chart: &mut Chart, logical_id: &str, properties: &Value) -> Result<ApiObject> {
        let props: CfnRoleProps = parse_properties(logical_id, RESOURCE_TYPE, properties)?;

        let spec = RoleSpec {
            name: props.role_name.clone(),
            assume_role_policy_document: props
                .assume_role_policy_document
                .as_ref()
                .map(document_string),
            description: props.description,
            max_session_duration: props.max_session_duration,
            path: props.path,
            policies: props.policies.into_iter().map(|p| p.policy_name).collect(),
        };

        ApiObject::new(logical_id, AckKind::Role.gvk())
            .with_name(props.role_name)
            .with_spec(&spec)
    }
}
