//! AWS::IAM::Policy → Policy

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ackbridge_common::{ApiObject, Chart, Result};

use crate::ack::AckKind;
use crate::mapper::{parse_properties, NameMapping, ResourceMapper};

const RESOURCE_TYPE: &str = "AWS::IAM::Policy";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfnPolicyProps {
    policy_name: Option<String>,
    policy_document: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PolicySpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    policy_document: Option<String>,
}

/// Maps IAM policies
#[derive(Debug, Default, Clone, Copy)]
pub struct IamPolicyMapper;

impl ResourceMapper for IamPolicyMapper {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn name_mapping(&self) -> NameMapping {
        NameMapping {
            cfn_property: "policyName",
            spec_path: "/spec/name",
        }
    }

    fn target_kind(&self) -> &'static str {
        AckKind::Policy.kind_str()
    }

    fn map(&self, _chart: &mut Chart, logical_id: &str, properties: &Value) -> Result<ApiObject> {
        let props: CfnPolicyProps = parse_properties(logical_id, RESOURCE_TYPE, properties)?;

        let spec = PolicySpec {
            name: props.policy_name.clone(),
            policy_document: props.policy_document.as_ref().map(document_string),
        };

        ApiObject::new(logical_id, AckKind::Policy.gvk())
            .with_name(props.policy_name)
            .with_spec(&spec)
    }
}

/// ACK takes policy documents as JSON strings; CloudFormation allows objects
pub(crate) fn document_string(document: &Value) -> String {
    match document {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
