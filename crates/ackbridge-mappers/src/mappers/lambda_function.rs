//! AWS::Lambda::Function → Function

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ackbridge_common::{ApiObject, Chart, Result};

use crate::ack::AckKind;
use crate::mapper::{parse_properties, NameMapping, ResourceMapper};

const RESOURCE_TYPE: &str = "AWS::Lambda::Function";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfnFunctionProps {
    function_name: Option<String>,
    #[serde(default)]
    code: CfnCode,
    role: Option<String>,
    handler: Option<String>,
    runtime: Option<String>,
    description: Option<String>,
    timeout: Option<i64>,
    memory_size: Option<i64>,
    package_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfnCode {
    image_uri: Option<String>,
    s3_bucket: Option<String>,
    s3_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FunctionSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    code: FunctionCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    handler: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    runtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    package_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FunctionCode {
    #[serde(rename = "imageURI", skip_serializing_if = "Option::is_none")]
    image_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    s3_bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    s3_key: Option<String>,
}

/// Maps Lambda functions
#[derive(Debug, Default, Clone, Copy)]
pub struct LambdaFunctionMapper;

impl ResourceMapper for LambdaFunctionMapper {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn name_mapping(&self) -> NameMapping {
        NameMapping {
            cfn_property: "functionName",
            spec_path: "/spec/name",
        }
    }

    fn target_kind(&self) -> &'static str {
        AckKind::Function.kind_str()
    }

    fn map(&self, _chart: &mut Chart, logical_id: &str, properties: &Value) -> Result<ApiObject> {
        let props: CfnFunctionProps = parse_properties(logical_id, RESOURCE_TYPE, properties)?;

        let spec = FunctionSpec {
            name: props.function_name.clone(),
            code: FunctionCode {
                image_uri: props.code.image_uri,
                s3_bucket: props.code.s3_bucket,
                s3_key: props.code.s3_key,
            },
            role: props.role,
            handler: props.handler,
            runtime: props.runtime,
            description: props.description,
            timeout: props.timeout,
            memory_size: props.memory_size,
            package_type: props.package_type,
        };

        ApiObject::new(logical_id, AckKind::Function.gvk())
            .with_name(props.function_name)
            .with_spec(&spec)
    }
}
