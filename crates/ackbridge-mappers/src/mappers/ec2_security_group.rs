//! AWS::EC2::SecurityGroup → SecurityGroup

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ackbridge_common::{ApiObject, Chart, Result};

use crate::ack::AckKind;
use crate::mapper::{parse_properties, NameMapping, ResourceMapper};

const RESOURCE_TYPE: &str = "AWS::EC2::SecurityGroup";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfnSecurityGroupProps {
    group_name: Option<String>,
    group_description: Option<String>,
    vpc_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct SecurityGroupSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "vpcID", skip_serializing_if = "Option::is_none")]
    vpc_id: Option<String>,
}

/// Maps EC2 security groups
#[derive(Debug, Default, Clone, Copy)]
pub struct Ec2SecurityGroupMapper;

impl ResourceMapper for Ec2SecurityGroupMapper {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn name_mapping(&self) -> NameMapping {
        NameMapping {
            cfn_property: "groupName",
            spec_path: "/spec/name",
        }
    }

    fn target_kind(&self) -> &'static str {
        AckKind::SecurityGroup.kind_str()
    }

    fn map(&self, _chart: &mut Chart, logical_id: &str, properties: &Value) -> Result<ApiObject> {
        let props: CfnSecurityGroupProps = parse_properties(logical_id, RESOURCE_TYPE, properties)?;

        let spec = SecurityGroupSpec {
            name: props.group_name.clone(),
            description: props.group_description,
            vpc_id: props.vpc_id,
        };

        ApiObject::new(logical_id, AckKind::SecurityGroup.gvk())
            .with_name(props.group_name)
            .with_spec(&spec)
    }
}
