//! AWS::RDS::DBSubnetGroup → DBSubnetGroup

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ackbridge_common::{ApiObject, Chart, Result};

use crate::ack::AckKind;
use crate::mapper::{parse_properties, NameMapping, ResourceMapper};

const RESOURCE_TYPE: &str = "AWS::RDS::DBSubnetGroup";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfnDbSubnetGroupProps {
    db_subnet_group_name: Option<String>,
    db_subnet_group_description: Option<String>,
    #[serde(default)]
    subnet_ids: Vec<String>,
    #[serde(default)]
    tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Tag {
    key: String,
    value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DbSubnetGroupSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "subnetIDs", skip_serializing_if = "Vec::is_empty")]
    subnet_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<Tag>,
}

/// Maps RDS subnet groups
#[derive(Debug, Default, Clone, Copy)]
pub struct RdsDbSubnetGroupMapper;

impl ResourceMapper for RdsDbSubnetGroupMapper {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn name_mapping(&self) -> NameMapping {
        NameMapping {
            cfn_property: "dbSubnetGroupName",
            spec_path: "/spec/name",
        }
    }

    fn target_kind(&self) -> &'static str {
        AckKind::DbSubnetGroup.kind_str()
    }

    fn map(&self, _chart: &mut Chart, logical_id: &str, properties: &Value) -> Result<ApiObject> {
        let props: CfnDbSubnetGroupProps = parse_properties(logical_id, RESOURCE_TYPE, properties)?;

        let spec = DbSubnetGroupSpec {
            name: props.db_subnet_group_name.clone(),
            description: props.db_subnet_group_description,
            subnet_ids: props.subnet_ids,
            tags: props.tags,
        };

        ApiObject::new(logical_id, AckKind::DbSubnetGroup.gvk())
            .with_name(props.db_subnet_group_name)
            .with_spec(&spec)
    }
}
