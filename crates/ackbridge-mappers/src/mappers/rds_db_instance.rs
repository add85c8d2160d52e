//! AWS::RDS::DBInstance → DBInstance
//!
//! The master password never lands in the ACK spec: it is moved into a
//! generated Secret and referenced by key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ackbridge_common::k8s::Secret;
use ackbridge_common::{ApiObject, Chart, Error, Result};

use crate::ack::AckKind;
use crate::mapper::{parse_properties, ExportMapping, NameMapping, ResourceMapper};

const RESOURCE_TYPE: &str = "AWS::RDS::DBInstance";

/// Key of the password inside the generated Secret
pub const PASSWORD_SECRET_KEY: &str = "password";

static EXPORTS: &[ExportMapping] = &[
    ExportMapping {
        field: "endpoint.address",
        attribute: "Endpoint.Address",
    },
    ExportMapping {
        field: "endpoint.port",
        attribute: "Endpoint.Port",
    },
];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfnDbInstanceProps {
    db_name: Option<String>,
    db_instance_identifier: Option<String>,
    db_cluster_identifier: Option<String>,
    db_instance_class: Option<String>,
    allocated_storage: Option<Value>,
    copy_tags_to_snapshot: Option<bool>,
    db_subnet_group_name: Option<String>,
    engine: Option<String>,
    engine_version: Option<String>,
    master_username: Option<String>,
    master_user_password: Option<String>,
    storage_type: Option<String>,
    #[serde(default)]
    db_security_groups: Vec<String>,
    #[serde(default)]
    vpc_security_groups: Vec<String>,
    character_set_name: Option<String>,
    multi_az: Option<bool>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct DbInstanceSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    db_instance_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_cluster_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_instance_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allocated_storage: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    copy_tags_to_snapshot: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_subnet_group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    engine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    engine_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    master_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    master_user_password: Option<SecretKeyReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    db_security_groups: Vec<String>,
    #[serde(rename = "vpcSecurityGroupIDs", skip_serializing_if = "Vec::is_empty")]
    vpc_security_group_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    character_set_name: Option<String>,
    #[serde(rename = "multiAZ", skip_serializing_if = "Option::is_none")]
    multi_az: Option<bool>,
}

#[derive(Debug, Serialize)]
struct SecretKeyReference {
    key: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
}

/// Maps RDS DB instances
#[derive(Debug, Default, Clone, Copy)]
pub struct RdsDbInstanceMapper;

impl RdsDbInstanceMapper {
    fn create_password_secret(
        chart: &mut Chart,
        logical_id: &str,
        password: &str,
    ) -> Result<SecretKeyReference> {
        let secret = Secret::default()
            .with_data(PASSWORD_SECRET_KEY, password)
            .into_api_object(format!("{logical_id}Secret"))?;
        let secret = chart.add(secret)?;
        Ok(SecretKeyReference {
            key: PASSWORD_SECRET_KEY.to_string(),
            name: secret.name().to_string(),
            namespace: secret.namespace().map(str::to_string),
        })
    }
}

impl ResourceMapper for RdsDbInstanceMapper {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn name_mapping(&self) -> NameMapping {
        NameMapping {
            cfn_property: "dbInstanceIdentifier",
            spec_path: "/spec/dbInstanceIdentifier",
        }
    }

    fn export_mappings(&self) -> &'static [ExportMapping] {
        EXPORTS
    }

    fn target_kind(&self) -> &'static str {
        AckKind::DbInstance.kind_str()
    }

    fn map(&self, chart: &mut Chart, logical_id: &str, properties: &Value) -> Result<ApiObject> {
        let props: CfnDbInstanceProps = parse_properties(logical_id, RESOURCE_TYPE, properties)?;

        let allocated_storage = props
            .allocated_storage
            .as_ref()
            .map(|v| parse_storage(logical_id, v))
            .transpose()?;

        let master_user_password = props
            .master_user_password
            .as_deref()
            .map(|password| Self::create_password_secret(chart, logical_id, password))
            .transpose()?;

        let spec = DbInstanceSpec {
            db_instance_identifier: props.db_instance_identifier.clone(),
            db_name: props.db_name,
            db_cluster_identifier: props.db_cluster_identifier,
            db_instance_class: props.db_instance_class,
            allocated_storage,
            copy_tags_to_snapshot: props.copy_tags_to_snapshot,
            db_subnet_group_name: props.db_subnet_group_name,
            engine: props.engine,
            engine_version: props.engine_version,
            master_username: props.master_username,
            master_user_password,
            storage_type: props.storage_type,
            db_security_groups: props.db_security_groups,
            vpc_security_group_ids: props.vpc_security_groups,
            character_set_name: props.character_set_name,
            multi_az: props.multi_az,
        };

        ApiObject::new(logical_id, AckKind::DbInstance.gvk())
            .with_name(props.db_instance_identifier)
            .with_spec(&spec)
    }
}

/// CloudFormation models storage as a string; ACK wants an integer
fn parse_storage(logical_id: &str, value: &Value) -> Result<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        Error::invalid_properties(
            logical_id,
            RESOURCE_TYPE,
            format!("allocatedStorage must be an integer, got {value}"),
        )
    })
}
