//! AWS::S3::Bucket → Bucket
//!
//! Lambda notification configurations are carried over with their key filters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ackbridge_common::{ApiObject, Chart, Result};

use crate::ack::AckKind;
use crate::mapper::{parse_properties, NameMapping, ResourceMapper};

const RESOURCE_TYPE: &str = "AWS::S3::Bucket";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfnBucketProps {
    bucket_name: Option<String>,
    notification_configuration: Option<CfnNotificationConfiguration>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfnNotificationConfiguration {
    #[serde(default)]
    lambda_configurations: Vec<CfnLambdaConfiguration>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfnLambdaConfiguration {
    event: String,
    function: String,
    filter: Option<CfnNotificationFilter>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfnNotificationFilter {
    s3_key: Option<CfnS3KeyFilter>,
}

#[derive(Debug, Deserialize)]
struct CfnS3KeyFilter {
    #[serde(default)]
    rules: Vec<FilterRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FilterRule {
    name: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct BucketSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification: Option<Notification>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Notification {
    lambda_function_configurations: Vec<LambdaFunctionConfiguration>,
}

#[derive(Debug, Serialize)]
struct LambdaFunctionConfiguration {
    events: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<NotificationFilter>,
    #[serde(rename = "lambdaFunctionARN")]
    lambda_function_arn: String,
}

#[derive(Debug, Serialize)]
struct NotificationFilter {
    key: KeyFilter,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyFilter {
    filter_rules: Vec<FilterRule>,
}

/// Maps S3 buckets
#[derive(Debug, Default, Clone, Copy)]
pub struct S3BucketMapper;

impl ResourceMapper for S3BucketMapper {
    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn name_mapping(&self) -> NameMapping {
        NameMapping {
            cfn_property: "bucketName",
            spec_path: "/spec/name",
        }
    }

    fn target_kind(&self) -> &'static str {
        AckKind::Bucket.kind_str()
    }

    fn map(&self, _chart: &mut Chart, logical_id: &str, properties: &Value) -> Result<ApiObject> {
        let props: CfnBucketProps = parse_properties(logical_id, RESOURCE_TYPE, properties)?;

        let configurations: Vec<LambdaFunctionConfiguration> = props
            .notification_configuration
            .map(|n| n.lambda_configurations)
            .unwrap_or_default()
            .into_iter()
            .map(|config| LambdaFunctionConfiguration {
                events: vec![config.event],
                filter: config
                    .filter
                    .and_then(|f| f.s3_key)
                    .map(|key| NotificationFilter {
                        key: KeyFilter {
                            filter_rules: key.rules,
                        },
                    }),
                lambda_function_arn: config.function,
            })
            .collect();

        let spec = BucketSpec {
            name: props.bucket_name.clone(),
            notification: (!configurations.is_empty()).then(|| Notification {
                lambda_function_configurations: configurations,
            }),
        };

        ApiObject::new(logical_id, AckKind::Bucket.gvk())
            .with_name(props.bucket_name)
            .with_spec(&spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lambda_notifications_mapped() {
        let mut chart = Chart::new("test");
        let obj = S3BucketMapper
            .map(
                &mut chart,
                "Uploads",
                &json!({
                    "bucketName": "uploads",
                    "notificationConfiguration": {
                        "lambdaConfigurations": [{
                            "event": "s3:ObjectCreated:*",
                            "function": "arn:aws:lambda:us-east-1:123:function:thumbs",
                            "filter": {"s3Key": {"rules": [{"name": "suffix", "value": ".png"}]}}
                        }]
                    }
                }),
            )
            .unwrap();

        let config = &obj.field("spec").unwrap()["notification"]["lambdaFunctionConfigurations"][0];
        assert_eq!(config["events"], json!(["s3:ObjectCreated:*"]));
        assert_eq!(
            config["lambdaFunctionARN"],
            "arn:aws:lambda:us-east-1:123:function:thumbs"
        );
        assert_eq!(
            config["filter"]["key"]["filterRules"],
            json!([{"name": "suffix", "value": ".png"}])
        );
    }

    #[test]
    fn test_plain_bucket_has_no_notification() {
        let mut chart = Chart::new("test");
        let obj = S3BucketMapper
            .map(&mut chart, "Plain", &json!({"bucketName": "plain"}))
            .unwrap();
        assert_eq!(obj.field("spec"), Some(&json!({"name": "plain"})));
    }

    #[test]
    fn test_notification_without_filter() {
        let mut chart = Chart::new("test");
        let obj = S3BucketMapper
            .map(
                &mut chart,
                "Uploads",
                &json!({
                    "notificationConfiguration": {
                        "lambdaConfigurations": [{"event": "s3:ObjectRemoved:*", "function": "fn"}]
                    }
                }),
            )
            .unwrap();
        let config = &obj.field("spec").unwrap()["notification"]["lambdaFunctionConfigurations"][0];
        assert!(config.get("filter").is_none());
    }
}
