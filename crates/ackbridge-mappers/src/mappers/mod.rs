//! Built-in mappers, one per CloudFormation resource type

mod ec2_security_group;
mod iam_policy;
mod iam_role;
mod lambda_function;
mod rds_db_instance;
mod rds_db_subnet_group;
mod s3_bucket;

pub use ec2_security_group::Ec2SecurityGroupMapper;
pub use iam_policy::IamPolicyMapper;
pub use iam_role::IamRoleMapper;
pub use lambda_function::LambdaFunctionMapper;
pub use rds_db_instance::{RdsDbInstanceMapper, PASSWORD_SECRET_KEY};
pub use rds_db_subnet_group::RdsDbSubnetGroupMapper;
pub use s3_bucket::S3BucketMapper;
