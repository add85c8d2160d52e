//! ACK custom resource kinds produced by the mappers

use kube::core::GroupVersionKind;

/// Version every targeted ACK controller serves
pub const ACK_VERSION: &str = "v1alpha1";

/// ACK kinds the built-in mappers and the export binder emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AckKind {
    /// DBInstance (rds.services.k8s.aws)
    DbInstance,
    /// DBSubnetGroup (rds.services.k8s.aws)
    DbSubnetGroup,
    /// SecurityGroup (ec2.services.k8s.aws)
    SecurityGroup,
    /// Policy (iam.services.k8s.aws)
    Policy,
    /// Role (iam.services.k8s.aws)
    Role,
    /// Function (lambda.services.k8s.aws)
    Function,
    /// Bucket (s3.services.k8s.aws)
    Bucket,
    /// FieldExport (services.k8s.aws)
    FieldExport,
}

/// All AckKind variants for iteration.
pub const ALL_ACK_KINDS: &[AckKind] = &[
    AckKind::DbInstance,
    AckKind::DbSubnetGroup,
    AckKind::SecurityGroup,
    AckKind::Policy,
    AckKind::Role,
    AckKind::Function,
    AckKind::Bucket,
    AckKind::FieldExport,
];

impl AckKind {
    /// API group.
    pub fn group(&self) -> &'static str {
        match self {
            Self::DbInstance | Self::DbSubnetGroup => "rds.services.k8s.aws",
            Self::SecurityGroup => "ec2.services.k8s.aws",
            Self::Policy | Self::Role => "iam.services.k8s.aws",
            Self::Function => "lambda.services.k8s.aws",
            Self::Bucket => "s3.services.k8s.aws",
            Self::FieldExport => "services.k8s.aws",
        }
    }

    /// Kubernetes Kind string.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::DbInstance => "DBInstance",
            Self::DbSubnetGroup => "DBSubnetGroup",
            Self::SecurityGroup => "SecurityGroup",
            Self::Policy => "Policy",
            Self::Role => "Role",
            Self::Function => "Function",
            Self::Bucket => "Bucket",
            Self::FieldExport => "FieldExport",
        }
    }

    /// Full group/version/kind.
    pub fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::gvk(self.group(), ACK_VERSION, self.kind_str())
    }
}
