//! Translation of CloudFormation resources into ACK custom resources
//!
//! The `Adapter` runs in two phases over one chart:
//!
//! 1. **Mapping**: each source resource, in declaration order, has its `Ref`s
//!    resolved against objects already produced, is mapped by its registered
//!    `ResourceMapper`, and has its runtime attributes bound to a carrier
//!    ConfigMap through `FieldExport`s.
//! 2. **Attribute rewriting**: container env vars that hold `Fn::GetAtt`
//!    tokens are patched to read from the matching carrier key.
//!
//! `AckChart` bundles the chart with the source stack for callers that want
//! a single object to declare resources on and synthesize.

#![deny(missing_docs)]

pub mod adapter;
pub mod chart;
pub mod exports;
pub mod resolver;
pub mod rewriter;

pub use adapter::Adapter;
pub use chart::AckChart;
pub use exports::{ExportDeclaration, ExportTable};
pub use resolver::IntrinsicResolver;
pub use rewriter::AttributeRewriter;
