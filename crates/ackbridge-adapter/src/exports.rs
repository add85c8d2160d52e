//! Runtime attribute exports
//!
//! ACK publishes runtime-computed values (endpoints, ports) only in the status
//! of a reconciled resource. A `FieldExport` asks the ACK runtime to copy one
//! status field into a ConfigMap, the carrier, which consumers then read.
//! Every exported attribute of a resource lands in the same carrier.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use ackbridge_common::k8s::ConfigMap;
use ackbridge_common::{ApiObject, ApiObjectRef, Chart, Result, DEFAULT_NAMESPACE};
use ackbridge_mappers::{AckKind, ExportMapping};

/// Carrier kind understood by the FieldExport controller
const CONFIG_MAP_TARGET_KIND: &str = "configmap";

#[derive(Debug, Serialize)]
struct FieldExportSpec {
    from: FieldExportSource,
    to: FieldExportTarget,
}

#[derive(Debug, Serialize)]
struct FieldExportSource {
    path: String,
    resource: ApiObjectRef,
}

#[derive(Debug, Serialize)]
struct FieldExportTarget {
    kind: &'static str,
    name: String,
}

/// A registered export of one runtime attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDeclaration {
    /// Chart id of the FieldExport (`<logicalId><attribute>`)
    pub id: String,
    /// Logical id of the exporting source resource
    pub logical_id: String,
    /// CloudFormation attribute name
    pub attribute: String,
    /// Status field path the value is copied from
    pub field: String,
    /// Name of the FieldExport object
    pub name: String,
    /// Namespace of the FieldExport object
    pub namespace: String,
    /// Name of the carrier ConfigMap
    pub config_map_name: String,
    /// The ACK object whose status is exported
    pub target: ApiObjectRef,
}

impl ExportDeclaration {
    /// Key under which the FieldExport controller stores the value in the carrier
    pub fn config_map_key(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

/// Export declarations of a run, keyed by `(logical_id, attribute)`
#[derive(Debug, Default, Clone)]
pub struct ExportTable {
    declarations: BTreeMap<(String, String), ExportDeclaration>,
}

impl ExportTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration
    pub fn insert(&mut self, declaration: ExportDeclaration) {
        self.declarations.insert(
            (declaration.logical_id.clone(), declaration.attribute.clone()),
            declaration,
        );
    }

    /// Declaration for an attribute of a resource
    pub fn find(&self, logical_id: &str, attribute: &str) -> Option<&ExportDeclaration> {
        self.declarations
            .get(&(logical_id.to_string(), attribute.to_string()))
    }

    /// All declarations
    pub fn iter(&self) -> impl Iterator<Item = &ExportDeclaration> {
        self.declarations.values()
    }

    /// Number of declarations
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether nothing was exported
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Chart id of an attribute's FieldExport
pub fn field_export_id(logical_id: &str, attribute: &str) -> String {
    format!("{logical_id}{attribute}")
}

/// Status path a FieldExport reads from
pub fn field_export_path(field: &str) -> String {
    format!(".status.{field}")
}

/// Add the carrier and one FieldExport per mapping to the chart.
///
/// Every mapped resource gets a carrier, even with nothing to export.
/// Returns the declarations in mapping order.
pub fn bind_exports(
    chart: &mut Chart,
    logical_id: &str,
    target: &ApiObjectRef,
    mappings: &[ExportMapping],
) -> Result<Vec<ExportDeclaration>> {
    let carrier = ConfigMap::default().into_api_object(format!("{logical_id}ConfigMap"))?;
    let config_map_name = chart.add(carrier)?.name().to_string();

    let mut declarations = Vec::with_capacity(mappings.len());
    for mapping in mappings {
        let id = field_export_id(logical_id, mapping.attribute);
        let spec = FieldExportSpec {
            from: FieldExportSource {
                path: field_export_path(mapping.field),
                resource: target.clone(),
            },
            to: FieldExportTarget {
                kind: CONFIG_MAP_TARGET_KIND,
                name: config_map_name.clone(),
            },
        };
        let field_export = chart.add(
            ApiObject::new(id.clone(), AckKind::FieldExport.gvk()).with_spec(&spec)?,
        )?;

        let declaration = ExportDeclaration {
            id,
            logical_id: logical_id.to_string(),
            attribute: mapping.attribute.to_string(),
            field: mapping.field.to_string(),
            name: field_export.name().to_string(),
            namespace: field_export
                .namespace()
                .unwrap_or(DEFAULT_NAMESPACE)
                .to_string(),
            config_map_name: config_map_name.clone(),
            target: target.clone(),
        };
        debug!(
            logical_id = %logical_id,
            attribute = %declaration.attribute,
            field_export = %declaration.name,
            carrier = %declaration.config_map_name,
            "Registered field export"
        );
        declarations.push(declaration);
    }

    Ok(declarations)
}
