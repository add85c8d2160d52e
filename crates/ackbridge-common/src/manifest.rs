//! Target side manifest objects
//!
//! An `ApiObject` is a Kubernetes manifest held in a chart. Once produced it is
//! only edited through JSON patches, which are applied when it is rendered.

use json_patch::{AddOperation, PatchOperation, RemoveOperation};
use jsonptr::PointerBuf;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::core::GroupVersionKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Identity of a produced object, as other objects reference it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiObjectRef {
    /// API group (empty for core)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Kind
    pub kind: String,
    /// Object name
    pub name: String,
}

/// A manifest in the target chart
#[derive(Clone, Debug, PartialEq)]
pub struct ApiObject {
    id: String,
    gvk: GroupVersionKind,
    /// Object metadata
    pub metadata: ObjectMeta,
    body: Map<String, Value>,
    patches: Vec<PatchOperation>,
}

impl ApiObject {
    /// Create an object with the given chart id and kind
    pub fn new(id: impl Into<String>, gvk: GroupVersionKind) -> Self {
        Self {
            id: id.into(),
            gvk,
            metadata: ObjectMeta::default(),
            body: Map::new(),
            patches: Vec::new(),
        }
    }

    /// Set an explicit name
    pub fn with_name(mut self, name: Option<impl Into<String>>) -> Self {
        self.metadata.name = name.map(Into::into);
        self
    }

    /// Set a top-level body field (`spec`, `data`, ...)
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.body.insert(key.into(), value);
        self
    }

    /// Set `spec` from any serializable value
    pub fn with_spec<T: Serialize>(self, spec: &T) -> Result<Self> {
        let kind = self.gvk.kind.clone();
        let value =
            serde_json::to_value(spec).map_err(|e| Error::serialization_for(kind, e.to_string()))?;
        Ok(self.with_field("spec", value))
    }

    /// Build an object from a full manifest (`apiVersion`, `kind`, `metadata`, ...)
    pub fn from_manifest(id: impl Into<String>, manifest: Value) -> Result<Self> {
        let Value::Object(mut fields) = manifest else {
            return Err(Error::serialization("manifest must be an object"));
        };
        let api_version = take_string(&mut fields, "apiVersion")?;
        let kind = take_string(&mut fields, "kind")?;
        let (group, version) = match api_version.split_once('/') {
            Some((group, version)) => (group.to_string(), version.to_string()),
            None => (String::new(), api_version),
        };
        let metadata = match fields.remove("metadata") {
            Some(meta) => serde_json::from_value(meta)
                .map_err(|e| Error::serialization_for(kind.clone(), e.to_string()))?,
            None => ObjectMeta::default(),
        };
        Ok(Self {
            id: id.into(),
            gvk: GroupVersionKind::gvk(&group, &version, &kind),
            metadata,
            body: fields,
            patches: Vec::new(),
        })
    }

    /// Chart-unique id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Kind (e.g. `Deployment`)
    pub fn kind(&self) -> &str {
        &self.gvk.kind
    }

    /// API group, `None` for the core group
    pub fn api_group(&self) -> Option<&str> {
        Some(self.gvk.group.as_str()).filter(|g| !g.is_empty())
    }

    /// `apiVersion` string
    pub fn api_version(&self) -> String {
        self.gvk.api_version()
    }

    /// Assigned name; empty until the object is added to a chart
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    /// Namespace, if set
    pub fn namespace(&self) -> Option<&str> {
        self.metadata.namespace.as_deref()
    }

    /// Unpatched body field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// Reference to this object
    pub fn object_ref(&self) -> ApiObjectRef {
        ApiObjectRef {
            group: self.api_group().map(str::to_string),
            kind: self.gvk.kind.clone(),
            name: self.name().to_string(),
        }
    }

    /// Queue a patch applied on render
    pub fn add_json_patch(&mut self, op: PatchOperation) {
        self.patches.push(op);
    }

    /// Queued patches
    pub fn patches(&self) -> &[PatchOperation] {
        &self.patches
    }

    /// Render the object and apply queued patches
    pub fn to_json(&self) -> Result<Value> {
        let mut doc = Map::new();
        doc.insert("apiVersion".to_string(), Value::String(self.api_version()));
        doc.insert("kind".to_string(), Value::String(self.gvk.kind.clone()));
        doc.insert("metadata".to_string(), serde_json::to_value(&self.metadata)?);
        for (key, value) in &self.body {
            doc.insert(key.clone(), value.clone());
        }

        let mut doc = Value::Object(doc);
        json_patch::patch(&mut doc, &self.patches).map_err(|e| Error::Patch {
            object: self.id.clone(),
            message: e.to_string(),
        })?;
        Ok(doc)
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Result<String> {
    match fields.remove(key) {
        Some(Value::String(s)) => Ok(s),
        _ => Err(Error::serialization(format!("manifest is missing '{key}'"))),
    }
}

/// Build a JSON pointer from path tokens
pub fn pointer<I, T>(tokens: I) -> PointerBuf
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    PointerBuf::from_tokens(tokens.into_iter().map(|t| t.to_string()))
}

/// Parse a `/`-separated pointer string, mapping errors into ours
pub fn parse_pointer(path: &str) -> Result<PointerBuf> {
    PointerBuf::parse(path)
        .map_err(|e| Error::serialization(format!("invalid JSON pointer '{path}': {e}")))
}

/// `add` patch operation
pub fn add_op(path: PointerBuf, value: Value) -> PatchOperation {
    PatchOperation::Add(AddOperation { path, value })
}

/// `remove` patch operation
pub fn remove_op(path: PointerBuf) -> PatchOperation {
    PatchOperation::Remove(RemoveOperation { path })
}
