//! Target chart: the ordered tree of produced manifests
//!
//! Objects are addressed by a chart-unique id. Objects added without an
//! explicit name get a stable DNS-label name derived from the chart name, the
//! id and a short hash of both, so regenerating a chart yields the same names.

use aws_lc_rs::digest::{digest, SHA256};
use serde_json::Value;

use crate::manifest::ApiObject;
use crate::{Error, Result};

/// Longest name Kubernetes accepts for most kinds
const MAX_NAME_LEN: usize = 63;

/// Ordered collection of manifests
#[derive(Clone, Debug, Default)]
pub struct Chart {
    name: String,
    namespace: Option<String>,
    objects: Vec<ApiObject>,
}

impl Chart {
    /// Create an empty chart
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            objects: Vec::new(),
        }
    }

    /// Default namespace for objects that do not set one
    pub fn with_namespace(mut self, namespace: Option<impl Into<String>>) -> Self {
        self.namespace = namespace.map(Into::into);
        self
    }

    /// Chart name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chart namespace, if any
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Add an object, assigning a name and namespace if it has none.
    ///
    /// Returns the stored object so callers can read the assigned name.
    pub fn add(&mut self, mut object: ApiObject) -> Result<&mut ApiObject> {
        if self.try_find_child(object.id()).is_some() {
            return Err(Error::DuplicateId {
                id: object.id().to_string(),
                chart: self.name.clone(),
            });
        }
        if object.metadata.name.as_deref().unwrap_or_default().is_empty() {
            object.metadata.name = Some(self.allocate_name(object.id()));
        }
        if object.metadata.namespace.is_none() {
            object.metadata.namespace = self.namespace.clone();
        }
        self.objects.push(object);
        let last = self.objects.len() - 1;
        Ok(&mut self.objects[last])
    }

    /// Object by id
    pub fn try_find_child(&self, id: &str) -> Option<&ApiObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    /// Objects in insertion order
    pub fn api_objects(&self) -> &[ApiObject] {
        &self.objects
    }

    /// Mutable objects in insertion order
    pub fn api_objects_mut(&mut self) -> &mut [ApiObject] {
        &mut self.objects
    }

    /// Render every object with its patches applied
    pub fn synth(&self) -> Result<Vec<Value>> {
        self.objects.iter().map(ApiObject::to_json).collect()
    }

    /// Name an unnamed object with the given id would receive
    pub fn allocate_name(&self, id: &str) -> String {
        let hash = digest(&SHA256, format!("{}/{}", self.name, id).as_bytes());
        let suffix: String = hash
            .as_ref()
            .iter()
            .take(4)
            .map(|b| format!("{:02x}", b))
            .collect();

        let parts: Vec<String> = [self.name.as_str(), id]
            .iter()
            .map(|c| dns_component(c))
            .filter(|c| !c.is_empty())
            .collect();

        let budget = MAX_NAME_LEN - suffix.len() - 1;
        let mut prefix = parts.join("-");
        if prefix.len() > budget {
            prefix.truncate(budget);
            while prefix.ends_with('-') {
                prefix.pop();
            }
        }

        if prefix.is_empty() {
            suffix
        } else {
            format!("{}-{}", prefix, suffix)
        }
    }
}

fn dns_component(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
