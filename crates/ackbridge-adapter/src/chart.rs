//! Chart that also hosts the source stack
//!
//! Source resources are declared directly on an `AckChart`: it holds the stack
//! as a collaborator and implements `ResourceScope` by forwarding to it.
//! `synth` then runs both adapter phases against its own target chart.

use serde_json::Value;
use tracing::info;

use ackbridge_common::{
    ApiObject, Chart, ResourceScope, Result, SourceResource, Stack, TokenTable,
};
use ackbridge_mappers::MapperRegistry;

use crate::adapter::Adapter;

/// Target chart plus the source stack whose resources it receives
pub struct AckChart {
    chart: Chart,
    stack: Stack,
    adapter: Adapter,
}

impl AckChart {
    /// Create a chart using the given registry
    pub fn new(name: impl Into<String>, registry: MapperRegistry) -> Self {
        Self::with_stack(Chart::new(name), Stack::new(), registry)
    }

    /// Create from an existing chart and stack
    pub fn with_stack(chart: Chart, stack: Stack, registry: MapperRegistry) -> Self {
        Self {
            chart,
            stack,
            adapter: Adapter::new(registry),
        }
    }

    /// The target chart
    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    /// The source stack
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Add a plain Kubernetes object, e.g. a workload consuming attributes
    pub fn add_manifest(&mut self, object: ApiObject) -> Result<&mut ApiObject> {
        self.chart.add(object)
    }

    /// Run both phases and render every object in chart order
    pub fn synth(mut self) -> Result<Vec<Value>> {
        let resources = self.stack.resources();
        self.adapter.transform_resources(&mut self.chart, resources)?;
        let patched = self
            .adapter
            .transform_attributes(&mut self.chart, self.stack.tokens())?;

        let docs = self.chart.synth()?;
        info!(
            chart = %self.chart.name(),
            objects = docs.len(),
            patches = patched,
            "Synthesized chart"
        );
        Ok(docs)
    }
}

impl ResourceScope for AckChart {
    fn add_resource(&mut self, resource: SourceResource) -> Result<()> {
        self.stack.add_resource(resource)
    }

    fn resources(&self) -> &[SourceResource] {
        self.stack.resources()
    }

    fn tokens(&self) -> &TokenTable {
        self.stack.tokens()
    }

    fn get_att(&mut self, logical_id: &str, attribute: &str) -> String {
        self.stack.get_att(logical_id, attribute)
    }
}
