//! Process-wide node registration table.
//!
//! Hosts discover plugins through two parallel mappings: node id →
//! implementation and node id → display name. Both are views over one static
//! table built on first access and never mutated afterwards.

use super::{
    CheckTensorAllZeros, ImageSave, Inputs, Node, NodeError, SplitString, StringToCombo,
    SwitchBooleanString,
};
use crate::value::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

/// One registered node type.
pub struct NodeRegistration {
    pub id: &'static str,
    pub display_name: &'static str,
    pub create: fn() -> Box<dyn Node>,
}

impl NodeRegistration {
    const fn new(
        id: &'static str,
        display_name: &'static str,
        create: fn() -> Box<dyn Node>,
    ) -> Self {
        Self {
            id,
            display_name,
            create,
        }
    }
}

/// The registration table, in registration order.
pub struct Registry {
    entries: Vec<NodeRegistration>,
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(|| Registry {
    entries: vec![
        NodeRegistration::new("StringToCombo", "String to Combo", || {
            Box::new(StringToCombo)
        }),
        NodeRegistration::new("SwitchBooleanString", "Switch String", || {
            Box::new(SwitchBooleanString)
        }),
        NodeRegistration::new("ImageSave", "Pixit Image Save", || {
            Box::new(ImageSave::new())
        }),
        NodeRegistration::new("SplitString", "Pixit Split String", || {
            Box::new(SplitString)
        }),
        NodeRegistration::new(
            "CheckTensorAllZeros",
            "Pixit Check Tensor All Zeros",
            || Box::new(CheckTensorAllZeros),
        ),
    ],
});

/// The process-wide registry.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

impl Registry {
    pub fn entries(&self) -> &[NodeRegistration] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&NodeRegistration> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Node id → constructor.
    pub fn node_class_mappings(&self) -> BTreeMap<&'static str, fn() -> Box<dyn Node>> {
        self.entries.iter().map(|e| (e.id, e.create)).collect()
    }

    /// Node id → human-readable name.
    pub fn display_name_mappings(&self) -> BTreeMap<&'static str, &'static str> {
        self.entries
            .iter()
            .map(|e| (e.id, e.display_name))
            .collect()
    }

    pub fn create(&self, id: &str) -> Result<Box<dyn Node>, NodeError> {
        self.get(id)
            .map(|e| (e.create)())
            .ok_or_else(|| NodeError::UnknownNode(id.to_string()))
    }

    /// Instantiate `id`, validate `inputs` against its schema and run it.
    pub fn execute(&self, id: &str, inputs: Inputs) -> Result<Vec<Value>, NodeError> {
        let node = self.create(id)?;
        let inputs = node.schema().prepare(inputs)?;
        debug!(node = id, "executing");
        node.execute(&inputs)
    }
}

/// Shorthand for `registry().execute(id, inputs)`.
pub fn execute(id: &str, inputs: Inputs) -> Result<Vec<Value>, NodeError> {
    registry().execute(id, inputs)
}
